use anyhow::Context;
use clap::Subcommand;
use sqlx::Executor;

use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;

/// Schema bootstrap baked into the binary at build time.
const SCHEMA_SQL: &str = include_str!("../../../sql/schema.sql");

#[derive(Subcommand)]
pub enum InitCommands {
    #[command(about = "Apply the schema to the configured database")]
    Schema {
        #[arg(long, help = "Read schema from a file instead of the embedded copy")]
        file: Option<std::path::PathBuf>,
    },
}

pub async fn handle(cmd: InitCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        InitCommands::Schema { file } => {
            let sql = match &file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => SCHEMA_SQL.to_string(),
            };

            let pool = DatabaseManager::main_pool()
                .await
                .context("failed to connect to database (is DATABASE_URL set?)")?;

            pool.execute(sql.as_str()).await.context("schema apply failed")?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "success": true, "applied": "schema" }))
                }
                OutputFormat::Text => println!("Schema applied."),
            }
            Ok(())
        }
    }
}
