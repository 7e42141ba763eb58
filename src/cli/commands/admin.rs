use anyhow::{bail, Context};
use clap::Subcommand;

use crate::auth;
use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;
use crate::services::account_service;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create an admin account")]
    Create {
        #[arg(help = "Admin email address")]
        email: String,
        #[arg(long, help = "Password (min 8 characters)")]
        password: String,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Create { email, password } => {
            account_service::validate_email(&email).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            account_service::validate_password(&password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

            let pool = DatabaseManager::main_pool()
                .await
                .context("failed to connect to database (is DATABASE_URL set?)")?;

            let exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE email = $1")
                .bind(email.to_lowercase())
                .fetch_one(&pool)
                .await?;
            if exists.0 > 0 {
                bail!("an account with email {} already exists", email);
            }

            let password_hash = auth::hash_password(&password).context("password hashing failed")?;

            let (id,): (uuid::Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO accounts (email, password_hash, role)
                VALUES ($1, $2, 'admin')
                RETURNING id
                "#,
            )
            .bind(email.to_lowercase())
            .bind(&password_hash)
            .fetch_one(&pool)
            .await?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "success": true, "account_id": id, "email": email })
                ),
                OutputFormat::Text => println!("Created admin account {} ({})", email, id),
            }
            Ok(())
        }
    }
}
