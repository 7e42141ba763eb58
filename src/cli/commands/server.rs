use anyhow::Context;
use clap::Subcommand;

use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health from the /health endpoint")]
    Health {
        #[arg(help = "Server URL (defaults to GIYA_API_URL or http://127.0.0.1:3000)")]
        url: Option<String>,
    },

    #[command(about = "Show server information from the API root endpoint")]
    Info {
        #[arg(help = "Server URL (defaults to GIYA_API_URL or http://127.0.0.1:3000)")]
        url: Option<String>,
    },
}

fn base_url(url: Option<String>) -> String {
    url.or_else(|| std::env::var("GIYA_API_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:3000".to_string())
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    match cmd {
        ServerCommands::Health { url } => {
            let url = format!("{}/health", base_url(url));
            let resp = client.get(&url).send().await.with_context(|| format!("GET {} failed", url))?;
            let status = resp.status();
            let body: serde_json::Value = resp.json().await.context("invalid JSON from server")?;

            match output_format {
                OutputFormat::Json => println!("{}", body),
                OutputFormat::Text => {
                    let db = body
                        .pointer("/data/database")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown");
                    println!("{} -> {} (database: {})", url, status, db);
                }
            }
            Ok(())
        }
        ServerCommands::Info { url } => {
            let url = base_url(url);
            let resp = client.get(&url).send().await.with_context(|| format!("GET {} failed", url))?;
            let body: serde_json::Value = resp.json().await.context("invalid JSON from server")?;

            match output_format {
                OutputFormat::Json => println!("{}", body),
                OutputFormat::Text => {
                    let name = body.pointer("/data/name").and_then(|v| v.as_str()).unwrap_or("?");
                    let version =
                        body.pointer("/data/version").and_then(|v| v.as_str()).unwrap_or("?");
                    println!("{} v{} at {}", name, version, url);
                }
            }
            Ok(())
        }
    }
}
