//! CampusDocs CLI — operational client for the file-storage layer.
//!
//! Configure through the environment (or a .env file): S3_BUCKET, S3_REGION
//! or AWS_REGION, optional S3_ENDPOINT for S3-compatible providers, and
//! optional STORAGE_PROVIDER (cloud|local) as the default provider.

use anyhow::Context;
use campusdocs_core::{FileCategory, Provider, StoreConfig};
use campusdocs_storage::create_file_store;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "campusdocs", about = "CampusDocs file-storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a document (syllabus, result, submission, or resource)
    Upload {
        /// Source reference: a local path, file:// URL, or http(s):// URL
        source: String,
        /// Original file name to store under
        name: String,
        /// MIME type of the content
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
        /// Category: syllabi, results, submissions, resources
        #[arg(long)]
        category: String,
        /// Provider override: cloud or local
        #[arg(long)]
        provider: Option<String>,
    },
    /// Delete a stored document by remote name
    Delete {
        /// Remote name returned by upload
        name: String,
        /// Provider override: cloud or local
        #[arg(long)]
        provider: Option<String>,
    },
    /// Resolve the public download URL for a remote name
    Url {
        /// Remote name returned by upload
        name: String,
        /// Provider override: cloud or local
        #[arg(long)]
        provider: Option<String>,
    },
}

/// Initialize tracing for the CLI.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize result")?;
    println!("{}", out);
    Ok(())
}

fn parse_provider(provider: Option<String>) -> anyhow::Result<Option<Provider>> {
    provider.map(|p| p.parse()).transpose()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = StoreConfig::from_env().context("Failed to read storage configuration")?;
    config
        .validate()
        .context("Invalid storage configuration. Set S3_BUCKET and S3_REGION (or AWS_REGION)")?;

    let store = create_file_store(&config)
        .await
        .context("Failed to construct file store")?;

    match cli.command {
        Commands::Upload {
            source,
            name,
            content_type,
            category,
            provider,
        } => {
            let category = FileCategory::from_str(&category)?;
            let provider = parse_provider(provider)?;
            let result = store
                .upload(&source, &name, &content_type, category, provider)
                .await;
            print_json(&result)?;
        }
        Commands::Delete { name, provider } => {
            let provider = parse_provider(provider)?;
            let result = store.delete(&name, provider).await;
            print_json(&result)?;
        }
        Commands::Url { name, provider } => {
            let provider = parse_provider(provider)?;
            let result = store.get_download_url(&name, provider).await;
            print_json(&result)?;
        }
    }

    Ok(())
}
