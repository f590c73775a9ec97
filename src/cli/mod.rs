//! CLI module for the knowledge retrieval service
//!
//! - `serve`: HTTP API server (default deployment)
//! - `ingest`: index one document from disk
//! - `query`: run a hybrid, reranked search and print the results

pub mod ingest;
pub mod query;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Knowledge Retrieval - ingest documents and curated knowledge, search them by meaning
#[derive(Parser)]
#[command(name = "knowledge-retrieval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Chunk, embed and index a document
    Ingest(ingest::IngestArgs),

    /// Search the index
    Query(query::QueryArgs),
}

/// Load `.env`, configuration files and environment, then install logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
