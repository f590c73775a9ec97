//! Query command - hybrid search with optional enhanced reranking

use clap::Args;

use crate::domain::knowledge::EntryType;
use crate::domain::rerank::RerankOptions;
use crate::domain::retrieval::{HybridQuery, RetrievalQuery};

#[derive(Args, Debug)]
pub struct QueryArgs {
    pub text: String,

    #[arg(long)]
    pub top_k: Option<usize>,

    #[arg(long)]
    pub min_score: Option<f32>,

    #[arg(long)]
    pub owner: Option<String>,

    #[arg(long)]
    pub scope: Option<String>,

    /// Restrict to entry types; repeatable
    #[arg(long = "type")]
    pub types: Vec<EntryType>,

    /// File ids to include in the hybrid search; repeatable
    #[arg(long = "file-id")]
    pub file_ids: Vec<String>,

    /// Blend similarity with type priority and recency
    #[arg(long)]
    pub enhanced: bool,
}

impl QueryArgs {
    fn into_parts(self, default_top_k: usize, default_min_score: f32) -> (HybridQuery, RerankOptions) {
        let base = RetrievalQuery {
            query: self.text,
            owner_id: self.owner,
            types: self.types,
            scope_id: self.scope,
            top_k: self.top_k.unwrap_or(default_top_k),
            min_score: self.min_score.unwrap_or(default_min_score),
        };
        let options = RerankOptions {
            enhanced: self.enhanced,
            ..RerankOptions::default()
        };

        (HybridQuery::new(base).with_file_ids(self.file_ids), options)
    }
}

/// Run the search and print the response as JSON
pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let service = crate::build_knowledge_service(&config).await?;

    let (query, options) = args.into_parts(config.retrieval.default_top_k, config.retrieval.min_score);
    let response = service.search(&query, &options).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
