//! Local feature-hashing embedding provider

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
};
use crate::domain::vector::l2_normalize;
use crate::domain::DomainError;

pub const HASHING_MODEL: &str = "feature-hash-v1";
pub const DEFAULT_HASHING_DIMENSIONS: usize = 384;

/// Deterministic bag-of-words embedding that needs no model artifact
///
/// Each lowercase token is hashed with SHA-256 into a signed bucket; the result is
/// L2-normalized, so texts sharing vocabulary have positive cosine similarity.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimensions: usize) -> Result<Self, DomainError> {
        if dimensions == 0 {
            return Err(DomainError::configuration(
                "hashing embedding dimensions must be greater than 0",
            ));
        }
        Ok(Self { dimensions })
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in Self::tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        if let Some(requested) = request.dimensions() {
            if requested != self.dimensions {
                return Err(DomainError::dimension_mismatch(self.dimensions, requested));
            }
        }

        let mut tokens = 0u32;
        let data = request
            .inputs()
            .iter()
            .enumerate()
            .map(|(i, text)| {
                tokens += Self::tokens(text).count() as u32;
                Embedding::new(i, self.embed_text(text))
            })
            .collect();

        Ok(EmbeddingResponse::new(
            HASHING_MODEL,
            data,
            EmbeddingUsage::new(tokens, tokens),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "hashing"
    }

    fn default_model(&self) -> &'static str {
        HASHING_MODEL
    }

    fn dimensions(&self, _model: &str) -> Option<usize> {
        Some(self.dimensions)
    }
}
