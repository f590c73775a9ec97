//! Hybrid retrieval configuration

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Share of a hybrid result budget reserved for the knowledge base
pub const DEFAULT_KNOWLEDGE_RATIO: f64 = 0.7;

/// Indexed search over-fetches by this factor before trimming to `top_k`
pub const DEFAULT_CANDIDATE_MULTIPLIER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    pub knowledge_ratio: f64,
    pub candidate_multiplier: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            knowledge_ratio: DEFAULT_KNOWLEDGE_RATIO,
            candidate_multiplier: DEFAULT_CANDIDATE_MULTIPLIER,
        }
    }
}

// Absorbs float noise such as 10 * (1 - 0.7) = 3.0000000000000004
fn ceil_share(value: f64) -> usize {
    (value - 1e-9).ceil().max(0.0) as usize
}

impl HybridConfig {
    pub fn new(knowledge_ratio: f64) -> Self {
        Self {
            knowledge_ratio,
            ..Self::default()
        }
    }

    pub fn with_candidate_multiplier(mut self, multiplier: usize) -> Self {
        self.candidate_multiplier = multiplier;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.knowledge_ratio) {
            return Err(DomainError::configuration(format!(
                "knowledge_ratio must be within [0, 1], got {}",
                self.knowledge_ratio
            )));
        }

        if self.candidate_multiplier == 0 {
            return Err(DomainError::configuration(
                "candidate_multiplier must be at least 1",
            ));
        }

        Ok(())
    }

    /// Knowledge base share: `ceil(top_k * ratio)`, or all of `top_k` without files
    pub fn knowledge_share(&self, top_k: usize, file_count: usize) -> usize {
        if file_count == 0 {
            return top_k;
        }

        ceil_share(top_k as f64 * self.knowledge_ratio)
    }

    /// Per-file share: `ceil(top_k * (1 - ratio) / file_count)`
    pub fn file_share(&self, top_k: usize, file_count: usize) -> usize {
        if file_count == 0 {
            return 0;
        }

        ceil_share(top_k as f64 * (1.0 - self.knowledge_ratio) / file_count as f64)
    }

    /// Candidates requested from the indexed store for a final `top_k`
    pub fn candidates(&self, top_k: usize) -> usize {
        top_k.saturating_mul(self.candidate_multiplier.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_split_for_ten_with_one_file() {
        let config = HybridConfig::default();

        assert_eq!(config.knowledge_share(10, 1), 7);
        assert_eq!(config.file_share(10, 1), 3);
    }

    #[test]
    fn test_split_across_files_rounds_up() {
        let config = HybridConfig::default();

        assert_eq!(config.file_share(10, 2), 2);
        assert_eq!(config.file_share(10, 4), 1);
        assert_eq!(config.knowledge_share(5, 3), 4);
    }

    #[test]
    fn test_no_files_gives_full_budget_to_knowledge() {
        let config = HybridConfig::default();

        assert_eq!(config.knowledge_share(10, 0), 10);
        assert_eq!(config.file_share(10, 0), 0);
    }

    #[test]
    fn test_candidates_use_multiplier() {
        assert_eq!(HybridConfig::default().candidates(5), 10);
        assert_eq!(HybridConfig::default().with_candidate_multiplier(3).candidates(5), 15);
    }

    #[test]
    fn test_validate_ratio_bounds() {
        assert!(HybridConfig::new(1.2).validate().is_err());
        assert!(HybridConfig::new(-0.1).validate().is_err());
        assert!(HybridConfig::new(1.0).validate().is_ok());
        assert!(HybridConfig::default().with_candidate_multiplier(0).validate().is_err());
    }
}
