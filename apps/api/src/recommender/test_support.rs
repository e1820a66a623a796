//! In-memory doubles for the recommender's collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::embedding::{Embedder, EmbeddingError};
use crate::recommender::similarity::{LookupError, SimilarityLookup};

const KEYWORD_DIMENSIONS: usize = 256;

/// Bag-of-words embedder: each lower-cased alphanumeric token adds 1.0 to an
/// FNV-1a bucket. Shared words give positive similarity, disjoint texts ~0.
#[derive(Default)]
pub struct KeywordEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

impl KeywordEmbedder {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keyword-test"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::Unavailable("test embedder offline".to_string()));
        }

        let mut vector = vec![0.0f32; KEYWORD_DIMENSIONS];
        for token in text
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = fnv1a(&token.to_ascii_lowercase()) as usize % KEYWORD_DIMENSIONS;
            vector[bucket] += 1.0;
        }
        Ok(vector)
    }
}

fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Returns a fixed similarity map (or a failure) and counts calls.
#[derive(Default)]
pub struct FixedLookup {
    scores: HashMap<i64, f64>,
    fail: bool,
    calls: AtomicUsize,
}

impl FixedLookup {
    pub fn new(scores: &[(i64, f64)]) -> Self {
        Self {
            scores: scores.iter().copied().collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimilarityLookup for FixedLookup {
    async fn lookup(
        &self,
        _candidate_id: i64,
        job_ids: &[i64],
    ) -> Result<HashMap<i64, f64>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LookupError::Unavailable("test lookup offline".to_string()));
        }
        Ok(job_ids
            .iter()
            .filter_map(|id| self.scores.get(id).map(|s| (*id, *s)))
            .collect())
    }
}
