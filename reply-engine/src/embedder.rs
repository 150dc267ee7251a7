//! Offline embeddings: hashed bag of words.
//!
//! Lets the vector index run without an embedding server. Quality is far
//! below a real model but ordering by shared vocabulary still works.

use knowledge_store::{BoxFuture, EmbeddingsProvider, StoreError};

use crate::text::{is_stop_word, words};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(word: &str) -> u64 {
    word.bytes()
        .fold(FNV_OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Term-frequency vector over filtered words, hashed into `dim` buckets and
/// L2-normalized.
#[derive(Clone, Debug)]
pub struct BagOfWordsEmbedder {
    dim: usize,
}

impl BagOfWordsEmbedder {
    /// # Errors
    /// [`StoreError::Config`] when `dim` is zero.
    pub fn new(dim: usize) -> Result<Self, StoreError> {
        if dim == 0 {
            return Err(StoreError::Config("bag-of-words dimension must be > 0".into()));
        }
        Ok(Self { dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Synchronous embedding; a text without usable words maps to the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let terms: Vec<String> = words(text)
            .into_iter()
            .filter(|w| w.len() > 2 && !is_stop_word(w))
            .collect();
        let mut v = vec![0.0f32; self.dim];
        if terms.is_empty() {
            return v;
        }
        let total = terms.len() as f32;
        for t in &terms {
            let bucket = (fnv1a(t) % self.dim as u64) as usize;
            v[bucket] += 1.0 / total;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl EmbeddingsProvider for BagOfWordsEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
        Box::pin(async move { Ok(self.embed_text(text)) })
    }

    fn name(&self) -> &str {
        "bag-of-words"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowledge_store::cosine_similarity;

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(BagOfWordsEmbedder::new(0).is_err());
    }

    #[test]
    fn vectors_are_unit_length_and_deterministic() {
        let e = BagOfWordsEmbedder::new(64).expect("embedder");
        let a = e.embed_text("Refunds are processed within five business days");
        let b = e.embed_text("Refunds are processed within five business days");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn stop_words_only_give_zero_vector() {
        let e = BagOfWordsEmbedder::new(16).expect("embedder");
        assert!(e.embed_text("the and of a").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn shared_vocabulary_is_closer() {
        let e = BagOfWordsEmbedder::new(256).expect("embedder");
        let q = e.embed_text("refund for my order");
        let near = e.embed_text("how to request a refund for an order");
        let far = e.embed_text("dark mode toggle settings");
        assert!(cosine_similarity(&q, &near) > cosine_similarity(&q, &far));
    }

    #[tokio::test]
    async fn provider_trait_delegates() {
        let e = BagOfWordsEmbedder::new(32).expect("embedder");
        let v = e.embed("password reset").await.expect("embed");
        assert_eq!(v, e.embed_text("password reset"));
        assert_eq!(e.name(), "bag-of-words");
    }
}
