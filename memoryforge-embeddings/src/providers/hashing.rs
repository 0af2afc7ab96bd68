//! A deterministic hashing embedder: no model, no I/O, always succeeds.
//!
//! Terms are hashed into fixed buckets (FNV-1a) and weighted by term
//! frequency, then L2-normalized. Used both as the local provider's actual
//! implementation and as the degradation chain's last resort, so the engine
//! always gets a vector back even with no configured backend reachable.

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::traits::EmbeddingProvider;

pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimension];
        }

        let mut counts = std::collections::HashMap::new();
        for tok in &tokens {
            *counts.entry(tok.clone()).or_insert(0.0f32) += 1.0;
        }
        let total = tokens.len() as f32;

        let mut vector = vec![0.0f32; self.dimension];
        for (term, count) in &counts {
            let freq = count / total;
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimension);
            vector[bucket] += freq * idf;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl EmbeddingProvider for HashingProvider {
    fn generate(&self, text: &str) -> MemoryForgeResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing-fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero_vector() {
        let p = HashingProvider::new(64);
        let v = p.generate("").unwrap();
        assert_eq!(v.len(), 64);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn output_is_unit_norm() {
        let p = HashingProvider::new(128);
        let v = p.generate("rust systems programming").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn deterministic_across_calls() {
        let p = HashingProvider::new(256);
        assert_eq!(p.generate("same text").unwrap(), p.generate("same text").unwrap());
    }

    #[test]
    fn similar_texts_are_closer_than_dissimilar_ones() {
        let p = HashingProvider::new(256);
        let a = p.generate("the project uses postgres for storage").unwrap();
        let b = p.generate("the project stores data in postgres").unwrap();
        let c = p.generate("the recipe calls for two cups of flour").unwrap();
        let cos = |x: &[f32], y: &[f32]| x.iter().zip(y).map(|(p, q)| p * q).sum::<f32>();
        assert!(cos(&a, &b) > cos(&a, &c));
    }
}
