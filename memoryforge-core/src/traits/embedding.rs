use crate::errors::MemoryForgeResult;

/// Turns text into a fixed-dimension vector. Implementations must keep
/// `dimension()` stable for the lifetime of the instance.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    fn generate(&self, text: &str) -> MemoryForgeResult<Vec<f32>>;

    /// Embed a batch of texts. May fall back to calling `generate` elementwise
    /// if the backend has no native batch endpoint or the batch call fails.
    fn generate_batch(&self, texts: &[String]) -> MemoryForgeResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.generate(t)).collect()
    }

    /// Output vector length, stable for the life of this instance.
    fn dimension(&self) -> usize;

    /// Human-readable provider name, for diagnostics and the health report.
    fn name(&self) -> &str;
}
