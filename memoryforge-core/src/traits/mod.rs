mod blob_store;
mod embedding;
mod storage;
mod vector_index;

pub use blob_store::BlobStore;
pub use embedding::EmbeddingProvider;
pub use storage::{ListMemoriesFilter, MemoryStorage, RelationDirection};
pub use vector_index::{VectorHit, VectorIndex, VectorPayload};
