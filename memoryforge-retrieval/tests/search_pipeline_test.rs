use chrono::Utc;

use memoryforge_core::memory::{Memory, MemorySource, MemoryType, Project};
use memoryforge_core::traits::{EmbeddingProvider, MemoryStorage, VectorIndex, VectorPayload};
use memoryforge_embeddings::LocalProvider;
use memoryforge_retrieval::{RetrievalEngine, SearchOptions};
use memoryforge_storage::{SqliteVectorIndex, StorageEngine};

struct Fixture {
    storage: StorageEngine,
    vector: SqliteVectorIndex,
    embedder: LocalProvider,
    project_id: String,
    _dir: tempfile::TempDir,
}

fn seed(memories: &[(&str, &str, MemoryType, bool)]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageEngine::open(&dir.path().join("memoryforge.sqlite")).unwrap();
    let vector = SqliteVectorIndex::open(&dir.path().join("vectors"), "project-1").unwrap();
    let embedder = LocalProvider::new();

    let project = Project {
        id: "project-1".into(),
        name: "demo".into(),
        root_path: "/tmp/demo".into(),
        created_at: Utc::now(),
    };
    storage.create_project(&project).unwrap();

    for (id, content, memory_type, confirmed) in memories {
        let mut memory = Memory::new(
            (*id).into(),
            project.id.clone(),
            (*content).into(),
            *memory_type,
            MemorySource::Manual,
            Utc::now(),
        );
        memory.confirmed = *confirmed;
        storage.create_memory(&memory).unwrap();

        let embedding = embedder.generate(content).unwrap();
        vector
            .upsert(
                &memory.id,
                &embedding,
                VectorPayload {
                    memory_type: memory.memory_type,
                    created_at: memory.created_at,
                    project_id: project.id.clone(),
                },
            )
            .unwrap();
        storage.save_embedding_reference(&memory.id, &memory.id).unwrap();
    }

    Fixture {
        storage,
        vector,
        embedder,
        project_id: project.id,
        _dir: dir,
    }
}

#[test]
fn search_returns_the_closest_memory_first() {
    let fixture = seed(&[
        ("m1", "the team standardized on axum for http services", MemoryType::Decision, true),
        ("m2", "recipe calls for two cups of flour", MemoryType::Note, true),
    ]);
    let engine = RetrievalEngine::new(&fixture.storage, &fixture.vector, &fixture.embedder)
        .with_defaults(5, 0.0);

    let results = engine
        .search(&fixture.project_id, "what http framework did we pick", &SearchOptions::default())
        .unwrap();

    assert!(!results.is_empty());
    assert_eq!(results[0].memory.id, "m1");
    assert!(results[0].explanation.starts_with("[Decision]"));
}

#[test]
fn explanation_starts_with_the_bracketed_capitalized_memory_type() {
    let fixture = seed(&[("m1", "We use FastAPI with Pydantic v2", MemoryType::Stack, true)]);
    let engine = RetrievalEngine::new(&fixture.storage, &fixture.vector, &fixture.embedder)
        .with_defaults(1, 0.0);

    let results = engine
        .search(&fixture.project_id, "Which backend framework?", &SearchOptions::default())
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.content, "We use FastAPI with Pydantic v2");
    assert!(results[0].score >= 0.5);
    assert!(
        results[0].explanation.starts_with("[Stack]"),
        "expected explanation to start with [Stack], got {:?}",
        results[0].explanation
    );
}

#[test]
fn search_updates_last_accessed_on_hits() {
    let fixture = seed(&[("m1", "uses postgres for storage", MemoryType::Stack, true)]);
    let engine = RetrievalEngine::new(&fixture.storage, &fixture.vector, &fixture.embedder)
        .with_defaults(5, 0.0);

    let before = fixture.storage.get_memory("m1").unwrap().unwrap();
    assert!(before.last_accessed.is_none());

    engine
        .search(&fixture.project_id, "postgres storage", &SearchOptions::default())
        .unwrap();

    let after = fixture.storage.get_memory("m1").unwrap().unwrap();
    assert!(after.last_accessed.is_some());
}

#[test]
fn archived_memories_are_excluded_from_results() {
    let fixture = seed(&[("m1", "uses postgres for storage", MemoryType::Stack, true)]);
    fixture.storage.archive_memory("m1", "m1").unwrap();

    let engine = RetrievalEngine::new(&fixture.storage, &fixture.vector, &fixture.embedder)
        .with_defaults(5, 0.0);
    let results = engine
        .search(&fixture.project_id, "postgres storage", &SearchOptions::default())
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn confirmed_only_filters_unconfirmed_memories() {
    let fixture = seed(&[("m1", "uses postgres for storage", MemoryType::Stack, false)]);
    let engine = RetrievalEngine::new(&fixture.storage, &fixture.vector, &fixture.embedder)
        .with_defaults(5, 0.0);

    let options = SearchOptions {
        confirmed_only: true,
        ..Default::default()
    };
    let results = engine.search(&fixture.project_id, "postgres storage", &options).unwrap();
    assert!(results.is_empty());
}

#[test]
fn get_timeline_returns_newest_first_without_touching_last_accessed() {
    let fixture = seed(&[
        ("m1", "first decision", MemoryType::Decision, true),
        ("m2", "second decision", MemoryType::Decision, true),
    ]);
    let engine = RetrievalEngine::new(&fixture.storage, &fixture.vector, &fixture.embedder);

    let timeline = engine.get_timeline(&fixture.project_id, 10).unwrap();
    assert_eq!(timeline.len(), 2);
    assert!(engine.get_timeline(&fixture.project_id, 10).unwrap()[0].last_accessed.is_none());
}

#[test]
fn blank_query_is_rejected() {
    let fixture = seed(&[]);
    let engine = RetrievalEngine::new(&fixture.storage, &fixture.vector, &fixture.embedder);
    assert!(engine.search(&fixture.project_id, "   ", &SearchOptions::default()).is_err());
}
