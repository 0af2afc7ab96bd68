use chrono::Utc;

use memoryforge_core::memory::{Memory, MemorySource, MemoryType, Project};
use memoryforge_core::traits::{ListMemoriesFilter, MemoryStorage, RelationDirection};
use memoryforge_core::{ConflictLogEntry, MemoryLink, MemoryRelation, RelationOrigin, RelationType, Resolution};
use memoryforge_storage::StorageEngine;

fn new_project(name: &str) -> Project {
    Project {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        root_path: "/tmp/project".into(),
        created_at: Utc::now(),
    }
}

fn new_memory(project_id: &str, content: &str) -> Memory {
    Memory::new(
        uuid::Uuid::new_v4().to_string(),
        project_id.to_string(),
        content.to_string(),
        MemoryType::Stack,
        MemorySource::Manual,
        Utc::now(),
    )
}

#[test]
fn project_lifecycle() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let project = new_project("demo");
    engine.create_project(&project).unwrap();

    let fetched = engine.get_project(&project.id).unwrap().unwrap();
    assert_eq!(fetched.name, "demo");

    let by_name = engine.get_project_by_name("demo").unwrap().unwrap();
    assert_eq!(by_name.id, project.id);

    let duplicate = new_project("demo");
    let err = engine.create_project(&duplicate).unwrap_err();
    assert!(matches!(err, memoryforge_core::MemoryForgeError::Conflict(_)));

    assert_eq!(engine.list_projects().unwrap().len(), 1);
}

#[test]
fn delete_project_refuses_while_memories_exist() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let project = new_project("occupied");
    engine.create_project(&project).unwrap();

    let memory = new_memory(&project.id, "uses postgres");
    engine.create_memory(&memory).unwrap();

    let err = engine.delete_project(&project.id).unwrap_err();
    assert!(matches!(err, memoryforge_core::MemoryForgeError::Conflict(_)));

    engine.delete_memory(&memory.id).unwrap();
    engine.delete_project(&project.id).unwrap();
    assert!(engine.get_project(&project.id).unwrap().is_none());
}

#[test]
fn memory_crud_round_trips() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let project = new_project("crud");
    engine.create_project(&project).unwrap();

    let memory = new_memory(&project.id, "uses postgres for storage");
    engine.create_memory(&memory).unwrap();

    let fetched = engine.get_memory(&memory.id).unwrap().unwrap();
    assert_eq!(fetched.content, "uses postgres for storage");
    assert!(!fetched.confirmed);

    engine.confirm_memory(&memory.id, Utc::now()).unwrap();
    let fetched = engine.get_memory(&memory.id).unwrap().unwrap();
    assert!(fetched.confirmed);

    engine.update_memory(&memory.id, "uses sqlite for storage", Utc::now()).unwrap();
    let fetched = engine.get_memory(&memory.id).unwrap().unwrap();
    assert_eq!(fetched.content, "uses sqlite for storage");
    assert_ne!(fetched.content_hash, memory.content_hash);

    let deleted = engine.delete_memory(&memory.id).unwrap();
    assert!(deleted);
    assert!(engine.get_memory(&memory.id).unwrap().is_none());
    assert!(!engine.delete_memory(&memory.id).unwrap());
}

#[test]
fn list_memories_applies_filters() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let project = new_project("filters");
    engine.create_project(&project).unwrap();

    let confirmed = new_memory(&project.id, "confirmed fact");
    engine.create_memory(&confirmed).unwrap();
    engine.confirm_memory(&confirmed.id, Utc::now()).unwrap();

    let unconfirmed = new_memory(&project.id, "unconfirmed fact");
    engine.create_memory(&unconfirmed).unwrap();

    let all = engine.list_memories(&project.id, &ListMemoriesFilter::default()).unwrap();
    assert_eq!(all.len(), 2);

    let filter = ListMemoriesFilter {
        confirmed_only: true,
        ..Default::default()
    };
    let confirmed_only = engine.list_memories(&project.id, &filter).unwrap();
    assert_eq!(confirmed_only.len(), 1);
    assert_eq!(confirmed_only[0].id, confirmed.id);

    assert_eq!(engine.get_memory_count(&project.id, false).unwrap(), 2);
    assert_eq!(engine.get_memory_count(&project.id, true).unwrap(), 1);
}

#[test]
fn staleness_and_archival_round_trip() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let project = new_project("lifecycle");
    engine.create_project(&project).unwrap();
    let memory = new_memory(&project.id, "aging fact");
    engine.create_memory(&memory).unwrap();

    engine.mark_stale(&memory.id, "superseded by newer commit").unwrap();
    let stale = engine.get_stale_memories(&project.id).unwrap();
    assert_eq!(stale.len(), 1);

    engine.clear_stale(&memory.id).unwrap();
    assert!(engine.get_stale_memories(&project.id).unwrap().is_empty());

    let survivor = new_memory(&project.id, "surviving fact");
    engine.create_memory(&survivor).unwrap();
    engine.archive_memory(&memory.id, &survivor.id).unwrap();

    let archived_into = engine.get_archived_memories(&survivor.id).unwrap();
    assert_eq!(archived_into.len(), 1);
    assert_eq!(archived_into[0].id, memory.id);

    let err = engine.archive_memory(&memory.id, &survivor.id).unwrap_err();
    assert!(matches!(err, memoryforge_core::MemoryForgeError::Conflict(_)));

    engine.restore_archived_memory(&memory.id).unwrap();
    assert!(engine.get_archived_memories(&survivor.id).unwrap().is_empty());
}

#[test]
fn confidence_scoring() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let project = new_project("confidence");
    engine.create_project(&project).unwrap();
    let memory = new_memory(&project.id, "uncertain fact");
    engine.create_memory(&memory).unwrap();

    engine.update_confidence_score(&memory.id, 0.1).unwrap();
    let low = engine.get_low_confidence_memories(&project.id, 0.3).unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, memory.id);
}

#[test]
fn versions_relations_links_and_conflicts() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let project = new_project("graph");
    engine.create_project(&project).unwrap();
    let a = new_memory(&project.id, "decision A");
    let b = new_memory(&project.id, "decision B");
    engine.create_memory(&a).unwrap();
    engine.create_memory(&b).unwrap();

    let version_no = engine.get_next_version_number(&a.id).unwrap();
    assert_eq!(version_no, 1);
    let version = memoryforge_core::MemoryVersion {
        id: uuid::Uuid::new_v4().to_string(),
        memory_id: a.id.clone(),
        content: a.content.clone(),
        version: version_no,
        created_at: Utc::now(),
    };
    engine.save_memory_version(&version).unwrap();
    assert_eq!(engine.get_memory_versions(&a.id).unwrap().len(), 1);
    assert_eq!(engine.get_next_version_number(&a.id).unwrap(), 2);

    let relation = MemoryRelation::new(
        uuid::Uuid::new_v4().to_string(),
        a.id.clone(),
        b.id.clone(),
        RelationType::Supersedes,
        Utc::now(),
        RelationOrigin::Human,
    )
    .unwrap();
    engine.create_memory_relation(&relation).unwrap();

    let self_loop = MemoryRelation::new(
        uuid::Uuid::new_v4().to_string(),
        a.id.clone(),
        a.id.clone(),
        RelationType::RelatesTo,
        Utc::now(),
        RelationOrigin::Human,
    );
    assert!(self_loop.is_err());

    let outgoing = engine.get_memory_relations(&a.id, RelationDirection::Outgoing).unwrap();
    assert_eq!(outgoing.len(), 1);
    let incoming = engine.get_memory_relations(&b.id, RelationDirection::Incoming).unwrap();
    assert_eq!(incoming.len(), 1);
    engine.delete_memory_relation(&relation.id).unwrap();
    assert!(engine.get_memory_relations(&a.id, RelationDirection::Both).unwrap().is_empty());

    let link = MemoryLink::new(
        uuid::Uuid::new_v4().to_string(),
        a.id.clone(),
        "abc123def".into(),
        memoryforge_core::LinkType::CreatedFrom,
        Utc::now(),
    );
    engine.create_memory_link(&link).unwrap();
    assert_eq!(engine.get_memory_links(&a.id).unwrap().len(), 1);
    assert_eq!(engine.get_memories_by_commit("abc123def").unwrap().len(), 1);

    engine.save_embedding_reference(&a.id, "vec-1").unwrap();
    assert_eq!(engine.get_embedding_reference(&a.id).unwrap(), Some("vec-1".to_string()));
    engine.delete_embedding_reference(&a.id).unwrap();
    assert!(engine.get_embedding_reference(&a.id).unwrap().is_none());

    let conflict = ConflictLogEntry::new(
        uuid::Uuid::new_v4().to_string(),
        a.id.clone(),
        Some("local".into()),
        Some("remote".into()),
        Resolution::RemoteWins,
        Utc::now(),
        None,
    );
    engine.log_conflict(&conflict).unwrap();
    assert_eq!(engine.get_conflict_history(Some(&a.id)).unwrap().len(), 1);
    assert_eq!(engine.get_conflict_history(None).unwrap().len(), 1);
}

#[test]
fn schema_version_starts_at_latest_on_fresh_db() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert_eq!(engine.get_schema_version().unwrap(), memoryforge_storage::schema::LATEST_SCHEMA_VERSION);
}
