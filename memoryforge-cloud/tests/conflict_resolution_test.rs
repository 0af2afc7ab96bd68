use chrono::Utc;

use memoryforge_cloud::{Conflict, ConflictResolver};
use memoryforge_core::memory::{Memory, MemorySource, MemoryType, Project, Resolution};
use memoryforge_core::traits::MemoryStorage;
use memoryforge_storage::StorageEngine;

fn fixture() -> (StorageEngine, tempfile::TempDir, Memory) {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageEngine::open(&dir.path().join("memoryforge.sqlite")).unwrap();
    let project = Project {
        id: "p1".into(),
        name: "demo".into(),
        root_path: "/tmp/demo".into(),
        created_at: Utc::now(),
    };
    storage.create_project(&project).unwrap();
    let memory = Memory::new("m1".into(), project.id, "local content".into(), MemoryType::Decision, MemorySource::Manual, Utc::now());
    storage.create_memory(&memory).unwrap();
    (storage, dir, memory)
}

#[test]
fn last_write_wins_picks_the_later_side_and_logs() {
    let (storage, _dir, memory) = fixture();
    let resolver = ConflictResolver::new(&storage);
    let conflict = Conflict {
        memory_id: memory.id.clone(),
        local_content: Some(memory.content.clone()),
        remote_content: "remote wins here".into(),
        local_timestamp: Some(memory.created_at),
        remote_timestamp: memory.created_at + chrono::Duration::seconds(60),
    };
    let resolution = resolver.resolve_last_write_wins(&conflict).unwrap();
    assert_eq!(resolution, Resolution::RemoteWins);
    let updated = storage.get_memory(&memory.id).unwrap().unwrap();
    assert_eq!(updated.content, "remote wins here");
    assert_eq!(storage.get_conflict_history(Some(&memory.id)).unwrap().len(), 1);
}

#[test]
fn resolve_manual_applies_the_merged_content() {
    let (storage, _dir, memory) = fixture();
    let resolver = ConflictResolver::new(&storage);
    let conflict = Conflict {
        memory_id: memory.id.clone(),
        local_content: Some(memory.content.clone()),
        remote_content: "remote".into(),
        local_timestamp: Some(memory.created_at),
        remote_timestamp: Utc::now(),
    };
    resolver.resolve_manual(&conflict, "merged content", "alice").unwrap();
    let updated = storage.get_memory(&memory.id).unwrap().unwrap();
    assert_eq!(updated.content, "merged content");
    let history = storage.get_conflict_history(Some(&memory.id)).unwrap();
    assert_eq!(history[0].resolution, Resolution::Manual);
    assert_eq!(history[0].resolved_by.as_deref(), Some("alice"));
}

#[test]
fn resolve_keep_local_does_not_touch_storage_content() {
    let (storage, _dir, memory) = fixture();
    let resolver = ConflictResolver::new(&storage);
    let conflict = Conflict {
        memory_id: memory.id.clone(),
        local_content: Some(memory.content.clone()),
        remote_content: "remote".into(),
        local_timestamp: Some(memory.created_at),
        remote_timestamp: memory.created_at + chrono::Duration::seconds(1),
    };
    resolver.resolve_keep_local(&conflict).unwrap();
    let unchanged = storage.get_memory(&memory.id).unwrap().unwrap();
    assert_eq!(unchanged.content, memory.content);
}

#[test]
fn resolve_keep_remote_overwrites_local_content() {
    let (storage, _dir, memory) = fixture();
    let resolver = ConflictResolver::new(&storage);
    let conflict = Conflict {
        memory_id: memory.id.clone(),
        local_content: Some(memory.content.clone()),
        remote_content: "remote content wins".into(),
        local_timestamp: Some(memory.created_at),
        remote_timestamp: memory.created_at - chrono::Duration::seconds(1),
    };
    resolver.resolve_keep_remote(&conflict).unwrap();
    let updated = storage.get_memory(&memory.id).unwrap().unwrap();
    assert_eq!(updated.content, "remote content wins");
}
