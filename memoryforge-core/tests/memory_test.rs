use chrono::Utc;
use memoryforge_core::{Memory, MemorySource, MemoryType};

#[test]
fn lifecycle_starts_unconfirmed_and_unarchived() {
    let memory = Memory::new(
        "mem-1".into(),
        "proj-1".into(),
        "the project uses axum for the http layer".into(),
        MemoryType::Stack,
        MemorySource::Chat,
        Utc::now(),
    );
    assert!(!memory.confirmed);
    assert!(!memory.is_archived);
    assert!(!memory.is_stale);
    assert!(memory.consolidated_into.is_none());
}

#[test]
fn equality_is_by_id_not_by_content() {
    let now = Utc::now();
    let a = Memory::new(
        "mem-1".into(),
        "proj-1".into(),
        "content a".into(),
        MemoryType::Note,
        MemorySource::Manual,
        now,
    );
    let mut b = a.clone();
    b.content = "content b".into();
    assert_eq!(a, b);
}
