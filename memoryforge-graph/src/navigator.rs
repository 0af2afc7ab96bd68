//! `GraphNavigator`: linking, neighborhood views, and bounded BFS traversal
//! over the relation graph `MemoryStorage` persists.

use std::collections::{HashSet, VecDeque};

use chrono::Utc;
use uuid::Uuid;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::{Memory, MemoryRelation, RelationOrigin, RelationType};
use memoryforge_core::traits::{MemoryStorage, RelationDirection};

use crate::types::{GraphView, RelationEdge};

const DEFAULT_MAX_DEPTH: u32 = 2;
const MAX_CAUSALITY_CHAIN_LEN: usize = 64;

pub struct GraphNavigator<'a> {
    storage: &'a dyn MemoryStorage,
}

impl<'a> GraphNavigator<'a> {
    pub fn new(storage: &'a dyn MemoryStorage) -> Self {
        Self { storage }
    }

    fn require_memory(&self, id: &str) -> MemoryForgeResult<Memory> {
        self.storage
            .get_memory(id)?
            .ok_or_else(|| MemoryForgeError::NotFound(id.to_string()))
    }

    /// Create a directed edge from `source_id` to `target_id`. Both memories
    /// must exist; self-links are rejected. Duplicate edges are allowed —
    /// they accumulate as additional evidence for the same relation.
    pub fn link_memories(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: RelationType,
        created_by: RelationOrigin,
    ) -> MemoryForgeResult<MemoryRelation> {
        self.require_memory(source_id)?;
        self.require_memory(target_id)?;

        let relation = MemoryRelation::new(
            Uuid::new_v4().to_string(),
            source_id.to_string(),
            target_id.to_string(),
            relation_type,
            Utc::now(),
            created_by,
        )?;
        self.storage.create_memory_relation(&relation)?;
        Ok(relation)
    }

    fn hydrate_edges(
        &self,
        relations: Vec<MemoryRelation>,
        other_end: impl Fn(&MemoryRelation) -> &str,
    ) -> MemoryForgeResult<Vec<RelationEdge>> {
        let mut edges = Vec::with_capacity(relations.len());
        for relation in &relations {
            if let Some(memory) = self.storage.get_memory(other_end(relation))? {
                edges.push(RelationEdge {
                    memory,
                    relation_type: relation.relation_type,
                });
            }
        }
        Ok(edges)
    }

    pub fn get_graph_view(&self, id: &str) -> MemoryForgeResult<GraphView> {
        let memory = self.require_memory(id)?;

        let incoming_relations = self.storage.get_memory_relations(id, RelationDirection::Incoming)?;
        let incoming = self.hydrate_edges(incoming_relations, |r| &r.source_memory_id)?;

        let outgoing_relations = self.storage.get_memory_relations(id, RelationDirection::Outgoing)?;
        let outgoing = self.hydrate_edges(outgoing_relations, |r| &r.target_memory_id)?;

        let causality_chain = self.trace_causality_chain(id)?;

        Ok(GraphView {
            memory,
            incoming,
            outgoing,
            causality_chain,
        })
    }

    /// Follow outgoing `caused_by` edges from `id`, one step at a time,
    /// collecting the chain of causes. Stops at the first memory with no
    /// further `caused_by` edge, or when a cycle or the length cap is hit.
    fn trace_causality_chain(&self, id: &str) -> MemoryForgeResult<Vec<Memory>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id.to_string());

        let mut current = id.to_string();
        while chain.len() < MAX_CAUSALITY_CHAIN_LEN {
            let outgoing = self.storage.get_memory_relations(&current, RelationDirection::Outgoing)?;
            let Some(cause) = outgoing.iter().find(|r| r.relation_type == RelationType::CausedBy) else {
                break;
            };
            if !visited.insert(cause.target_memory_id.clone()) {
                break;
            }
            let Some(memory) = self.storage.get_memory(&cause.target_memory_id)? else {
                break;
            };
            current = memory.id.clone();
            chain.push(memory);
        }

        Ok(chain)
    }

    /// Breadth-first traversal over relations in both directions, optionally
    /// filtered to `types`, deduplicated across levels, excluding the root.
    pub fn find_related_memories(
        &self,
        id: &str,
        types: Option<&[RelationType]>,
        max_depth: u32,
    ) -> MemoryForgeResult<Vec<Memory>> {
        self.require_memory(id)?;
        let max_depth = if max_depth == 0 { DEFAULT_MAX_DEPTH } else { max_depth };

        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        let mut queue = VecDeque::new();
        queue.push_back((id.to_string(), 0u32));
        let mut found = Vec::new();

        while let Some((current_id, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let relations = self.storage.get_memory_relations(&current_id, RelationDirection::Both)?;
            for relation in &relations {
                if let Some(allowed) = types {
                    if !allowed.contains(&relation.relation_type) {
                        continue;
                    }
                }
                let other_id = if relation.source_memory_id == current_id {
                    &relation.target_memory_id
                } else {
                    &relation.source_memory_id
                };
                if !visited.insert(other_id.clone()) {
                    continue;
                }
                if let Some(memory) = self.storage.get_memory(other_id)? {
                    found.push(memory);
                    queue.push_back((other_id.clone(), depth + 1));
                }
            }
        }

        Ok(found)
    }

    /// Memories caused by `id`: incoming `caused_by` edges.
    pub fn get_decision_consequences(&self, id: &str) -> MemoryForgeResult<Vec<Memory>> {
        self.require_memory(id)?;
        let incoming = self.storage.get_memory_relations(id, RelationDirection::Incoming)?;
        let mut consequences = Vec::new();
        for relation in incoming.iter().filter(|r| r.relation_type == RelationType::CausedBy) {
            if let Some(memory) = self.storage.get_memory(&relation.source_memory_id)? {
                consequences.push(memory);
            }
        }
        Ok(consequences)
    }
}
