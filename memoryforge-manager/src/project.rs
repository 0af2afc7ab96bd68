//! Project lifecycle and the single active-project pointer, persisted in
//! the process-wide `MemoryForgeConfig` rather than the relational store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use memoryforge_core::config::MemoryForgeConfig;
use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::Project;
use memoryforge_core::traits::MemoryStorage;

/// The shape returned by `get_project_status`.
#[derive(Debug, Clone)]
pub struct ProjectStatus {
    pub active: bool,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub root_path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub memory_count: Option<u64>,
    pub pending_count: Option<u64>,
    pub is_active_project: bool,
    /// Set only when `active` is `false` (no such project, or none active).
    pub message: Option<String>,
}

impl ProjectStatus {
    fn inactive(message: impl Into<String>) -> Self {
        Self {
            active: false,
            project_id: None,
            project_name: None,
            root_path: None,
            created_at: None,
            memory_count: None,
            pending_count: None,
            is_active_project: false,
            message: Some(message.into()),
        }
    }
}

pub struct ProjectRouter<'a> {
    storage: &'a dyn MemoryStorage,
    config: MemoryForgeConfig,
    config_path: Option<std::path::PathBuf>,
}

impl<'a> ProjectRouter<'a> {
    pub fn new(storage: &'a dyn MemoryStorage, config: MemoryForgeConfig, config_path: Option<std::path::PathBuf>) -> Self {
        Self { storage, config, config_path }
    }

    fn save_config(&self) -> MemoryForgeResult<()> {
        self.config.save(self.config_path.as_deref())
    }

    /// Rejects a duplicate name. With `set_active`, the new project becomes
    /// the active one and the config is persisted.
    pub fn create_project(&mut self, name: &str, root_path: &str, set_active: bool) -> MemoryForgeResult<Project> {
        if self.storage.get_project_by_name(name)?.is_some() {
            return Err(MemoryForgeError::Conflict(format!("project `{name}` already exists")));
        }

        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            root_path: root_path.to_string(),
            created_at: Utc::now(),
        };
        self.storage.create_project(&project)?;

        if set_active {
            self.config.active_project_id = Some(project.id.clone());
            self.save_config()?;
        }

        Ok(project)
    }

    /// Accepts either a project id or a project name. Fails `NotFound` if
    /// neither resolves.
    pub fn switch_project(&mut self, id_or_name: &str) -> MemoryForgeResult<Project> {
        let project = self.resolve(id_or_name)?;
        self.config.active_project_id = Some(project.id.clone());
        self.save_config()?;
        Ok(project)
    }

    fn resolve(&self, id_or_name: &str) -> MemoryForgeResult<Project> {
        if let Some(project) = self.storage.get_project(id_or_name)? {
            return Ok(project);
        }
        self.storage
            .get_project_by_name(id_or_name)?
            .ok_or_else(|| MemoryForgeError::NotFound(id_or_name.to_string()))
    }

    pub fn get_active_project_id(&self) -> Option<&str> {
        self.config.active_project_id.as_deref()
    }

    pub fn get_active_project(&self) -> MemoryForgeResult<Option<Project>> {
        match &self.config.active_project_id {
            Some(id) => self.storage.get_project(id),
            None => Ok(None),
        }
    }

    pub fn list_projects(&self) -> MemoryForgeResult<Vec<Project>> {
        self.storage.list_projects()
    }

    pub fn get_project(&self, id: &str) -> MemoryForgeResult<Option<Project>> {
        self.storage.get_project(id)
    }

    pub fn get_project_by_name(&self, name: &str) -> MemoryForgeResult<Option<Project>> {
        self.storage.get_project_by_name(name)
    }

    /// Fails with `Conflict` if any memory (archived or not) still belongs
    /// to this project, per `MemoryStorage::delete_project`. Clears the
    /// active pointer if it pointed at this project.
    pub fn delete_project(&mut self, id: &str) -> MemoryForgeResult<()> {
        self.storage.delete_project(id)?;
        if self.config.active_project_id.as_deref() == Some(id) {
            self.config.active_project_id = None;
            self.save_config()?;
        }
        Ok(())
    }

    /// `id` defaults to the active project. `{active:false, message}` if
    /// there is none, or if an explicit `id` doesn't resolve.
    pub fn get_project_status(&self, id: Option<&str>) -> MemoryForgeResult<ProjectStatus> {
        let target_id = match id.map(str::to_string).or_else(|| self.config.active_project_id.clone()) {
            Some(id) => id,
            None => return Ok(ProjectStatus::inactive("no active project")),
        };

        let Some(project) = self.storage.get_project(&target_id)? else {
            return Ok(ProjectStatus::inactive(format!("no such project: {target_id}")));
        };

        let memory_count = self.storage.get_memory_count(&project.id, false)?;
        let pending_count = self.storage.get_memory_count(&project.id, false)?
            - self.storage.get_memory_count(&project.id, true)?;
        let is_active = self.config.active_project_id.as_deref() == Some(project.id.as_str());

        Ok(ProjectStatus {
            active: true,
            project_id: Some(project.id),
            project_name: Some(project.name),
            root_path: Some(project.root_path),
            created_at: Some(project.created_at),
            memory_count: Some(memory_count),
            pending_count: Some(pending_count),
            is_active_project: is_active,
            message: None,
        })
    }

    /// Returns the active project id, switching to the first known project
    /// if none is active yet. Fails `NotInitialized` if no project exists.
    pub fn ensure_active_project(&mut self) -> MemoryForgeResult<String> {
        if let Some(id) = self.config.active_project_id.clone() {
            return Ok(id);
        }
        let mut projects = self.storage.list_projects()?;
        projects.sort_by_key(|p| p.created_at);
        let first = projects
            .into_iter()
            .next()
            .ok_or_else(|| MemoryForgeError::NotInitialized("no project has been created yet".into()))?;
        self.config.active_project_id = Some(first.id.clone());
        self.save_config()?;
        Ok(first.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoryforge_storage::StorageEngine;

    fn fixture() -> (StorageEngine, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::open(&dir.path().join("memoryforge.sqlite")).unwrap();
        (storage, dir)
    }

    fn config_at(dir: &tempfile::TempDir) -> (MemoryForgeConfig, std::path::PathBuf) {
        let path = dir.path().join("config.yaml");
        (MemoryForgeConfig::default(), path)
    }

    #[test]
    fn create_project_rejects_a_duplicate_name() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        router.create_project("demo", "/tmp/demo", false).unwrap();
        assert!(router.create_project("demo", "/tmp/other", false).is_err());
    }

    #[test]
    fn create_project_with_set_active_persists_the_pointer() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path.clone()));
        let project = router.create_project("demo", "/tmp/demo", true).unwrap();
        assert_eq!(router.get_active_project_id(), Some(project.id.as_str()));

        let reloaded = MemoryForgeConfig::load(Some(&path)).unwrap();
        assert_eq!(reloaded.active_project_id, Some(project.id));
    }

    #[test]
    fn switch_project_accepts_a_name() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        let project = router.create_project("demo", "/tmp/demo", false).unwrap();
        let switched = router.switch_project("demo").unwrap();
        assert_eq!(switched.id, project.id);
        assert_eq!(router.get_active_project_id(), Some(project.id.as_str()));
    }

    #[test]
    fn switch_project_fails_for_an_unknown_name() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        assert!(router.switch_project("nope").is_err());
    }

    #[test]
    fn delete_project_clears_the_active_pointer() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        let project = router.create_project("demo", "/tmp/demo", true).unwrap();
        router.delete_project(&project.id).unwrap();
        assert_eq!(router.get_active_project_id(), None);
    }

    #[test]
    fn delete_project_refuses_when_memories_exist() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        let project = router.create_project("demo", "/tmp/demo", false).unwrap();
        let memory = memoryforge_core::memory::Memory::new(
            "m1".into(),
            project.id.clone(),
            "content".into(),
            memoryforge_core::memory::MemoryType::Decision,
            memoryforge_core::memory::MemorySource::Manual,
            Utc::now(),
        );
        storage.create_memory(&memory).unwrap();
        assert!(router.delete_project(&project.id).is_err());
    }

    #[test]
    fn ensure_active_project_picks_the_first_project_when_none_is_active() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        let project = router.create_project("demo", "/tmp/demo", false).unwrap();
        let active = router.ensure_active_project().unwrap();
        assert_eq!(active, project.id);
    }

    #[test]
    fn ensure_active_project_fails_when_nothing_exists() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        assert!(router.ensure_active_project().is_err());
    }

    #[test]
    fn get_project_status_reports_inactive_with_no_active_project() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let router = ProjectRouter::new(&storage, config, Some(path));
        let status = router.get_project_status(None).unwrap();
        assert!(!status.active);
        assert!(status.message.is_some());
    }

    #[test]
    fn get_project_status_reports_memory_counts() {
        let (storage, dir) = fixture();
        let (config, path) = config_at(&dir);
        let mut router = ProjectRouter::new(&storage, config, Some(path));
        let project = router.create_project("demo", "/tmp/demo", true).unwrap();
        let memory = memoryforge_core::memory::Memory::new(
            "m1".into(),
            project.id.clone(),
            "content".into(),
            memoryforge_core::memory::MemoryType::Decision,
            memoryforge_core::memory::MemorySource::Manual,
            Utc::now(),
        );
        storage.create_memory(&memory).unwrap();

        let status = router.get_project_status(None).unwrap();
        assert!(status.active);
        assert_eq!(status.memory_count, Some(1));
        assert_eq!(status.pending_count, Some(1));
        assert!(status.is_active_project);
    }
}
