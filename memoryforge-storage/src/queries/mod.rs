pub mod conflict_ops;
pub mod link_ops;
pub mod maintenance;
pub mod memory_crud;
pub mod memory_query;
pub mod project_ops;
pub mod relation_ops;
pub mod version_ops;
