//! Persistence: PostgreSQL repositories plus in-memory implementations
//! used by the integration test suite.

pub mod issue_repository;
pub mod memory;
pub mod project_repository;
pub mod rows;
pub mod session_repository;
pub mod token_resolver;

pub use issue_repository::SqlxIssueRepository;
pub use memory::{
    MemoryIssueRepository, MemoryPrincipalResolver, MemoryProjectRepository,
    MemorySessionRepository, MemoryStore,
};
pub use project_repository::SqlxProjectRepository;
pub use session_repository::SqlxSessionRepository;
pub use token_resolver::SqlxPrincipalResolver;
