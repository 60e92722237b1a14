//! CodeGuard - AI-assisted source code security analysis service
//!
//! The service ingests a project's source code, obtains a vulnerability
//! assessment from an external reasoning model, validates the response
//! against a fixed taxonomy, computes an aggregate 0-10 security score, and
//! durably records the analysis session and each finding.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── presentation/     # HTTP layer
//! │   ├── controllers/  # Request handlers
//! │   ├── auth/         # Bearer-token extractor
//! │   ├── models.rs     # DTOs with OpenAPI schemas
//! │   └── routes.rs     # API route definitions
//! ├── application/      # The analysis pipeline
//! │   └── analysis/     # Extractor, aggregator, use cases
//! ├── infrastructure/   # External integrations
//! │   ├── llm/          # Reasoning service client
//! │   └── persistence/  # PostgreSQL + in-memory repositories
//! ├── domain/           # Entities, value objects, repository traits
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! Environment variables use the `CODEGUARD__` prefix with double underscore
//! separators:
//!
//! ```bash
//! CODEGUARD__SERVER__PORT=3000
//! CODEGUARD__DATABASE__URL=postgres://localhost/codeguard
//! CODEGUARD__REASONING__API_KEY=sk-...
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

mod app;

pub use app::{AppHandle, create_app};
pub use config::Config;
pub use logging::init_tracing;
