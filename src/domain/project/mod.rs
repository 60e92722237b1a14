//! Project entity (external collaborator, referenced not owned here)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::PrincipalId;

/// A project holding the source content to analyze.
///
/// CRUD for projects lives outside this service; the pipeline reads the
/// content, verifies ownership, and bumps the analysis timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub principal_id: PrincipalId,
    pub name: String,
    pub source_content: String,
    pub last_analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
