//! Request handlers

pub mod analysis;
pub mod health;
pub mod issues;

use std::sync::Arc;
use std::time::Instant;

use crate::application::analysis::{
    ExportAnalysisUseCase, GetAnalysisUseCase, RunAnalysisUseCase, ToggleIssueUseCase,
};
use crate::presentation::auth::AuthState;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub run_analysis: Arc<RunAnalysisUseCase>,
    pub get_analysis: Arc<GetAnalysisUseCase>,
    pub export_analysis: Arc<ExportAnalysisUseCase>,
    pub toggle_issue: Arc<ToggleIssueUseCase>,
    pub auth_state: AuthState,
    pub startup_time: Instant,
}
