//! Authentication extractor for the bearer-token boundary

pub mod extractors;

pub use extractors::{Auth, AuthState};
