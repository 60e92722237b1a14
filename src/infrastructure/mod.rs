//! Infrastructure: reasoning-service client and persistence

pub mod llm;
pub mod persistence;
