pub mod config;
pub mod error;
pub mod identifier;
pub mod manager;
pub mod pagination;
pub mod params;
pub mod pass;
pub mod quota;
pub mod render;
pub mod score;

#[cfg(test)]
mod mock;

pub use error::{Result, ScoreError};
pub use manager::EvaluationManager;
