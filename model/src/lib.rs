pub mod github;
pub mod score;
