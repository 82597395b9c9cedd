//! Shared test utilities for the rulesets workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`](project::TestProject), a rulesets home
//!   and a project directory side by side in one temp dir

pub mod project;

pub use project::TestProject;
