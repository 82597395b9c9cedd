//! Error types for rulesets-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] rulesets_fs::Error),

    #[error("Invalid region name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Content for region '{name}' contains a region delimiter on line {line}")]
    InvalidContent { name: String, line: usize },
}
