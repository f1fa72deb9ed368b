// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsrError {
    #[error("Unsupported particle species '{0}': only 'electron' is implemented")]
    UnsupportedSpecies(String),

    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    #[error("Degenerate grid: {0}")]
    DegenerateGrid(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bunch carries no charge inside the grid")]
    EmptyBunch,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CsrResult<T> = Result<T, CsrError>;

impl CsrError {
    /// Shorthand for a length mismatch between two parallel arrays.
    pub fn length_mismatch(what: &str, expected: usize, got: usize) -> Self {
        CsrError::DimensionMismatch {
            what: what.to_string(),
            expected,
            got,
        }
    }
}
