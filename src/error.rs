use thiserror::Error;

/// Errors surfaced across the engine's public API boundary.
///
/// `reserve`'s not-found / email-mismatch / already-expired paths and
/// `findAndHold`'s out-of-capacity path are deliberately *not* variants
/// here — they collapse to `Ok(None)` so the engine never discloses which
/// condition failed to a caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("seat count {requested} is out of range [1, {capacity}]")]
    BadArgument { requested: i64, capacity: i64 },

    #[error("layout dimensions must both be at least 1, got {rows}x{columns}")]
    BadLayout { rows: i64, columns: i64 },

    #[error("{field} must not be null/empty")]
    NullArgument { field: &'static str },
}

pub type Result<T> = std::result::Result<T, EngineError>;
