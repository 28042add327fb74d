//! Engine error type.
//!
//! The engine degrades gracefully on bad numbers (fallback defaults,
//! range reordering, epsilon floors), so the only caller error it signals
//! is a tier key that names no configured tier.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown tier key: {0:?} (expected good, better, or best)")]
    UnknownTier(String),
}
