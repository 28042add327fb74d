//! Advisor bridge: the constraint layer between the admin surface and the
//! savings engine.
//!
//! The admin surface sends JSON. The bridge parses it into exactly one of
//! the valid operations, validates the parameters, resolves the effective
//! configuration (base plus overrides) once, runs the pure engine, and
//! returns a structured result. Invalid operations are rejected at parse
//! time; an unknown tier key or scope tag never reaches a calculation.

pub mod error;
pub mod ops;
pub mod protocol;
pub mod summary;

pub use error::{BridgeError, BridgeResult};
pub use ops::AdvisorOperation;
pub use protocol::{AdvisorRequest, AdvisorResponse, Bridge, OperationOutcome};
pub use summary::render_snapshot_summary;
