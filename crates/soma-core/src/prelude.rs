//! Soma Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use soma_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{Bounds, Cell, CellRecord, CellType, Position, Tick, Vector3};

// Re-export the field contract
pub use crate::field::{FieldAccessor, SUBSTANCE_0, SUBSTANCE_1};

// Re-export error types
pub use crate::error::{ConfigError, Result, SomaError};
