//! Soma Agents Prelude — convenient imports for common usage.
//!
//! ```rust
//! use soma_agents::prelude::*;
//! ```

// Re-export behaviors
pub use crate::behavior::{
    followed_substance, secreted_substance, Behavior, Chemotaxis, Secretion, ATTRACTANT_SENSITIVE,
    DEFAULT_CHEMOTAXIS_WEIGHT, DEFAULT_SECRETION_AMOUNT,
};
pub use crate::soma_cell::SomaCell;

// Re-export from core
pub use soma_core::prelude::*;
