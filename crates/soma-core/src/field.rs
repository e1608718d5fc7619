//! Field access — the shared environment all cells sense and modify.
//!
//! Fields are named scalar substances defined over continuous space.
//! Cells read their gradient and add to their concentration, but never
//! touch each other directly: every interaction between cells goes
//! through a field.

use crate::types::*;

/// Substance secreted by non-marker cells and followed by marker cells.
pub const SUBSTANCE_0: &str = "Substance_0";
/// Substance secreted by marker cells and followed by every other type.
pub const SUBSTANCE_1: &str = "Substance_1";

/// Read/write access to named scalar fields.
///
/// Implementations must be safe to share across the worker threads that
/// step cells in parallel: `deposit_at` takes `&self` and must accumulate
/// atomically so that concurrent deposits are never lost.
///
/// Looking up a name that was never defined is a configuration error the
/// caller is expected to have ruled out; implementations may panic.
pub trait FieldAccessor: Sync {
    /// Gradient of the named field at `position`.
    fn gradient_at(&self, name: &str, position: &Position) -> Vector3;

    /// Add `amount` (non-negative) to the named field at `position`.
    fn deposit_at(&self, name: &str, position: &Position, amount: f64);

    /// Concentration of the named field at `position`.
    fn concentration_at(&self, name: &str, position: &Position) -> f64;

    /// Whether a field with this name exists.
    fn has_field(&self, name: &str) -> bool;
}
