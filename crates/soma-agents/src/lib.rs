//! # Soma Agents
//!
//! Cell behaviors for Soma simulations.
//!
//! Every cell runs a fixed, ordered list of behaviors each step:
//!
//! - **Secretion** — deposit one unit of the cell's own substance at its position
//! - **Chemotaxis** — sense both substance gradients and follow the other type's substance
//!
//! Cells never read each other. All coupling between cells flows through
//! the substances they secrete and sense.

pub mod behavior;
pub mod soma_cell;
pub mod prelude;
