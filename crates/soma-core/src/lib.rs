//! # Soma Core
//!
//! Core types and contracts for chemotactic cell simulations.
//!
//! A Soma simulation is a population of point cells in 3D space. Each cell
//! carries a type label, secretes a substance chosen by that label, and
//! moves along the gradient of a substance. This crate defines the pieces
//! every other crate agrees on:
//!
//! - **Cell** — position, mass location, type label, diameter
//! - **FieldAccessor** — gradient and deposit access to named substances
//! - **CellRecord** — the (position, type) pair captured in snapshots
//!
//! ## Quick Start
//!
//! ```rust
//! use soma_core::prelude::*;
//!
//! let mut cell = Cell::new(Position::new(1.0, 2.0, 3.0), CellType::POSITIVE, 10.0);
//! cell.update_position(Vector3::new(0.5, 0.0, 0.0));
//! cell.commit_mass_location();
//! assert_eq!(cell.position, Position::new(1.5, 2.0, 3.0));
//! ```

pub mod types;
pub mod field;
pub mod error;
pub mod prelude;
