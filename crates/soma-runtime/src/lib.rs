//! # Soma Runtime
//!
//! Substances, colony stepping, and cluster validation.
//!
//! The runtime owns everything that changes over time: the diffusion grids
//! cells secrete into, the step loop that runs every cell's behaviors in
//! parallel, and the validator that judges the final arrangement.

pub mod diffusion;
pub mod substrate_impl;
pub mod colony;
pub mod colony_builder;
pub mod clustering;
pub mod export;
pub mod prelude;
