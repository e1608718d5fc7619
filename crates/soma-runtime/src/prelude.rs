//! Soma Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use soma_runtime::prelude::*;
//! ```

// Re-export substances
pub use crate::diffusion::{DiffusionGrid, SubstanceConfig};
pub use crate::substrate_impl::SubstrateImpl;

// Re-export colony
pub use crate::colony::{
    Colony, ColonyConfig, ColonySnapshot, ColonyStats, SubstanceTotal, TypeCount,
};
pub use crate::colony_builder::{
    ColonyBuilder, REFERENCE_CELL_COUNT, REFERENCE_DIAMETER, REFERENCE_STEPS,
};

// Re-export validation
pub use crate::clustering::{
    count_close_pairs, evaluate, filter_subvolume, is_well_clustered, subvolume_half_width,
    ClusterCriterion, ClusterReport, PairCounts, Verdict,
};

// Re-export snapshot files
pub use crate::export::{read_snapshot_json, write_snapshot_json};

// Re-export from agents
pub use soma_agents::prelude::*;
