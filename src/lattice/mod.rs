//! Lattice geometry: site indexing, neighborhood rules, and the neighbor table.

/// Neighborhood rules producing relative offsets.
pub mod neighborhood;

/// The immutable lattice and its site encoding.
pub mod topology;

pub use neighborhood::{
    CustomNeighborhood, NearestNeighbors, Neighborhood, NeighborhoodSpec, NextNearestNeighbors,
    Offset,
};
pub use topology::{Coordinates, Lattice, Parity};
