use crate::estimators::Observable;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, IsingError>;

/// Everything which can go wrong while building or running a lattice simulation.
///
/// None of these are transient: a run which fails a precondition must be
/// reconfigured, retrying with the same inputs gives the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsingError {
    /// Lattice extents were empty, contained a zero, or have too many sites to index.
    #[error("invalid lattice dimensions {dimensions:?}: {reason}")]
    InvalidDimensions {
        /// The rejected extents.
        dimensions: Vec<usize>,
        /// Which check failed.
        reason: &'static str,
    },

    /// The neighborhood produced a different number of offsets than there are couplings.
    #[error("neighborhood produced {offsets} offsets but {coefficients} interaction coefficients were given")]
    NeighborhoodCoefficientMismatch {
        /// Number of offsets produced by the neighborhood.
        offsets: usize,
        /// Number of interaction coefficients supplied.
        coefficients: usize,
    },

    /// An offset does not have one component per lattice axis.
    #[error("offset {offset_index} has {found} components, lattice has {expected} axes")]
    OffsetDimensionMismatch {
        /// Position of the offending offset.
        offset_index: usize,
        /// Number of lattice axes.
        expected: usize,
        /// Number of components in the offset.
        found: usize,
    },

    /// Temperature must be strictly positive and finite.
    #[error("temperature must be positive, got {0}")]
    InvalidTemperature(f64),

    /// A spin configuration does not match the lattice it is used with.
    #[error("spin state has {found} sites, lattice has {expected}")]
    StateSizeMismatch {
        /// Number of lattice sites.
        expected: usize,
        /// Length of the offending state.
        found: usize,
    },

    /// A spin value outside of {-1, +1} was supplied.
    #[error("site {site} holds {value}, spins must be -1 or +1")]
    InvalidSpin {
        /// Site of the offending value.
        site: usize,
        /// The offending value.
        value: i8,
    },

    /// A moment was requested before any sample was recorded.
    #[error("no samples recorded for {0}")]
    NoSamplesRecorded(Observable),

    /// A trace sink refused a checkpoint or a row.
    #[error("trace sink failed: {0}")]
    TraceSink(String),
}
