use smallvec::{smallvec, SmallVec};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A displacement in lattice coordinates, one component per axis.
pub type Offset = SmallVec<[isize; 4]>;

/// A rule producing the relative offsets which define who a site interacts with.
///
/// The order of the returned offsets is significant: the `k`th offset is paired
/// with the `k`th interaction coefficient of the lattice.
pub trait Neighborhood {
    /// Offsets for a lattice with the given extents.
    fn generate_offsets(&self, dimensions: &[usize]) -> Vec<Offset>;
}

/// Axis-aligned nearest neighbors: for each axis, `-1` then `+1`.
///
/// For a 2D lattice this yields `[[-1,0], [1,0], [0,-1], [0,1]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NearestNeighbors;

impl Neighborhood for NearestNeighbors {
    fn generate_offsets(&self, dimensions: &[usize]) -> Vec<Offset> {
        let n_dims = dimensions.len();
        (0..n_dims)
            .flat_map(|axis| {
                [-1isize, 1].into_iter().map(move |step| {
                    let mut offset: Offset = smallvec![0; n_dims];
                    offset[axis] = step;
                    offset
                })
            })
            .collect()
    }
}

/// Nearest neighbors followed by the diagonal next-nearest neighbors.
///
/// Diagonals are enumerated per pair of axes `a < b` in the order
/// `(-1,-1), (-1,+1), (+1,-1), (+1,+1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NextNearestNeighbors;

impl Neighborhood for NextNearestNeighbors {
    fn generate_offsets(&self, dimensions: &[usize]) -> Vec<Offset> {
        let n_dims = dimensions.len();
        let mut offsets = NearestNeighbors.generate_offsets(dimensions);
        for a in 0..n_dims {
            for b in (a + 1)..n_dims {
                for (sa, sb) in [(-1isize, -1isize), (-1, 1), (1, -1), (1, 1)] {
                    let mut offset: Offset = smallvec![0; n_dims];
                    offset[a] = sa;
                    offset[b] = sb;
                    offsets.push(offset);
                }
            }
        }
        offsets
    }
}

/// An explicit, user supplied set of offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomNeighborhood {
    offsets: Vec<Offset>,
}

impl CustomNeighborhood {
    /// Wrap a list of offsets.
    pub fn new<O: Into<Vec<isize>>>(offsets: Vec<O>) -> Self {
        Self {
            offsets: offsets
                .into_iter()
                .map(|o| SmallVec::from_vec(o.into()))
                .collect(),
        }
    }
}

impl Neighborhood for CustomNeighborhood {
    fn generate_offsets(&self, _dimensions: &[usize]) -> Vec<Offset> {
        self.offsets.clone()
    }
}

/// Configurable form of the neighborhood rule, as found in simulation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum NeighborhoodSpec {
    /// See [`NearestNeighbors`].
    #[default]
    NearestNeighbor,
    /// See [`NextNearestNeighbors`].
    NextNearestNeighbor,
    /// Explicit offsets, one `Vec` per neighbor.
    Custom(Vec<Vec<isize>>),
}

impl Neighborhood for NeighborhoodSpec {
    fn generate_offsets(&self, dimensions: &[usize]) -> Vec<Offset> {
        match self {
            NeighborhoodSpec::NearestNeighbor => NearestNeighbors.generate_offsets(dimensions),
            NeighborhoodSpec::NextNearestNeighbor => {
                NextNearestNeighbors.generate_offsets(dimensions)
            }
            NeighborhoodSpec::Custom(offsets) => offsets
                .iter()
                .map(|o| SmallVec::from_slice(o))
                .collect(),
        }
    }
}
