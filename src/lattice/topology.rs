use crate::errors::{IsingError, Result};
use crate::lattice::neighborhood::{Neighborhood, Offset};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::debug;

/// Multi-dimensional position of a site, one index per axis.
pub type Coordinates = SmallVec<[usize; 4]>;

/// Sublattice of a site, from the sum of its coordinate indices modulo 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Parity {
    /// Coordinate sum is even.
    Even,
    /// Coordinate sum is odd.
    Odd,
}

impl Parity {
    /// Parity of a coordinate tuple.
    pub fn of(coordinates: &[usize]) -> Self {
        // Summing each index mod 2 avoids overflow on huge coordinates.
        if coordinates.iter().fold(0usize, |acc, c| acc ^ (c & 1)) == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

/// Periodic lattice with a precomputed neighbor table.
///
/// Sites are indexed in row-major (C) order: the last axis varies fastest.
/// The neighbor table is flat, entry `site * neighbors_per_site + k` is the
/// neighbor reached from `site` through the `k`th offset, and it is coupled
/// with strength `interaction_coefficients[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    dimensions: Vec<usize>,
    strides: Vec<usize>,
    number_sites: usize,
    neighbor_table: Vec<usize>,
    interaction_coefficients: Vec<f64>,
    parities: Vec<Parity>,
}

impl Lattice {
    /// Build a lattice from its extents, a neighborhood rule, and one coupling per offset.
    ///
    /// # Errors
    /// * [`IsingError::InvalidDimensions`] if `dimensions` is empty, has a zero
    ///   extent, or the site count does not fit the index range.
    /// * [`IsingError::NeighborhoodCoefficientMismatch`] if the neighborhood does
    ///   not produce exactly one offset per coefficient.
    /// * [`IsingError::OffsetDimensionMismatch`] if an offset has the wrong arity.
    pub fn build<N: Neighborhood + ?Sized>(
        dimensions: &[usize],
        neighborhood: &N,
        interaction_coefficients: &[f64],
    ) -> Result<Self> {
        checked_site_count(dimensions)?;
        let offsets = neighborhood.generate_offsets(dimensions);
        Self::from_offsets(dimensions, &offsets, interaction_coefficients)
    }

    /// Build a lattice from explicit offsets.
    pub fn from_offsets(
        dimensions: &[usize],
        offsets: &[Offset],
        interaction_coefficients: &[f64],
    ) -> Result<Self> {
        let number_sites = checked_site_count(dimensions)?;
        if offsets.len() != interaction_coefficients.len() {
            return Err(IsingError::NeighborhoodCoefficientMismatch {
                offsets: offsets.len(),
                coefficients: interaction_coefficients.len(),
            });
        }
        let n_dims = dimensions.len();
        if let Some((offset_index, offset)) = offsets
            .iter()
            .enumerate()
            .find(|(_, offset)| offset.len() != n_dims)
        {
            return Err(IsingError::OffsetDimensionMismatch {
                offset_index,
                expected: n_dims,
                found: offset.len(),
            });
        }

        let mut strides = vec![1usize; n_dims];
        for d in (0..n_dims.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * dimensions[d + 1];
        }

        // Reduce offsets once so that wrapping below stays in unsigned arithmetic.
        let shifts = offsets
            .iter()
            .map(|offset| {
                offset
                    .iter()
                    .zip(dimensions.iter())
                    .map(|(o, extent)| o.rem_euclid(*extent as isize) as usize)
                    .collect::<Coordinates>()
            })
            .collect::<Vec<_>>();

        let n_neighbors = offsets.len();
        let mut neighbor_table = Vec::with_capacity(number_sites * n_neighbors);
        let mut parities = Vec::with_capacity(number_sites);
        let mut coordinates: Coordinates = smallvec![0; n_dims];
        for site in 0..number_sites {
            decode(site, dimensions, &strides, &mut coordinates);
            parities.push(Parity::of(&coordinates));
            for shift in &shifts {
                let neighbor = coordinates
                    .iter()
                    .zip(shift.iter())
                    .zip(dimensions.iter().zip(strides.iter()))
                    .map(|((c, s), (extent, stride))| ((c + s) % extent) * stride)
                    .sum::<usize>();
                neighbor_table.push(neighbor);
            }
        }

        debug!(
            ?dimensions,
            number_sites,
            neighbors_per_site = n_neighbors,
            "built lattice topology"
        );

        Ok(Self {
            dimensions: dimensions.to_vec(),
            strides,
            number_sites,
            neighbor_table,
            interaction_coefficients: interaction_coefficients.to_vec(),
            parities,
        })
    }

    /// Extent along each axis.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Number of axes.
    pub fn n_dims(&self) -> usize {
        self.dimensions.len()
    }

    /// Total number of sites, the product of the extents.
    pub fn number_sites(&self) -> usize {
        self.number_sites
    }

    /// Number of neighbor entries every site has.
    pub fn neighbors_per_site(&self) -> usize {
        self.interaction_coefficients.len()
    }

    /// Coupling strength paired with each neighbor slot.
    pub fn interaction_coefficients(&self) -> &[f64] {
        &self.interaction_coefficients
    }

    /// Neighbors of `site`, in offset order.
    #[inline]
    pub fn neighbors(&self, site: usize) -> &[usize] {
        let n = self.neighbors_per_site();
        &self.neighbor_table[site * n..(site + 1) * n]
    }

    /// Neighbors of `site` zipped with their coupling strengths.
    #[inline]
    pub fn couplings(&self, site: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.neighbors(site)
            .iter()
            .copied()
            .zip(self.interaction_coefficients.iter().copied())
    }

    /// Sublattice the site belongs to.
    #[inline]
    pub fn parity(&self, site: usize) -> Parity {
        self.parities[site]
    }

    /// Decode a linear site index into coordinates.
    pub fn coordinates(&self, site: usize) -> Coordinates {
        let mut coordinates: Coordinates = smallvec![0; self.n_dims()];
        decode(site, &self.dimensions, &self.strides, &mut coordinates);
        coordinates
    }

    /// Encode coordinates as a linear site index, `None` if any is out of range.
    pub fn site_index(&self, coordinates: &[usize]) -> Option<usize> {
        if coordinates.len() != self.n_dims() {
            return None;
        }
        coordinates
            .iter()
            .zip(self.dimensions.iter().zip(self.strides.iter()))
            .try_fold(0, |acc, (c, (extent, stride))| {
                (c < extent).then(|| acc + c * stride)
            })
    }

    /// Fail unless a state of length `found` fits this lattice.
    pub(crate) fn check_state_size(&self, found: usize) -> Result<()> {
        if found == self.number_sites {
            Ok(())
        } else {
            Err(IsingError::StateSizeMismatch {
                expected: self.number_sites,
                found,
            })
        }
    }
}

fn decode(site: usize, dimensions: &[usize], strides: &[usize], coordinates: &mut [usize]) {
    coordinates
        .iter_mut()
        .zip(dimensions.iter().zip(strides.iter()))
        .for_each(|(c, (extent, stride))| *c = (site / stride) % extent);
}

fn checked_site_count(dimensions: &[usize]) -> Result<usize> {
    let invalid = |reason: &'static str| IsingError::InvalidDimensions {
        dimensions: dimensions.to_vec(),
        reason,
    };
    if dimensions.is_empty() {
        return Err(invalid("at least one axis is required"));
    }
    if dimensions.iter().any(|d| *d == 0) {
        return Err(invalid("every axis needs at least one site"));
    }
    dimensions
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(*d))
        .filter(|n| *n <= isize::MAX as usize)
        .ok_or_else(|| invalid("site count overflows the index range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::neighborhood::{CustomNeighborhood, NearestNeighbors};

    fn square(dimensions: &[usize]) -> Lattice {
        let coefficients = vec![1.0; 2 * dimensions.len()];
        Lattice::build(dimensions, &NearestNeighbors, &coefficients).unwrap()
    }

    #[test]
    fn test_1d_periodic_neighbors() {
        let lat = square(&[6]);
        assert_eq!(lat.number_sites(), 6);
        assert_eq!(lat.neighbors(0), &[5, 1]);
        assert_eq!(lat.neighbors(5), &[4, 0]);
        assert_eq!(lat.neighbors(3), &[2, 4]);
    }

    #[test]
    fn test_2d_neighbors() {
        // 3x4 lattice, offsets [-1,0], [1,0], [0,-1], [0,1]
        let lat = square(&[3, 4]);
        assert_eq!(lat.number_sites(), 12);
        assert_eq!(lat.strides, vec![4, 1]);

        // Site 0 = (0,0)
        assert_eq!(lat.neighbors(0), &[8, 4, 3, 1]);
        // Site 11 = (2,3)
        assert_eq!(lat.neighbors(11), &[7, 3, 10, 8]);
        // Site 5 = (1,1)
        assert_eq!(lat.neighbors(5), &[1, 9, 4, 6]);
    }

    #[test]
    fn test_triangular_neighbors() {
        let tri = CustomNeighborhood::new(vec![vec![1, 0], vec![0, 1], vec![1, -1]]);
        let lat = Lattice::build(&[4, 4], &tri, &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(lat.neighbors_per_site(), 3);
        // (0,0) -> (1,0)=4, (0,1)=1, (1,3)=7
        assert_eq!(lat.neighbors(0), &[4, 1, 7]);
        // (3,3) -> (0,3)=3, (3,0)=12, (0,2)=2
        assert_eq!(lat.neighbors(15), &[3, 12, 2]);
    }

    #[test]
    fn test_large_offsets_wrap() {
        let wide = CustomNeighborhood::new(vec![vec![-7], vec![13]]);
        let lat = Lattice::build(&[5], &wide, &[1.0, 1.0]).unwrap();
        // -7 = 3 (mod 5), 13 = 3 (mod 5)
        assert_eq!(lat.neighbors(0), &[3, 3]);
        assert_eq!(lat.neighbors(4), &[2, 2]);
    }

    #[test]
    fn test_coordinates_round_trip() {
        let lat = square(&[2, 3, 4]);
        assert_eq!(lat.coordinates(0).as_slice(), &[0, 0, 0]);
        assert_eq!(lat.coordinates(23).as_slice(), &[1, 2, 3]);
        assert_eq!(lat.coordinates(13).as_slice(), &[1, 0, 1]);
        for site in 0..lat.number_sites() {
            assert_eq!(lat.site_index(&lat.coordinates(site)), Some(site));
        }
        assert_eq!(lat.site_index(&[2, 0, 0]), None);
        assert_eq!(lat.site_index(&[0, 0]), None);
    }

    #[test]
    fn test_parity() {
        let lat = square(&[3, 3]);
        assert_eq!(lat.parity(0), Parity::Even);
        assert_eq!(lat.parity(1), Parity::Odd);
        assert_eq!(lat.parity(3), Parity::Odd);
        assert_eq!(lat.parity(4), Parity::Even);
        // (0,2) and (2,0) are both even even though the lattice is odd sized.
        assert_eq!(lat.parity(2), Parity::Even);
        assert_eq!(lat.parity(6), Parity::Even);
    }

    #[test]
    fn test_invalid_dimensions() {
        for dims in [vec![], vec![4, 0], vec![usize::MAX, 2]] {
            let res = Lattice::build(&dims, &NearestNeighbors, &vec![1.0; 2 * dims.len()]);
            assert!(matches!(res, Err(IsingError::InvalidDimensions { .. })));
        }
    }

    #[test]
    fn test_coefficient_mismatch() {
        let res = Lattice::build(&[4, 4], &NearestNeighbors, &[1.0, 1.0]);
        assert_eq!(
            res,
            Err(IsingError::NeighborhoodCoefficientMismatch {
                offsets: 4,
                coefficients: 2
            })
        );
    }

    #[test]
    fn test_offset_arity_mismatch() {
        let bad = CustomNeighborhood::new(vec![vec![1, 0], vec![1]]);
        let res = Lattice::build(&[4, 4], &bad, &[1.0, 1.0]);
        assert_eq!(
            res,
            Err(IsingError::OffsetDimensionMismatch {
                offset_index: 1,
                expected: 2,
                found: 1
            })
        );
    }
}
