use itertools::Itertools;
use rand::prelude::*;
use spinlattice::lattice::Offset;
use spinlattice::*;

fn nearest(dimensions: &[usize]) -> Lattice {
    Lattice::build(dimensions, &NearestNeighbors, &vec![1.0; 2 * dimensions.len()]).unwrap()
}

/// Couples only along the first axis, with a different strength per direction.
struct FirstAxisChain;

impl Neighborhood for FirstAxisChain {
    fn generate_offsets(&self, dimensions: &[usize]) -> Vec<Offset> {
        [-1isize, 1]
            .iter()
            .map(|step| {
                let mut offset: Offset = Offset::from_elem(0, dimensions.len());
                offset[0] = *step;
                offset
            })
            .collect()
    }
}

#[test]
fn site_count_and_neighbor_range() {
    let mut rng = SmallRng::seed_from_u64(1234);
    for _ in 0..25 {
        let n_dims = rng.gen_range(1..=4);
        let dims = (0..n_dims).map(|_| rng.gen_range(1..=6)).collect::<Vec<usize>>();
        for lattice in [
            nearest(&dims),
            Lattice::build(
                &dims,
                &NextNearestNeighbors,
                &vec![0.5; NextNearestNeighbors.generate_offsets(&dims).len()],
            )
            .unwrap(),
        ] {
            assert_eq!(lattice.number_sites(), dims.iter().product::<usize>());
            for site in 0..lattice.number_sites() {
                let neighbors = lattice.neighbors(site);
                assert_eq!(neighbors.len(), lattice.interaction_coefficients().len());
                assert!(neighbors.iter().all(|n| *n < lattice.number_sites()));
            }
        }
    }
}

#[test]
fn one_d_periodic_boundaries() {
    for n in [2, 3, 10, 101] {
        let lattice = nearest(&[n]);
        assert_eq!(lattice.neighbors(0), &[n - 1, 1 % n]);
        assert_eq!(lattice.neighbors(n - 1), &[n - 2, 0]);
    }
}

#[test]
fn single_site_axis_is_its_own_neighbor() {
    let lattice = nearest(&[1, 3]);
    assert_eq!(lattice.number_sites(), 3);
    // Both offsets along the unit axis return to the same site.
    assert_eq!(&lattice.neighbors(1)[..2], &[1, 1]);
    assert_eq!(&lattice.neighbors(1)[2..], &[0, 2]);
}

#[test]
fn coordinates_are_row_major_bijection() {
    let dims = [3usize, 2, 4];
    let lattice = nearest(&dims);
    let all = dims.iter().map(|d| 0..*d).multi_cartesian_product();
    for (expected_site, coords) in all.enumerate() {
        assert_eq!(lattice.site_index(&coords), Some(expected_site));
        assert_eq!(lattice.coordinates(expected_site).to_vec(), coords);
        let parity = if coords.iter().sum::<usize>() % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        };
        assert_eq!(lattice.parity(expected_site), parity);
    }
}

#[test]
fn neighbors_follow_offsets() {
    let dims = [4usize, 5];
    let lattice = Lattice::build(&dims, &NextNearestNeighbors, &[1.0; 8]).unwrap();
    let offsets = NextNearestNeighbors.generate_offsets(&dims);
    for site in 0..lattice.number_sites() {
        let coords = lattice.coordinates(site);
        for (k, offset) in offsets.iter().enumerate() {
            let target = coords
                .iter()
                .zip(offset.iter())
                .zip(dims.iter())
                .map(|((c, o), d)| (*c as isize + o).rem_euclid(*d as isize) as usize)
                .collect::<Vec<_>>();
            assert_eq!(lattice.neighbors(site)[k], lattice.site_index(&target).unwrap());
        }
    }
}

#[test]
fn injected_neighborhood() {
    let rule: &dyn Neighborhood = &FirstAxisChain;
    let lattice = Lattice::build(&[3, 3], rule, &[1.0, 0.25]).unwrap();
    // (0,1) -> (2,1) and (1,1)
    assert_eq!(lattice.neighbors(1), &[7, 4]);
    let couplings = lattice.couplings(1).collect::<Vec<_>>();
    assert_eq!(couplings, vec![(7, 1.0), (4, 0.25)]);

    let wrong = Lattice::build(&[3, 3], rule, &[1.0; 4]);
    assert_eq!(
        wrong,
        Err(IsingError::NeighborhoodCoefficientMismatch {
            offsets: 2,
            coefficients: 4
        })
    );
}

#[test]
fn nearest_neighbor_spec_round_trips_through_parameters() {
    let params = simulation::SimulationParameters {
        neighborhood: NeighborhoodSpec::Custom(vec![vec![0, 1], vec![0, -1]]),
        interaction_coefficients: vec![1.0, 1.0],
        ..simulation::SimulationParameters::nearest_neighbor(vec![2, 5], 1.0, 1.0)
    };
    let lattice = params.build_lattice().unwrap();
    assert_eq!(lattice.neighbors(0), &[1, 4]);
}
