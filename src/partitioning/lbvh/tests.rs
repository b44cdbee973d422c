use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::partitioning::{BuildError, Lbvh, NearestCandidate};
use crate::query::{nearest, overlap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_point(rng: &mut StdRng) -> Point<Real> {
    Point::new(
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
    )
}

fn random_aabbs(rng: &mut StdRng, len: usize) -> Vec<Aabb> {
    (0..len)
        .map(|_| {
            let half: Real = rng.gen_range(0.0..2.0);
            Aabb::from_half_extents(random_point(rng), Vector::repeat(half))
        })
        .collect()
}

fn collect_overlap(bvh: &Lbvh, query: &Aabb) -> Vec<u32> {
    let mut matches = Vec::new();
    bvh.traverse(&overlap(*query), &mut |primitive: u32| {
        matches.push(primitive)
    });
    matches.sort_unstable();
    matches
}

#[test]
fn build_is_well_formed_for_every_size() {
    let mut rng = StdRng::seed_from_u64(0x7a3c_55d1_9e02_4b8f);
    for len in 1..=64 {
        let aabbs = random_aabbs(&mut rng, len);
        let bvh = Lbvh::from_primitives(&aabbs[..]).unwrap();
        assert_eq!(bvh.leaf_count(), len);
        bvh.assert_well_formed();
    }
}

#[test]
fn build_with_compact_keys_is_well_formed() {
    let mut rng = StdRng::seed_from_u64(0x11d4_90aa_2c1f_7e63);
    for len in [1, 2, 3, 7, 32, 100] {
        let aabbs = random_aabbs(&mut rng, len);
        let bvh = Lbvh::from_primitives_with_keys::<u32, _>(&aabbs[..]).unwrap();
        bvh.assert_well_formed();
    }
}

#[test]
fn duplicate_positions_still_build_a_proper_tree() {
    // Identical boxes collide on their Morton key; the tree topology then
    // comes entirely from the leaf-index fallback of the prefix function.
    for len in [2, 3, 8, 33] {
        let points = vec![Point::new(0.0, 0.0, 0.0); len];
        let bvh = Lbvh::from_primitives(&points[..]).unwrap();
        assert_eq!(bvh.leaf_count(), len);
        bvh.assert_well_formed();
    }
}

#[test]
fn build_rejects_empty_input() {
    let aabbs: Vec<Aabb> = Vec::new();
    assert_eq!(
        Lbvh::from_primitives(&aabbs).unwrap_err(),
        BuildError::Empty
    );
}

#[test]
fn build_rejects_inverted_boxes() {
    let mut rng = StdRng::seed_from_u64(0x03f8_11bc_6077_29ad);
    let mut aabbs = random_aabbs(&mut rng, 10);
    aabbs[7] = Aabb::new(Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 1.0));
    assert_eq!(
        Lbvh::from_primitives(&aabbs).unwrap_err(),
        BuildError::InvalidGeometry { index: 7 }
    );
}

#[test]
fn single_primitive_tree() {
    let points = [Point::new(4.0, 5.0, 6.0)];
    let bvh = Lbvh::from_primitives(&points[..]).unwrap();
    bvh.assert_well_formed();
    assert!(bvh.root().is_leaf());

    assert_eq!(collect_overlap(&bvh, &Aabb::from_point(points[0])), vec![0]);

    let mut results = Vec::new();
    bvh.traverse_nearest(&nearest(Point::origin(), 1), &mut |primitive: u32,
                                                             _distance: Real| {
        results.push(primitive)
    });
    assert_eq!(results, vec![0]);
}

#[test]
fn overlap_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0xbb61_4df0_8c3a_0217);
    let aabbs = random_aabbs(&mut rng, 200);
    let bvh = Lbvh::from_primitives(&aabbs[..]).unwrap();

    for _ in 0..20 {
        let query = Aabb::from_half_extents(random_point(&mut rng), Vector::repeat(8.0));
        let expected: Vec<u32> = aabbs
            .iter()
            .enumerate()
            .filter(|(_, aabb)| aabb.intersects(&query))
            .map(|(i, _)| i as u32)
            .collect();
        assert_eq!(collect_overlap(&bvh, &query), expected);
    }
}

#[test]
fn shuffled_input_yields_equal_match_sets() {
    use rand::seq::SliceRandom;

    let mut rng = StdRng::seed_from_u64(0x5e92_c4b7_013d_86fa);
    let aabbs = random_aabbs(&mut rng, 150);

    let mut permutation: Vec<usize> = (0..aabbs.len()).collect();
    permutation.shuffle(&mut rng);
    let shuffled: Vec<Aabb> = permutation.iter().map(|&i| aabbs[i]).collect();

    let bvh_a = Lbvh::from_primitives(&aabbs[..]).unwrap();
    let bvh_b = Lbvh::from_primitives(&shuffled[..]).unwrap();

    for _ in 0..20 {
        let query = Aabb::from_half_extents(random_point(&mut rng), Vector::repeat(10.0));
        let matches_a = collect_overlap(&bvh_a, &query);

        // Indices into the shuffled input name the same primitives through
        // the permutation.
        let mut matches_b: Vec<u32> = collect_overlap(&bvh_b, &query)
            .into_iter()
            .map(|i| permutation[i as usize] as u32)
            .collect();
        matches_b.sort_unstable();

        assert_eq!(matches_a, matches_b);
    }
}

#[test]
fn nearest_reports_sorted_distances_and_breaks_ties_by_index() {
    let points = vec![Point::new(0.0, 0.0, 0.0); 8];
    let bvh = Lbvh::from_primitives(&points).unwrap();

    let mut results = Vec::new();
    bvh.traverse_nearest(
        &nearest(Point::new(1.0, 0.0, 0.0), 3),
        &mut |primitive: u32, distance: Real| results.push((primitive, distance)),
    );
    assert_eq!(results, vec![(0, 1.0), (1, 1.0), (2, 1.0)]);
}

#[test]
fn nearest_into_runs_in_caller_scratch() {
    let mut rng = StdRng::seed_from_u64(0xc7f0_3a61_5b98_e24d);
    let aabbs = random_aabbs(&mut rng, 100);
    let bvh = Lbvh::from_primitives(&aabbs[..]).unwrap();
    let query = nearest(random_point(&mut rng), 12);

    let mut expected = Vec::new();
    bvh.traverse_nearest(&query, &mut |primitive: u32, distance: Real| {
        expected.push((primitive, distance))
    });

    let mut scratch = vec![NearestCandidate::default(); 12];
    let mut results = Vec::new();
    bvh.traverse_nearest_into(&query, &mut scratch, &mut |primitive: u32, distance: Real| {
        results.push((primitive, distance))
    });

    assert_eq!(results, expected);
    assert_eq!(results.len(), 12);
}
