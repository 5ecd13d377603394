use crate::geometry::{distance_sq, Point};
use rstar::primitives::GeomWithData;
use rstar::RTree;

/// A particle anchor tagged with its index in the field's particle vector.
pub type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Build an R*-tree over particle origins via bulk_load (O(n log n)).
///
/// A brute-force all-pairs scan would be O(n²) and still acceptable, since
/// the density cap of 40 per axis keeps fields in the low thousands of
/// particles, but the tree keeps rebuilds cheap through resize-heavy
/// sessions.
pub fn build_index(origins: &[Point]) -> RTree<IndexedPoint> {
    RTree::bulk_load(
        origins
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect(),
    )
}

/// Indices of the `k` nearest other particles to `origins[index]`, ascending
/// by squared distance with index-order tie-break (first-created wins when
/// distances are exactly equal).
pub fn nearest_neighbors(
    tree: &RTree<IndexedPoint>,
    origins: &[Point],
    index: usize,
    k: usize,
) -> Vec<usize> {
    let center = origins[index];
    let mut found: Vec<(f64, usize)> = tree
        .nearest_neighbor_iter(&[center.x, center.y])
        .filter(|n| n.data != index)
        .take(k)
        .map(|n| {
            let p = Point::new(n.geom()[0], n.geom()[1]);
            (distance_sq(center, p), n.data)
        })
        .collect();
    found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    found.into_iter().map(|(_, i)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_neighbors_excludes_self_and_sorts_by_distance() {
        let origins = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(0.0, 7.0),
        ];
        let tree = build_index(&origins);
        let neighbors = nearest_neighbors(&tree, &origins, 0, 3);
        assert_eq!(neighbors, vec![2, 3, 1]);
    }

    #[test]
    fn nearest_neighbors_returns_all_others_when_k_exceeds_field() {
        let origins = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let tree = build_index(&origins);
        let neighbors = nearest_neighbors(&tree, &origins, 1, 5);
        assert_eq!(neighbors, vec![0]);
    }

    #[test]
    fn nearest_neighbors_of_singleton_field_is_empty() {
        let origins = vec![Point::new(5.0, 5.0)];
        let tree = build_index(&origins);
        assert!(nearest_neighbors(&tree, &origins, 0, 5).is_empty());
    }
}
