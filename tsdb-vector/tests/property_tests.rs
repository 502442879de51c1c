use proptest::prelude::*;
use tsdb_core::series::Point;
use tsdb_vector::{find_similar, motifs};

fn finite_vec(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0f64..1000.0, len)
}

proptest! {
    /// Every similarity returned by `find_similar` lies in [-1, 1] and
    /// is at least the requested threshold.
    #[test]
    fn similarity_results_stay_within_bounds(
        points in prop::collection::vec(finite_vec(3), 1..20),
        query in finite_vec(3),
        threshold in -1.0f64..1.0,
    ) {
        let series: Vec<Point> = points.into_iter().map(Point::new).collect();
        let results = find_similar(&series, 3, &query, 10, threshold).unwrap();
        for m in &results {
            prop_assert!(m.similarity >= -1.0 - 1e-9 && m.similarity <= 1.0 + 1e-9);
            prop_assert!(m.similarity >= threshold - 1e-9);
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    /// Selected motif positions are always separated by at least the
    /// window length, regardless of the input series' shape.
    #[test]
    fn motif_positions_never_overlap(
        values in prop::collection::vec(-50.0f64..50.0, 30..60),
        window in 2usize..8,
    ) {
        let series: Vec<Point> = values.into_iter().map(|v| Point::new(vec![v])).collect();
        let result = motifs(&series, 1, window, 5).unwrap();
        for i in 0..result.len() {
            for j in (i + 1)..result.len() {
                let a = result[i].index.unwrap();
                let b = result[j].index.unwrap();
                prop_assert!(a.abs_diff(b) >= window);
            }
        }
    }
}
