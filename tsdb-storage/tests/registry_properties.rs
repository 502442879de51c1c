use proptest::prelude::*;
use tsdb_storage::SeriesRegistry;

fn finite_vec(dimension: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1e6f64..1e6, dimension..=dimension)
}

proptest! {
    /// Whatever sequence of points is inserted into a freshly created
    /// series comes back out of `query` in the same order, unchanged.
    #[test]
    fn query_returns_inserted_points_in_insertion_order(
        dimension in 1usize..4,
        batches in prop::collection::vec(finite_vec(1), 0..20),
    ) {
        let dimension = dimension.max(1);
        let batches: Vec<Vec<f64>> = batches
            .into_iter()
            .map(|v| vec![v[0]; dimension])
            .collect();

        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(async {
                let registry = SeriesRegistry::new();
                registry.create_series("s", dimension).await.unwrap();
                for values in &batches {
                    registry.insert("s", values.clone()).await.unwrap();
                }

                let points = registry.query("s").await.unwrap();
                prop_assert_eq!(points.len(), batches.len());
                for (point, expected) in points.iter().zip(&batches) {
                    prop_assert_eq!(&point.values, expected);
                }

                let stats = registry.stats("s").await.unwrap();
                prop_assert_eq!(stats.total_points, batches.len());
                prop_assert_eq!(stats.dimension, dimension);
                Ok(())
            })?;
    }
}
