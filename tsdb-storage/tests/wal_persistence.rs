use tempfile::TempDir;
use tsdb_storage::{SeriesRegistry, Wal};

/// Helper to open a WAL-backed registry rooted at `dir`.
async fn open_registry(dir: &TempDir) -> SeriesRegistry {
    let wal = Wal::open(dir.path()).expect("failed to open wal");
    SeriesRegistry::with_wal(wal)
        .await
        .expect("failed to build registry")
}

#[tokio::test]
async fn state_survives_a_simulated_restart() {
    let dir = TempDir::new().unwrap();

    {
        let registry = open_registry(&dir).await;
        registry.create_series("prices", 2).await.unwrap();
        registry.insert("prices", vec![100.0, 1.5]).await.unwrap();
        registry.insert("prices", vec![101.0, 1.6]).await.unwrap();
    }

    // Drop and reopen against the same directory, as if the process restarted.
    let registry = open_registry(&dir).await;
    let stats = registry.stats("prices").await.unwrap();
    assert_eq!(stats.total_points, 2);
    assert_eq!(stats.dimension, 2);

    let points = registry.query("prices").await.unwrap();
    assert_eq!(points[0].values, vec![100.0, 1.5]);
    assert_eq!(points[1].values, vec![101.0, 1.6]);
}

#[tokio::test]
async fn deleted_series_stays_gone_across_a_restart() {
    let dir = TempDir::new().unwrap();

    {
        let registry = open_registry(&dir).await;
        registry.create_series("temp", 1).await.unwrap();
        registry.insert("temp", vec![1.0]).await.unwrap();
        registry.delete_series("temp").await.unwrap();
    }

    let registry = open_registry(&dir).await;
    assert!(!registry.series_exists("temp").await);
}

#[tokio::test]
async fn in_memory_registry_does_not_touch_the_filesystem() {
    // No Wal involved at all; this should simply work without a persistence_path.
    let registry = SeriesRegistry::new();
    registry.create_series("ephemeral", 1).await.unwrap();
    registry.insert("ephemeral", vec![42.0]).await.unwrap();
    assert_eq!(registry.stats("ephemeral").await.unwrap().total_points, 1);
}
