//! The series registry: named, dimension-fixed, insertion-ordered
//! vector series, protected by a per-series reader-writer discipline.
//!
//! A two-level lock: one `RwLock` over the registry's name → series
//! map (held only for create/delete/lookup), and one `RwLock` per
//! [`Series`] guarding its point vector (held for insert/read). An
//! `Insert` on series `a` never contends with a `Query` on series `b`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tsdb_core::{Error, Result};
use tsdb_core::series::Point;

use crate::wal::Wal;

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct SeriesStats {
    pub total_points: usize,
    pub dimension: usize,
}

/// A consistent point-in-time view of a series, for the analytic
/// engines to operate on without holding a lock across an O(n²)
/// computation.
#[derive(Debug, Clone)]
pub struct SeriesSnapshot {
    pub dimension: usize,
    pub points: Vec<Point>,
}

struct Series {
    dimension: usize,
    points: RwLock<Vec<Point>>,
}

impl Series {
    fn new(dimension: usize) -> Self {
        Self {
            dimension,
            points: RwLock::new(Vec::new()),
        }
    }
}

pub struct SeriesRegistry {
    series: RwLock<HashMap<String, Arc<Series>>>,
    wal: Option<Wal>,
}

impl SeriesRegistry {
    /// An in-memory-only registry; nothing survives a restart.
    pub fn new() -> Self {
        Self {
            series: RwLock::new(HashMap::new()),
            wal: None,
        }
    }

    /// A registry backed by a write-ahead log, replayed at construction
    /// time so the registry is fully populated before any connection
    /// is accepted.
    ///
    /// Async rather than synchronous: the replayed points are written
    /// through `RwLock::write().await` instead of `blocking_write`,
    /// which panics when called from inside a Tokio runtime — and this
    /// is always called from `build_registry` inside one.
    pub async fn with_wal(wal: Wal) -> Result<Self> {
        let replayed = wal.replay()?;
        let mut map = HashMap::with_capacity(replayed.len());
        for (meta, points) in replayed {
            let series = Series::new(meta.dimension);
            *series.points.write().await = points;
            map.insert(meta.name, Arc::new(series));
        }
        Ok(Self {
            series: RwLock::new(map),
            wal: Some(wal),
        })
    }

    pub async fn create_series(&self, name: &str, dimension: usize) -> Result<()> {
        if dimension == 0 {
            return Err(Error::InvalidArgument(
                "dimension must be positive".to_string(),
            ));
        }

        let mut map = self.series.write().await;
        if map.contains_key(name) {
            return Err(Error::SeriesAlreadyExists(name.to_string()));
        }
        if let Some(wal) = &self.wal {
            wal.record_create_series(name, dimension)?;
        }
        map.insert(name.to_string(), Arc::new(Series::new(dimension)));
        Ok(())
    }

    pub async fn delete_series(&self, name: &str) -> Result<()> {
        let mut map = self.series.write().await;
        if map.remove(name).is_none() {
            return Err(Error::SeriesNotFound(name.to_string()));
        }
        if let Some(wal) = &self.wal {
            wal.record_delete_series(name)?;
        }
        Ok(())
    }

    pub async fn insert(&self, name: &str, values: Vec<f64>) -> Result<usize> {
        let series = self.lookup(name).await?;

        if values.len() != series.dimension {
            return Err(Error::DimensionMismatch {
                expected: series.dimension,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidArgument(
                "all vector components must be finite".to_string(),
            ));
        }

        // The WAL write happens with the points lock already held, so
        // concurrent inserts hit the log in the same order they land in
        // memory — writing it beforehand could let two racing inserts
        // log in one order and commit in the other, desyncing replay.
        let mut points = series.points.write().await;
        if let Some(wal) = &self.wal {
            wal.record_insert(name, &values)?;
        }
        points.push(Point::new(values));
        Ok(points.len() - 1)
    }

    pub async fn query(&self, name: &str) -> Result<Vec<Point>> {
        let series = self.lookup(name).await?;
        Ok(series.points.read().await.clone())
    }

    pub async fn stats(&self, name: &str) -> Result<SeriesStats> {
        let series = self.lookup(name).await?;
        let points = series.points.read().await;
        Ok(SeriesStats {
            total_points: points.len(),
            dimension: series.dimension,
        })
    }

    /// A consistent snapshot for an analytic engine to read from; the
    /// per-series lock is released as soon as the clone completes, so a
    /// long-running `Motif`/`Anomaly` call never blocks concurrent
    /// inserts on unrelated series and only briefly blocks inserts on
    /// this one.
    pub async fn snapshot(&self, name: &str) -> Result<SeriesSnapshot> {
        let series = self.lookup(name).await?;
        let points = series.points.read().await.clone();
        Ok(SeriesSnapshot {
            dimension: series.dimension,
            points,
        })
    }

    pub async fn series_exists(&self, name: &str) -> bool {
        self.series.read().await.contains_key(name)
    }

    async fn lookup(&self, name: &str) -> Result<Arc<Series>> {
        self.series
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::SeriesNotFound(name.to_string()))
    }
}

impl Default for SeriesRegistry {
    fn default() -> Self {
        Self::new()
    }
}
