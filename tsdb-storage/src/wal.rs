//! Optional write-ahead persistence: one append-only log per series
//! plus a registry manifest. Every record is length-prefixed and
//! CRC32-checksummed so a crash mid-write truncates cleanly on replay
//! instead of corrupting later records.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tsdb_core::series::{Point, SeriesMeta};

const SERIES_DIR: &str = "series";
const MANIFEST_FILE: &str = "registry.manifest";

#[derive(Debug, Clone, Serialize, Deserialize)]
enum ManifestEntry {
    CreateSeries { name: String, dimension: usize },
    DeleteSeries { name: String },
}

fn append_record<T: Serialize>(path: &Path, record: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_vec(record).map_err(io::Error::other)?;
    let crc = crc32fast::hash(&payload);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(&crc.to_le_bytes())?;
    file.write_all(&(payload.len() as u32).to_le_bytes())?;
    file.write_all(&payload)?;
    file.flush()
}

/// Reads every well-formed record from `path`. A record whose length
/// header would run past the end of the file is treated as a
/// crash-truncated tail write and silently dropped, not an error.
fn read_records<T: for<'de> Deserialize<'de>>(path: &Path) -> io::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut file = File::open(path)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;

    let mut records = Vec::new();
    let mut offset = 0;
    while offset + 8 <= buf.len() {
        let crc = u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap());
        let len = u32::from_le_bytes(buf[offset + 4..offset + 8].try_into().unwrap()) as usize;
        offset += 8;
        if offset + len > buf.len() {
            break;
        }
        let payload = &buf[offset..offset + len];
        if crc32fast::hash(payload) != crc {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "WAL record failed checksum validation",
            ));
        }
        records.push(serde_json::from_slice(payload).map_err(io::Error::other)?);
        offset += len;
    }
    Ok(records)
}

/// An append-only, per-series durability layer rooted at a directory.
pub struct Wal {
    dir: PathBuf,
}

impl Wal {
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn series_log_path(&self, name: &str) -> PathBuf {
        self.dir.join(SERIES_DIR).join(format!("{name}.log"))
    }

    pub fn record_create_series(&self, name: &str, dimension: usize) -> io::Result<()> {
        append_record(
            &self.manifest_path(),
            &ManifestEntry::CreateSeries {
                name: name.to_string(),
                dimension,
            },
        )
    }

    pub fn record_delete_series(&self, name: &str) -> io::Result<()> {
        append_record(
            &self.manifest_path(),
            &ManifestEntry::DeleteSeries {
                name: name.to_string(),
            },
        )
    }

    pub fn record_insert(&self, series: &str, values: &[f64]) -> io::Result<()> {
        append_record(&self.series_log_path(series), &values.to_vec())
    }

    /// Rebuild `(SeriesMeta, points)` pairs in creation order by replaying
    /// the manifest and then each surviving series' own log.
    pub fn replay(&self) -> io::Result<Vec<(SeriesMeta, Vec<Point>)>> {
        let entries: Vec<ManifestEntry> = read_records(&self.manifest_path())?;

        let mut order = Vec::new();
        let mut live = std::collections::HashMap::new();
        for entry in entries {
            match entry {
                ManifestEntry::CreateSeries { name, dimension } => {
                    if !live.contains_key(&name) {
                        order.push(name.clone());
                    }
                    live.insert(name, dimension);
                }
                ManifestEntry::DeleteSeries { name } => {
                    live.remove(&name);
                }
            }
        }

        let mut result = Vec::new();
        for name in order {
            let Some(dimension) = live.get(&name).copied() else {
                continue;
            };
            let values: Vec<Vec<f64>> = read_records(&self.series_log_path(&name))?;
            let points = values.into_iter().map(Point::new).collect();
            result.push((SeriesMeta { name, dimension }, points));
        }
        Ok(result)
    }
}
