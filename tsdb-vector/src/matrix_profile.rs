//! Matrix Profile engine: self-join over sliding windows, with
//! `Motif`/`Anomaly` derivations.
//!
//! The outer self-join loop is `rayon`-parallelized: each row's nearest
//! non-trivial neighbor search is independent of the others.

use rayon::prelude::*;
use serde::Serialize;
use tsdb_core::series::Point;
use tsdb_core::{Error, Result};

use crate::distance::{euclidean_distance, zscore_normalize};

/// The raw self-join result: `profile[i]` is the minimum z-normalized
/// Euclidean distance from subsequence `i` to its nearest non-trivial
/// neighbor, and `profile_index[i]` is that neighbor's position.
#[derive(Debug, Clone)]
pub struct MatrixProfile {
    pub window: usize,
    pub profile: Vec<f64>,
    pub profile_index: Vec<usize>,
}

/// A single motif or anomaly pick: a subsequence position and its
/// profile score. `index`/`index_match` are carried as optional
/// fields for callers that want the raw positions; most don't need
/// them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileMatch {
    pub score: f64,
    pub window_size: usize,
    pub index: Option<usize>,
    pub index_match: Option<usize>,
}

/// Compute the self-join matrix profile for `points` over window
/// length `window`. Returns an empty profile (not an error) when
/// `points` is shorter than `window`.
pub fn compute(points: &[Point], dimension: usize, window: usize) -> Result<MatrixProfile> {
    if window < 2 {
        return Err(Error::InvalidArgument(
            "window must be at least 2".to_string(),
        ));
    }

    let n = points.len();
    if n < window {
        return Ok(MatrixProfile {
            window,
            profile: Vec::new(),
            profile_index: Vec::new(),
        });
    }

    let m = n - window + 1;
    let exclusion_zone = window.div_ceil(2);

    let normalized: Vec<Vec<f64>> = (0..m)
        .map(|start| normalize_window(points, start, window, dimension))
        .collect();

    let rows: Vec<(f64, usize)> = (0..m)
        .into_par_iter()
        .map(|i| nearest_neighbor(&normalized, i, exclusion_zone))
        .collect();

    let mut profile = Vec::with_capacity(m);
    let mut profile_index = Vec::with_capacity(m);
    for (distance, neighbor) in rows {
        profile.push(distance);
        profile_index.push(neighbor);
    }

    Ok(MatrixProfile {
        window,
        profile,
        profile_index,
    })
}

fn normalize_window(points: &[Point], start: usize, window: usize, dimension: usize) -> Vec<f64> {
    let mut flattened = Vec::with_capacity(window * dimension);
    for d in 0..dimension {
        let column: Vec<f64> = (start..start + window).map(|t| points[t].values[d]).collect();
        flattened.extend(zscore_normalize(&column));
    }
    flattened
}

fn nearest_neighbor(normalized: &[Vec<f64>], i: usize, exclusion_zone: usize) -> (f64, usize) {
    let m = normalized.len();
    let mut best_distance = f64::INFINITY;
    let mut best_j = i;
    for j in 0..m {
        if i.abs_diff(j) < exclusion_zone {
            continue;
        }
        let distance = euclidean_distance(&normalized[i], &normalized[j]);
        if distance < best_distance {
            best_distance = distance;
            best_j = j;
        }
    }
    if best_distance.is_finite() {
        (best_distance, best_j)
    } else {
        // No candidate survived the exclusion zone (m too small relative
        // to the window); report a trivial self-match with zero score.
        (0.0, i)
    }
}

/// The `k` smallest, mutually non-overlapping profile positions —
/// recurring shapes — ascending by score.
pub fn motifs(points: &[Point], dimension: usize, window: usize, k: usize) -> Result<Vec<ProfileMatch>> {
    let profile = compute(points, dimension, window)?;
    Ok(select_non_overlapping(&profile, k, true))
}

/// The `k` largest, mutually non-overlapping profile positions —
/// discords — descending by score.
pub fn anomalies(points: &[Point], dimension: usize, window: usize, k: usize) -> Result<Vec<ProfileMatch>> {
    let profile = compute(points, dimension, window)?;
    Ok(select_non_overlapping(&profile, k, false))
}

fn select_non_overlapping(profile: &MatrixProfile, k: usize, ascending: bool) -> Vec<ProfileMatch> {
    let m = profile.profile.len();
    if m == 0 || k == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        let cmp = profile.profile[a]
            .partial_cmp(&profile.profile[b])
            .unwrap_or(std::cmp::Ordering::Equal);
        if ascending { cmp } else { cmp.reverse() }
    });

    let mut excluded = vec![false; m];
    let mut results = Vec::with_capacity(k);
    for i in order {
        if results.len() >= k {
            break;
        }
        if excluded[i] {
            continue;
        }
        let j = profile.profile_index[i];
        results.push(ProfileMatch {
            score: profile.profile[i],
            window_size: profile.window,
            index: Some(i),
            index_match: Some(j),
        });
        exclude_radius(&mut excluded, i, profile.window);
        exclude_radius(&mut excluded, j, profile.window);
    }
    results
}

fn exclude_radius(excluded: &mut [bool], center: usize, radius: usize) {
    let start = center.saturating_sub(radius);
    let end = (center + radius + 1).min(excluded.len());
    for slot in excluded.iter_mut().take(end).skip(start) {
        *slot = true;
    }
}
