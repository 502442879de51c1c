//! `FindSimilar`: an exact cosine-similarity scan over a series'
//! points. This is a linear scan, not an approximate nearest-neighbor
//! index — exactness matters more than sublinear lookup at the scale
//! a single series is expected to reach.

use serde::Serialize;
use tsdb_core::series::Point;
use tsdb_core::{Error, Result};

use crate::distance::cosine_similarity;

/// A single `FindSimilar` match: the point's own values and its
/// cosine similarity to the query vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
    pub values: Vec<f64>,
    pub similarity: f64,
}

/// Find the points in `points` most similar to `query`, restricted to
/// those with similarity at least `threshold`, sorted descending by
/// similarity with ties broken by earlier insertion index, capped at
/// `limit` results.
///
/// `dimension` is the series' fixed dimension; used only to validate
/// `query`'s length before scanning.
pub fn find_similar(
    points: &[Point],
    dimension: usize,
    query: &[f64],
    limit: usize,
    threshold: f64,
) -> Result<Vec<SimilarityMatch>> {
    if query.len() != dimension {
        return Err(Error::DimensionMismatch {
            expected: dimension,
            actual: query.len(),
        });
    }

    let mut matches: Vec<(usize, SimilarityMatch)> = points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let similarity = cosine_similarity(query, &point.values);
            if similarity >= threshold {
                Some((
                    index,
                    SimilarityMatch {
                        values: point.values.clone(),
                        similarity,
                    },
                ))
            } else {
                None
            }
        })
        .collect();

    // Descending by similarity; earlier insertion index wins ties.
    matches.sort_by(|(i_a, a), (i_b, b)| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| i_a.cmp(i_b))
    });

    matches.truncate(limit);
    Ok(matches.into_iter().map(|(_, m)| m).collect())
}
