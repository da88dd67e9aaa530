//! Similarity between two count profiles of equal length.
//!
//! Both measures first scale each vector to unit L2 norm.

use crate::core::error::{KmerError, Result};
use crate::core::profile::Profile;

const COORD_DIGITS: i32 = 10;
const DISTANCE_DIGITS: i32 = 8;
const CORRELATION_DIGITS: i32 = 5;

/// Euclidean distance between the unit-normalized vectors, rounded to 8 decimals.
pub fn euclidean_distance(a: &[u32], b: &[u32]) -> Result<f64> {
    check_dims(a, b)?;
    let na = normalized(a)?;
    let nb = normalized(b)?;
    let sum: f64 = na
        .iter()
        .zip(&nb)
        .map(|(&x, &y)| {
            let d = round_to(x, COORD_DIGITS) - round_to(y, COORD_DIGITS);
            d * d
        })
        .sum();
    Ok(round_to(sum.sqrt(), DISTANCE_DIGITS))
}

/// Pearson correlation of the unit-normalized vectors, rounded to 5 decimals.
pub fn pearson_correlation(a: &[u32], b: &[u32]) -> Result<f64> {
    check_dims(a, b)?;
    if is_flat(a) || is_flat(b) {
        return Err(KmerError::InvalidArgument(
            "correlation is undefined for a profile without variance".into(),
        ));
    }
    let x = normalized(a)?;
    let y = normalized(b)?;
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut ssxy, mut ssxx, mut ssyy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(&y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ssxy += dx * dy;
        ssxx += dx * dx;
        ssyy += dy * dy;
    }
    let r = ssxy / (ssxx * ssyy).sqrt();
    if !r.is_finite() {
        return Err(KmerError::InvalidArgument(
            "correlation is undefined for a profile without variance".into(),
        ));
    }
    Ok(round_to(r.clamp(-1.0, 1.0), CORRELATION_DIGITS))
}

impl Profile {
    pub fn euclidean_distance(&self, other: &Profile) -> Result<f64> {
        euclidean_distance(self.counts(), other.counts())
    }

    pub fn pearson_correlation(&self, other: &Profile) -> Result<f64> {
        pearson_correlation(self.counts(), other.counts())
    }
}

fn check_dims(a: &[u32], b: &[u32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(KmerError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(KmerError::InvalidArgument("cannot compare empty profiles".into()));
    }
    Ok(())
}

fn is_flat(v: &[u32]) -> bool {
    v.iter().all(|&c| c == v[0])
}

fn normalized(v: &[u32]) -> Result<Vec<f64>> {
    let norm = v.iter().map(|&c| (c as f64) * (c as f64)).sum::<f64>().sqrt();
    if norm == 0.0 {
        return Err(KmerError::InvalidArgument(
            "cannot normalize an all-zero profile".into(),
        ));
    }
    Ok(v.iter().map(|&c| c as f64 / norm).collect())
}

fn round_to(x: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (x * scale).round() / scale
}
