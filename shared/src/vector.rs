//! Numeric helpers over dense vectors, e.g. for comparing embeddings.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
    #[error("vectors must be of the same length (got {left} and {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("cosine similarity is undefined for a zero vector")]
    ZeroNorm,
}

fn ensure_same_len(a: &[f64], b: &[f64]) -> Result<(), VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64, VectorError> {
    ensure_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Euclidean (L2) norm. The empty vector has norm 0.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub fn subtract(a: &[f64], b: &[f64]) -> Result<Vec<f64>, VectorError> {
    ensure_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

/// Cosine of the angle between `a` and `b`.
///
/// Fails with [`VectorError::ZeroNorm`] rather than returning NaN when either
/// vector has zero length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, VectorError> {
    let product = dot(a, b)?;
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        return Err(VectorError::ZeroNorm);
    }
    Ok(product / denominator)
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64, VectorError> {
    Ok(norm(&subtract(a, b)?))
}
