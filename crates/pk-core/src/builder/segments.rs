//! Proportional partitioning of a length into segments.

use crate::model::non_negative;

/// Resolve `count` segment sizes that sum exactly to `total`.
///
/// Explicit sizes come from `segments`; any missing, non-positive, or
/// non-finite entry defaults to an equal share (`total / count`). The result
/// is rescaled to `total`, and the last segment absorbs the floating-point
/// remainder.
pub fn normalize_segments(total: f64, count: usize, segments: Option<&[f64]>) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let total = non_negative(total);
    let equal = total / count as f64;

    let raw: Vec<f64> = (0..count)
        .map(|i| {
            segments
                .and_then(|s| s.get(i))
                .copied()
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(equal)
        })
        .collect();

    let sum: f64 = raw.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return vec![equal; count];
    }

    let scale = total / sum;
    let mut out: Vec<f64> = raw.iter().map(|v| v * scale).collect();
    let head: f64 = out[..count - 1].iter().sum();
    out[count - 1] = (total - head).max(0.0);
    out
}

/// Running start offsets of `segments` from `origin`, plus the end offset.
pub fn offsets(origin: f64, segments: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(segments.len() + 1);
    let mut at = origin;
    out.push(at);
    for s in segments {
        at += s;
        out.push(at);
    }
    out
}
