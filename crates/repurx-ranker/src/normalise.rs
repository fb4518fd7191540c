//! Score normalisation.

/// Min-max normalisation into `[0, 1]`. An empty range (`max <= min`)
/// maps to 0; any positive spread, however small, is stretched.
pub fn minmax_normalise(value: f64, min_val: f64, max_val: f64) -> f64 {
    let range = max_val - min_val;
    if range <= 0.0 || !range.is_finite() {
        return 0.0;
    }
    ((value - min_val) / (max_val - min_val)).clamp(0.0, 1.0)
}

/// Min-max over the whole slice, in input order. When every score is equal
/// (including a single score) all outputs are 0.
pub fn minmax_slice(scores: &[f64]) -> Vec<f64> {
    let (min, max) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    scores.iter().map(|&s| minmax_normalise(s, min, max)).collect()
}
