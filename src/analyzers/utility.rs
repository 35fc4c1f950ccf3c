/// Empirical quantile of an ascending-sorted slice at fraction `f` (0.0–1.0).
///
/// The position `f * (n - 1)` is interpolated linearly between the two
/// neighbouring order statistics. Returns 0.0 for empty input.
pub fn quantile_sorted(sorted: &[f64], f: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = f.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Sorts a copy of `values` ascending. Callers pass finite values only.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}
