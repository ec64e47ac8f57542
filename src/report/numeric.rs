//! NaN-safe numeric helpers
//!
//! Ingested report cells can be blank, which reaches the engine as NaN.
//! Every aggregate-producing function routes its arithmetic through these
//! helpers so partial data degrades to an undefined value or a zero
//! contribution instead of poisoning a whole rollup — division by zero and
//! NaN propagation are absorbed here, never raised.

/// Ratio `num / den`.
///
/// Returns `None` when the denominator is NaN or not strictly positive,
/// or when the numerator itself is undefined. Never panics, never divides
/// by zero.
pub fn ratio(num: f64, den: f64) -> Option<f64> {
    if num.is_nan() || den.is_nan() || den <= 0.0 {
        None
    } else {
        Some(num / den)
    }
}

/// `Option`-friendly variant of [`ratio`] for values that are already
/// possibly-undefined (e.g. a CTM that could not be computed).
pub fn ratio_opt(num: f64, den: Option<f64>) -> Option<f64> {
    ratio(num, den?)
}

/// Replace a NaN with zero. Used before sums where a blank cell must count
/// as "nothing recorded" rather than wiping out the total.
pub fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Same-length copy of `values` with every NaN replaced by zero.
pub fn nan_to_zero_seq(values: &[f64]) -> Vec<f64> {
    values.iter().copied().map(nan_to_zero).collect()
}

/// Sum of `values` with NaN entries contributing zero.
pub fn nansum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().map(nan_to_zero).sum()
}

/// Arithmetic mean of the non-NaN entries of `values`.
///
/// Returns `None` when no valid entries remain. This is the aggregation
/// used for QC percentages, which are averaged and never summed.
pub fn mean_valid<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_finite_values() {
        assert_eq!(ratio(10.0, 4.0), Some(2.5));
        assert_eq!(ratio(0.0, 100.0), Some(0.0));
    }

    #[test]
    fn ratio_undefined_for_nonpositive_denominator() {
        assert_eq!(ratio(100.0, 0.0), None);
        assert_eq!(ratio(100.0, -3.0), None);
        assert_eq!(ratio(100.0, f64::NAN), None);
    }

    #[test]
    fn ratio_undefined_for_nan_numerator() {
        assert_eq!(ratio(f64::NAN, 5.0), None);
    }

    #[test]
    fn nansum_skips_nan_entries() {
        let total = nansum([1.0, f64::NAN, 2.0, f64::NAN]);
        assert!((total - 3.0).abs() < 1e-12);
    }

    #[test]
    fn nan_to_zero_seq_preserves_length() {
        let out = nan_to_zero_seq(&[1.0, f64::NAN, 3.0]);
        assert_eq!(out, vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn mean_valid_ignores_invalid_entries() {
        assert_eq!(mean_valid([f64::NAN, 98.0, 96.0]), Some(97.0));
        assert_eq!(mean_valid([f64::NAN, f64::NAN]), None);
        assert_eq!(mean_valid(std::iter::empty()), None);
    }
}
