/// Approximates the Wasserstein-1 distance between two 1D empirical sample sets.
///
/// Both sets are sorted and the mean absolute difference of the sorted values is returned.
/// This is the exact W1 distance when both sets have the same size. Otherwise the longer
/// set is truncated to the length of the shorter one after sorting, dropping its upper tail.
///
/// # Arguments
/// * `data` - Samples from the target distribution.
/// * `model` - Samples from the model distribution.
///
/// # Returns
/// The estimated distance, or `NaN` if either set is empty.
pub fn wasserstein_1d(data: &[f32], model: &[f32]) -> f32 {
    if data.is_empty() || model.is_empty() {
        return f32::NAN;
    }

    let n = data.len().min(model.len());
    let data = sorted(data);
    let model = sorted(model);

    let total: f32 = data[..n]
        .iter()
        .zip(&model[..n])
        .map(|(d, m)| (d - m).abs())
        .sum();

    total / n as f32
}

fn sorted(xs: &[f32]) -> Vec<f32> {
    let mut xs = xs.to_vec();
    xs.sort_by(f32::total_cmp);
    xs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sets_are_at_zero() {
        assert_eq!(wasserstein_1d(&[-1., 0., 1.], &[-1., 0., 1.]), 0.);
    }

    #[test]
    fn order_does_not_matter() {
        assert_eq!(wasserstein_1d(&[1., -1., 0.], &[0., 1., -1.]), 0.);
    }

    #[test]
    fn empty_is_undefined() {
        assert!(wasserstein_1d(&[], &[0., 1.]).is_nan());
        assert!(wasserstein_1d(&[0., 1.], &[]).is_nan());
        assert!(wasserstein_1d(&[], &[]).is_nan());
    }

    #[test]
    fn shift_is_measured() {
        let d = wasserstein_1d(&[0., 0.5, 1.], &[0.25, 0.75, 1.25]);
        assert!((d - 0.25).abs() < 1e-6);
    }

    #[test]
    fn symmetric_for_equal_lengths() {
        let a = [0.3, -0.7, 0.1, 0.9];
        let b = [-0.2, 0.4, 0.8, -0.5];
        assert_eq!(wasserstein_1d(&a, &b), wasserstein_1d(&b, &a));
    }

    #[test]
    fn longer_set_loses_its_tail() {
        // sorted model truncated to [0, 1], the 10 is dropped
        let d = wasserstein_1d(&[0., 1.], &[10., 1., 0.]);
        assert_eq!(d, 0.);
    }

    #[test]
    fn never_negative() {
        let a = [0.9, -0.9, 0.2];
        let b = [-0.1, -0.3, 0.7, 0.05];
        assert!(wasserstein_1d(&a, &b) >= 0.);
    }
}
