//! Descriptive statistics over replicate groups.

use itertools::Itertools;
use log::{
    trace,
    warn,
};
use statrs::statistics::Statistics;

use crate::data_structs::{
    ConditionMeta,
    Difference,
    GroupSummary,
    LabeledGroup,
};
use crate::error::{
    CytoError,
    Result,
};

/// Mean and sample standard deviation (N - 1 denominator) of the finite
/// entries of `values`. Blank cells arrive as NaN and are left out.
///
/// A single value gives a NaN standard deviation, no value a NaN mean.
pub fn describe(values: &[f64]) -> (f64, f64) {
    let finite = finite_values(values);
    (finite.iter().mean(), finite.iter().std_dev())
}

/// Number of entries [`describe`] uses.
pub fn finite_count(values: &[f64]) -> usize {
    values.iter().filter(|v| v.is_finite()).count()
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Summarises `column` for every group, tagging each record with `condition`.
pub fn summarize(
    groups: &[LabeledGroup],
    column: &str,
    condition: Option<&ConditionMeta>,
) -> Result<Vec<GroupSummary>> {
    groups
        .iter()
        .map(|group| {
            let values = group.values(column)?;
            let (mean, std) = describe(&values);
            let n = finite_count(&values);
            if n < values.len() {
                warn!(
                    "group {} '{}': {} of {} values missing in '{column}'",
                    group.index(),
                    group.label(),
                    values.len() - n,
                    values.len()
                );
            }
            trace!(
                "group {} '{}': n={n} mean={mean} std={std}",
                group.index(),
                group.label(),
            );
            Ok(GroupSummary {
                index: group.index(),
                label: group.label().to_string(),
                n,
                mean,
                std,
                values,
                condition: condition.cloned(),
            })
        })
        .collect()
}

/// Positional `b - a` differences with independent error propagation.
///
/// `mean_diff = mean_b - mean_a`, `std_combined = sqrt(std_a² + std_b²)`.
/// Both series must list the same groups in the same order.
pub fn paired_difference(
    a: &[GroupSummary],
    b: &[GroupSummary],
) -> Result<Vec<Difference>> {
    if a.len() != b.len() {
        return Err(CytoError::SeriesMismatch {
            left:  a.len(),
            right: b.len(),
        });
    }
    a.iter()
        .zip(b.iter())
        .map(|(sa, sb)| {
            Ok(Difference {
                index:           sb.index,
                label:           sb.label.clone(),
                mean_diff:       sb.mean - sa.mean,
                std_combined:    combined_std(sa.std, sb.std),
                replicate_diffs: replicate_differences(&sa.values, &sb.values)?,
            })
        })
        .collect()
}

/// `sqrt(std_a² + std_b²)`.
pub fn combined_std(
    std_a: f64,
    std_b: f64,
) -> f64 {
    std_a.hypot(std_b)
}

/// Element-wise `b_i - a_i` of two equally sized replicate sets.
pub fn replicate_differences(
    a: &[f64],
    b: &[f64],
) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(CytoError::SeriesMismatch {
            left:  a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip_eq(b.iter()).map(|(va, vb)| vb - va).collect())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn summary(
        mean: f64,
        std: f64,
    ) -> GroupSummary {
        GroupSummary {
            index: 0,
            label: "g".into(),
            n: 3,
            mean,
            std,
            values: vec![mean; 3],
            condition: None,
        }
    }

    #[test]
    fn test_describe_uses_sample_std() {
        let (mean, std) = describe(&[1.0, 2.0, 3.0]);
        assert_approx_eq!(mean, 2.0);
        assert_approx_eq!(std, 1.0);

        let (mean, std) = describe(&[10.0, 11.0, 12.0]);
        assert_approx_eq!(mean, 11.0);
        assert_approx_eq!(std, 1.0);
    }

    #[test]
    fn test_describe_single_value_std_is_nan() {
        let (mean, std) = describe(&[4.2]);
        assert_approx_eq!(mean, 4.2);
        assert!(std.is_nan());
    }

    #[test]
    fn test_describe_skips_missing_values() {
        let (mean, std) = describe(&[1.0, f64::NAN, 3.0]);
        assert_approx_eq!(mean, 2.0);
        assert_approx_eq!(std, 2f64.sqrt());
        assert_eq!(finite_count(&[1.0, f64::NAN, 3.0]), 2);

        let (mean, std) = describe(&[f64::NAN, f64::NAN]);
        assert!(mean.is_nan());
        assert!(std.is_nan());
    }

    #[test]
    fn test_describe_is_order_insensitive() {
        let (m1, s1) = describe(&[3.0, 9.5, 1.25]);
        let (m2, s2) = describe(&[1.25, 3.0, 9.5]);
        assert_approx_eq!(m1, m2);
        assert_approx_eq!(s1, s2);
    }

    #[test]
    fn test_combined_std() {
        assert_approx_eq!(combined_std(1.0, 1.0), 2f64.sqrt());
        assert_approx_eq!(combined_std(1.0, 2.0), 5f64.sqrt());
        assert!(combined_std(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn test_paired_difference_length_mismatch() {
        let err = paired_difference(&[summary(1.0, 1.0)], &[]).unwrap_err();
        assert!(matches!(err, CytoError::SeriesMismatch {
            left:  1,
            right: 0,
        }));
    }

    #[test]
    fn test_replicate_differences() {
        let diffs =
            replicate_differences(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(diffs, vec![1.0, 2.0, 3.0]);
        assert!(replicate_differences(&[1.0], &[1.0, 2.0]).is_err());
    }
}
