// Wald-type inference for the ratio of two Bernoulli rates
//
// The interval is built on the log-ratio scale around the null bounds and
// exponentiated back; H0 is rejected when the observed ratio falls strictly
// outside it. Below the validity gate the normal approximation is not trusted
// and the test abstains instead of reporting an unreliable interval.

use super::hypothesis::{serialize_bound, Hypothesis, HypothesisInput};
use crate::error::{Result, StatError};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

/// Default significance level (Type I error rate)
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Minimum trials per group for the normal approximation
pub const MIN_TRIALS: u64 = 100;

/// Minimum successes per group for the normal approximation
pub const MIN_SUCCESSES: u64 = 5;

/// Confidence bounds on the ratio scale; either side may be infinite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioInterval {
    #[serde(serialize_with = "serialize_bound")]
    pub lower: f64,
    #[serde(serialize_with = "serialize_bound")]
    pub upper: f64,
}

impl RatioInterval {
    /// Check if `ratio` lies strictly outside `[lower, upper]`
    pub fn excludes(&self, ratio: f64) -> bool {
        ratio < self.lower || ratio > self.upper
    }
}

impl fmt::Display for RatioInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lower, self.upper)
    }
}

/// Three-way reading of a [`TestResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    /// Observed ratio falls outside the interval: H0 rejected
    Reject,
    /// Test ran and the observed ratio is inside the interval
    FailToReject,
    /// Validity gate failed: no inference was made
    Abstain,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Reject => write!(f, "reject"),
            TestOutcome::FailToReject => write!(f, "fail to reject"),
            TestOutcome::Abstain => write!(f, "abstain"),
        }
    }
}

/// Result of a rates-ratio test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Observed success rate of group A
    pub oec_a: f64,
    /// Observed success rate of group B
    pub oec_b: f64,
    /// oec_b / oec_a; `None` when the test abstained
    pub oec_ratio: Option<f64>,
    /// Null hypothesis in the shape it was supplied
    pub ratio_hypo: HypothesisInput,
    /// Normalized null hypothesis
    pub hypothesis: Hypothesis,
    /// Significance level used
    pub alpha: f64,
    /// Confidence interval; `None` when the test abstained
    pub ratio_ci: Option<RatioInterval>,
    /// Whether H0 is rejected (always false on abstention)
    pub reject: bool,
}

impl TestResult {
    pub fn outcome(&self) -> TestOutcome {
        match (self.ratio_ci, self.reject) {
            (None, _) => TestOutcome::Abstain,
            (Some(_), true) => TestOutcome::Reject,
            (Some(_), false) => TestOutcome::FailToReject,
        }
    }

    pub fn abstained(&self) -> bool {
        self.outcome() == TestOutcome::Abstain
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match self.outcome() {
            TestOutcome::Reject => report.push_str("❌ NULL HYPOTHESIS REJECTED\n\n"),
            TestOutcome::FailToReject => report.push_str("✅ NULL HYPOTHESIS NOT REJECTED\n\n"),
            TestOutcome::Abstain => {
                report.push_str("⚠️  INSUFFICIENT DATA\n\n");
                report.push_str(&format!(
                    "Reason: need at least {} trials and {} successes per group\n",
                    MIN_TRIALS, MIN_SUCCESSES
                ));
            }
        }

        report.push_str(&format!("H0 (ratio B/A): {}\n", self.ratio_hypo));
        report.push_str(&format!(
            "Significance level: {} ({}% confidence)\n",
            self.alpha,
            (1.0 - self.alpha) * 100.0
        ));
        report.push_str(&format!("OEC A: {:.6}\n", self.oec_a));
        report.push_str(&format!("OEC B: {:.6}\n", self.oec_b));

        if let (Some(ratio), Some(ci)) = (self.oec_ratio, self.ratio_ci) {
            report.push_str(&format!("Observed ratio: {:.6}\n", ratio));
            report.push_str(&format!("Confidence interval: {}\n", ci));
        }

        report
    }
}

/// Arguments of [`test_rates_ratio`] as one value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesRatioInput {
    /// Trials in group A (control)
    pub num_a: Option<u64>,
    /// Trials in group B (treatment)
    pub num_b: Option<u64>,
    /// Successes in group A
    pub pos_a: Option<u64>,
    /// Successes in group B
    pub pos_b: Option<u64>,
    pub ratio_hypo: HypothesisInput,
    pub alpha: f64,
}

impl Default for RatesRatioInput {
    fn default() -> Self {
        Self {
            num_a: None,
            num_b: None,
            pos_a: None,
            pos_b: None,
            ratio_hypo: HypothesisInput::default(),
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl RatesRatioInput {
    pub fn run(&self) -> Result<TestResult> {
        test_rates_ratio(
            self.num_a,
            self.num_b,
            self.pos_a,
            self.pos_b,
            &self.ratio_hypo,
            self.alpha,
        )
    }
}

/// Check the large-sample adequacy rule for the Wald interval
pub fn passes_validity_gate(num_a: u64, num_b: u64, pos_a: u64, pos_b: u64) -> bool {
    num_a >= MIN_TRIALS
        && num_b >= MIN_TRIALS
        && pos_a >= MIN_SUCCESSES
        && pos_b >= MIN_SUCCESSES
}

/// Standard normal quantile `Φ⁻¹(p)`
pub fn normal_quantile(p: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| StatError::Distribution(e.to_string()))?;
    Ok(normal.inverse_cdf(p))
}

/// Hypothesis test for the rates ratio OEC_B / OEC_A
///
/// H0 takes one of the forms
/// - `r`: ratio = r
/// - `[r1, r2]`: r1 < ratio < r2
/// - `[None, r2]`: ratio < r2
/// - `[r1, None]`: ratio > r1
///
/// against H1: otherwise.
///
/// # Arguments
/// * `num_a`, `num_b` - Trials in group A (control) and B (treatment)
/// * `pos_a`, `pos_b` - Successes in each group
/// * `ratio_hypo` - Null hypothesis (see [`HypothesisInput`])
/// * `alpha` - Significance level in (0, 1)
///
/// # Errors
/// * `StatError::MissingInput` - any count is `None`
/// * `StatError::HypothesisType` / `HypothesisValue` / `HypothesisOrder` - malformed H0
/// * `StatError::InvalidCounts` - zero trials or more successes than trials
/// * `StatError::InvalidAlpha` - alpha outside (0, 1)
///
/// # Example
/// ```
/// use rfm_oec::rates_ratio::{test_rates_ratio, HypothesisInput};
///
/// let hypo = HypothesisInput::pair(None, Some(1.5));
/// let result = test_rates_ratio(Some(1000), Some(1000), Some(50), Some(60), &hypo, 0.05).unwrap();
/// assert!((result.oec_ratio.unwrap() - 1.2).abs() < 1e-12);
/// assert!(!result.reject);
/// ```
pub fn test_rates_ratio(
    num_a: Option<u64>,
    num_b: Option<u64>,
    pos_a: Option<u64>,
    pos_b: Option<u64>,
    ratio_hypo: &HypothesisInput,
    alpha: f64,
) -> Result<TestResult> {
    let (Some(num_a), Some(num_b), Some(pos_a), Some(pos_b)) = (num_a, num_b, pos_a, pos_b) else {
        let missing: Vec<&str> = [
            ("num_a", num_a.is_none()),
            ("num_b", num_b.is_none()),
            ("pos_a", pos_a.is_none()),
            ("pos_b", pos_b.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();
        return Err(StatError::MissingInput(missing.join(", ")));
    };

    let hypothesis = ratio_hypo.normalize()?;

    validate_counts('A', num_a, pos_a)?;
    validate_counts('B', num_b, pos_b)?;

    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(StatError::InvalidAlpha(alpha));
    }

    let oec_a = pos_a as f64 / num_a as f64;
    let oec_b = pos_b as f64 / num_b as f64;

    if !passes_validity_gate(num_a, num_b, pos_a, pos_b) {
        tracing::debug!(num_a, num_b, pos_a, pos_b, "validity gate failed, abstaining");
        return Ok(TestResult {
            oec_a,
            oec_b,
            oec_ratio: None,
            ratio_hypo: ratio_hypo.clone(),
            hypothesis,
            alpha,
            ratio_ci: None,
            reject: false,
        });
    }

    let oec_ratio = oec_b / oec_a;

    // Delta-method variance of ln(oec_b / oec_a)
    let variance =
        (1.0 - oec_b) / (num_b as f64 * oec_b) + (1.0 - oec_a) / (num_a as f64 * oec_a);
    let stdev = variance.sqrt();

    let z = if hypothesis.is_two_sided() {
        normal_quantile(1.0 - alpha / 2.0)?
    } else {
        normal_quantile(1.0 - alpha)?
    };

    let interval = match hypothesis {
        Hypothesis::PointNull(r) => RatioInterval {
            lower: lower_bound(r, z, stdev),
            upper: upper_bound(r, z, stdev),
        },
        Hypothesis::TwoSided { lower, upper } => RatioInterval {
            lower: lower_bound(lower, z, stdev),
            upper: upper_bound(upper, z, stdev),
        },
        Hypothesis::UpperOnly(upper) => RatioInterval {
            lower: f64::NEG_INFINITY,
            upper: upper_bound(upper, z, stdev),
        },
        Hypothesis::LowerOnly(lower) => RatioInterval {
            lower: lower_bound(lower, z, stdev),
            upper: f64::INFINITY,
        },
    };

    let reject = interval.excludes(oec_ratio);

    tracing::debug!(
        oec_ratio,
        stdev,
        z,
        ci_lower = interval.lower,
        ci_upper = interval.upper,
        reject,
        "rates ratio test"
    );

    Ok(TestResult {
        oec_a,
        oec_b,
        oec_ratio: Some(oec_ratio),
        ratio_hypo: ratio_hypo.clone(),
        hypothesis,
        alpha,
        ratio_ci: Some(interval),
        reject,
    })
}

fn lower_bound(r: f64, z: f64, stdev: f64) -> f64 {
    (r.ln() - z * stdev).exp()
}

fn upper_bound(r: f64, z: f64, stdev: f64) -> f64 {
    (r.ln() + z * stdev).exp()
}

fn validate_counts(group: char, trials: u64, successes: u64) -> Result<()> {
    if trials == 0 {
        return Err(StatError::InvalidCounts {
            group,
            reason: "number of trials must be positive".to_string(),
        });
    }
    if successes > trials {
        return Err(StatError::InvalidCounts {
            group,
            reason: format!("{} successes exceed {} trials", successes, trials),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_quantile_known_values() {
        assert!((normal_quantile(0.975).unwrap() - 1.959_963_984_540_054).abs() < 1e-6);
        assert!((normal_quantile(0.95).unwrap() - 1.644_853_626_951_472_2).abs() < 1e-6);
        assert!(normal_quantile(0.5).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_validity_gate_thresholds() {
        assert!(passes_validity_gate(100, 100, 5, 5));
        assert!(!passes_validity_gate(99, 100, 5, 5));
        assert!(!passes_validity_gate(100, 99, 5, 5));
        assert!(!passes_validity_gate(100, 100, 4, 5));
        assert!(!passes_validity_gate(100, 100, 5, 4));
    }

    #[test]
    fn test_interval_excludes_is_strict() {
        let ci = RatioInterval {
            lower: 1.0,
            upper: 2.0,
        };
        assert!(!ci.excludes(1.0));
        assert!(!ci.excludes(2.0));
        assert!(ci.excludes(0.99));
        assert!(ci.excludes(2.01));
    }

    #[test]
    fn test_missing_inputs_listed() {
        let err = test_rates_ratio(Some(1), None, Some(1), None, &HypothesisInput::Scalar(1.0), 0.05)
            .unwrap_err();
        assert_eq!(err, StatError::MissingInput("num_b, pos_b".to_string()));
    }

    #[test]
    fn test_missing_inputs_checked_before_hypothesis() {
        let err = test_rates_ratio(None, None, None, None, &HypothesisInput::pair(None, None), 0.05)
            .unwrap_err();
        assert!(matches!(err, StatError::MissingInput(_)));
    }

    #[test]
    fn test_invalid_counts() {
        let hypo = HypothesisInput::Scalar(1.0);
        assert!(matches!(
            test_rates_ratio(Some(0), Some(100), Some(0), Some(5), &hypo, 0.05),
            Err(StatError::InvalidCounts { group: 'A', .. })
        ));
        assert!(matches!(
            test_rates_ratio(Some(100), Some(100), Some(5), Some(101), &hypo, 0.05),
            Err(StatError::InvalidCounts { group: 'B', .. })
        ));
    }

    #[test]
    fn test_invalid_alpha() {
        let hypo = HypothesisInput::Scalar(1.0);
        for alpha in [0.0, 1.0, -0.1, f64::NAN] {
            assert!(matches!(
                test_rates_ratio(Some(100), Some(100), Some(5), Some(5), &hypo, alpha),
                Err(StatError::InvalidAlpha(_))
            ));
        }
    }

    #[test]
    fn test_outcome_mapping() {
        let hypo = HypothesisInput::pair(None, Some(1.5));
        let abstain = test_rates_ratio(Some(50), Some(1000), Some(5), Some(60), &hypo, 0.05).unwrap();
        assert_eq!(abstain.outcome(), TestOutcome::Abstain);
        assert!(abstain.abstained());

        let keep = test_rates_ratio(Some(1000), Some(1000), Some(50), Some(60), &hypo, 0.05).unwrap();
        assert_eq!(keep.outcome(), TestOutcome::FailToReject);

        let reject = test_rates_ratio(Some(1000), Some(1000), Some(50), Some(150), &hypo, 0.05).unwrap();
        assert_eq!(reject.outcome(), TestOutcome::Reject);
    }

    #[test]
    fn test_serialize_infinite_bound_as_string() {
        let ci = RatioInterval {
            lower: f64::NEG_INFINITY,
            upper: 2.0,
        };
        assert_eq!(
            serde_json::to_string(&ci).unwrap(),
            r#"{"lower":"-inf","upper":2.0}"#
        );
    }

    #[test]
    fn test_input_struct_defaults() {
        let input = RatesRatioInput::default();
        assert_eq!(input.alpha, DEFAULT_ALPHA);
        assert_eq!(input.ratio_hypo, HypothesisInput::default());
        assert!(matches!(input.run(), Err(StatError::MissingInput(_))));
    }

    #[test]
    fn test_report_mentions_outcome() {
        let hypo = HypothesisInput::pair(None, Some(1.5));
        let result = test_rates_ratio(Some(1000), Some(1000), Some(50), Some(150), &hypo, 0.05).unwrap();
        let report = result.to_report_string();
        assert!(report.contains("REJECTED"));
        assert!(report.contains("[None, 1.5]"));

        let abstain = test_rates_ratio(Some(50), Some(1000), Some(5), Some(60), &hypo, 0.05).unwrap();
        assert!(abstain.to_report_string().contains("INSUFFICIENT DATA"));
    }
}
