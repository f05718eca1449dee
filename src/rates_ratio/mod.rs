// Rates-Ratio Hypothesis Testing for A/B experiments
//
// Compares the Overall Evaluation Criterion (OEC) of a treatment group B
// against a control group A, where each OEC is the success rate of a vector
// of Bernoulli trials. The null hypothesis bounds the ratio OEC_B / OEC_A.
//
// Scientific Foundation:
// [1] Roy, S. N. (1953). On a heuristic method of test construction and its use
//     in multivariate analysis. Annals of Mathematical Statistics, 24(2).
//     Union-Intersection construction for interval and one-sided nulls.
//
// [2] Katz, D., Baptista, J., Azen, S. P., & Pike, M. C. (1978). Obtaining
//     confidence intervals for the risk ratio in cohort studies. Biometrics, 34(3).
//     Delta-method variance of the log ratio of two proportions.
//
// [3] Kohavi, R., Longbotham, R., Sommerfield, D., & Henne, R. M. (2009).
//     Controlled experiments on the web: survey and practical guide.
//     Data Mining and Knowledge Discovery, 18(1). OEC terminology.
//
// Implementation:
// - Uses statrs for the standard normal quantile
// - Validity gate (100 trials, 5 successes per group) is a fixed business rule

mod hypothesis;
mod inference;

pub use hypothesis::{Hypothesis, HypothesisInput, DEFAULT_UPPER_RATIO};
pub use inference::{
    normal_quantile, passes_validity_gate, test_rates_ratio, RatesRatioInput, RatioInterval,
    TestOutcome, TestResult, DEFAULT_ALPHA, MIN_SUCCESSES, MIN_TRIALS,
};
