// Null hypotheses for the rates ratio OEC_B / OEC_A
//
// Callers hand over a loosely shaped null hypothesis (a scalar or a sequence,
// possibly with holes). It is normalized once, at the boundary, into the
// tagged `Hypothesis` variant which the inference code matches exhaustively.

use crate::error::{Result, StatError};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Default upper bound of the one-sided default hypothesis `[None, 2.7]`
pub const DEFAULT_UPPER_RATIO: f64 = 2.7;

/// Null hypothesis exactly as the caller supplied it
///
/// Serializes as a JSON number or an array with `null` holes, and is echoed
/// back unchanged in [`super::TestResult::ratio_hypo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HypothesisInput {
    /// `r`: H0 is OEC_B / OEC_A = r
    Scalar(#[serde(serialize_with = "serialize_bound")] f64),
    /// `[r1, r2]` with optional holes; any other length is rejected on normalization
    Sequence(#[serde(serialize_with = "serialize_optional_bounds")] Vec<Option<f64>>),
}

// JSON has no infinity literal
pub(crate) fn serialize_bound<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
    } else {
        serializer.serialize_f64(*value)
    }
}

struct Bound(f64);

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_bound(&self.0, serializer)
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_optional_bounds<S>(
    values: &Vec<Option<f64>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|value| value.map(Bound)))
}

impl Default for HypothesisInput {
    fn default() -> Self {
        HypothesisInput::Sequence(vec![None, Some(DEFAULT_UPPER_RATIO)])
    }
}

impl HypothesisInput {
    /// Shorthand for a two-element sequence
    pub fn pair(lower: Option<f64>, upper: Option<f64>) -> Self {
        HypothesisInput::Sequence(vec![lower, upper])
    }

    /// Validate and normalize into a [`Hypothesis`]
    ///
    /// # Errors
    /// * `StatError::HypothesisType` - sequence length other than 2
    /// * `StatError::HypothesisValue` - both bounds absent
    /// * `StatError::HypothesisOrder` - lower bound greater than upper bound
    pub fn normalize(&self) -> Result<Hypothesis> {
        match self {
            HypothesisInput::Scalar(r) => Ok(Hypothesis::PointNull(*r)),
            HypothesisInput::Sequence(values) => match values.as_slice() {
                [None, None] => Err(StatError::HypothesisValue),
                [Some(lower), Some(upper)] if lower > upper => Err(StatError::HypothesisOrder {
                    lower: *lower,
                    upper: *upper,
                }),
                [Some(lower), Some(upper)] => Ok(Hypothesis::TwoSided {
                    lower: *lower,
                    upper: *upper,
                }),
                [None, Some(upper)] => Ok(Hypothesis::UpperOnly(*upper)),
                [Some(lower), None] => Ok(Hypothesis::LowerOnly(*lower)),
                other => Err(StatError::HypothesisType { len: other.len() }),
            },
        }
    }
}

impl From<f64> for HypothesisInput {
    fn from(r: f64) -> Self {
        HypothesisInput::Scalar(r)
    }
}

impl From<[Option<f64>; 2]> for HypothesisInput {
    fn from([lower, upper]: [Option<f64>; 2]) -> Self {
        HypothesisInput::pair(lower, upper)
    }
}

impl fmt::Display for HypothesisInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HypothesisInput::Scalar(r) => write!(f, "{}", r),
            HypothesisInput::Sequence(values) => {
                let parts: Vec<String> = values
                    .iter()
                    .map(|v| v.map_or_else(|| "None".to_string(), |r| r.to_string()))
                    .collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Parse `2.5`, `[1.0, 2.0]`, `[None, 2.7]`, `[null, 2.7]` or `[, 2.7]`
///
/// Sequences of any length parse; the length is checked by
/// [`HypothesisInput::normalize`].
impl FromStr for HypothesisInput {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        let Some(inner) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) else {
            return parse_bound(s).map(HypothesisInput::Scalar);
        };

        if inner.trim().is_empty() {
            return Ok(HypothesisInput::Sequence(Vec::new()));
        }

        inner
            .split(',')
            .map(|part| {
                let part = part.trim();
                if part.is_empty()
                    || part.eq_ignore_ascii_case("none")
                    || part.eq_ignore_ascii_case("null")
                {
                    Ok(None)
                } else {
                    parse_bound(part).map(Some)
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(HypothesisInput::Sequence)
    }
}

fn parse_bound(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|_| StatError::Parse(format!("'{}' is not a valid ratio", s)))
}

/// Normalized null hypothesis on the ratio OEC_B / OEC_A
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hypothesis {
    /// H0: ratio = r (zero-width target, two-sided critical value)
    PointNull(#[serde(serialize_with = "serialize_bound")] f64),
    /// H0: lower < ratio < upper
    TwoSided {
        #[serde(serialize_with = "serialize_bound")]
        lower: f64,
        #[serde(serialize_with = "serialize_bound")]
        upper: f64,
    },
    /// H0: ratio < r2
    UpperOnly(#[serde(serialize_with = "serialize_bound")] f64),
    /// H0: ratio > r1
    LowerOnly(#[serde(serialize_with = "serialize_bound")] f64),
}

impl Hypothesis {
    /// The `(r1, r2)` pair, `None` meaning unbounded on that side
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        match *self {
            Hypothesis::PointNull(r) => (Some(r), Some(r)),
            Hypothesis::TwoSided { lower, upper } => (Some(lower), Some(upper)),
            Hypothesis::UpperOnly(upper) => (None, Some(upper)),
            Hypothesis::LowerOnly(lower) => (Some(lower), None),
        }
    }

    /// Two-sided forms split alpha across both tails
    pub fn is_two_sided(&self) -> bool {
        matches!(
            self,
            Hypothesis::PointNull(_) | Hypothesis::TwoSided { .. }
        )
    }
}
