use serde::Deserialize;
use super::surface::TickIntervals;
/// Upper bound of the visible span paired with the major interval used at or below it.
const MAJOR_STEPS: [(f64, f64); 9] = [
    (0.01, 0.001),
    (0.05, 0.005),
    (0.1, 0.01),
    (0.5, 0.05),
    (1.0, 0.1),
    (5.0, 0.5),
    (10.0, 1.0),
    (50.0, 5.0),
    (100.0, 10.0),
];
const WIDEST_MAJOR: f64 = 20.0;
/// How the time axis picks its grid: adaptive, or a fixed major interval.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "TickPolicyRepr")]
pub enum TickPolicy {
    Auto,
    Fixed(f64),
}
#[derive(Deserialize)]
#[serde(untagged)]
enum TickPolicyRepr {
    Number(f64),
    Text(String),
}
impl TryFrom<TickPolicyRepr> for TickPolicy {
    type Error = String;
    fn try_from(value: TickPolicyRepr) -> Result<Self, Self::Error> {
        let interval = match value {
            TickPolicyRepr::Text(text) if text.trim().eq_ignore_ascii_case("auto") => {
                return Ok(TickPolicy::Auto)
            }
            TickPolicyRepr::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("xaxis_interval must be \"auto\" or a number, got '{text}'"))?,
            TickPolicyRepr::Number(n) => n,
        };
        if interval.is_finite() && interval > 0.0 {
            Ok(TickPolicy::Fixed(interval))
        } else {
            Err(format!("xaxis_interval must be positive, got {interval}"))
        }
    }
}
impl TickPolicy {
    pub fn intervals_for(&self, span: f64) -> TickIntervals {
        let major = match self {
            TickPolicy::Auto => major_interval(span),
            TickPolicy::Fixed(interval) => *interval,
        };
        TickIntervals {
            major,
            minor: minor_interval(major),
        }
    }
}
/// Finer steps for narrower spans.
pub fn major_interval(span: f64) -> f64 {
    MAJOR_STEPS
        .iter()
        .find(|(threshold, _)| span <= *threshold)
        .map(|(_, interval)| *interval)
        .unwrap_or(WIDEST_MAJOR)
}
pub fn minor_interval(major: f64) -> f64 {
    if major >= 10.0 {
        2.0
    } else if major >= 5.0 {
        1.0
    } else if major >= 1.0 {
        0.5
    } else if major >= 0.1 {
        0.05
    } else if major >= 0.01 {
        0.005
    } else {
        major / 5.0
    }
}
