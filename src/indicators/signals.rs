// =============================================================================
// Ichimoku Signal Classifiers
// =============================================================================
//
// Pure functions that turn already-computed line values into labels.  They
// are total over f64: the `Unknown` variants are only reachable with NaN
// input and exist so that a classifier never has to panic.
// =============================================================================

use serde::Serialize;

/// Position of one line (or price) relative to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineCross {
    Above,
    Below,
    Cross,
    Unknown,
}

/// Position of a price relative to the cloud between Span A and Span B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloudPosition {
    Above,
    TopEdge,
    Inside,
    BottomEdge,
    Below,
    Unknown,
}

/// Direction of the projected (future) cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloudBias {
    Bullish,
    Bearish,
    Twist,
    Unknown,
}

impl std::fmt::Display for LineCross {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
            Self::Cross => write!(f, "cross"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::fmt::Display for CloudPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::TopEdge => write!(f, "top-edge"),
            Self::Inside => write!(f, "inside"),
            Self::BottomEdge => write!(f, "bottom-edge"),
            Self::Below => write!(f, "below"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::fmt::Display for CloudBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Twist => write!(f, "twist"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Compare `subject` (Tenkan-sen or last price) with `reference` (Kijun-sen).
pub fn line_cross(subject: f64, reference: f64) -> LineCross {
    if subject > reference {
        LineCross::Above
    } else if subject < reference {
        LineCross::Below
    } else if subject == reference {
        LineCross::Cross
    } else {
        LineCross::Unknown
    }
}

/// Locate `subject` (last price or Chikou span) against the cloud.
///
/// The higher span is the top edge.  When the cloud is flat
/// (`span_a == span_b`) span A is taken as the top edge and the top-edge
/// check runs first, so a subject sitting on a flat cloud is `TopEdge`.
pub fn cloud_position(subject: f64, span_a: f64, span_b: f64) -> CloudPosition {
    let (top, bottom) = if span_a >= span_b {
        (span_a, span_b)
    } else {
        (span_b, span_a)
    };

    if subject > top {
        CloudPosition::Above
    } else if subject == top {
        CloudPosition::TopEdge
    } else if subject == bottom {
        CloudPosition::BottomEdge
    } else if subject < bottom {
        CloudPosition::Below
    } else if subject > bottom && subject < top {
        CloudPosition::Inside
    } else {
        CloudPosition::Unknown
    }
}

/// Bias of the cloud projected 26 periods ahead.
pub fn cloud_bias(future_span_a: f64, future_span_b: f64) -> CloudBias {
    if future_span_a > future_span_b {
        CloudBias::Bullish
    } else if future_span_a < future_span_b {
        CloudBias::Bearish
    } else if future_span_a == future_span_b {
        CloudBias::Twist
    } else {
        CloudBias::Unknown
    }
}
