//! Display tiers derived from backend labels and metrics
//!
//! Every tier maps to a stable class name (`segment-champions`,
//! `retention-high`, ...) that presentation layers use for styling.

use std::fmt;

/// RFM segment label as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Champions,
    LoyalCustomers,
    AtRisk,
    CannotLoseThem,
    Lost,
    /// Any label the dashboard does not know about, kept verbatim
    Unknown(String),
}

impl Segment {
    /// Exact, case-sensitive match on the backend label
    pub fn parse(label: &str) -> Self {
        match label {
            "Champions" => Segment::Champions,
            "Loyal Customers" => Segment::LoyalCustomers,
            "At Risk" => Segment::AtRisk,
            "Cannot Lose Them" => Segment::CannotLoseThem,
            "Lost" => Segment::Lost,
            other => Segment::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Segment::Champions => "Champions",
            Segment::LoyalCustomers => "Loyal Customers",
            Segment::AtRisk => "At Risk",
            Segment::CannotLoseThem => "Cannot Lose Them",
            Segment::Lost => "Lost",
            Segment::Unknown(label) => label.as_str(),
        }
    }

    /// Unknown labels render as loyal.
    pub fn tier(&self) -> SegmentTier {
        match self {
            Segment::Champions => SegmentTier::Champions,
            Segment::LoyalCustomers => SegmentTier::Loyal,
            Segment::AtRisk | Segment::CannotLoseThem => SegmentTier::AtRisk,
            Segment::Lost => SegmentTier::Lost,
            Segment::Unknown(_) => SegmentTier::Loyal,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a raw segment label
pub fn classify(label: &str) -> SegmentTier {
    Segment::parse(label).tier()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentTier {
    Champions,
    Loyal,
    AtRisk,
    Lost,
}

impl SegmentTier {
    pub fn class_name(&self) -> &'static str {
        match self {
            SegmentTier::Champions => "segment-champions",
            SegmentTier::Loyal => "segment-loyal",
            SegmentTier::AtRisk => "segment-at-risk",
            SegmentTier::Lost => "segment-lost",
        }
    }
}

/// Cohort retention band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetentionTier {
    High,
    Medium,
    Low,
}

impl RetentionTier {
    /// `>= 50` high, `>= 20` medium, anything else (NaN included) low
    pub fn classify(rate: f64) -> Self {
        if rate >= 50.0 {
            RetentionTier::High
        } else if rate >= 20.0 {
            RetentionTier::Medium
        } else {
            RetentionTier::Low
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            RetentionTier::High => "retention-high",
            RetentionTier::Medium => "retention-medium",
            RetentionTier::Low => "retention-low",
        }
    }
}

/// Inventory urgency band for the low stock table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrgencyTier {
    Critical,
    Low,
    OutOfStock,
}

impl UrgencyTier {
    /// Backend labels: `Critical`, `Low`, `Out of Stock`. Anything else is `Low`.
    pub fn classify(label: &str) -> Self {
        match label {
            "Critical" => UrgencyTier::Critical,
            "Out of Stock" => UrgencyTier::OutOfStock,
            _ => UrgencyTier::Low,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "urgency-critical",
            UrgencyTier::Low => "urgency-low",
            UrgencyTier::OutOfStock => "urgency-out",
        }
    }
}
