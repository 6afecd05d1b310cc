use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::events::EventCounts;

/// Weighted 0-100 rule scoring a night from the stream-wide aggregates.
/// Four terms, 25 points each; off-band vitals and noisy nights earn the
/// reduced award instead of zero.
pub struct QualityScorer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityCategory {
    Poor,
    #[default]
    Fair,
    Good,
    Excellent,
}

impl QualityScorer {
    /// Average SpO2 above this earns full marks.
    pub const SPO2_HEALTHY: f64 = 95.0;

    /// Resting heart-rate band earning full marks, bounds inclusive.
    pub const HR_NORMAL_MIN: f64 = 60.0;
    pub const HR_NORMAL_MAX: f64 = 100.0;

    /// Snore events below this count are unremarkable.
    pub const SNORE_LIMIT: u64 = 10;

    /// Movement events below this count are unremarkable.
    pub const MOVEMENT_LIMIT: u64 = 20;

    const FULL_MARKS: u32 = 25;
    const VITALS_AWARD: u32 = 15;
    const EVENTS_AWARD: u32 = 10;

    const EXCELLENT_MIN: u32 = 90;
    const GOOD_MIN: u32 = 75;
    const FAIR_MIN: u32 = 60;

    pub fn score(avg_spo2: f64, avg_heart_rate: f64, counts: EventCounts) -> u32 {
        let spo2_term = if avg_spo2 > Self::SPO2_HEALTHY {
            Self::FULL_MARKS
        } else {
            Self::VITALS_AWARD
        };

        let hr_term = if (Self::HR_NORMAL_MIN..=Self::HR_NORMAL_MAX).contains(&avg_heart_rate) {
            Self::FULL_MARKS
        } else {
            Self::VITALS_AWARD
        };

        let snore_term = if counts.snores < Self::SNORE_LIMIT {
            Self::FULL_MARKS
        } else {
            Self::EVENTS_AWARD
        };

        let movement_term = if counts.movements < Self::MOVEMENT_LIMIT {
            Self::FULL_MARKS
        } else {
            Self::EVENTS_AWARD
        };

        spo2_term + hr_term + snore_term + movement_term
    }

    pub fn categorize(score: u32) -> QualityCategory {
        if score >= Self::EXCELLENT_MIN {
            QualityCategory::Excellent
        } else if score >= Self::GOOD_MIN {
            QualityCategory::Good
        } else if score >= Self::FAIR_MIN {
            QualityCategory::Fair
        } else {
            QualityCategory::Poor
        }
    }

    pub fn assess(avg_spo2: f64, avg_heart_rate: f64, counts: EventCounts) -> QualityCategory {
        Self::categorize(Self::score(avg_spo2, avg_heart_rate, counts))
    }
}

impl Display for QualityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            QualityCategory::Poor => "Poor",
            QualityCategory::Fair => "Fair",
            QualityCategory::Good => "Good",
            QualityCategory::Excellent => "Excellent",
        };
        f.write_str(label)
    }
}
