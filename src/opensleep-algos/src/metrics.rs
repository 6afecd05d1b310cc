use std::fmt::Display;

use opensleep_types::{AudioMovementSample, VitalSample};
use serde::Serialize;

use crate::events::EventDetector;
use crate::helpers::time_math::round1;
use crate::quality::{QualityCategory, QualityScorer};
use crate::sleep::SleepDurationTracker;

/// Stream-wide aggregates for one analysis pass. Recomputed from scratch on
/// every refresh, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepMetrics {
    pub avg_heart_rate: f64,
    #[serde(rename = "avgSPO2")]
    pub avg_spo2: f64,
    pub avg_temperature: f64,
    pub sleep_duration_hours: f64,
    pub snore_events: u64,
    pub movement_events: u64,
    pub quality: QualityCategory,
}

impl SleepMetrics {
    /// Derive metrics from chronologically ordered collections.
    ///
    /// Either stream being empty yields the all-zero default with the
    /// neutral `Fair` category; no error is raised.
    pub fn derive(audio: &[AudioMovementSample], vitals: &[VitalSample]) -> Self {
        if audio.is_empty() || vitals.is_empty() {
            return Self::default();
        }

        let n = vitals.len() as f64;
        let avg_heart_rate = round1(vitals.iter().map(|v| v.heart_rate).sum::<f64>() / n);
        let avg_spo2 = round1(vitals.iter().map(|v| v.spo2).sum::<f64>() / n);
        let avg_temperature = round1(vitals.iter().map(|v| v.temperature).sum::<f64>() / n);

        let counts = EventDetector::count_events(audio);
        let quality = QualityScorer::assess(avg_spo2, avg_heart_rate, counts);

        Self {
            avg_heart_rate,
            avg_spo2,
            avg_temperature,
            sleep_duration_hours: SleepDurationTracker::total_hours(audio),
            snore_events: counts.snores,
            movement_events: counts.movements,
            quality,
        }
    }
}

impl Display for SleepMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Avg heart rate: {} bpm\nAvg SpO2: {}%\nAvg temperature: {}C\nSleep duration: {}h\nSnore events: {}\nMovement events: {}\nQuality: {}",
            self.avg_heart_rate,
            self.avg_spo2,
            self.avg_temperature,
            self.sleep_duration_hours,
            self.snore_events,
            self.movement_events,
            self.quality,
        ))
    }
}
