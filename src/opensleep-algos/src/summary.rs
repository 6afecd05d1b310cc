use std::fmt::Display;

use opensleep_types::{AudioMovementSample, SleepStage, VitalSample};
use serde::Serialize;

use crate::charts::ChartShaper;
use crate::helpers::time_math::round1;
use crate::metrics::SleepMetrics;
use crate::quality::QualityScorer;

/// Secondary analytics for the report footer: efficiency, per-hour event
/// indexes, chart-window ranges, stage-time estimates, and advisory flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Percentage of audio samples spent in any non-awake stage.
    pub sleep_efficiency_pct: f64,
    /// Snore events per tracked hour of sleep.
    pub snore_index: f64,
    /// Movement events per tracked hour of sleep.
    pub movement_index: f64,
    /// Spread between the highest and lowest heart rate in the chart window.
    pub hr_variability: f64,
    pub heart_rate_range: ValueRange,
    pub spo2_range: ValueRange,
    pub deep_sleep_hours: f64,
    pub rem_hours: f64,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    AdjustSleepPosition,
    IncreaseSleepTime,
    ConsultProviderLowSpo2,
}

impl SessionSummary {
    /// Stage-time estimates assume the device's five-minute reporting
    /// cadence; they are estimates, not tracked intervals.
    pub const SAMPLE_CADENCE_MINUTES: f64 = 5.0;

    /// Nights shorter than this trigger the sleep-time recommendation.
    pub const OPTIMAL_SLEEP_HOURS: f64 = 7.0;

    /// Average SpO2 below this is worth flagging to a provider.
    pub const SPO2_CONCERN: f64 = 92.0;

    pub fn derive(
        audio: &[AudioMovementSample],
        vitals: &[VitalSample],
        metrics: &SleepMetrics,
    ) -> Self {
        let window = ChartShaper::window(vitals);
        let heart_rate_range = Self::range(window.iter().map(|v| v.heart_rate));
        let spo2_range = Self::range(window.iter().map(|v| v.spo2));

        let dist = ChartShaper::stage_distribution(audio);
        let stage_hours = |stage: SleepStage| {
            round1(dist.count_of(stage) as f64 * Self::SAMPLE_CADENCE_MINUTES / 60.0)
        };

        Self {
            sleep_efficiency_pct: Self::efficiency(audio),
            snore_index: Self::hourly_index(metrics.snore_events, metrics.sleep_duration_hours),
            movement_index: Self::hourly_index(
                metrics.movement_events,
                metrics.sleep_duration_hours,
            ),
            hr_variability: heart_rate_range.max - heart_rate_range.min,
            heart_rate_range,
            spo2_range,
            deep_sleep_hours: stage_hours(SleepStage::Deep),
            rem_hours: stage_hours(SleepStage::Rem),
            recommendations: Self::recommend(metrics, vitals.is_empty()),
        }
    }

    fn efficiency(audio: &[AudioMovementSample]) -> f64 {
        if audio.is_empty() {
            return 0.0;
        }
        let asleep = audio.iter().filter(|s| s.state != 0).count();
        round1(asleep as f64 / audio.len() as f64 * 100.0)
    }

    /// A zero duration divides by one hour instead, so event-heavy nights
    /// with no closed interval still report a finite rate.
    fn hourly_index(events: u64, duration_hours: f64) -> f64 {
        let divisor = if duration_hours == 0.0 {
            1.0
        } else {
            duration_hours
        };
        round1(events as f64 / divisor)
    }

    fn range(values: impl Iterator<Item = f64>) -> ValueRange {
        values.fold(None, |acc: Option<ValueRange>, v| {
            Some(match acc {
                None => ValueRange { min: v, max: v },
                Some(r) => ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            })
        })
        .unwrap_or_default()
    }

    fn recommend(metrics: &SleepMetrics, vitals_empty: bool) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if metrics.snore_events > QualityScorer::SNORE_LIMIT {
            out.push(Recommendation::AdjustSleepPosition);
        }
        if metrics.sleep_duration_hours < Self::OPTIMAL_SLEEP_HOURS {
            out.push(Recommendation::IncreaseSleepTime);
        }
        if !vitals_empty && metrics.avg_spo2 < Self::SPO2_CONCERN {
            out.push(Recommendation::ConsultProviderLowSpo2);
        }
        out
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Recommendation::AdjustSleepPosition => {
                "Consider a sleep position adjustment for snoring"
            }
            Recommendation::IncreaseSleepTime => "Aim for at least 7 hours of sleep",
            Recommendation::ConsultProviderLowSpo2 => {
                "Low SpO2 detected - consult a healthcare provider"
            }
        };
        f.write_str(text)
    }
}

impl Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Sleep efficiency: {}%\nSnore index: {}/hour\nMovement index: {}/hour\nHR variability: {} bpm\nHR range: {}-{} bpm\nSpO2 range: {}-{}%\nDeep sleep: {}h\nREM: {}h",
            self.sleep_efficiency_pct,
            self.snore_index,
            self.movement_index,
            self.hr_variability,
            self.heart_rate_range.min,
            self.heart_rate_range.max,
            self.spo2_range.min,
            self.spo2_range.max,
            self.deep_sleep_hours,
            self.rem_hours,
        ))?;

        for rec in &self.recommendations {
            write!(f, "\n- {}", rec)?;
        }
        Ok(())
    }
}
