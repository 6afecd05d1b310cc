use opensleep_types::{AudioMovementSample, VitalSample};
use serde::Serialize;

use crate::charts::{AudioChartPoint, ChartShaper, StageDistribution, VitalsChartPoint};
use crate::metrics::SleepMetrics;
use crate::summary::SessionSummary;

/// Complete derived output of one analysis pass. Each pass replaces the
/// previous one wholesale; nothing here carries state between refreshes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepAnalysis {
    pub metrics: SleepMetrics,
    pub audio_series: Vec<AudioChartPoint>,
    pub vitals_series: Vec<VitalsChartPoint>,
    pub stages: StageDistribution,
    pub summary: SessionSummary,
}

impl SleepAnalysis {
    /// Run the full engine over one snapshot of both streams.
    ///
    /// Collections arrive newest-first, the query boundary's native order;
    /// they are reversed here so every time-ordered computation sees
    /// chronological input.
    pub fn derive(mut audio: Vec<AudioMovementSample>, mut vitals: Vec<VitalSample>) -> Self {
        audio.reverse();
        vitals.reverse();

        let metrics = SleepMetrics::derive(&audio, &vitals);
        let summary = SessionSummary::derive(&audio, &vitals, &metrics);

        Self {
            metrics,
            audio_series: ChartShaper::audio_series(&audio),
            vitals_series: ChartShaper::vitals_series(&vitals),
            stages: ChartShaper::stage_distribution(&audio),
            summary,
        }
    }
}
