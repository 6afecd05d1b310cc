use std::collections::BTreeMap;
use std::fmt::Display;

use opensleep_types::{AudioMovementSample, SleepStage, VitalSample};
use serde::Serialize;

use crate::events::EventDetector;
use crate::helpers::format_hm::FormatHM;

/// Shapes raw streams into display-ready structures. Performs no filtering
/// beyond the fixed window and never feeds back into the metrics.
pub struct ChartShaper;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioChartPoint {
    pub time: String,
    #[serde(rename = "micRMS")]
    pub mic_rms: f64,
    #[serde(rename = "piezoPeak")]
    pub piezo_peak: f64,
    pub state: i32,
    #[serde(rename = "isSnoring")]
    pub is_snoring: bool,
    #[serde(rename = "isMoving")]
    pub is_moving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsChartPoint {
    pub time: String,
    #[serde(rename = "heartRate")]
    pub heart_rate: f64,
    pub spo2: f64,
    pub temperature: f64,
    pub timestamp: i64,
}

/// Sample count per observed stage, ordered by ascending raw state value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageDistribution {
    pub stages: Vec<StageCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCount {
    pub state: i32,
    pub label: String,
    pub count: u64,
}

impl ChartShaper {
    /// Display window: only the most recent samples per stream are charted.
    pub const WINDOW_SIZE: usize = 50;

    pub fn audio_series(samples: &[AudioMovementSample]) -> Vec<AudioChartPoint> {
        Self::window(samples)
            .iter()
            .map(|s| AudioChartPoint {
                time: s.recorded_at.format_hm(),
                mic_rms: s.mic_rms,
                piezo_peak: s.piezo_peak,
                state: s.state,
                is_snoring: EventDetector::is_snore(s),
                is_moving: EventDetector::exceeds_piezo_threshold(s),
            })
            .collect()
    }

    pub fn vitals_series(samples: &[VitalSample]) -> Vec<VitalsChartPoint> {
        Self::window(samples)
            .iter()
            .map(|s| VitalsChartPoint {
                time: s.recorded_at.format_hm(),
                heart_rate: s.heart_rate,
                spo2: s.spo2,
                temperature: s.temperature,
                timestamp: s.timestamp,
            })
            .collect()
    }

    /// Stage histogram over the FULL collection, not the display window.
    pub fn stage_distribution(samples: &[AudioMovementSample]) -> StageDistribution {
        let mut counts = BTreeMap::new();
        for sample in samples {
            *counts.entry(sample.state).or_insert(0_u64) += 1;
        }

        StageDistribution {
            stages: counts
                .into_iter()
                .map(|(state, count)| StageCount {
                    state,
                    label: SleepStage::from(state).to_string(),
                    count,
                })
                .collect(),
        }
    }

    pub(crate) fn window<T>(samples: &[T]) -> &[T] {
        let start = samples.len().saturating_sub(Self::WINDOW_SIZE);
        &samples[start..]
    }
}

impl StageDistribution {
    pub fn count_of(&self, stage: SleepStage) -> u64 {
        self.stages
            .iter()
            .find(|s| SleepStage::from(s.state) == stage)
            .map(|s| s.count)
            .unwrap_or_default()
    }

    pub fn total(&self) -> u64 {
        self.stages.iter().map(|s| s.count).sum()
    }
}

impl Display for StageDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {}", stage.label, stage.count)?;
        }
        Ok(())
    }
}
