use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One reading from the bedside audio/movement board: microphone RMS level,
/// piezo vibration peak, and the sleep stage the firmware reported for that
/// instant. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMovementSample {
    #[serde(rename = "micRMS")]
    pub mic_rms: f64,
    #[serde(rename = "piezoPeak")]
    pub piezo_peak: f64,
    /// Raw stage value as sent by the device: 0=Awake, 1=Light, 2=Deep,
    /// 3=REM. Out-of-range values are carried through, never rejected.
    pub state: i32,
    /// Device clock, epoch milliseconds.
    pub timestamp: i64,
    /// Creation time at the storage boundary; orders samples for display.
    #[serde(rename = "recordedAt", alias = "createdAt")]
    pub recorded_at: NaiveDateTime,
}

impl AudioMovementSample {
    pub fn stage(&self) -> SleepStage {
        SleepStage::from(self.state)
    }
}

/// One reading from the vitals board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSample {
    #[serde(rename = "heartRate")]
    pub heart_rate: f64,
    pub spo2: f64,
    pub temperature: f64,
    /// Device clock, epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "recordedAt", alias = "createdAt")]
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepStage {
    Awake,
    Light,
    Deep,
    Rem,
    /// Stage value outside the documented 0-3 range.
    Other(i32),
}

impl From<i32> for SleepStage {
    fn from(state: i32) -> Self {
        match state {
            0 => SleepStage::Awake,
            1 => SleepStage::Light,
            2 => SleepStage::Deep,
            3 => SleepStage::Rem,
            other => SleepStage::Other(other),
        }
    }
}

impl Display for SleepStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SleepStage::Awake => f.write_str("Awake"),
            SleepStage::Light => f.write_str("Light Sleep"),
            SleepStage::Deep => f.write_str("Deep Sleep"),
            SleepStage::Rem => f.write_str("REM"),
            SleepStage::Other(n) => write!(f, "State {}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_from_known_states() {
        assert_eq!(SleepStage::from(0), SleepStage::Awake);
        assert_eq!(SleepStage::from(1), SleepStage::Light);
        assert_eq!(SleepStage::from(2), SleepStage::Deep);
        assert_eq!(SleepStage::from(3), SleepStage::Rem);
    }

    #[test]
    fn stage_from_unknown_state() {
        assert_eq!(SleepStage::from(7), SleepStage::Other(7));
        assert_eq!(SleepStage::from(-1), SleepStage::Other(-1));
    }

    #[test]
    fn stage_labels() {
        assert_eq!(SleepStage::Light.to_string(), "Light Sleep");
        assert_eq!(SleepStage::Rem.to_string(), "REM");
        assert_eq!(SleepStage::Other(7).to_string(), "State 7");
    }

    #[test]
    fn audio_sample_accepts_stored_row_keys() {
        let sample: AudioMovementSample = serde_json::from_str(
            r#"{
                "id": 12,
                "micRMS": 1.2,
                "piezoPeak": 3.4,
                "state": 1,
                "timestamp": 1234567890,
                "createdAt": "2025-01-01T22:15:00"
            }"#,
        )
        .unwrap();

        assert_eq!(sample.mic_rms, 1.2);
        assert_eq!(sample.stage(), SleepStage::Light);
    }
}
