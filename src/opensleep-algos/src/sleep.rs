use opensleep_types::{AudioMovementSample, SleepStage};

use crate::helpers::time_math::round1;

/// Run detector for sleep intervals over the stage sequence.
///
/// An interval opens on a light-sleep sample and closes on the next awake
/// sample. Deep sleep and REM are opaque to the tracker: they neither open,
/// close, nor extend an interval, so a run Light -> Deep -> Awake still
/// closes correctly. An interval left open at the end of the data
/// contributes nothing.
pub struct SleepDurationTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    Awake,
    Tracking { since: i64 },
}

impl SleepDurationTracker {
    const MILLIS_PER_HOUR: f64 = 3_600_000.0;

    /// Total tracked sleep across `samples`, in hours rounded to one
    /// decimal place. `samples` must be in chronological order.
    pub fn total_hours(samples: &[AudioMovementSample]) -> f64 {
        let mut state = TrackerState::Awake;
        let mut total_ms = 0_i64;

        for sample in samples {
            state = match (state, sample.stage()) {
                (TrackerState::Awake, SleepStage::Light) => TrackerState::Tracking {
                    since: sample.timestamp,
                },
                (TrackerState::Tracking { since }, SleepStage::Awake) => {
                    total_ms += sample.timestamp - since;
                    TrackerState::Awake
                }
                (state, _) => state,
            };
        }

        round1(total_ms as f64 / Self::MILLIS_PER_HOUR)
    }
}
