use opensleep_types::{AudioMovementSample, SleepStage};

/// Per-sample threshold classification for the audio/movement stream.
pub struct EventDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepEvent {
    Snore,
    Movement,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub snores: u64,
    pub movements: u64,
}

impl EventDetector {
    /// Microphone RMS above this reads as snoring.
    pub const SNORE_MIC_RMS: f64 = 100.0;

    /// Piezo peak above this reads as movement.
    pub const MOVEMENT_PIEZO_PEAK: f64 = 50.0;

    pub fn is_snore(sample: &AudioMovementSample) -> bool {
        sample.mic_rms > Self::SNORE_MIC_RMS
    }

    /// Bare piezo threshold, no stage condition. Chart flags use this
    /// weaker predicate; the movement event count does not.
    pub fn exceeds_piezo_threshold(sample: &AudioMovementSample) -> bool {
        sample.piezo_peak > Self::MOVEMENT_PIEZO_PEAK
    }

    /// Movement only counts during light sleep. Restlessness while awake
    /// or in deep sleep/REM stays out of the event total.
    pub fn is_movement(sample: &AudioMovementSample) -> bool {
        Self::exceeds_piezo_threshold(sample) && sample.stage() == SleepStage::Light
    }

    pub fn classify(sample: &AudioMovementSample) -> Vec<SleepEvent> {
        let mut events = Vec::new();
        if Self::is_snore(sample) {
            events.push(SleepEvent::Snore);
        }
        if Self::is_movement(sample) {
            events.push(SleepEvent::Movement);
        }
        events
    }

    pub fn count_events(samples: &[AudioMovementSample]) -> EventCounts {
        EventCounts {
            snores: samples.iter().filter(|s| Self::is_snore(s)).count() as u64,
            movements: samples.iter().filter(|s| Self::is_movement(s)).count() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_sample(mic_rms: f64, piezo_peak: f64, state: i32) -> AudioMovementSample {
        AudioMovementSample {
            mic_rms,
            piezo_peak,
            state,
            timestamp: 0,
            recorded_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn snore_above_threshold_only() {
        assert!(!EventDetector::is_snore(&make_sample(100.0, 0.0, 1)));
        assert!(EventDetector::is_snore(&make_sample(100.1, 0.0, 1)));
    }

    #[test]
    fn snore_ignores_stage() {
        for state in [0, 1, 2, 3, 7] {
            assert!(EventDetector::is_snore(&make_sample(150.0, 0.0, state)));
        }
    }

    #[test]
    fn movement_requires_light_sleep() {
        assert!(EventDetector::is_movement(&make_sample(0.0, 60.0, 1)));
        for state in [0, 2, 3, 7] {
            assert!(!EventDetector::is_movement(&make_sample(0.0, 60.0, state)));
        }
    }

    #[test]
    fn piezo_threshold_ignores_stage() {
        for state in [0, 1, 2, 3] {
            assert!(EventDetector::exceeds_piezo_threshold(&make_sample(0.0, 51.0, state)));
        }
        assert!(!EventDetector::exceeds_piezo_threshold(&make_sample(0.0, 50.0, 1)));
    }

    #[test]
    fn classify_can_return_both() {
        let both = EventDetector::classify(&make_sample(150.0, 60.0, 1));
        assert_eq!(both, vec![SleepEvent::Snore, SleepEvent::Movement]);

        let quiet = EventDetector::classify(&make_sample(10.0, 10.0, 1));
        assert!(quiet.is_empty());
    }

    #[test]
    fn count_events_over_collection() {
        let samples = vec![
            make_sample(150.0, 10.0, 2), // snore only
            make_sample(10.0, 60.0, 1),  // movement only
            make_sample(120.0, 70.0, 1), // both
            make_sample(10.0, 70.0, 3),  // piezo spike outside light sleep
            make_sample(10.0, 10.0, 0),
        ];

        let counts = EventDetector::count_events(&samples);
        assert_eq!(counts.snores, 2);
        assert_eq!(counts.movements, 2);
    }

    #[test]
    fn count_events_empty() {
        assert_eq!(EventDetector::count_events(&[]), EventCounts::default());
    }
}
