use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};
use opensleep_types::{AudioMovementSample, VitalSample};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{self:?}")]
pub enum IngestError {
    NotAnArray,
    InvalidInt { index: usize, field: &'static str },
    BadRecord { index: usize, source: serde_json::Error },
    Read(#[from] std::io::Error),
    Json(#[from] serde_json::Error),
}

/// File-backed stand-in for the storage collaborator: one JSON batch per
/// stream, served newest-first the way the query boundary returns rows.
pub struct SampleStore {
    audio_path: PathBuf,
    vitals_path: PathBuf,
}

impl SampleStore {
    pub fn new(audio_path: PathBuf, vitals_path: PathBuf) -> Self {
        Self {
            audio_path,
            vitals_path,
        }
    }

    pub fn load(&self) -> Result<(Vec<AudioMovementSample>, Vec<VitalSample>), IngestError> {
        let audio_raw: Value = serde_json::from_str(&fs::read_to_string(&self.audio_path)?)?;
        let vitals_raw: Value = serde_json::from_str(&fs::read_to_string(&self.vitals_path)?)?;

        let mut audio = parse_audio_batch(&audio_raw)?;
        let mut vitals = parse_vitals_batch(&vitals_raw)?;

        debug!(
            "loaded {} audio samples, {} vitals samples",
            audio.len(),
            vitals.len()
        );

        audio.sort_by(|a, b| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then(b.timestamp.cmp(&a.timestamp))
        });
        vitals.sort_by(|a, b| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then(b.timestamp.cmp(&a.timestamp))
        });

        Ok((audio, vitals))
    }
}

/// Audio/movement batch. Device uploads use the firmware's short keys
/// (`mic`, `pz`, `state`, `t`); storage exports use the full column names
/// and deserialize directly. The two forms can be mixed per record.
pub fn parse_audio_batch(payload: &Value) -> Result<Vec<AudioMovementSample>, IngestError> {
    let records = payload.as_array().ok_or(IngestError::NotAnArray)?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            if record.get("mic").is_some() {
                let timestamp = int_field(record, "t", index)?;
                Ok(AudioMovementSample {
                    mic_rms: float_field(record, "mic"),
                    piezo_peak: float_field(record, "pz"),
                    state: int_field(record, "state", index)? as i32,
                    timestamp,
                    recorded_at: recorded_at(record, timestamp),
                })
            } else {
                serde_json::from_value(record.clone())
                    .map_err(|source| IngestError::BadRecord { index, source })
            }
        })
        .collect()
}

/// Vitals batch. Device uploads carry every numeric field as a string;
/// storage exports carry real numbers. Field-wise parsing covers both.
pub fn parse_vitals_batch(payload: &Value) -> Result<Vec<VitalSample>, IngestError> {
    let records = payload.as_array().ok_or(IngestError::NotAnArray)?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let timestamp = int_field(record, "timestamp", index)?;
            Ok(VitalSample {
                heart_rate: float_field(record, "heartRate"),
                spo2: float_field(record, "spo2"),
                temperature: float_field(record, "temperature"),
                timestamp,
                recorded_at: recorded_at(record, timestamp),
            })
        })
        .collect()
}

/// Float fields keep the upstream parseFloat contract: a value that does
/// not parse becomes NaN and flows through downstream arithmetic instead
/// of failing the batch.
fn float_field(record: &Value, key: &str) -> f64 {
    match record.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Integer fields have no NaN to hide behind; a bad one fails the whole
/// batch, matching the all-or-nothing ingest transaction.
fn int_field(record: &Value, key: &'static str, index: usize) -> Result<i64, IngestError> {
    let parsed = match record.get(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    };

    parsed.ok_or(IngestError::InvalidInt { index, field: key })
}

fn recorded_at(record: &Value, timestamp_ms: i64) -> NaiveDateTime {
    record
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.naive_utc())
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                .ok()
        })
        .or_else(|| DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.naive_utc()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_array_payload() {
        let payload = json!({"mic": "1.0"});
        assert!(matches!(
            parse_audio_batch(&payload),
            Err(IngestError::NotAnArray)
        ));
        assert!(matches!(
            parse_vitals_batch(&json!("[]")),
            Err(IngestError::NotAnArray)
        ));
    }

    #[test]
    fn parses_device_audio_record() {
        let payload = json!([{"mic": "101.5", "pz": "12.0", "state": "1", "t": "1735772400000"}]);
        let samples = parse_audio_batch(&payload).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].mic_rms, 101.5);
        assert_eq!(samples[0].piezo_peak, 12.0);
        assert_eq!(samples[0].state, 1);
        assert_eq!(samples[0].timestamp, 1_735_772_400_000);
    }

    #[test]
    fn unparseable_float_becomes_nan() {
        let payload = json!([{"mic": "abc", "pz": "1.0", "state": "0", "t": 0}]);
        let samples = parse_audio_batch(&payload).unwrap();
        assert!(samples[0].mic_rms.is_nan());
        assert_eq!(samples[0].piezo_peak, 1.0);
    }

    #[test]
    fn missing_float_becomes_nan() {
        let payload = json!([{"heartRate": "70", "timestamp": 0}]);
        let samples = parse_vitals_batch(&payload).unwrap();
        assert_eq!(samples[0].heart_rate, 70.0);
        assert!(samples[0].spo2.is_nan());
    }

    #[test]
    fn bad_integer_fails_the_batch() {
        let payload = json!([
            {"mic": "1.0", "pz": "1.0", "state": "1", "t": 0},
            {"mic": "1.0", "pz": "1.0", "state": "awake", "t": 0}
        ]);
        assert!(matches!(
            parse_audio_batch(&payload),
            Err(IngestError::InvalidInt { index: 1, field: "state" })
        ));
    }

    #[test]
    fn fractional_integer_truncates() {
        let payload = json!([{"mic": "1.0", "pz": "1.0", "state": "1.9", "t": "12.7"}]);
        let samples = parse_audio_batch(&payload).unwrap();
        assert_eq!(samples[0].state, 1);
        assert_eq!(samples[0].timestamp, 12);
    }

    #[test]
    fn stored_audio_rows_deserialize_directly() {
        let payload = json!([{
            "id": 3,
            "micRMS": 1.2,
            "piezoPeak": 3.4,
            "state": 2,
            "timestamp": 1234567890,
            "createdAt": "2025-01-01T22:15:00"
        }]);
        let samples = parse_audio_batch(&payload).unwrap();
        assert_eq!(samples[0].mic_rms, 1.2);
        assert_eq!(samples[0].state, 2);
    }

    #[test]
    fn created_at_overrides_timestamp_clock() {
        let payload = json!([{
            "heartRate": 70.0, "spo2": 96.0, "temperature": 36.5,
            "timestamp": 0,
            "createdAt": "2025-01-01T22:15:00Z"
        }]);
        let samples = parse_vitals_batch(&payload).unwrap();
        assert_eq!(
            samples[0].recorded_at,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(22, 15, 0)
                .unwrap()
        );
    }

    #[test]
    fn recorded_at_falls_back_to_timestamp_millis() {
        // 2025-01-01T00:00:00 UTC
        let payload = json!([{"heartRate": 70.0, "timestamp": 1735689600000_i64}]);
        let samples = parse_vitals_batch(&payload).unwrap();
        assert_eq!(
            samples[0].recorded_at,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
