pub(crate) mod samples;
pub use samples::{AudioMovementSample, SleepStage, VitalSample};
