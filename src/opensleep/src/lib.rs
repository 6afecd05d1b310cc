#[macro_use]
extern crate log;

mod ingest;
pub use ingest::{IngestError, SampleStore, parse_audio_batch, parse_vitals_batch};
