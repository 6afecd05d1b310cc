pub(crate) mod events;
pub use events::{EventCounts, EventDetector, SleepEvent};

pub(crate) mod sleep;
pub use sleep::SleepDurationTracker;

pub(crate) mod quality;
pub use quality::{QualityCategory, QualityScorer};

pub(crate) mod metrics;
pub use metrics::SleepMetrics;

pub(crate) mod charts;
pub use charts::{AudioChartPoint, ChartShaper, StageCount, StageDistribution, VitalsChartPoint};

pub(crate) mod summary;
pub use summary::{Recommendation, SessionSummary, ValueRange};

pub(crate) mod analysis;
pub use analysis::SleepAnalysis;

pub mod helpers;
