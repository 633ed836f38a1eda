//! # Vega usage collector
//!
//! Summarizes how saved Vega visualizations are used, for periodic telemetry.
//!
//! ## Architecture
//!
//! ```text
//! SearchClient ──> SearchResponse (raw hits)
//!                        │
//! SampleDataProvider ──> SampleExclusions (bundled demo states)
//!                        │
//!                        └──> UsageSummarizer
//!                               ├─ keep `visualization` docs with a vega visState
//!                               ├─ drop states shipped with sample data
//!                               ├─ classify params.spec by text pattern
//!                               └─ UsageSummary | nothing
//! ```

mod collector;
mod config;
mod error;
mod files;
mod sample;
mod spec_text;
mod summarizer;

pub use collector::{NoSampleData, SampleDataProvider, SearchClient, VegaUsageCollector};
pub use config::{CollectorConfig, DEFAULT_INDEX, DEFAULT_MAP_CONFIG_KEY, DEFAULT_SEARCH_SIZE};
pub use error::{CollectorError, Result};
pub use files::{load_sample_datasets, FileSampleData, FileSearchClient};
pub use sample::SampleExclusions;
pub use spec_text::{classify, schema_uri, strip_comments, SpecKind, SpecMarkers, VegaLibrary};
pub use summarizer::{summarize, UsageOutcome, UsageSummarizer};
pub use vis_usage_protocol::UsageSummary;
