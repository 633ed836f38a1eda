use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod hits;
pub mod sample_data;

pub use hits::{HitSource, SearchHit, SearchHits, SearchResponse, VisualizationAttributes};
pub use hits::{VisualizationSearchRequest, VISUALIZATION_TYPE};
pub use sample_data::{SampleDataset, SampleSavedObject, SampleSavedObjectAttributes};

/// Collector type under which the summary is reported.
pub const VEGA_COLLECTOR_TYPE: &str = "vis_type_vega";

/// Aggregate Vega usage counters.
///
/// Field names are consumed verbatim by the telemetry pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub struct UsageSummary {
    pub vega_lib_specs_total: u64,
    pub vega_lite_lib_specs_total: u64,
    pub vega_use_map_total: u64,
}

impl UsageSummary {
    pub const fn is_empty(&self) -> bool {
        self.vega_lib_specs_total == 0
            && self.vega_lite_lib_specs_total == 0
            && self.vega_use_map_total == 0
    }
}

/// JSON Schema of the reported summary.
pub fn usage_schema() -> Result<serde_json::Value> {
    let schema = schemars::schema_for!(UsageSummary);
    serde_json::to_value(schema).map_err(Into::into)
}
