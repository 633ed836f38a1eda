use crate::config::CollectorConfig;
use crate::error::{CollectorError, Result};
use crate::sample::SampleExclusions;
use crate::spec_text::SpecMarkers;
use crate::summarizer::UsageSummarizer;
use async_trait::async_trait;
use vis_usage_protocol::{
    SampleDataset, SearchResponse, UsageSummary, VisualizationSearchRequest, VEGA_COLLECTOR_TYPE,
};

/// Executes the visualization search against the saved-objects index.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, request: &VisualizationSearchRequest) -> Result<SearchResponse>;
}

/// Source of bundled sample datasets, read once per fetch.
pub trait SampleDataProvider: Send + Sync {
    fn sample_datasets(&self) -> Vec<SampleDataset>;
}

/// Provider for deployments without sample data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSampleData;

impl SampleDataProvider for NoSampleData {
    fn sample_datasets(&self) -> Vec<SampleDataset> {
        Vec::new()
    }
}

impl<T: SampleDataProvider + ?Sized> SampleDataProvider for Box<T> {
    fn sample_datasets(&self) -> Vec<SampleDataset> {
        (**self).sample_datasets()
    }
}

impl SampleDataProvider for Vec<SampleDataset> {
    fn sample_datasets(&self) -> Vec<SampleDataset> {
        self.clone()
    }
}

/// `vis_type_vega` usage collector.
pub struct VegaUsageCollector<P = NoSampleData> {
    config: CollectorConfig,
    markers: SpecMarkers,
    provider: P,
}

impl<P: SampleDataProvider> VegaUsageCollector<P> {
    pub fn new(config: CollectorConfig, provider: P) -> Result<Self> {
        config.validate()?;
        let markers = config.markers()?;
        Ok(Self {
            config,
            markers,
            provider,
        })
    }

    pub fn collector_type(&self) -> &'static str {
        VEGA_COLLECTOR_TYPE
    }

    pub fn is_ready(&self) -> bool {
        true
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// JSON Schema of the reported summary.
    pub fn schema(&self) -> Result<serde_json::Value> {
        vis_usage_protocol::usage_schema().map_err(|err| CollectorError::Other(err.to_string()))
    }

    pub fn search_request(&self) -> VisualizationSearchRequest {
        VisualizationSearchRequest::new(self.config.index.clone(), self.config.size)
    }

    pub async fn fetch(&self, client: &dyn SearchClient) -> Result<Option<UsageSummary>> {
        let request = self.search_request();
        let response = client.search(&request).await?;
        log::debug!(
            "{}: fetched {} hits from {}",
            self.collector_type(),
            response.len(),
            request.index
        );
        if response.is_empty() {
            return Ok(None);
        }

        let exclusions = SampleExclusions::from_datasets(&self.provider.sample_datasets());
        let summary =
            UsageSummarizer::new(&exclusions, &self.markers).summarize(response.hits());
        log::debug!("{}: summary {:?}", self.collector_type(), summary);
        Ok(summary)
    }
}
