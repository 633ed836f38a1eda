//! File-backed collaborators: captured search responses and sample-data
//! manifests on disk.

use crate::collector::{SampleDataProvider, SearchClient};
use crate::error::{CollectorError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use vis_usage_protocol::{SampleDataset, SearchHit, SearchResponse, VisualizationSearchRequest};

#[derive(Deserialize)]
#[serde(untagged)]
enum CapturedHits {
    Hits(Vec<SearchHit>),
    Response(SearchResponse),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CapturedSamples {
    Many(Vec<SampleDataset>),
    One(SampleDataset),
}

/// Serves a captured search response (or a bare array of hits) from disk.
#[derive(Debug, Clone)]
pub struct FileSearchClient {
    path: PathBuf,
}

impl FileSearchClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SearchClient for FileSearchClient {
    async fn search(&self, request: &VisualizationSearchRequest) -> Result<SearchResponse> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|err| {
            CollectorError::Search(format!("failed to read {}: {err}", self.path.display()))
        })?;
        let captured: CapturedHits = serde_json::from_slice(&bytes).map_err(|err| {
            CollectorError::Search(format!(
                "{} is not a search response: {err}",
                self.path.display()
            ))
        })?;
        let mut response = match captured {
            CapturedHits::Hits(hits) => SearchResponse::from_hits(hits),
            CapturedHits::Response(response) => response,
        };
        if let Some(hits) = response.hits.hits.as_mut() {
            hits.truncate(request.size);
        }
        Ok(response)
    }
}

/// Reads a JSON array of sample datasets (or a single dataset).
pub fn load_sample_datasets(path: &Path) -> Result<Vec<SampleDataset>> {
    let bytes = std::fs::read(path)?;
    let captured: CapturedSamples = serde_json::from_slice(&bytes)?;
    Ok(match captured {
        CapturedSamples::Many(datasets) => datasets,
        CapturedSamples::One(dataset) => vec![dataset],
    })
}

/// Sample datasets loaded once from a manifest file.
#[derive(Debug, Clone, Default)]
pub struct FileSampleData {
    datasets: Vec<SampleDataset>,
}

impl FileSampleData {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            datasets: load_sample_datasets(path)?,
        })
    }
}

impl SampleDataProvider for FileSampleData {
    fn sample_datasets(&self) -> Vec<SampleDataset> {
        self.datasets.clone()
    }
}
