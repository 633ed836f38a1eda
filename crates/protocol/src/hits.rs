//! Raw search-engine shapes: the hits the collector consumes and the request
//! that produces them.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Saved-object type tag of visualizations.
pub const VISUALIZATION_TYPE: &str = "visualization";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct VisualizationAttributes {
    #[serde(rename = "visState", default, skip_serializing_if = "Option::is_none")]
    pub vis_state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct HitSource {
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<VisualizationAttributes>,
}

/// One raw hit: `{ _id, _source: { type, visualization?: { visState } } }`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<HitSource>,
}

impl SearchHit {
    pub fn visualization(id: impl Into<String>, vis_state: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: Some(HitSource {
                doc_type: VISUALIZATION_TYPE.to_string(),
                visualization: Some(VisualizationAttributes {
                    vis_state: Some(vis_state.into()),
                }),
            }),
        }
    }

    pub fn is_visualization(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.doc_type == VISUALIZATION_TYPE)
    }

    /// Serialized visualization state, only for visualization documents.
    pub fn vis_state(&self) -> Option<&str> {
        if !self.is_visualization() {
            return None;
        }
        self.source
            .as_ref()?
            .visualization
            .as_ref()?
            .vis_state
            .as_deref()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SearchHits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<Vec<SearchHit>>,
}

/// Search response envelope. Missing `hits.hits` means no results.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: SearchHits,
}

impl SearchResponse {
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits: SearchHits { hits: Some(hits) },
        }
    }

    pub fn hits(&self) -> Option<&[SearchHit]> {
        self.hits.hits.as_deref()
    }

    pub fn len(&self) -> usize {
        self.hits().map_or(0, <[SearchHit]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search issued against the saved-objects index for every visualization.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VisualizationSearchRequest {
    pub index: String,
    pub size: usize,
    pub ignore_unavailable: bool,
    pub filter_path: Vec<String>,
    pub body: serde_json::Value,
}

impl VisualizationSearchRequest {
    pub fn new(index: impl Into<String>, size: usize) -> Self {
        Self {
            index: index.into(),
            size,
            ignore_unavailable: true,
            filter_path: vec![
                "hits.hits._id".to_string(),
                "hits.hits._source.type".to_string(),
                "hits.hits._source.visualization".to_string(),
            ],
            body: json!({
                "query": {
                    "bool": {
                        "filter": { "term": { "type": VISUALIZATION_TYPE } }
                    }
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_raw_hit_shape() {
        let raw = r#"{
            "_id": "visualization:vega-1",
            "_score": 1.0,
            "_source": {
                "type": "visualization",
                "visualization": { "visState": "{\"type\":\"vega\"}", "title": "x" }
            }
        }"#;
        let hit: SearchHit = serde_json::from_str(raw).unwrap();
        assert_eq!(hit.id, "visualization:vega-1");
        assert!(hit.is_visualization());
        assert_eq!(hit.vis_state(), Some(r#"{"type":"vega"}"#));
    }

    #[test]
    fn non_visualization_hit_has_no_state() {
        let raw = r#"{
            "_id": "index-pattern:abc",
            "_source": {
                "type": "index-pattern",
                "visualization": { "visState": "{\"type\":\"vega\"}" }
            }
        }"#;
        let hit: SearchHit = serde_json::from_str(raw).unwrap();
        assert!(!hit.is_visualization());
        assert_eq!(hit.vis_state(), None);
    }

    #[test]
    fn missing_hits_array_reads_as_empty() {
        let response: SearchResponse = serde_json::from_str(r#"{"hits":{}}"#).unwrap();
        assert!(response.hits().is_none());
        assert!(response.is_empty());

        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.len(), 0);
    }

    #[test]
    fn request_filters_on_visualization_type() {
        let request = VisualizationSearchRequest::new(".kibana", 10_000);
        assert_eq!(request.size, 10_000);
        assert!(request.ignore_unavailable);
        assert_eq!(
            request.body["query"]["bool"]["filter"]["term"]["type"],
            "visualization"
        );
        assert_eq!(
            request.filter_path,
            vec![
                "hits.hits._id",
                "hits.hits._source.type",
                "hits.hits._source.visualization"
            ]
        );
    }
}
