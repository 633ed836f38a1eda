//! Sample dataset descriptors as exposed by the sample-data registry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SampleSavedObjectAttributes {
    #[serde(rename = "visState", default, skip_serializing_if = "Option::is_none")]
    pub vis_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SampleSavedObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub attributes: SampleSavedObjectAttributes,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SampleDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "savedObjects", default)]
    pub saved_objects: Vec<SampleSavedObject>,
}

impl SampleDataset {
    /// Visualization states bundled with this dataset.
    pub fn visualization_states(&self) -> impl Iterator<Item = &str> {
        self.saved_objects
            .iter()
            .filter(|object| object.object_type == crate::VISUALIZATION_TYPE)
            .filter_map(|object| object.attributes.vis_state.as_deref())
    }
}
