use serde_json::Value;
use vis_usage_protocol::SampleDataset;

/// Parsed vega states bundled with sample datasets.
///
/// Matching is structural: a candidate is excluded when its parsed visState
/// equals a sample's parsed visState, independent of key order and spacing.
/// A user's unmodified copy of a sample visualization is excluded as well.
#[derive(Debug, Clone, Default)]
pub struct SampleExclusions {
    states: Vec<Value>,
}

impl SampleExclusions {
    pub fn from_datasets(datasets: &[SampleDataset]) -> Self {
        let mut states = Vec::new();
        for dataset in datasets {
            for raw in dataset.visualization_states() {
                let state: Value = match serde_json::from_str(raw) {
                    Ok(state) => state,
                    Err(err) => {
                        log::debug!(
                            "Skipping sample visState from dataset {:?}: {err}",
                            dataset.id
                        );
                        continue;
                    }
                };
                if is_vega_state(&state) && !states.contains(&state) {
                    states.push(state);
                }
            }
        }
        Self { states }
    }

    pub fn contains(&self, state: &Value) -> bool {
        self.states.iter().any(|sample| sample == state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

pub(crate) fn is_vega_state(state: &Value) -> bool {
    state.get("type").and_then(Value::as_str) == Some("vega")
}
