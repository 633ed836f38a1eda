use crate::sample::{is_vega_state, SampleExclusions};
use crate::spec_text::{SpecKind, SpecMarkers, VegaLibrary};
use serde_json::Value;
use vis_usage_protocol::{SearchHit, UsageSummary};

/// Result of one summarization pass.
///
/// `NoData` is the empty-batch fast path; a batch that was scanned but
/// produced no usage is `Summary` with all counters at zero. Both collapse to
/// `None` in [`UsageOutcome::into_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageOutcome {
    NoData,
    Summary(UsageSummary),
}

impl UsageOutcome {
    pub fn into_summary(self) -> Option<UsageSummary> {
        match self {
            Self::NoData => None,
            Self::Summary(summary) if summary.is_empty() => None,
            Self::Summary(summary) => Some(summary),
        }
    }
}

/// Counts Vega library and map usage over raw visualization hits.
pub struct UsageSummarizer<'a> {
    exclusions: &'a SampleExclusions,
    markers: &'a SpecMarkers,
}

impl<'a> UsageSummarizer<'a> {
    pub fn new(exclusions: &'a SampleExclusions, markers: &'a SpecMarkers) -> Self {
        Self {
            exclusions,
            markers,
        }
    }

    pub fn outcome(&self, hits: Option<&[SearchHit]>) -> UsageOutcome {
        let Some(hits) = hits.filter(|hits| !hits.is_empty()) else {
            return UsageOutcome::NoData;
        };

        let mut summary = UsageSummary::default();
        for hit in hits {
            let Some(kind) = self.spec_kind(hit) else {
                continue;
            };
            match kind.library {
                Some(VegaLibrary::Vega) => summary.vega_lib_specs_total += 1,
                Some(VegaLibrary::VegaLite) => summary.vega_lite_lib_specs_total += 1,
                None => {}
            }
            if kind.uses_map {
                summary.vega_use_map_total += 1;
            }
        }
        UsageOutcome::Summary(summary)
    }

    pub fn summarize(&self, hits: Option<&[SearchHit]>) -> Option<UsageSummary> {
        self.outcome(hits).into_summary()
    }

    /// Classification of a hit's spec, or `None` when the hit does not count.
    fn spec_kind(&self, hit: &SearchHit) -> Option<SpecKind> {
        let raw = hit.vis_state()?;
        let state: Value = match serde_json::from_str(raw) {
            Ok(state) => state,
            Err(err) => {
                log::debug!("Skipping {}: unparseable visState ({err})", hit.id);
                return None;
            }
        };
        if !is_vega_state(&state) {
            return None;
        }
        if self.exclusions.contains(&state) {
            log::debug!("Skipping {}: sample data visualization", hit.id);
            return None;
        }
        let spec = state.pointer("/params/spec").and_then(Value::as_str)?;
        Some(self.markers.classify(spec))
    }
}

pub fn summarize(
    hits: Option<&[SearchHit]>,
    exclusions: &SampleExclusions,
    markers: &SpecMarkers,
) -> Option<UsageSummary> {
    UsageSummarizer::new(exclusions, markers).summarize(hits)
}
