use std::path::Path;
use vis_usage_protocol::{UsageSummary, VEGA_COLLECTOR_TYPE};

pub fn render_usage_report(source: &Path, summary: Option<&UsageSummary>) -> String {
    let mut md = String::new();
    md.push_str("# Vega usage report\n\n");
    md.push_str(&format!("- Collector: `{VEGA_COLLECTOR_TYPE}`\n"));
    md.push_str(&format!("- Source: `{}`\n\n", source.display()));

    let Some(summary) = summary else {
        md.push_str("No Vega usage found.\n");
        return md;
    };

    md.push_str("| counter | total |\n");
    md.push_str("|---|---:|\n");
    for (name, total) in [
        ("vega_lib_specs_total", summary.vega_lib_specs_total),
        ("vega_lite_lib_specs_total", summary.vega_lite_lib_specs_total),
        ("vega_use_map_total", summary.vega_use_map_total),
    ] {
        md.push_str(&format!("| `{name}` | `{total}` |\n"));
    }
    md
}
