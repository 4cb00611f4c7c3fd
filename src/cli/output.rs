//! Output formatting utilities

use crate::application::ConversionReport;
use crate::domain::SiteFeature;

/// Decimal places for printed degrees, about 1 cm on the ground
const DEGREE_PRECISION: usize = 7;

fn format_degrees(value: f64) -> String {
    format!("{:.*}", DEGREE_PRECISION, value)
}

/// Format a resolved tag: kind and tag on the first line, then one `lon, lat` per line
pub fn format_feature(feature: &SiteFeature) -> String {
    let mut output = format!("{} {}\n", feature.kind(), feature.tag);
    for coord in feature.geometry.coords() {
        output.push_str(&format!(
            "  {}, {}\n",
            format_degrees(coord.x),
            format_degrees(coord.y)
        ));
    }
    output
}

/// Format the summary printed after a conversion
pub fn format_report(report: &ConversionReport) -> String {
    let mut output = format!(
        "Datum: {} (lat {}, lon {})\n",
        report.datum.label,
        format_degrees(report.datum.latitude()),
        format_degrees(report.datum.longitude())
    );
    for layer in &report.layers {
        let noun = if layer.features == 1 { "feature" } else { "features" };
        match &layer.path {
            Some(path) => output.push_str(&format!(
                "  {} ({}): {} {} -> {}\n",
                layer.name,
                layer.kind,
                layer.features,
                noun,
                path.display()
            )),
            None => output.push_str(&format!(
                "  {} ({}): {} {} (skipped)\n",
                layer.name, layer.kind, layer.features, noun
            )),
        }
    }
    output
}
