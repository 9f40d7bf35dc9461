//! Output formatting for scan results.
//!
//! Text output prints one line per system in the form
//! `Name [4.38ly] (12 bodies)`; JSON output emits an array of objects that
//! downstream tools can consume. Nothing here talks to the network.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use edsm_scanner_lib::{QueryableField, SystemBody, SystemRef, BODY_FIELDS, SYSTEM_FIELDS};

use crate::scan::ScanRow;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render rows in the requested format.
pub fn render_rows<W: Write>(out: &mut W, rows: &[ScanRow], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => render_text(out, rows),
        OutputFormat::Json => render_json(out, rows),
    }
}

fn render_text<W: Write>(out: &mut W, rows: &[ScanRow]) -> io::Result<()> {
    for row in rows {
        writeln!(out, "{}", format_row(row))?;
    }
    Ok(())
}

/// One text line for a row.
///
/// When bodies were fetched the count reads `discovered/expected`. A plotted
/// journey appends the leg from the previous line as `+1.50ly`.
pub fn format_row(row: &ScanRow) -> String {
    let system = &row.resolved.system;
    let mut line = format!(
        "{} [{:.2}ly] ({})",
        system.name,
        row.resolved.distance_from_origin,
        body_summary(row)
    );
    if let Some(deviation) = row.resolved.route_deviation {
        line.push_str(&format!(" {:.2}ly off route", deviation));
    }
    if let Some(leg) = row.journey_leg {
        line.push_str(&format!(" +{:.2}ly", leg));
    }
    if !row.matching_bodies.is_empty() {
        line.push_str(&format!(" matching: {}", row.matching_bodies.join(", ")));
    }
    line
}

fn body_summary(row: &ScanRow) -> String {
    let expected = row
        .details
        .as_ref()
        .and_then(|details| details.body_count)
        .or(row.resolved.system.body_count);
    let discovered = row
        .details
        .as_ref()
        .and_then(|details| details.discovered_bodies());

    match (discovered, expected) {
        (Some(found), Some(total)) => format!("{found}/{total} bodies"),
        (Some(found), None) => format!("{found}/? bodies"),
        (None, Some(total)) => format!("{total} bodies"),
        (None, None) => "? bodies".to_string(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRow<'a> {
    #[serde(flatten)]
    system: &'a SystemRef,
    distance_from_origin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    route_deviation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discovered_bodies: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_fully_discovered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    journey_leg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matching_bodies: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bodies: Option<&'a [SystemBody]>,
}

impl<'a> From<&'a ScanRow> for JsonRow<'a> {
    fn from(row: &'a ScanRow) -> Self {
        let details = row.details.as_ref();
        Self {
            system: &row.resolved.system,
            distance_from_origin: row.resolved.distance_from_origin,
            route_deviation: row.resolved.route_deviation,
            discovered_bodies: details.and_then(|d| d.discovered_bodies()),
            is_fully_discovered: details.and_then(|d| d.is_fully_discovered()),
            journey_leg: row.journey_leg,
            url: details.map(|d| d.url.as_str()).filter(|url| !url.is_empty()),
            matching_bodies: Some(row.matching_bodies.as_slice())
                .filter(|names| !names.is_empty()),
            bodies: details.and_then(|d| d.bodies.as_deref()),
        }
    }
}

fn render_json<W: Write>(out: &mut W, rows: &[ScanRow]) -> io::Result<()> {
    let json: Vec<JsonRow<'_>> = rows.iter().map(JsonRow::from).collect();
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)
}

/// List the queryable fields of systems and bodies under one heading each.
pub fn render_fields<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "System fields (--filter-system):")?;
    render_field_table(out, SYSTEM_FIELDS)?;
    writeln!(out)?;
    writeln!(out, "Body fields (--filter-body):")?;
    render_field_table(out, BODY_FIELDS)
}

fn render_field_table<W: Write, T>(out: &mut W, fields: &[QueryableField<T>]) -> io::Result<()> {
    let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for field in fields {
        writeln!(
            out,
            "  {:<width$}  {:<9}  {}",
            field.name,
            field.kind.to_string(),
            field.description,
            width = width
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::system;
    use edsm_scanner_lib::{ResolvedSystem, SystemDetails};

    fn row(details: Option<SystemDetails>) -> ScanRow {
        let origin = system(1, "Sol", 0.0, 3);
        let target = system(2, "Alpha Centauri", 4.38, 4);
        ScanRow::new(ResolvedSystem::from_origin(&origin, target), details)
    }

    fn render(rows: &[ScanRow], format: OutputFormat) -> String {
        let mut buf = Vec::new();
        render_rows(&mut buf, rows, format).expect("write to buffer");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn text_line_without_details() {
        assert_eq!(format_row(&row(None)), "Alpha Centauri [4.38ly] (4 bodies)");
    }

    #[test]
    fn text_line_with_details_and_deviation() {
        let mut details = SystemDetails::unresolved(system(2, "Alpha Centauri", 4.38, 4));
        details.bodies = Some(vec![SystemBody::default(), SystemBody::default()]);
        let mut row = row(Some(details));
        row.resolved.route_deviation = Some(0.5);

        assert_eq!(
            format_row(&row),
            "Alpha Centauri [4.38ly] (2/4 bodies) 0.50ly off route"
        );
    }

    #[test]
    fn unknown_counts_render_as_question_marks() {
        let mut row = row(None);
        row.resolved.system.body_count = None;
        assert_eq!(format_row(&row), "Alpha Centauri [4.38ly] (? bodies)");
    }

    #[test]
    fn json_output_is_an_array() {
        let output = render(&[row(None)], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        let entries = value.as_array().expect("array");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "Alpha Centauri");
        let distance = entries[0]["distanceFromOrigin"].as_f64().expect("number");
        assert!((distance - 4.38).abs() < 1e-9);
        assert!(entries[0].get("routeDeviation").is_none());
        assert!(entries[0].get("bodies").is_none());
    }

    #[test]
    fn journey_leg_and_matching_bodies_are_appended() {
        let mut row = row(None);
        row.journey_leg = Some(1.5);
        row.matching_bodies = vec!["Alpha Centauri 1".to_string(), "Alpha Centauri 2".to_string()];

        assert_eq!(
            format_row(&row),
            "Alpha Centauri [4.38ly] (4 bodies) +1.50ly \
             matching: Alpha Centauri 1, Alpha Centauri 2"
        );

        let output = render(&[row], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value[0]["journeyLeg"], 1.5);
        assert_eq!(value[0]["matchingBodies"][1], "Alpha Centauri 2");
    }

    #[test]
    fn fields_listing_names_every_field() {
        let mut buf = Vec::new();
        render_fields(&mut buf).expect("write to buffer");
        let listing = String::from_utf8(buf).expect("utf8");

        // two headings and a blank separator line
        assert_eq!(
            listing.lines().count(),
            SYSTEM_FIELDS.len() + BODY_FIELDS.len() + 3
        );
        assert!(listing.contains("IsFullyDiscovered"));
        assert!(listing.contains("SurfacePressure"));
        assert!(listing.contains("text list"));
        let body_heading = listing.find("Body fields").expect("body heading");
        assert!(listing.find("RingTypes").expect("ring types") > body_heading);
    }
}
