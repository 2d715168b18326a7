//! Markdown rendering for one bus-line record.

use tracing::warn;

use crate::combine::INDEX_ANCHOR;
use crate::record::LineRecord;
use crate::schedule::{ScheduleError, project};

/// A rendered per-line document, ready to be written and aggregated.
///
/// `heading` is the document's first line; the aggregator derives the index
/// entry from it. `filename` is the zero-padded line number joined to the
/// source file's stem, which makes lexicographic filename order agree with
/// numeric line order.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub heading: String,
    pub markdown: String,
}

/// Renders one line record to Markdown.
///
/// A missing line number or name is tolerated: the heading gets an empty
/// value and the filename prefix falls back to `000`. A day type whose
/// departures fail to project is skipped with a warning so the remaining
/// day types still render.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptyStopSequence`] if the record has no stops;
/// no table can be produced without a first stop to anchor to.
pub fn render(record: &LineRecord, source_stem: &str) -> Result<RenderedDocument, ScheduleError> {
    if record.stops.is_empty() {
        return Err(ScheduleError::EmptyStopSequence);
    }

    if record.number.is_none() || record.name.is_none() {
        warn!(
            source_stem,
            has_number = record.number.is_some(),
            has_name = record.name.is_some(),
            "Record is missing line number or name, using empty values"
        );
    }

    let number = record.number.map(|n| n.to_string()).unwrap_or_default();
    let name = record.name.clone().unwrap_or_default();

    let heading = format!("# Linija {}: {}", number, name);
    let filename = format!("{:03}_{}.md", record.number.unwrap_or(0), source_stem);

    let mut md = String::new();
    md.push_str(&heading);
    md.push_str("\n\n");

    if let Some(note) = record.note.as_deref()
        && !note.is_empty()
    {
        md.push_str(&format!("> **Napomena:** {}\n\n", note));
    }

    for group in &record.departures {
        let trips = match project(&group.times, &record.stops) {
            Ok(trips) => trips,
            Err(e) => {
                warn!(
                    source_stem,
                    day_type = %group.day_type,
                    error = %e,
                    "Skipping day type, departures failed to project"
                );
                continue;
            }
        };

        md.push_str(&format!("## {}\n\n", group.day_type));

        let header: Vec<&str> = record.stops.iter().map(|s| s.name.as_str()).collect();
        md.push_str(&format!("| {} |\n", header.join(" | ")));
        md.push_str(&format!("|{}\n", " :---: |".repeat(record.stops.len())));

        for trip in &trips {
            let cells: Vec<String> = trip
                .stop_times
                .iter()
                .enumerate()
                .map(|(i, st)| {
                    let time = st.time.format("%H:%M");
                    if i == 0 {
                        format!("**{}**", time)
                    } else {
                        time.to_string()
                    }
                })
                .collect();
            md.push_str(&format!("| {} |\n", cells.join(" | ")));
        }

        md.push('\n');
    }

    md.push_str(&format!("[Natrag na popis linija](#{})\n", INDEX_ANCHOR));

    Ok(RenderedDocument {
        filename,
        heading,
        markdown: md,
    })
}
