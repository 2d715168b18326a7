//! Aggregation of rendered line documents into one combined, indexed
//! timetable document.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::render::RenderedDocument;

/// Heading of the combined document's index section. The per-line
/// documents' back-links point at [`INDEX_ANCHOR`], its slug.
pub const INDEX_HEADING: &str = "Popis linija";
pub const INDEX_ANCHOR: &str = "popis-linija";

/// Derives an anchor slug from a heading's text: lowercase, spaces become
/// hyphens, colons are removed. Other punctuation passes through, so
/// "Linija 7: Centar - Terminal" slugs to "linija-7-centar---terminal",
/// repeated hyphens included.
pub fn slug(text: &str) -> String {
    text.to_lowercase().replace(' ', "-").replace(':', "")
}

/// Concatenates all rendered documents into the combined timetable.
///
/// Documents are sorted by filename ascending; the zero-padded filename
/// prefix makes that order agree with numeric line order. The output is a
/// timestamp line, the index section (one linked entry per document), a
/// divider, then every document's full text in the same order separated by
/// blank lines.
///
/// A document whose heading does not start with `# ` gets no index entry
/// but its text is still included; this is logged, never an error.
pub fn combine(documents: &[RenderedDocument], generated_at: DateTime<Utc>) -> String {
    let mut sorted: Vec<&RenderedDocument> = documents.iter().collect();
    sorted.sort_by(|a, b| a.filename.cmp(&b.filename));

    let mut out = String::new();
    out.push_str(&format!(
        "Generirano: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str(&format!("## {}\n\n", INDEX_HEADING));
    for doc in &sorted {
        match doc.heading.strip_prefix("# ") {
            Some(text) => {
                out.push_str(&format!("- [{}](#{})\n", text, slug(text)));
            }
            None => {
                warn!(
                    filename = %doc.filename,
                    heading = %doc.heading,
                    "Document heading does not look like a level-1 heading, leaving it out of the index"
                );
            }
        }
    }

    out.push_str("\n---\n\n");

    let body: Vec<&str> = sorted.iter().map(|d| d.markdown.trim_end()).collect();
    out.push_str(&body.join("\n\n"));
    out.push('\n');

    out
}
