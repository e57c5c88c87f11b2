// src/specs/listing.rs
//! Layout of the listing page.
//!
//! Layout:
//! ```text
//! <div id="hideMap">
//!   <h3>Building: Tower - 2 Bedrooms, 1 Bathroom</h3>
//!   <table> <tbody>
//!     <tr><td data-label="Apartment">101</td><td data-label="Rent">$2,100</td>…</tr>
//!   </tbody> </table>
//!   … one heading + one table per group …
//! </div>
//! ```
//! Returns headings and row sets as parallel lists in document order.

use crate::config::ParseOptions;
use crate::config::consts::HEADING_SEP;
use crate::core::html::{self, Element};
use crate::error::{Result, WatchError};

/// `(label, text)` pairs of one table row, in cell order.
pub type RawRow = Vec<(String, String)>;

/// Parsed `<prefix>: <name> - <descriptor>` heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupHeading {
    pub name: String,
    pub descriptor: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub headings: Vec<GroupHeading>,
    pub groups: Vec<Vec<RawRow>>,
}

impl ParsedPage {
    pub fn len(&self) -> usize { self.headings.len() }
    pub fn is_empty(&self) -> bool { self.headings.is_empty() }

    /// Heading paired with its rows.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupHeading, &[RawRow])> {
        self.headings.iter().zip(self.groups.iter().map(|g| g.as_slice()))
    }
}

pub fn parse_document(doc: &str, opts: &ParseOptions) -> Result<ParsedPage> {
    let container = html::element_by_id(doc, &opts.container_id)
        .ok_or_else(|| WatchError::parse("container not found"))?;

    let heading_blocks = html::elements_ci(container.inner, &opts.heading_tag);
    let table_blocks = html::elements_ci(container.inner, "table");

    if heading_blocks.len() != table_blocks.len() {
        return Err(WatchError::parse(format!(
            "unpaired groups: {} headings but {} tables",
            heading_blocks.len(),
            table_blocks.len()
        )));
    }

    let mut page = ParsedPage::default();
    for (h, t) in heading_blocks.iter().zip(&table_blocks) {
        let heading = parse_heading(&h.text())?;
        let rows = extract_rows(t, &opts.label_attr);
        logd!(group = %heading.name, rows = rows.len(), "parsed group");
        page.headings.push(heading);
        page.groups.push(rows);
    }
    Ok(page)
}

/// Split heading text into group name and feature descriptor.
/// Everything up to the last `:` is an ignored prefix.
pub fn parse_heading(text: &str) -> Result<GroupHeading> {
    let body = text.rsplit(':').next().unwrap_or(text).trim();
    let parts: Vec<&str> = body.split(HEADING_SEP).collect();

    match parts.as_slice() {
        [name, descriptor] if !name.trim().is_empty() && !descriptor.trim().is_empty() => {
            Ok(GroupHeading { name: s!(name.trim()), descriptor: s!(descriptor.trim()) })
        }
        _ => Err(WatchError::parse(format!("malformed heading: {text:?}"))),
    }
}

/// Body rows of one group table. Cells without a label are dropped; rows
/// left with no labelled cell (header rows, spacers) are skipped.
fn extract_rows(table: &Element<'_>, label_attr: &str) -> Vec<RawRow> {
    let body = html::next_element_ci(table.inner, "tbody", 0)
        .map(|b| b.inner)
        .unwrap_or(table.inner);

    let mut rows = Vec::new();
    for tr in html::elements_ci(body, "tr") {
        let row: RawRow = html::elements_ci(tr.inner, "td")
            .into_iter()
            .filter_map(|td| td.attr(label_attr).map(|label| (label, td.text())))
            .collect();
        if row.is_empty() {
            continue;
        }
        rows.push(row);
    }
    rows
}
