// src/parse.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, trace, warn};

use crate::error::ResultError;
use crate::record::{RecordBuilder, StudentRecord};
use crate::usn::Usn;

/// Label the result page puts in front of the student's name. Only its
/// length is used: that many leading characters are dropped.
pub const NAME_LABEL: &str = "Name : ";

static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("center h1").expect("name selector should parse"));
static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector should parse"));

/// Parse a result page into a [`StudentRecord`] for `usn`.
///
/// The page must have an `h1` inside a `center` block holding the name,
/// and at least one `table`; only the first table is read. Anything else
/// (an error page for an unknown USN, a redesigned site) is a
/// [`ResultError::Parse`].
#[instrument(level = "debug", skip(usn, html), fields(usn = %usn, html_len = html.len()))]
pub fn parse_result_page(usn: &Usn, html: &str) -> Result<StudentRecord, ResultError> {
    let document = Html::parse_document(html);
    let mut builder = RecordBuilder::new();

    builder.name(extract_name(&document)?);

    let table = document.select(&TABLE_SELECTOR).next().ok_or_else(|| {
        warn!("results table not found");
        ResultError::Parse("results table not found".to_string())
    })?;

    let mut rows = 0usize;
    for (idx, row) in own_rows(table).into_iter().enumerate() {
        let text = row_text(row);
        match split_row(&text) {
            Some((code, grade)) => {
                trace!(row = idx, code, grade, "parsed row");
                builder.grade(code, grade);
                rows += 1;
            }
            None => trace!(row = idx, text = %text, "skipping row"),
        }
    }

    debug!(rows, "finished result table");
    builder.build(usn.clone())
}

fn extract_name(document: &Html) -> Result<String, ResultError> {
    let heading = document.select(&NAME_SELECTOR).next().ok_or_else(|| {
        warn!("name heading not found");
        ResultError::Parse("name heading not found".to_string())
    })?;

    let text = normalize_ws(&heading.text().collect::<String>());
    let name = text
        .char_indices()
        .nth(NAME_LABEL.chars().count())
        .map(|(at, _)| text[at..].trim())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            warn!(heading = %text, "heading too short to hold a name");
            ResultError::Parse(format!("no name in heading {:?}", text))
        })?;

    trace!(name, "extracted name");
    Ok(name.to_string())
}

/// Direct element children of `parent` named `tag`.
fn children_named<'a>(
    parent: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}

/// Rows belonging to `table` itself, either directly or through a row
/// group. Rows of tables nested in a cell are left out.
fn own_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(children_named(child, "tr")),
            _ => {}
        }
    }
    rows
}

/// Text of each of the row's own `td` cells, separated by a space.
fn row_text(row: ElementRef<'_>) -> String {
    children_named(row, "td")
        .map(|cell| cell.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First token is the subject code, last token the grade. Rows with fewer
/// than two tokens carry no usable pair.
fn split_row(text: &str) -> Option<(&str, &str)> {
    let mut tokens = text.split_whitespace();
    let code = tokens.next()?;
    let grade = tokens.last()?;
    Some((code, grade))
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
