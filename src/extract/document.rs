//! Structured field lookups over a fetched league page.

use scraper::{Html, Selector};
use url::form_urlencoded;

/// Background colors the league site uses for schedule table rows.
const SCHEDULE_ROW_COLORS: [&str; 2] = ["white", "#D2D2FF"];

/// A fetched page, retained as markup and queried on demand.
///
/// The document owns its HTML as plain text so it can travel freely between
/// tasks; each lookup parses on the fly. Pages are small and each is queried
/// only a few times per load.
#[derive(Debug)]
pub struct Document {
    url: String,
    html: String,
}

/// One row of the schedule table on a team page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    /// The row's cells in document order.
    pub cells: Vec<Cell>,
}

/// A single table cell: its collapsed text and the first link target, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell text with whitespace runs collapsed to single spaces.
    pub text: String,
    /// `href` of the first anchor inside the cell.
    pub link: Option<String>,
}

impl Document {
    /// Wraps fetched markup together with the URL it came from.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self { url: url.into(), html: html.into() }
    }

    /// URL this document was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// First non-empty bold text in the page's table region.
    ///
    /// Both organization and team pages carry the entity's display name as
    /// the first `<b>` inside the header table.
    pub fn first_bold_text(&self) -> Option<String> {
        let doc = Html::parse_document(&self.html);
        let selector = Selector::parse("td b").ok()?;
        doc.select(&selector)
            .map(|el| collapse_whitespace(el.text()))
            .find(|text| !text.is_empty())
    }

    /// The `id` query parameter of every link whose target starts with
    /// `path_prefix`, in document order. Links without a parseable `id` are
    /// skipped.
    pub fn linked_ids(&self, path_prefix: &str) -> Vec<u32> {
        let doc = Html::parse_document(&self.html);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };
        doc.select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .filter(|href| href.starts_with(path_prefix))
            .filter_map(id_query_param)
            .collect()
    }

    /// The schedule table rows of a team page: every `<tr>` carrying one of
    /// the background colors the site uses for match rows.
    pub fn schedule_rows(&self) -> Vec<ScheduleRow> {
        let doc = Html::parse_document(&self.html);
        let (Ok(rows), Ok(cells), Ok(anchors)) = (
            Selector::parse("tr"),
            Selector::parse("td"),
            Selector::parse("a[href]"),
        ) else {
            return Vec::new();
        };

        doc.select(&rows)
            .filter(|row| {
                row.value()
                    .attr("bgcolor")
                    .is_some_and(|color| SCHEDULE_ROW_COLORS.contains(&color))
            })
            .map(|row| ScheduleRow {
                cells: row
                    .select(&cells)
                    .map(|cell| Cell {
                        text: collapse_whitespace(cell.text()),
                        link: cell
                            .select(&anchors)
                            .next()
                            .and_then(|a| a.value().attr("href"))
                            .map(str::to_string),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Extracts the `id` query parameter from a (possibly relative) link target.
pub(crate) fn id_query_param(href: &str) -> Option<u32> {
    let (_, query) = href.split_once('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .and_then(|(_, value)| value.parse().ok())
}

fn collapse_whitespace<'a>(text: impl Iterator<Item = &'a str>) -> String {
    text.collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}
