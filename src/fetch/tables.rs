// src/fetch/tables.rs
use crate::fetch::{FetchError, TableKind};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// One season's worth of player rows for a single table kind.
/// Headers are what the page claims; duplicate labels can occur and are
/// resolved at merge time.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SeasonTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse the stats table out of a season page.
///
/// The page may carry several tables; the one we want is identified by the
/// columns it must have for `kind`, not by position. No table at all is
/// `NoDataFound`; tables present but none with the expected columns is
/// `SchemaDrift`, so upstream layout changes fail loudly instead of feeding
/// the pipeline the wrong data.
pub fn parse_season_table(
    html: &str,
    kind: TableKind,
    metric_col: &str,
    url: &str,
) -> Result<SeasonTable, FetchError> {
    let table_sel = Selector::parse("table").expect("CSS selector for tables should be valid");
    let row_sel = Selector::parse("tr").expect("CSS selector for rows should be valid");
    let cell_sel = Selector::parse("th, td").expect("CSS selector for cells should be valid");

    let doc = Html::parse_document(html);
    let required = kind.required_columns(metric_col);

    let mut first_parsed: Option<SeasonTable> = None;
    for table in doc.select(&table_sel) {
        let Some(parsed) = parse_table(table, &row_sel, &cell_sel) else {
            continue;
        };
        if required.iter().all(|c| parsed.column(c).is_some()) {
            debug!(url, kind = kind.slug(), rows = parsed.rows.len(), "parsed stats table");
            return Ok(parsed);
        }
        if first_parsed.is_none() {
            first_parsed = Some(parsed);
        }
    }

    match first_parsed {
        Some(t) => Err(FetchError::SchemaDrift {
            url: url.to_string(),
            missing: required
                .iter()
                .filter(|c| t.column(c).is_none())
                .map(|c| c.to_string())
                .collect(),
        }),
        None => Err(FetchError::NoDataFound {
            url: url.to_string(),
        }),
    }
}

/// One `<table>` element into headers + rows. The first non-empty row is the
/// header; repeated mid-table header rows (class "thead", or cells equal to
/// the header) are skipped. Short rows are padded so every row matches the
/// header width.
fn parse_table(table: ElementRef, row_sel: &Selector, cell_sel: &Selector) -> Option<SeasonTable> {
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for tr in table.select(row_sel) {
        let cells: Vec<String> = tr
            .select(cell_sel)
            .map(|c| c.text().collect::<String>().trim().to_string())
            .collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }

        if headers.is_empty() {
            for (i, h) in cells.iter().enumerate() {
                if cells[..i].contains(h) {
                    warn!(column = %h, "duplicate column label in table header");
                }
            }
            headers = cells;
            continue;
        }

        let class = tr.value().attr("class").unwrap_or_default();
        if class.split_whitespace().any(|c| c == "thead") || cells == headers {
            continue;
        }

        let mut row = cells;
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    if headers.is_empty() {
        return None;
    }
    Some(SeasonTable { headers, rows })
}
