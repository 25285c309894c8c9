use async_trait::async_trait;
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::{read_location, TableSource};
use crate::domain::{Cell, Table};
use crate::error::{EtlError, Result};

/// Cells in extracted PDF text are separated by tabs or runs of 2+ spaces
static CELL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t+|\s{2,}").expect("cell separator pattern is valid"));

/// Reads a table printed across the pages of a PDF document
pub struct PdfTableSource {
    location: String,
}

impl PdfTableSource {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

fn split_cells(line: &str) -> Vec<&str> {
    CELL_SEPARATOR.split(line.trim()).collect()
}

/// Turn extracted PDF text into a table.
///
/// The first line with at least two cells is the header. Header lines
/// repeated on later pages are skipped, as are lines whose cell count
/// doesn't match the header.
pub fn parse_pdf_text(text: &str) -> Result<Table> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let header = lines
        .by_ref()
        .map(split_cells)
        .find(|cells| cells.len() >= 2)
        .ok_or_else(|| EtlError::Source {
            source_name: "pdf".to_string(),
            message: "no table header found in extracted text".to_string(),
        })?;

    let mut table = Table::new(header.iter().copied());
    let mut skipped = 0usize;
    for line in lines {
        let cells = split_cells(line);
        if cells == header {
            continue;
        }
        if cells.len() != header.len() {
            skipped += 1;
            continue;
        }
        let row = cells
            .into_iter()
            .map(|cell| if cell.is_empty() { Cell::Null } else { Cell::text(cell) })
            .collect();
        table.push_row(row)?;
    }

    if skipped > 0 {
        warn!(skipped, "Skipped PDF lines that don't match the table header");
    }
    Ok(table)
}

#[async_trait]
impl TableSource for PdfTableSource {
    async fn fetch(&self) -> Result<Table> {
        let bytes = read_location(&self.location).await?;
        let document = Document::load_mem(&bytes)?;

        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        let text = document.extract_text(&pages)?;
        debug!(pages = pages.len(), chars = text.len(), "Extracted PDF text");

        parse_pdf_text(&text)
    }

    fn describe(&self) -> String {
        format!("pdf {}", self.location)
    }
}
