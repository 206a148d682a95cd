use thiserror::Error;

use crate::column::Column;
use crate::page::Page;

/// A header cell with its computed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: Column,
    pub title: &'static str,
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The row builder produced a row without a cell for a displayed column.
    #[error("row {row} has no value for column \"{column}\"")]
    MissingCell { column: Column, row: usize },
}

/// What a panel displays for one page and one column set.
///
/// `rows[i]` and `urls[i]` always describe the same pull request, in fetch
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableLayout {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<String>>,
    pub urls: Vec<String>,
}

impl TableLayout {
    /// Lay out `page` for `columns`, in the order given.
    ///
    /// Each width is the page's widest cell for that column clamped to the
    /// column's bounds, so an empty page yields minimum widths.
    pub fn compute(page: &Page, columns: &[Column]) -> Result<Self, LayoutError> {
        let headers = columns
            .iter()
            .map(|&column| HeaderCell {
                column,
                title: column.header(),
                width: column.clamp_width(page.column_width(column)),
            })
            .collect();

        let mut rows = Vec::with_capacity(page.len());
        let mut urls = Vec::with_capacity(page.len());
        for (idx, row) in page.rows().iter().enumerate() {
            let cells = columns
                .iter()
                .map(|&column| {
                    row.cell(column)
                        .map(str::to_owned)
                        .ok_or(LayoutError::MissingCell { column, row: idx })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
            urls.push(row.url().to_owned());
        }

        Ok(Self {
            headers,
            rows,
            urls,
        })
    }

    /// Headers at minimum width and no rows.
    pub fn empty(columns: &[Column]) -> Self {
        Self {
            headers: columns
                .iter()
                .map(|&column| HeaderCell {
                    column,
                    title: column.header(),
                    width: column.min_width(),
                })
                .collect(),
            rows: Vec::new(),
            urls: Vec::new(),
        }
    }

    /// URL of the row at `idx`, if any.
    pub fn url_at(&self, idx: usize) -> Option<&str> {
        self.urls.get(idx).map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn widths(&self) -> Vec<usize> {
        self.headers.iter().map(|h| h.width).collect()
    }
}
