use iocraft::prelude::*;

use crate::layout::TableLayout;

/// Blank cells between adjacent columns.
const COLUMN_GAP: u32 = 1;

// ---------------------------------------------------------------------------
// Pre-rendered table data (all owned)
// ---------------------------------------------------------------------------

/// Pre-render table data into fully owned structures that can be passed
/// into the `element!` macro without lifetime issues.
pub struct RenderedTable {
    pub header_cells: Vec<HeaderCell>,
    pub body_rows: Vec<RenderedRow>,
    pub header_fg: Color,
    pub border_fg: Color,
    /// Message to display when there are no rows.
    pub empty_message: Option<String>,
}

pub struct HeaderCell {
    pub text: String,
    pub width: u32,
}

pub struct RenderedRow {
    pub key: usize,
    pub bg: Option<Color>,
    pub cells: Vec<RenderedCell>,
}

pub struct RenderedCell {
    pub text: String,
    pub width: u32,
}

/// Configuration for building a `RenderedTable`.
pub struct TableBuildConfig<'a> {
    pub layout: &'a TableLayout,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,
    /// Message to show when rows are empty.
    pub empty_message: Option<&'a str>,
}

impl RenderedTable {
    /// Build a `RenderedTable` from a configuration.
    pub fn build(cfg: &TableBuildConfig<'_>) -> Self {
        let layout = cfg.layout;
        let widths: Vec<u32> = layout
            .widths()
            .into_iter()
            .map(|w| u32::try_from(w).unwrap_or(u32::MAX).saturating_add(COLUMN_GAP))
            .collect();

        let header_cells: Vec<HeaderCell> = layout
            .headers
            .iter()
            .zip(widths.iter())
            .map(|(h, &width)| HeaderCell {
                text: h.title.to_owned(),
                width,
            })
            .collect();

        let rows = &layout.rows;
        let end = (cfg.scroll_offset + cfg.visible_rows).min(rows.len());
        let visible_slice = if cfg.scroll_offset < rows.len() {
            &rows[cfg.scroll_offset..end]
        } else {
            &[]
        };

        let body_rows: Vec<RenderedRow> = visible_slice
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let absolute_idx = cfg.scroll_offset + i;
                let bg = (absolute_idx == cfg.cursor).then_some(Color::DarkBlue);
                let cells = row
                    .iter()
                    .zip(widths.iter())
                    .map(|(text, &width)| RenderedCell {
                        text: text.clone(),
                        width,
                    })
                    .collect();
                RenderedRow {
                    key: absolute_idx,
                    bg,
                    cells,
                }
            })
            .collect();

        let empty_message = if rows.is_empty() {
            cfg.empty_message.map(String::from)
        } else {
            None
        };

        Self {
            header_cells,
            body_rows,
            header_fg: Color::White,
            border_fg: Color::DarkGrey,
            empty_message,
        }
    }
}

// ---------------------------------------------------------------------------
// ScrollableTable component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct ScrollableTableProps {
    /// Pre-rendered table data.
    pub table: Option<RenderedTable>,
}

#[component]
pub fn ScrollableTable(props: &mut ScrollableTableProps) -> impl Into<AnyElement<'static>> {
    let Some(table) = props.table.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(flex_direction: FlexDirection::Column, flex_grow: 1.0) {
            // Header row
            View {
                #(table.header_cells.into_iter().enumerate().map(|(i, hc)| {
                    element! {
                        View(key: i, width: hc.width) {
                            Text(
                                content: hc.text,
                                weight: Weight::Bold,
                                color: table.header_fg,
                                wrap: TextWrap::NoWrap,
                            )
                        }
                    }
                }))
            }

            // Empty-state message or body rows
            #(table.empty_message.into_iter().map(|msg| {
                element! {
                    View(padding_top: 1, padding_left: 2) {
                        Text(
                            content: msg,
                            color: table.border_fg,
                        )
                    }
                }
            }))
            #(table.body_rows.into_iter().map(|row| {
                element! {
                    View(key: row.key, background_color: row.bg) {
                        #(row.cells.into_iter().enumerate().map(|(ci, cell)| {
                            element! {
                                View(key: ci, width: cell.width) {
                                    Text(
                                        content: cell.text,
                                        wrap: TextWrap::NoWrap,
                                    )
                                }
                            }
                        }))
                    }
                }
            }))
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::page::{Page, Row};

    fn layout(n: usize) -> TableLayout {
        let rows = (0..n)
            .map(|i| {
                Row::new(format!("u{i}"))
                    .with_cell(Column::Title, format!("title {i}"))
                    .with_cell(Column::Author, "octocat")
            })
            .collect();
        TableLayout::compute(&Page::new(rows), &[Column::Title, Column::Author]).unwrap()
    }

    #[test]
    fn widths_include_gap() {
        let layout = layout(2);
        let table = RenderedTable::build(&TableBuildConfig {
            layout: &layout,
            cursor: 0,
            scroll_offset: 0,
            visible_rows: 10,
            empty_message: None,
        });
        let widths: Vec<u32> = table.header_cells.iter().map(|h| h.width).collect();
        assert_eq!(widths, vec![8, 8]);
        assert_eq!(table.header_cells[0].text, "Title");
    }

    #[test]
    fn only_visible_window_is_rendered() {
        let layout = layout(10);
        let table = RenderedTable::build(&TableBuildConfig {
            layout: &layout,
            cursor: 5,
            scroll_offset: 4,
            visible_rows: 3,
            empty_message: Some("nothing"),
        });
        let keys: Vec<usize> = table.body_rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![4, 5, 6]);
        assert!(table.body_rows[1].bg.is_some());
        assert!(table.body_rows[0].bg.is_none());
        assert_eq!(table.body_rows[1].cells[0].text, "title 5");
        assert!(table.empty_message.is_none());
    }

    #[test]
    fn empty_layout_shows_message() {
        let layout = TableLayout::empty(&[Column::Title]);
        let table = RenderedTable::build(&TableBuildConfig {
            layout: &layout,
            cursor: 0,
            scroll_offset: 0,
            visible_rows: 10,
            empty_message: Some("No pull requests"),
        });
        assert!(table.body_rows.is_empty());
        assert_eq!(table.empty_message.as_deref(), Some("No pull requests"));
    }
}
