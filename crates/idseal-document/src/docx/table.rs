// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WordprocessingML tables — a streaming `quick-xml` pass over the main
// document part that keeps only the body-level `w:tbl` elements.
//
// Grid model:
//   - a `w:tc` with `w:gridSpan` occupies that many grid columns;
//   - a `w:tc` with a bare `w:vMerge` (or val="continue") continues the cell
//     above it in the same grid column;
//   - cell text is the cell's own paragraphs joined by '\n'. Nested tables
//     are skipped entirely.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// How a cell takes part in a vertical merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VMerge {
    #[default]
    None,
    Restart,
    Continue,
}

/// One `w:tc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub grid_span: usize,
    pub v_merge: VMerge,
}

/// One `w:tr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// The cell covering grid column `column`, honouring `w:gridSpan`.
    pub fn cell_at(&self, column: usize) -> Option<&Cell> {
        let mut start: usize = 0;
        for cell in &self.cells {
            let end = start.saturating_add(cell.grid_span.max(1));
            if column < end {
                return Some(cell);
            }
            start = end;
        }
        None
    }

    /// Number of grid columns this row spans, saturating at `usize::MAX`.
    pub fn grid_width(&self) -> usize {
        self.cells
            .iter()
            .fold(0usize, |width, c| width.saturating_add(c.grid_span.max(1)))
    }
}

/// A body-level table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Number of `w:gridCol` entries in `w:tblGrid`.
    pub grid_columns: usize,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Declared grid width, or the widest row when the grid is missing.
    pub fn column_count(&self) -> usize {
        let widest = self.rows.iter().map(Row::grid_width).max().unwrap_or(0);
        self.grid_columns.max(widest)
    }

    /// Text of the cell at (`row`, `column`), both zero-based grid
    /// coordinates. Vertically merged continuation cells resolve to the
    /// cell that started the merge.
    pub fn cell_text(&self, row: usize, column: usize) -> Option<&str> {
        let mut row_index = row;
        loop {
            let cell = self.rows.get(row_index)?.cell_at(column)?;
            match cell.v_merge {
                VMerge::Continue if row_index > 0 => row_index -= 1,
                _ => return Some(&cell.text),
            }
        }
    }
}

/// Parse every body-level table out of a `word/document.xml` string, in
/// document order.
pub fn parse_tables(xml: &str) -> quick_xml::Result<Vec<Table>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut tables = Vec::new();
    let mut builder: Option<TableBuilder> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = element.local_name().as_ref().to_vec();
                let parent = stack.last().map(Vec::as_slice);
                match builder.as_mut() {
                    Some(table) => table.open(&name, parent, &element)?,
                    None if name == b"tbl" && parent == Some(b"body".as_slice()) => {
                        builder = Some(TableBuilder::default());
                    }
                    None => {}
                }
                stack.push(name);
            }
            Event::Empty(element) => {
                if let Some(table) = builder.as_mut() {
                    let name = element.local_name();
                    let parent = stack.last().map(Vec::as_slice);
                    table.open(name.as_ref(), parent, &element)?;
                    // An empty element closes itself; a self-closed top-level
                    // `w:tbl` cannot occur inside an open table.
                    table.close(name.as_ref());
                }
            }
            Event::End(element) => {
                stack.pop();
                let finished = match builder.as_mut() {
                    Some(table) => table.close(element.local_name().as_ref()),
                    None => false,
                };
                if finished && let Some(table) = builder.take() {
                    tables.push(table.finish());
                }
            }
            Event::Text(text) => {
                if let Some(table) = builder.as_mut()
                    && stack.last().map(Vec::as_slice) == Some(b"t".as_slice())
                {
                    table.push_text(&text.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(tables)
}

struct CellBuilder {
    paragraphs: Vec<String>,
    grid_span: usize,
    v_merge: VMerge,
}

impl Default for CellBuilder {
    fn default() -> Self {
        Self {
            paragraphs: Vec::new(),
            grid_span: 1,
            v_merge: VMerge::None,
        }
    }
}

impl CellBuilder {
    fn finish(self) -> Cell {
        Cell {
            text: self.paragraphs.join("\n"),
            grid_span: self.grid_span,
            v_merge: self.v_merge,
        }
    }
}

/// Accumulates one body-level table while its events stream past.
#[derive(Default)]
struct TableBuilder {
    table: Table,
    /// Depth of tables nested inside this one; their content is ignored.
    nested: usize,
    row: Option<Row>,
    cell: Option<CellBuilder>,
}

impl TableBuilder {
    fn open(
        &mut self,
        name: &[u8],
        parent: Option<&[u8]>,
        element: &BytesStart<'_>,
    ) -> quick_xml::Result<()> {
        if self.nested > 0 {
            if name == b"tbl" {
                self.nested += 1;
            }
            return Ok(());
        }

        match name {
            b"tbl" => self.nested += 1,
            b"gridCol" => self.table.grid_columns += 1,
            b"tr" => self.row = Some(Row::default()),
            b"tc" => self.cell = Some(CellBuilder::default()),
            b"gridSpan" => {
                if let Some(cell) = self.cell.as_mut()
                    && let Some(value) = attribute(element, b"val")?
                {
                    cell.grid_span = value.trim().parse().unwrap_or(1).max(1);
                }
            }
            b"vMerge" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.v_merge = match attribute(element, b"val")?.as_deref() {
                        Some("restart") => VMerge::Restart,
                        _ => VMerge::Continue,
                    };
                }
            }
            b"p" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.paragraphs.push(String::new());
                }
            }
            b"tab" if parent == Some(b"r".as_slice()) => self.push_text("\t"),
            b"br" | b"cr" if parent == Some(b"r".as_slice()) => self.push_text("\n"),
            _ => {}
        }
        Ok(())
    }

    /// Returns `true` when `name` closes the table itself.
    fn close(&mut self, name: &[u8]) -> bool {
        if name == b"tbl" {
            if self.nested == 0 {
                return true;
            }
            self.nested -= 1;
            return false;
        }
        if self.nested > 0 {
            return false;
        }

        match name {
            b"tc" => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.cells.push(cell.finish());
                }
            }
            b"tr" => {
                if let Some(row) = self.row.take() {
                    self.table.rows.push(row);
                }
            }
            _ => {}
        }
        false
    }

    fn push_text(&mut self, text: &str) {
        if self.nested > 0 {
            return;
        }
        if let Some(cell) = self.cell.as_mut() {
            match cell.paragraphs.last_mut() {
                Some(paragraph) => paragraph.push_str(text),
                None => cell.paragraphs.push(text.to_string()),
            }
        }
    }

    fn finish(self) -> Table {
        self.table
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> quick_xml::Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
