//! Decision table text parsing and the parsed grid.
//!
//! A [`Table`] owns the text it was parsed from and records every cell as
//! a span into that buffer, so cell access is allocation free. The grammar
//! lives in `table.pest`: rows are terminated by newline, carriage return
//! or NUL, and cells are separated by spaces, tabs or `=`, with the first
//! `=` of each row marking the boundary between criterion columns and data
//! columns.
//!
//! Shape rules enforced here:
//! * the table has at least one row (the header) and the boundary sits
//!   strictly inside it (`1 <= criteria < cols`);
//! * every row agrees with the header on column count and boundary
//!   position;
//! * every header criterion cell parses as a valid criterion.
//!
//! Querying, retrieval and verification live in [`crate::engine`]; the
//! expression cell cache and the optional evaluator handle are owned here
//! so that `parse` can reset them together with the grid.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use crate::criteria::Criteria;
use crate::datatype::Value;
use crate::error::{Result, TablematchError};
use crate::evaluate::Evaluator;

#[derive(Parser)]
#[grammar = "table.pest"] // relative to src
struct TableParser;

/// An immutable row-major grid of cells with a criteria/data split column.
/// Row 0 is the header; rows `1..rows-1` are data rows.
pub struct Table {
    buf: String,
    cells: Vec<Range<usize>>,
    rows: usize,
    cols: usize,
    criteria: usize,
    pub(crate) evaluator: Option<RefCell<Box<dyn Evaluator>>>,
    pub(crate) cache: RefCell<HashMap<(usize, usize), Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::assemble(None)
    }

    /// A table whose expression cells are delegated to `evaluator`.
    pub fn with_evaluator(evaluator: Box<dyn Evaluator>) -> Self {
        Self::assemble(Some(evaluator))
    }

    fn assemble(evaluator: Option<Box<dyn Evaluator>>) -> Self {
        Self {
            buf: String::new(),
            cells: Vec::new(),
            rows: 0,
            cols: 0,
            criteria: 0,
            evaluator: evaluator.map(RefCell::new),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Parses `text` into the grid, replacing any previous contents. This
    /// is a destructive reset: all slices returned by earlier calls are
    /// invalidated and the expression cache is dropped.
    pub fn parse(&mut self, text: impl Into<String>) -> Result<()> {
        self.buf = text.into();
        self.cells.clear();
        self.rows = 0;
        self.cols = 0;
        self.criteria = 0;
        self.cache.borrow_mut().clear();

        let mut cells: Vec<Range<usize>> = Vec::new();
        let mut rows = 0usize;
        let mut cols = 0usize;
        let mut criteria = 0usize;
        {
            let table = TableParser::parse(Rule::table, &self.buf)
                .map_err(|e| TablematchError::TableFormat(e.to_string()))?
                .next();
            let table = match table {
                Some(pair) => pair,
                None => return Err(TablematchError::TableFormat("empty table".to_owned())),
            };
            for row in table.into_inner() {
                if row.as_rule() != Rule::row {
                    continue;
                }
                let mut row_cells: Vec<Range<usize>> = Vec::new();
                let mut boundary: Option<usize> = None;
                for item in row.into_inner() {
                    match item.as_rule() {
                        Rule::cell => {
                            let span = item.as_span();
                            row_cells.push(span.start()..span.end());
                        }
                        Rule::boundary => {
                            // only the first `=` splits; later ones separate
                            if boundary.is_none() {
                                boundary = Some(row_cells.len());
                            }
                        }
                        _ => {}
                    }
                }
                if row_cells.is_empty() && boundary.is_none() {
                    continue; // blank line
                }
                let boundary = match boundary {
                    Some(b) => b,
                    None => {
                        return Err(TablematchError::TableFormat(format!(
                            "row {rows} has no `=` separator"
                        )))
                    }
                };
                if rows == 0 {
                    cols = row_cells.len();
                    criteria = boundary;
                    if criteria < 1 || criteria >= cols {
                        return Err(TablematchError::TableFormat(format!(
                            "header `=` at column {criteria} of {cols}"
                        )));
                    }
                } else {
                    if row_cells.len() != cols {
                        return Err(TablematchError::TableFormat(format!(
                            "row {rows} has {} columns, expected {cols}",
                            row_cells.len()
                        )));
                    }
                    if boundary != criteria {
                        return Err(TablematchError::TableFormat(format!(
                            "row {rows} has its `=` at column {boundary}, expected {criteria}"
                        )));
                    }
                }
                cells.extend(row_cells);
                rows += 1;
            }
        }
        if rows == 0 {
            return Err(TablematchError::TableFormat("empty table".to_owned()));
        }
        // criteria headers must be well formed before any query runs
        for j in 0..criteria {
            Criteria::new(&self.buf[cells[j].clone()]).map_err(|e| e.at(0, j))?;
        }
        self.cells = cells;
        self.rows = rows;
        self.cols = cols;
        self.criteria = criteria;
        debug!(rows, cols, criteria, "table parsed");
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Index of the first data column; columns `0..criteria()` are
    /// criterion columns.
    pub fn criteria(&self) -> usize {
        self.criteria
    }

    /// Cell text at `row`, `col` (0-based; row 0 is the header). Panics
    /// when out of range, like slice indexing.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.buf[self.cells[row * self.cols + col].clone()]
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Table {
    /// Column-aligned dump of the parsed grid.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut widths = vec![0usize; self.cols];
        for row in 0..self.rows {
            for col in 0..self.cols {
                widths[col] = widths[col].max(self.cell(row, col).len());
            }
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col == self.criteria {
                    write!(f, "= ")?;
                }
                write!(f, "{:width$} ", self.cell(row, col), width = widths[col])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
