use chrono::NaiveDateTime;
use std::fmt;

/// One spreadsheet cell, as loosely typed as the workbook stores it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// An error cell such as `#N/A` or `#DIV/0!`.
    Error(String),
}

impl Cell {
    /// Empty cells, whitespace-only text and error cells all count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty | Cell::Error(_) => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::DateTime(dt) => write!(f, "{}", dt),
            Cell::Error(e) => f.write_str(e),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

/// One data row and the 1-based sheet row it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names, from the header row of the sheet (trimmed).
    pub headers: Vec<String>,
    /// Data rows, one `Cell` per header. Short rows are padded with `Cell::Empty`.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.as_ref().trim().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row directly below the previous one (the first data row is sheet row 2).
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        let number = self.rows.last().map_or(2, |r| r.number + 1);
        self.push_row_at(number, cells);
    }

    pub fn push_row_at(&mut self, number: usize, mut cells: Vec<Cell>) {
        if cells.len() < self.headers.len() {
            cells.resize(self.headers.len(), Cell::Empty);
        }
        self.rows.push(RawRow { number, cells });
    }

    /// Position of `name` among the headers, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}
