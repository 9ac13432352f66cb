//! Row source - reads tabular records from a named workbook sheet
//!
//! The first row of the sheet is the header and supplies column names
//! as-is. Each following row becomes one [`Row`], an ordered mapping of
//! column name to cell value.

use indexmap::IndexMap;
use std::path::Path;

use crate::error::{DocmergeError, Result};

/// A single cell value, classified from the workbook's raw cell text
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    fn classify(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(number) = raw.parse::<f64>() {
            return CellValue::Number(number);
        }
        if raw.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }
        CellValue::Text(raw.to_string())
    }

    /// Canonical string form used for substitution and file names.
    ///
    /// Whole numbers render without a fractional part (`1024.0` → `"1024"`),
    /// empty cells render as the empty string.
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                // f64 keeps integers exact up to 2^53
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// One record of the sheet, one generated document per row
#[derive(Debug, Clone)]
pub struct Row {
    index: usize,
    values: IndexMap<String, CellValue>,
}

impl Row {
    pub(crate) fn from_values(index: usize, values: IndexMap<String, CellValue>) -> Self {
        Self { index, values }
    }

    /// 1-based data-row index (header row excluded)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// String form of a column's value; missing columns render as ""
    pub fn value_string(&self, column: &str) -> String {
        self.get(column).map(CellValue::render).unwrap_or_default()
    }
}

/// All rows of the configured sheet, read once up front
#[derive(Debug)]
pub struct RowSource {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RowSource {
    /// Open a workbook and read the named sheet.
    ///
    /// Fails with `DATA_SOURCE_ERROR` if the workbook cannot be read and
    /// `SHEET_NOT_FOUND` if the sheet does not exist. Rows whose cells are
    /// all empty are skipped (trailing styled-but-blank sheet rows).
    pub fn open(path: &Path, sheet_name: &str) -> Result<Self> {
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
            DocmergeError::DataSource(format!("failed to read '{}': {}", path.display(), e))
        })?;

        let sheet = book
            .get_sheet_by_name(sheet_name)
            .ok_or_else(|| DocmergeError::SheetNotFound(sheet_name.to_string()))?;

        let (max_col, max_row) = sheet.get_highest_column_and_row();
        if max_row == 0 {
            return Ok(Self {
                columns: Vec::new(),
                rows: Vec::new(),
            });
        }

        let columns: Vec<String> = (1..=max_col)
            .map(|col| sheet.get_value((col, 1)))
            .collect();

        let mut rows = Vec::new();
        for row_num in 2..=max_row {
            let mut values = IndexMap::new();
            for (col_idx, column) in columns.iter().enumerate() {
                let raw = sheet.get_value((col_idx as u32 + 1, row_num));
                values.insert(column.clone(), CellValue::classify(&raw));
            }
            if values.values().all(CellValue::is_empty) {
                continue;
            }
            let index = rows.len() + 1;
            rows.push(Row::from_values(index, values));
        }

        Ok(Self { columns, rows })
    }

    /// Header column names in sheet order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
