//! File-backed tabular store.
//!
//! The workbook is a JSON file holding an ordered column list and one
//! string-cell map per row. Row indexes mirror a spreadsheet: the header
//! is row 1, the first data row is row 2, and indexes stay stable for the
//! lifetime of the file so result columns land back on the row they came
//! from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result columns appended to the provisioning sheet on first use.
pub const RESULT_COLUMNS: [&str; 5] = [
    "customerId",
    "subscriptionId",
    "currentPlan",
    "currentStatus",
    "trialEndTime",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workbook not found: {0}")]
    Missing(PathBuf),

    #[error("row {0} is out of range")]
    RowOutOfRange(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed workbook: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
}

/// One data row with its stable sheet index.
#[derive(Debug, Clone)]
pub struct Row {
    pub index: usize,
    cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new(index: usize, cells: BTreeMap<String, String>) -> Self {
        Self { index, cells }
    }

    /// Trimmed cell value; missing columns read as empty.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(|v| v.trim()).unwrap_or("")
    }
}

#[derive(Debug)]
pub struct SheetStore {
    path: PathBuf,
    sheet: Sheet,
}

impl SheetStore {
    /// Open an existing workbook. A missing file is an operator mistake,
    /// not something to silently create.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(StoreError::Missing(path));
        }
        let text = std::fs::read_to_string(&path)?;
        let sheet: Sheet = serde_json::from_str(&text)?;
        Ok(Self { path, sheet })
    }

    /// Create a workbook at `path` with the given content. Used by tests
    /// and by the SKU map seeding path.
    pub fn create<P: AsRef<Path>>(path: P, sheet: Sheet) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            sheet,
        };
        store.save()?;
        Ok(store)
    }

    pub fn columns(&self) -> &[String] {
        &self.sheet.columns
    }

    /// All data rows with their sheet indexes (first data row is 2).
    pub fn rows(&self) -> Vec<Row> {
        self.sheet
            .rows
            .iter()
            .enumerate()
            .map(|(i, cells)| Row::new(i + 2, cells.clone()))
            .collect()
    }

    /// Append any missing columns, preserving existing ones. Idempotent:
    /// re-running with the same names changes nothing.
    pub fn ensure_columns(&mut self, names: &[&str]) {
        for name in names {
            if !self.sheet.columns.iter().any(|c| c == name) {
                self.sheet.columns.push((*name).to_string());
            }
        }
    }

    /// Merge named fields into one row. Fields without a matching column
    /// are ignored; cells not named in the patch keep their values.
    pub fn write_row(&mut self, index: usize, patch: &[(&str, String)]) -> Result<(), StoreError> {
        let slot = index
            .checked_sub(2)
            .and_then(|i| self.sheet.rows.get_mut(i))
            .ok_or(StoreError::RowOutOfRange(index))?;
        for (column, value) in patch {
            if self.sheet.columns.iter().any(|c| c == column) {
                slot.insert((*column).to_string(), value.clone());
            }
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.sheet)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}
