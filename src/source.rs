//! Where roll weights come from.

use crate::error::InputError;
use crate::items::ItemSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// A finite, restartable sequence of weights. Every call reads it afresh.
pub trait ItemSource {
    fn weights(&self) -> Result<Vec<f64>, InputError>;

    /// Reads the weights and validates them.
    fn items(&self) -> Result<ItemSet, InputError> {
        ItemSet::new(self.weights()?)
    }
}

/// A delimited text file with one roll per row.
///
/// Comma, semicolon, tab and whitespace separated files are accepted. If the
/// first data row is not numeric it is taken as a header and the column named
/// like `column` (case-insensitive) is read, otherwise the first column.
/// Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone)]
pub struct WeightFile {
    path: PathBuf,
    column: String,
}

impl WeightFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            column: "weight".to_string(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}

impl ItemSource for WeightFile {
    fn weights(&self) -> Result<Vec<f64>, InputError> {
        let file = File::open(&self.path)?;
        parse_weights(BufReader::new(file), &self.column)
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    let fields: Vec<&str> = if line.contains(';') {
        line.split(';').collect()
    } else if line.contains(',') {
        line.split(',').collect()
    } else if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    };
    fields.into_iter().map(str::trim).collect()
}

/// Reads weights from delimited text. See [`WeightFile`] for the format.
pub fn parse_weights<R: BufRead>(reader: R, column: &str) -> Result<Vec<f64>, InputError> {
    let mut weights = Vec::new();
    let mut col_index: Option<usize> = None;

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields = split_fields(trimmed);

        let idx = match col_index {
            Some(idx) => idx,
            None => {
                let is_header = fields.iter().all(|f| f.parse::<f64>().is_err());
                if is_header {
                    let idx = fields
                        .iter()
                        .position(|f| f.eq_ignore_ascii_case(column))
                        .ok_or_else(|| InputError::MissingColumn(column.to_string()))?;
                    col_index = Some(idx);
                    continue;
                }
                col_index = Some(0);
                0
            }
        };

        let token = fields.get(idx).copied().unwrap_or("");
        let weight = token.parse::<f64>().map_err(|_| InputError::Parse {
            line: n + 1,
            token: token.to_string(),
        })?;
        weights.push(weight);
    }

    Ok(weights)
}

/// Weights given inline, e.g. on the command line.
///
/// Each entry is either a single weight (`"12.5"`) or `WxN`, meaning `N` rolls
/// of weight `W` (`"10x3"` is `[10, 10, 10]`).
#[derive(Debug, Clone)]
pub struct Shorthand {
    entries: Vec<String>,
}

impl Shorthand {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }
}

impl ItemSource for Shorthand {
    fn weights(&self) -> Result<Vec<f64>, InputError> {
        parse_shorthand(&self.entries)
    }
}

/// Expands shorthand entries. Parse errors report the 1-based entry number
/// as the line.
pub fn parse_shorthand(entries: &[String]) -> Result<Vec<f64>, InputError> {
    let mut result = Vec::new();

    for (n, entry) in entries.iter().enumerate() {
        let parse_error = || InputError::Parse {
            line: n + 1,
            token: entry.clone(),
        };
        if let Some((weight_str, count_str)) = entry.split_once('x') {
            let weight: f64 = weight_str.trim().parse().map_err(|_| parse_error())?;
            let count: usize = count_str.trim().parse().map_err(|_| parse_error())?;
            result.extend(std::iter::repeat_n(weight, count));
        } else {
            result.push(entry.trim().parse().map_err(|_| parse_error())?);
        }
    }

    Ok(result)
}
