//! Tabular step arguments

use crate::error::{DomainError, DomainResult};

/// A data table attached to a step, as rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Creates a table from rows of cells.
    #[must_use]
    pub fn new<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Interprets the table as `(key, value)` pairs.
    ///
    /// Every row is checked before any pair is returned, so a caller
    /// applying the pairs never sees a partially valid table.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedTable`] for the first row that does
    /// not have exactly two cells.
    pub fn pairs(&self) -> DomainResult<Vec<(&str, &str)>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| match row.as_slice() {
                [key, value] => Ok((key.as_str(), value.as_str())),
                _ => Err(DomainError::MalformedTable {
                    row: index,
                    expected: 2,
                    actual: row.len(),
                }),
            })
            .collect()
    }
}
