//! This module contains the table logic for the application.
//!
//! The main entry point is the [`Table`] struct which represents a table built from a header and
//! rows of cells. List commands convert their results into a table for the text output format.
use std::{fmt::Display, iter};

/// Table representation.
///
/// A table is a collection of rows and columns.
///
/// The table is printed using the [`Display`] trait with fixed-width,
/// left-aligned columns and no border characters.
pub struct Table {
    /// Header of the table.
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Column definition.
///
/// A column is a tuple of a name and a function to get the value of the column for a given item.
pub type TableColumn<S, T> = (S, fn(&T) -> String);

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Create a new table from an iterator of items.
    ///
    /// # Arguments
    ///
    /// * `iter` - The iterator of items.
    /// * `columns` - The columns of the table.
    pub fn from_iter<'a, S, Iter, Item>(iter: Iter, columns: &[TableColumn<S, Item>]) -> Self
    where
        S: Display,
        Iter: IntoIterator<Item = &'a Item>,
        Item: 'a,
    {
        let iter = iter.into_iter();

        // Create the header from the column names.
        let header = columns.iter().map(|(name, _)| name.to_string()).collect();

        // Create the rows by applying every column function to every item.
        let rows = iter
            .map(|item| columns.iter().map(|(_, f)| f(item)).collect())
            .collect();

        Self::new(header, rows)
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // calculate the max width of each column
        // combine the header and rows into a single iterator
        // then get the length of each cell + 4 (for the padding)
        let max_column_widths: Vec<usize> = iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|row| row.iter().map(|cell| cell.len() + 4).collect())
            .max()
            .unwrap_or_default();

        for row in iter::once(&self.header).chain(self.rows.iter()) {
            // print the cells with fixed widths
            for (cell, width) in row.iter().zip(max_column_widths.iter()) {
                write!(f, "{:<width$}", cell, width = width)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
