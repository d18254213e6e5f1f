//! Built-in expressions over numeric columns.
//!
//! Non-numeric cells read as NaN and booleans as 0 or 1, as in
//! `Column::to_f64_vec`.

use crate::expression::Expression;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use prism_core::{Error, Result};
use prism_source::{ColumnDataSource, Dependencies};

fn column_values(source: &ColumnDataSource, field: &str) -> Result<Vec<f64>> {
    source
        .get_column(field)
        .map(|column| column.to_f64_vec())
        .ok_or_else(|| Error::column_not_found(field))
}

// ========== CumSum ==========

/// Running total of a column.
///
/// With `include_zero` the result starts at 0 and has one more element than
/// the column; otherwise it starts at the first value.
#[derive(Clone, Debug, PartialEq)]
pub struct CumSum {
    pub field: String,
    pub include_zero: bool,
}

impl CumSum {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            include_zero: false,
        }
    }

    pub fn include_zero(mut self, include_zero: bool) -> Self {
        self.include_zero = include_zero;
        self
    }
}

impl Expression for CumSum {
    type Output = Vec<f64>;

    fn dependencies(&self) -> Dependencies {
        Dependencies::columns([self.field.as_str()])
    }

    fn compute(&self, source: &ColumnDataSource) -> Result<Vec<f64>> {
        let values = column_values(source, &self.field)?;
        let mut result = Vec::with_capacity(values.len() + 1);
        let mut total = 0.0;
        if self.include_zero {
            result.push(total);
        }
        for v in values {
            total += v;
            result.push(total);
        }
        Ok(result)
    }
}

// ========== Stack ==========

/// Elementwise sum of several columns, one value per row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stack {
    pub fields: Vec<String>,
}

impl Stack {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Expression for Stack {
    type Output = Vec<f64>;

    fn dependencies(&self) -> Dependencies {
        Dependencies::Columns(self.fields.clone())
    }

    fn compute(&self, source: &ColumnDataSource) -> Result<Vec<f64>> {
        let len = source.len().unwrap_or(0);
        let mut result = vec![0.0; len];
        for field in &self.fields {
            let values = column_values(source, field)?;
            for (acc, v) in result.iter_mut().zip(values) {
                *acc += v;
            }
        }
        Ok(result)
    }
}

// ========== Minimum / Maximum ==========

/// Smallest value of a column, starting from `initial` (or +∞).
///
/// NaN cells are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimum {
    pub field: String,
    pub initial: Option<f64>,
}

impl Minimum {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            initial: None,
        }
    }

    pub fn initial(mut self, initial: f64) -> Self {
        self.initial = Some(initial);
        self
    }
}

impl Expression for Minimum {
    type Output = f64;

    fn dependencies(&self) -> Dependencies {
        Dependencies::columns([self.field.as_str()])
    }

    fn compute(&self, source: &ColumnDataSource) -> Result<f64> {
        let start = self.initial.unwrap_or(f64::INFINITY);
        let values = column_values(source, &self.field)?;
        Ok(values.into_iter().fold(start, |acc, v| if v < acc { v } else { acc }))
    }
}

/// Largest value of a column, starting from `initial` (or -∞).
///
/// NaN cells are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct Maximum {
    pub field: String,
    pub initial: Option<f64>,
}

impl Maximum {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            initial: None,
        }
    }

    pub fn initial(mut self, initial: f64) -> Self {
        self.initial = Some(initial);
        self
    }
}

impl Expression for Maximum {
    type Output = f64;

    fn dependencies(&self) -> Dependencies {
        Dependencies::columns([self.field.as_str()])
    }

    fn compute(&self, source: &ColumnDataSource) -> Result<f64> {
        let start = self.initial.unwrap_or(f64::NEG_INFINITY);
        let values = column_values(source, &self.field)?;
        Ok(values.into_iter().fold(start, |acc, v| if v > acc { v } else { acc }))
    }
}
