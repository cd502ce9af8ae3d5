//! Field-level encoding shared by every CSV record type.
//!
//! Each line holds one record with a fixed number of fields in a fixed
//! order. Integers are written in decimal, floats with two decimals,
//! timestamps as epoch seconds and flags as `0`/`1`.

use chrono::{DateTime, TimeZone, Utc};
use csv::StringRecord;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::Record;

/// Why a persisted line could not be turned into a record
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("expected {expected} fields, found {found}")]
    WrongFieldCount { expected: usize, found: usize },
    #[error("invalid {field} '{value}': {message}")]
    Invalid {
        field: &'static str,
        value: String,
        message: String,
    },
}

/// A record type with a fixed-arity CSV line representation
pub trait CsvRecord: Record + Sized {
    /// File name inside the data directory
    const FILE_NAME: &'static str;
    /// Number of fields on every line
    const FIELD_COUNT: usize;

    /// Fields in file order
    fn to_fields(&self) -> Vec<String>;

    /// Parse one line. The field count has not been checked yet.
    fn from_fields(record: &StringRecord) -> Result<Self, FieldError>;
}

pub fn format_float(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.timestamp().to_string()
}

pub fn format_flag(value: bool) -> String {
    let flag = if value { "1" } else { "0" };
    flag.to_string()
}

/// Sequential, typed access to the fields of one line
pub struct FieldReader<'r> {
    record: &'r StringRecord,
    index: usize,
}

impl<'r> FieldReader<'r> {
    /// Check the arity and start reading at the first field
    pub fn new(record: &'r StringRecord, expected: usize) -> Result<Self, FieldError> {
        if record.len() != expected {
            return Err(FieldError::WrongFieldCount {
                expected,
                found: record.len(),
            });
        }
        Ok(Self { record, index: 0 })
    }

    fn next_raw(&mut self) -> &'r str {
        let value = self.record.get(self.index).unwrap_or("");
        self.index += 1;
        value
    }

    /// Free text, kept verbatim
    pub fn text(&mut self) -> String {
        self.next_raw().to_string()
    }

    /// Any `FromStr` value; surrounding whitespace is ignored
    pub fn parse<T>(&mut self, field: &'static str) -> Result<T, FieldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.next_raw();
        raw.trim().parse::<T>().map_err(|e| FieldError::Invalid {
            field,
            value: raw.to_string(),
            message: e.to_string(),
        })
    }

    pub fn int(&mut self, field: &'static str) -> Result<i32, FieldError> {
        self.parse::<i32>(field)
    }

    pub fn float(&mut self, field: &'static str) -> Result<f64, FieldError> {
        self.parse::<f64>(field)
    }

    /// Epoch seconds
    pub fn timestamp(&mut self, field: &'static str) -> Result<DateTime<Utc>, FieldError> {
        let raw = self.next_raw();
        let invalid = |message: &str| FieldError::Invalid {
            field,
            value: raw.to_string(),
            message: message.to_string(),
        };
        let seconds = raw
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(&e.to_string()))?;
        Utc.timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| invalid("timestamp out of range"))
    }

    /// Integer flag; any non-zero value is true
    pub fn flag(&mut self, field: &'static str) -> Result<bool, FieldError> {
        Ok(self.parse::<i64>(field)? != 0)
    }
}
