//! Row decoding helpers shared by the query modules.

use std::{fmt::Display, str::FromStr};

use jiff::Timestamp;
use rusqlite::{types::Type, Row};

/// Reads a text column and parses it with `FromStr`.
pub(crate) fn parse_column<T>(row: &Row, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let text: String = row.get(index)?;
    text.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("Invalid value '{text}': {e}").into(),
        )
    })
}

/// Reads an RFC 3339 timestamp column.
pub(crate) fn timestamp(row: &Row, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Reads a nullable RFC 3339 timestamp column.
pub(crate) fn optional_timestamp(row: &Row, index: usize) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(index)?
        .map(|text| {
            text.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Reads an unsigned integer column stored as SQLite INTEGER.
pub(crate) fn unsigned(row: &Row, index: usize) -> rusqlite::Result<u32> {
    let value: i64 = row.get(index)?;
    u32::try_from(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(e))
    })
}
