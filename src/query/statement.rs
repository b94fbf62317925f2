//! SQL statement data container and dialect translation.
//!
//! BigQuery's SQL dialect has no driver-side parameter binding in this
//! connector; parameterized statements are rewritten into literal SQL before
//! submission. [`render`] performs that rewrite: it validates the leading
//! keyword, then substitutes each positional `?` placeholder with the
//! dialect-correct literal for the next parameter, consuming parameters
//! strictly left to right.
//!
//! Rendering is a pure function of its inputs. It never submits anything.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TranslateError;

/// The positional placeholder marker recognized in statement text.
pub const PLACEHOLDER: char = '?';

/// Statement kinds accepted by this connector.
///
/// BigQuery jobs submitted through this driver are restricted to the four
/// row-level statement forms; DDL and scripting statements are rejected
/// before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Classify a statement by its leading keyword.
    ///
    /// Leading/trailing whitespace is ignored and the keyword is matched
    /// case-insensitively. Returns `None` for any other keyword.
    pub fn classify(sql: &str) -> Option<Self> {
        let keyword = sql.trim().split_whitespace().next().unwrap_or("");
        if keyword.eq_ignore_ascii_case("SELECT") {
            Some(StatementKind::Select)
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            Some(StatementKind::Insert)
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            Some(StatementKind::Update)
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            Some(StatementKind::Delete)
        } else {
            None
        }
    }
}

/// One typed statement parameter.
///
/// A closed set of value kinds, each with exactly one literal rendering rule.
/// BigQuery is literal-syntax-sensitive: temporal values need their typed
/// literal prefix and text must be quoted with embedded quotes doubled.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// SQL NULL.
    Null,
    /// Boolean, rendered unquoted.
    Bool(bool),
    /// Integer, rendered unquoted.
    Int(i64),
    /// Floating point, rendered unquoted.
    Float(f64),
    /// Text, rendered single-quoted with `'` doubled.
    Text(String),
    /// Calendar date, rendered as `DATE '<ISO-8601 date>'`.
    Date(NaiveDate),
    /// Time of day, rendered as `TIME '<ISO-8601 time>'`.
    Time(NaiveTime),
    /// Date and time without zone, rendered as `TIMESTAMP '<ISO-8601>'`.
    Timestamp(NaiveDateTime),
    /// Date and time with a UTC offset, rendered as `TIMESTAMP '<RFC 3339>'`.
    TimestampTz(DateTime<FixedOffset>),
}

impl Parameter {
    /// Render this parameter as a BigQuery SQL literal.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Parameter::Null => "NULL".to_string(),
            Parameter::Bool(b) => b.to_string(),
            Parameter::Int(i) => i.to_string(),
            Parameter::Float(f) => f.to_string(),
            Parameter::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Parameter::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
            Parameter::Time(t) => format!("TIME '{}'", t.format("%H:%M:%S%.f")),
            Parameter::Timestamp(dt) => {
                format!("TIMESTAMP '{}'", dt.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
            Parameter::TimestampTz(dt) => format!("TIMESTAMP '{}'", dt.to_rfc3339()),
        }
    }
}

impl From<bool> for Parameter {
    fn from(v: bool) -> Self {
        Parameter::Bool(v)
    }
}

impl From<i32> for Parameter {
    fn from(v: i32) -> Self {
        Parameter::Int(i64::from(v))
    }
}

impl From<i64> for Parameter {
    fn from(v: i64) -> Self {
        Parameter::Int(v)
    }
}

impl From<f64> for Parameter {
    fn from(v: f64) -> Self {
        Parameter::Float(v)
    }
}

impl From<&str> for Parameter {
    fn from(v: &str) -> Self {
        Parameter::Text(v.to_string())
    }
}

impl From<String> for Parameter {
    fn from(v: String) -> Self {
        Parameter::Text(v)
    }
}

impl From<NaiveDate> for Parameter {
    fn from(v: NaiveDate) -> Self {
        Parameter::Date(v)
    }
}

impl From<NaiveTime> for Parameter {
    fn from(v: NaiveTime) -> Self {
        Parameter::Time(v)
    }
}

impl From<NaiveDateTime> for Parameter {
    fn from(v: NaiveDateTime) -> Self {
        Parameter::Timestamp(v)
    }
}

impl From<DateTime<FixedOffset>> for Parameter {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Parameter::TimestampTz(v)
    }
}

impl<T> From<Option<T>> for Parameter
where
    T: Into<Parameter>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(value) => value.into(),
            None => Parameter::Null,
        }
    }
}

/// Render a parameterized statement into literal BigQuery SQL.
///
/// The leading keyword must be one of SELECT, INSERT, UPDATE, DELETE
/// (case-insensitive, surrounding whitespace ignored). With no parameters the
/// statement text is returned unchanged. Otherwise every [`PLACEHOLDER`] is
/// replaced, left to right, with the literal rendering of the next parameter.
///
/// Parameters beyond the last placeholder are ignored; running out of
/// parameters is an error.
///
/// # Errors
///
/// [`TranslateError::UnsupportedStatement`] for a disallowed leading keyword,
/// [`TranslateError::ParameterUnderflow`] when the parameter sequence is
/// exhausted before the last placeholder.
pub fn render(sql: &str, parameters: &[Parameter]) -> Result<String, TranslateError> {
    if StatementKind::classify(sql).is_none() {
        let keyword = sql.trim().split_whitespace().next().unwrap_or("").to_string();
        return Err(TranslateError::UnsupportedStatement { keyword });
    }

    if parameters.is_empty() {
        return Ok(sql.to_string());
    }

    let mut remaining = parameters.iter();
    let mut rendered = String::with_capacity(sql.len());
    for ch in sql.chars() {
        if ch == PLACEHOLDER {
            let value = remaining
                .next()
                .ok_or(TranslateError::ParameterUnderflow {
                    supplied: parameters.len(),
                })?;
            rendered.push_str(&value.to_sql_literal());
        } else {
            rendered.push(ch);
        }
    }
    Ok(rendered)
}

/// SQL statement data container.
///
/// A statement is pure data: the SQL text plus its bound parameters.
/// Execution is performed by [`Cursor`](crate::query::cursor::Cursor).
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    parameters: Vec<Parameter>,
}

impl Statement {
    /// Create a statement with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    /// Create a statement with the given parameters.
    pub fn with_parameters(sql: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    /// Append one parameter, consuming in placeholder order.
    pub fn bind(mut self, parameter: impl Into<Parameter>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// The raw statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Render this statement into literal SQL.
    ///
    /// # Errors
    ///
    /// See [`render`].
    pub fn render(&self) -> Result<String, TranslateError> {
        render(&self.sql, &self.parameters)
    }
}
