//! Encoding and decoding helpers between section column maps and the values
//! stored in SQLite columns.
//!
//! Section records travel as JSON column maps (see
//! [`SectionRecord::to_columns`]). Numbers map to `INTEGER` or `REAL`, booleans
//! to `0`/`1`, strings to `TEXT`. Calendar dates are stored and read back as
//! `YYYY-MM-DD`. Stock timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, NaiveDate, Utc};
use research_core::{
  section::{SectionKind, SectionRecord},
  stock::Stock,
};
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Map, Number, Value};

use crate::{Error, Result};

// ─── Tables ──────────────────────────────────────────────────────────────────

pub fn table_name(kind: SectionKind) -> &'static str {
  match kind {
    SectionKind::BalanceSheet => "research_balance_sheet",
    SectionKind::Details => "research_stock_details",
    SectionKind::FinancialRatios => "research_financial_ratios",
    SectionKind::IncomeStatement => "research_income_statement",
    SectionKind::KeyMetrics => "research_key_metrics",
    SectionKind::PerformanceMetrics => "research_performance_metrics",
    SectionKind::RdInvestments => "research_rd_investments",
    SectionKind::RevenueMix => "research_revenue_mix",
    SectionKind::ShareholdingPattern => "research_shareholding_pattern",
  }
}

/// Bookkeeping columns present on every section table but not part of the
/// record itself.
pub const META_COLUMNS: [&str; 4] = ["id", "stock_id", "created_at", "updated_at"];

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Reduce a stored date (possibly carrying a time component) to `YYYY-MM-DD`.
pub fn normalize_date(s: &str) -> Result<String> {
  let head = s.get(..10).unwrap_or(s);
  NaiveDate::parse_from_str(head, "%Y-%m-%d")
    .map(|d| d.format("%Y-%m-%d").to_string())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Values ──────────────────────────────────────────────────────────────────

fn to_sql(kind: SectionKind, column: &str, value: Value) -> Result<SqlValue> {
  Ok(match value {
    Value::Null => SqlValue::Null,
    Value::Bool(b) => SqlValue::Integer(i64::from(b)),
    Value::Number(n) => match n.as_i64() {
      Some(i) => SqlValue::Integer(i),
      None => n
        .as_f64()
        .map(SqlValue::Real)
        .ok_or_else(|| Error::UnsupportedValue(column.to_owned()))?,
    },
    Value::String(s) if kind.date_columns().contains(&column) => {
      SqlValue::Text(normalize_date(&s)?)
    }
    Value::String(s) => SqlValue::Text(s),
    Value::Array(_) | Value::Object(_) => {
      return Err(Error::UnsupportedValue(column.to_owned()));
    }
  })
}

fn from_sql(kind: SectionKind, column: &str, value: ValueRef<'_>) -> Result<Value> {
  Ok(match value {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::from(i),
    ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
    ValueRef::Text(bytes) => {
      let text = String::from_utf8_lossy(bytes);
      if kind.date_columns().contains(&column) {
        Value::String(normalize_date(&text)?)
      } else {
        Value::String(text.into_owned())
      }
    }
    ValueRef::Blob(_) => return Err(Error::UnsupportedValue(column.to_owned())),
  })
}

/// Split a record into `(column, value)` pairs ready for binding.
pub fn encode_columns(record: &SectionRecord) -> Result<Vec<(String, SqlValue)>> {
  let kind = record.kind();
  record
    .to_columns()?
    .into_iter()
    .map(|(column, value)| {
      let sql = to_sql(kind, &column, value)?;
      Ok((column, sql))
    })
    .collect()
}

/// Read a full `SELECT *` row back into `(id, record)`.
pub fn decode_row(kind: SectionKind, row: &rusqlite::Row<'_>) -> Result<(i64, SectionRecord)> {
  let id: i64 = row.get("id")?;
  let mut columns = Map::new();
  for (index, name) in row.as_ref().column_names().into_iter().enumerate() {
    if META_COLUMNS.contains(&name) {
      continue;
    }
    let value = from_sql(kind, name, row.get_ref(index)?)?;
    columns.insert(name.to_owned(), value);
  }
  Ok((id, SectionRecord::from_columns(kind, columns)?))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `research_stocks` row.
pub struct RawStock {
  pub id:           i64,
  pub symbol:       String,
  pub company_name: Option<String>,
  pub exchange:     Option<String>,
  pub created_at:   String,
}

impl RawStock {
  pub const COLUMNS: &'static str = "id, symbol, company_name, exchange, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      symbol:       row.get(1)?,
      company_name: row.get(2)?,
      exchange:     row.get(3)?,
      created_at:   row.get(4)?,
    })
  }

  pub fn into_stock(self) -> Result<Stock> {
    Ok(Stock {
      id:           self.id,
      symbol:       self.symbol,
      company_name: self.company_name,
      exchange:     self.exchange,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
