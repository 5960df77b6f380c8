//! The research payload and its validator.
//!
//! A payload names one stock by symbol and carries up to nine optional
//! sections. Validation runs before any storage access and reports every
//! violated constraint as a `{path, message}` pair; an absent section is
//! never an error, but a present section must carry its natural-key fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
  section::{
    BalanceSheet, Details, FinancialRatios, IncomeStatement, KeyMetrics,
    PerformanceMetrics, RdInvestments, RevenueMix, Section, SectionRecord,
    ShareholdingPattern,
  },
  stock::StockRef,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// One violated constraint. `path` is dotted, e.g. `revenue_mix.category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub path:    String,
  pub message: String,
}

impl FieldError {
  pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), message: message.into() }
  }
}

/// The payload failed validation; nothing was written.
#[derive(Debug, Clone, Error)]
#[error("payload failed validation with {} error(s)", .errors.len())]
pub struct InvalidPayload {
  pub errors: Vec<FieldError>,
}

/// Render a validator error as a human-readable message.
fn describe(error: &ValidationError) -> String {
  if let Some(message) = &error.message {
    return message.to_string();
  }
  let param = |name: &str| error.params.get(name).map(Value::to_string);
  match &*error.code {
    "required" => "is required".to_owned(),
    "range" => match (param("min"), param("max")) {
      (Some(min), Some(max)) => format!("must be between {min} and {max}"),
      (Some(min), None) => format!("must be at least {min}"),
      (None, Some(max)) => format!("must be at most {max}"),
      (None, None) => "is out of range".to_owned(),
    },
    "length" => match (param("min"), param("max")) {
      (Some(min), Some(max)) if min == "1" => {
        format!("must not be empty and at most {max} characters")
      }
      (Some(min), Some(max)) => {
        format!("must be between {min} and {max} characters")
      }
      (Some(min), None) => format!("must be at least {min} characters"),
      (None, Some(max)) => format!("must be at most {max} characters"),
      (None, None) => "has an invalid length".to_owned(),
    },
    other => format!("failed the {other} check"),
  }
}

/// Flatten `errors` into `{path, message}` pairs, prefixing each field name
/// with `prefix` when given.
pub fn field_errors(prefix: Option<&str>, errors: &ValidationErrors) -> Vec<FieldError> {
  let mut out = Vec::new();
  for (field, list) in errors.field_errors() {
    let path = match prefix {
      Some(prefix) => format!("{prefix}.{field}"),
      None => field.to_string(),
    };
    out.extend(list.iter().map(|e| FieldError::new(path.clone(), describe(e))));
  }
  out
}

/// `true` if `s` is an unambiguous `YYYY-MM-DD` calendar date.
pub fn is_calendar_date(s: &str) -> bool {
  s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

// ─── Payload ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
struct StockInput {
  #[serde(default)]
  #[validate(required, length(min = 1, max = 45))]
  symbol: Option<String>,
}

/// A validated create/update request. `None` means "leave this section
/// untouched".
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchPayload {
  pub stock:                StockRef,
  pub balance_sheet:        Option<BalanceSheet>,
  pub details:              Option<Details>,
  pub financial_ratios:     Option<FinancialRatios>,
  pub income_statement:     Option<IncomeStatement>,
  pub key_metrics:          Option<KeyMetrics>,
  pub performance_metrics:  Option<PerformanceMetrics>,
  pub rd_investments:       Option<RdInvestments>,
  pub revenue_mix:          Option<RevenueMix>,
  pub shareholding_pattern: Option<ShareholdingPattern>,
}

impl ResearchPayload {
  /// A payload for `symbol` with no sections.
  pub fn for_symbol(symbol: impl Into<String>) -> Self {
    Self {
      stock:                StockRef { symbol: symbol.into() },
      balance_sheet:        None,
      details:              None,
      financial_ratios:     None,
      income_statement:     None,
      key_metrics:          None,
      performance_metrics:  None,
      rd_investments:       None,
      revenue_mix:          None,
      shareholding_pattern: None,
    }
  }

  /// Validate an untyped request body.
  pub fn parse(body: &Value) -> Result<Self, InvalidPayload> {
    let Some(body) = body.as_object() else {
      return Err(InvalidPayload {
        errors: vec![FieldError::new("", "expected a JSON object")],
      });
    };

    let mut errors = Vec::new();
    let stock = parse_stock(body, &mut errors);

    let payload = Self {
      stock:                StockRef { symbol: stock.unwrap_or_default() },
      balance_sheet:        parse_section(body, &mut errors),
      details:              parse_section(body, &mut errors),
      financial_ratios:     parse_section(body, &mut errors),
      income_statement:     parse_section(body, &mut errors),
      key_metrics:          parse_section(body, &mut errors),
      performance_metrics:  parse_section(body, &mut errors),
      rd_investments:       parse_section(body, &mut errors),
      revenue_mix:          parse_section(body, &mut errors),
      shareholding_pattern: parse_section(body, &mut errors),
    };

    if errors.is_empty() {
      Ok(payload)
    } else {
      errors.sort_by(|a, b| a.path.cmp(&b.path));
      Err(InvalidPayload { errors })
    }
  }

  /// The present sections, in write order.
  pub fn sections(&self) -> Vec<SectionRecord> {
    let Self {
      stock: _,
      balance_sheet,
      details,
      financial_ratios,
      income_statement,
      key_metrics,
      performance_metrics,
      rd_investments,
      revenue_mix,
      shareholding_pattern,
    } = self;

    [
      balance_sheet.clone().map(SectionRecord::from),
      details.clone().map(SectionRecord::from),
      financial_ratios.clone().map(SectionRecord::from),
      income_statement.clone().map(SectionRecord::from),
      key_metrics.clone().map(SectionRecord::from),
      performance_metrics.clone().map(SectionRecord::from),
      rd_investments.clone().map(SectionRecord::from),
      revenue_mix.clone().map(SectionRecord::from),
      shareholding_pattern.clone().map(SectionRecord::from),
    ]
    .into_iter()
    .flatten()
    .collect()
  }
}

fn parse_stock(body: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
  let Some(value) = body.get("stock") else {
    errors.push(FieldError::new("stock", "is required"));
    return None;
  };
  if !value.is_object() {
    errors.push(FieldError::new("stock", "expected an object"));
    return None;
  }
  let input: StockInput = match serde_json::from_value(value.clone()) {
    Ok(input) => input,
    Err(e) => {
      errors.push(FieldError::new("stock.symbol", e.to_string()));
      return None;
    }
  };
  if let Err(e) = input.validate() {
    errors.extend(field_errors(Some("stock"), &e));
    return None;
  }
  input.symbol
}

fn parse_section<T: Section>(
  body: &Map<String, Value>,
  errors: &mut Vec<FieldError>,
) -> Option<T> {
  let name = T::KIND.field_name();
  let value = body.get(name)?;
  let Some(fields) = value.as_object() else {
    errors.push(FieldError::new(name, "expected an object"));
    return None;
  };

  // Decode each field on its own so one bad value neither hides the others
  // nor the constraint checks below. Every section field defaults to `None`.
  let before = errors.len();
  let mut decoded = Map::new();
  let mut malformed = Vec::new();
  for (field, raw) in fields {
    let single = Map::from_iter([(field.clone(), raw.clone())]);
    match serde_json::from_value::<T>(Value::Object(single)) {
      Ok(_) => {
        decoded.insert(field.clone(), raw.clone());
      }
      Err(e) => {
        errors.push(FieldError::new(format!("{name}.{field}"), e.to_string()));
        malformed.push(field.as_str());
      }
    }
  }

  let section: T = match serde_json::from_value(Value::Object(decoded)) {
    Ok(section) => section,
    Err(e) => {
      errors.push(FieldError::new(name, e.to_string()));
      return None;
    }
  };

  if let Err(e) = section.validate() {
    errors.extend(
      field_errors(Some(name), &e)
        .into_iter()
        .filter(|err| !malformed.iter().any(|f| err.path == format!("{name}.{f}"))),
    );
  }

  (errors.len() == before).then_some(section)
}
