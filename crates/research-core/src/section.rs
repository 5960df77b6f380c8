//! Section records: the nine independently keyed tables that hang off a
//! stock.
//!
//! Each section is a flat record of optional scalars. Natural-key fields are
//! `Option` as well, so that a missing key surfaces as a field-level
//! validation error (`required`) instead of a parse failure. Once a payload
//! has passed validation every key field is guaranteed to be `Some`.

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{Error, Result, coerce, payload::is_calendar_date};

// ─── Section kind ────────────────────────────────────────────────────────────

/// Discriminant for the nine section variants. The snake-case name doubles as
/// the payload key and the response key.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
  BalanceSheet,
  Details,
  FinancialRatios,
  IncomeStatement,
  KeyMetrics,
  PerformanceMetrics,
  RdInvestments,
  RevenueMix,
  ShareholdingPattern,
}

impl SectionKind {
  /// Every section, in the order the engine writes them.
  pub const ALL: [SectionKind; 9] = [
    Self::BalanceSheet,
    Self::Details,
    Self::FinancialRatios,
    Self::IncomeStatement,
    Self::KeyMetrics,
    Self::PerformanceMetrics,
    Self::RdInvestments,
    Self::RevenueMix,
    Self::ShareholdingPattern,
  ];

  /// Payload and response key. Must match the serde names above.
  pub fn field_name(self) -> &'static str {
    match self {
      Self::BalanceSheet => "balance_sheet",
      Self::Details => "details",
      Self::FinancialRatios => "financial_ratios",
      Self::IncomeStatement => "income_statement",
      Self::KeyMetrics => "key_metrics",
      Self::PerformanceMetrics => "performance_metrics",
      Self::RdInvestments => "rd_investments",
      Self::RevenueMix => "revenue_mix",
      Self::ShareholdingPattern => "shareholding_pattern",
    }
  }

  /// Natural-key columns in addition to the owning stock id. A row is unique
  /// per `(stock_id, key_columns…)`; key columns are never overwritten.
  pub fn key_columns(self) -> &'static [&'static str] {
    match self {
      Self::BalanceSheet => &["fiscal_year"],
      Self::Details => &[],
      Self::FinancialRatios => &["fiscal_year", "period_type"],
      Self::IncomeStatement => &["fiscal_year"],
      Self::KeyMetrics => &["snapshot_date"],
      Self::PerformanceMetrics => &["period_type"],
      Self::RdInvestments => &["fiscal_year"],
      Self::RevenueMix => &["fiscal_year", "mix_type", "category"],
      Self::ShareholdingPattern => &["period_month", "period_year"],
    }
  }

  /// Columns that order rows from newest to oldest, most significant first.
  /// Ties (and sections with no temporal column) fall back to write order.
  pub fn recency_columns(self) -> &'static [&'static str] {
    match self {
      Self::BalanceSheet
      | Self::FinancialRatios
      | Self::IncomeStatement
      | Self::RdInvestments
      | Self::RevenueMix => &["fiscal_year"],
      Self::Details => &["report_date"],
      Self::KeyMetrics => &["snapshot_date"],
      Self::PerformanceMetrics => &["as_of_date"],
      Self::ShareholdingPattern => &["period_year", "period_month"],
    }
  }

  /// Calendar-date columns, exchanged as `YYYY-MM-DD`.
  pub fn date_columns(self) -> &'static [&'static str] {
    match self {
      Self::Details => &["report_date"],
      Self::KeyMetrics => &["snapshot_date"],
      Self::PerformanceMetrics => &["as_of_date"],
      _ => &[],
    }
  }
}

impl fmt::Display for SectionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.field_name())
  }
}

/// Field validator for the `YYYY-MM-DD` date columns.
fn calendar_date(value: &str) -> Result<(), ValidationError> {
  if is_calendar_date(value) {
    return Ok(());
  }
  Err(
    ValidationError::new("date")
      .with_message(Cow::Borrowed("must be a date in YYYY-MM-DD format")),
  )
}

// ─── Enumerated periods ──────────────────────────────────────────────────────

/// Reporting period of a set of financial ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportingPeriod {
  Annual,
  Quarterly,
  #[serde(rename = "Half-Yearly")]
  HalfYearly,
  #[serde(rename = "YTD")]
  YearToDate,
}

/// Look-back window of a performance snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformancePeriod {
  #[serde(rename = "1D")]
  OneDay,
  #[serde(rename = "1W")]
  OneWeek,
  #[serde(rename = "1M")]
  OneMonth,
  #[serde(rename = "3M")]
  ThreeMonths,
  #[serde(rename = "6M")]
  SixMonths,
  #[serde(rename = "1Y")]
  OneYear,
  #[serde(rename = "3Y")]
  ThreeYears,
  #[serde(rename = "5Y")]
  FiveYears,
  #[serde(rename = "YTD")]
  YearToDate,
}

// ─── Section records ─────────────────────────────────────────────────────────

/// Year-end balance sheet. Keyed by `fiscal_year`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct BalanceSheet {
  #[serde(default, deserialize_with = "coerce::opt_i32")]
  #[validate(required, range(min = 1900, max = 2100))]
  pub fiscal_year:              Option<i32>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub equity_capital:           Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub reserves:                 Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub total_equity:             Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub long_term_borrowings:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub short_term_borrowings:    Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub total_liabilities:        Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub fixed_assets:             Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub capital_work_in_progress: Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub investments:              Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub current_assets:           Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub cash_and_equivalents:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub total_assets:             Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 10))]
  pub currency:                 Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_bool")]
  pub is_consolidated:          Option<bool>,
}

/// Free-form analyst write-up. At most one row per stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Details {
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(custom(function = "calendar_date"))]
  pub report_date:       Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 100))]
  pub analyst_name:      Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 20))]
  pub rating:            Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub target_price:      Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub current_price:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub upside_potential:  Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 100))]
  pub sector:            Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 100))]
  pub industry:          Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 5000))]
  pub investment_thesis: Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 5000))]
  pub key_risks:         Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_bool")]
  pub is_published:      Option<bool>,
}

/// Valuation and efficiency ratios. Keyed by `(fiscal_year, period_type)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct FinancialRatios {
  #[serde(default, deserialize_with = "coerce::opt_i32")]
  #[validate(required, range(min = 1900, max = 2100))]
  pub fiscal_year:       Option<i32>,
  #[serde(default)]
  #[validate(required)]
  pub period_type:       Option<ReportingPeriod>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub pe_ratio:          Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub pb_ratio:          Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub ev_to_ebitda:      Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub roe:               Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub roce:              Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub roa:               Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub debt_to_equity:    Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub current_ratio:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub quick_ratio:       Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub interest_coverage: Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub dividend_yield:    Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub dividend_payout:   Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub operating_margin:  Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub net_profit_margin: Option<f64>,
}

/// Annual profit and loss. Keyed by `fiscal_year`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct IncomeStatement {
  #[serde(default, deserialize_with = "coerce::opt_i32")]
  #[validate(required, range(min = 1900, max = 2100))]
  pub fiscal_year:        Option<i32>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub revenue:            Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub other_income:       Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub total_income:       Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub operating_expenses: Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub ebitda:             Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub depreciation:       Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub interest_expense:   Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub profit_before_tax:  Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub tax_expense:        Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub net_profit:         Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub eps:                Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub dividend_per_share: Option<f64>,
}

/// Point-in-time market snapshot. Keyed by `snapshot_date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct KeyMetrics {
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(required, custom(function = "calendar_date"))]
  pub snapshot_date:        Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub market_cap:           Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub current_price:        Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub high_52_week:         Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub low_52_week:          Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub pe_ratio:             Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub pb_ratio:             Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub dividend_yield:       Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub book_value_per_share: Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub face_value:           Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_i64")]
  #[validate(range(min = 0))]
  pub average_volume:       Option<i64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub beta:                 Option<f64>,
}

/// Trailing returns over a look-back window. Keyed by `period_type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PerformanceMetrics {
  #[serde(default)]
  #[validate(required)]
  pub period_type:      Option<PerformancePeriod>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(custom(function = "calendar_date"))]
  pub as_of_date:       Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub stock_return:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub benchmark_return: Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub alpha:            Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub volatility:       Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub sharpe_ratio:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub max_drawdown:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_bool")]
  pub outperformed:     Option<bool>,
}

/// Research and development spend. Keyed by `fiscal_year`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RdInvestments {
  #[serde(default, deserialize_with = "coerce::opt_i32")]
  #[validate(required, range(min = 1900, max = 2100))]
  pub fiscal_year:     Option<i32>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub rd_expense:      Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub rd_to_revenue:   Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub capitalized_rd:  Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_i64")]
  #[validate(range(min = 0))]
  pub patents_filed:   Option<i64>,
  #[serde(default, deserialize_with = "coerce::opt_i64")]
  #[validate(range(min = 0))]
  pub patents_granted: Option<i64>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(length(max = 1000))]
  pub focus_areas:     Option<String>,
}

/// One slice of a revenue breakdown, e.g. a segment or a geography.
/// Keyed by `(fiscal_year, mix_type, category)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RevenueMix {
  #[serde(default, deserialize_with = "coerce::opt_i32")]
  #[validate(required, range(min = 1900, max = 2100))]
  pub fiscal_year:    Option<i32>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(required, length(min = 1, max = 50))]
  pub mix_type:       Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_string")]
  #[validate(required, length(min = 1, max = 100))]
  pub category:       Option<String>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub percentage:     Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0))]
  pub revenue_amount: Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  pub growth_rate:    Option<f64>,
}

/// Quarterly ownership breakdown. Keyed by `(period_month, period_year)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShareholdingPattern {
  #[serde(default, deserialize_with = "coerce::opt_i32")]
  #[validate(required, range(min = 1, max = 12))]
  pub period_month:        Option<i32>,
  #[serde(default, deserialize_with = "coerce::opt_i32")]
  #[validate(required, range(min = 1900, max = 2100))]
  pub period_year:         Option<i32>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub promoter_holding:    Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub promoter_pledged:    Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub fii_holding:         Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub dii_holding:         Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub mutual_fund_holding: Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub retail_holding:      Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_f64")]
  #[validate(range(min = 0.0, max = 100.0))]
  pub other_holding:       Option<f64>,
  #[serde(default, deserialize_with = "coerce::opt_i64")]
  #[validate(range(min = 0))]
  pub total_shareholders:  Option<i64>,
}

// ─── Section trait ───────────────────────────────────────────────────────────

/// Implemented by every section record; ties the concrete type to its
/// [`SectionKind`] and to the [`SectionRecord`] sum type.
pub trait Section:
  Serialize + DeserializeOwned + Validate + Clone + Into<SectionRecord>
{
  const KIND: SectionKind;
}

macro_rules! impl_section {
  ($($ty:ident => $kind:ident),* $(,)?) => {
    $(
      impl Section for $ty {
        const KIND: SectionKind = SectionKind::$kind;
      }

      impl From<$ty> for SectionRecord {
        fn from(value: $ty) -> Self { SectionRecord::$kind(value) }
      }
    )*
  };
}

impl_section! {
  BalanceSheet => BalanceSheet,
  Details => Details,
  FinancialRatios => FinancialRatios,
  IncomeStatement => IncomeStatement,
  KeyMetrics => KeyMetrics,
  PerformanceMetrics => PerformanceMetrics,
  RdInvestments => RdInvestments,
  RevenueMix => RevenueMix,
  ShareholdingPattern => ShareholdingPattern,
}

// ─── SectionRecord ───────────────────────────────────────────────────────────

/// One validated section, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionRecord {
  BalanceSheet(BalanceSheet),
  Details(Details),
  FinancialRatios(FinancialRatios),
  IncomeStatement(IncomeStatement),
  KeyMetrics(KeyMetrics),
  PerformanceMetrics(PerformanceMetrics),
  RdInvestments(RdInvestments),
  RevenueMix(RevenueMix),
  ShareholdingPattern(ShareholdingPattern),
}

/// Run `$body` against the inner record of any variant.
macro_rules! with_inner {
  ($record:expr, $inner:ident => $body:expr) => {
    match $record {
      SectionRecord::BalanceSheet($inner) => $body,
      SectionRecord::Details($inner) => $body,
      SectionRecord::FinancialRatios($inner) => $body,
      SectionRecord::IncomeStatement($inner) => $body,
      SectionRecord::KeyMetrics($inner) => $body,
      SectionRecord::PerformanceMetrics($inner) => $body,
      SectionRecord::RdInvestments($inner) => $body,
      SectionRecord::RevenueMix($inner) => $body,
      SectionRecord::ShareholdingPattern($inner) => $body,
    }
  };
}

impl SectionRecord {
  pub fn kind(&self) -> SectionKind {
    match self {
      Self::BalanceSheet(_) => SectionKind::BalanceSheet,
      Self::Details(_) => SectionKind::Details,
      Self::FinancialRatios(_) => SectionKind::FinancialRatios,
      Self::IncomeStatement(_) => SectionKind::IncomeStatement,
      Self::KeyMetrics(_) => SectionKind::KeyMetrics,
      Self::PerformanceMetrics(_) => SectionKind::PerformanceMetrics,
      Self::RdInvestments(_) => SectionKind::RdInvestments,
      Self::RevenueMix(_) => SectionKind::RevenueMix,
      Self::ShareholdingPattern(_) => SectionKind::ShareholdingPattern,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    with_inner!(self, inner => inner.validate())
  }

  /// Every declared column of the section, absent fields as `null`.
  pub fn to_columns(&self) -> Result<Map<String, Value>> {
    let value = with_inner!(self, inner => serde_json::to_value(inner))?;
    match value {
      Value::Object(map) => Ok(map),
      _ => Err(Error::NotAColumnMap(self.kind())),
    }
  }

  /// Rebuild a record from stored columns. Unknown columns are ignored.
  pub fn from_columns(kind: SectionKind, columns: Map<String, Value>) -> Result<Self> {
    let value = Value::Object(columns);
    Ok(match kind {
      SectionKind::BalanceSheet => Self::BalanceSheet(serde_json::from_value(value)?),
      SectionKind::Details => Self::Details(serde_json::from_value(value)?),
      SectionKind::FinancialRatios => {
        Self::FinancialRatios(serde_json::from_value(value)?)
      }
      SectionKind::IncomeStatement => {
        Self::IncomeStatement(serde_json::from_value(value)?)
      }
      SectionKind::KeyMetrics => Self::KeyMetrics(serde_json::from_value(value)?),
      SectionKind::PerformanceMetrics => {
        Self::PerformanceMetrics(serde_json::from_value(value)?)
      }
      SectionKind::RdInvestments => Self::RdInvestments(serde_json::from_value(value)?),
      SectionKind::RevenueMix => Self::RevenueMix(serde_json::from_value(value)?),
      SectionKind::ShareholdingPattern => {
        Self::ShareholdingPattern(serde_json::from_value(value)?)
      }
    })
  }
}
