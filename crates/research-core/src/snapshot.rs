//! The read model returned for a stock: its latest row per section.

use serde::Serialize;

use crate::{
  section::{
    BalanceSheet, Details, FinancialRatios, IncomeStatement, KeyMetrics,
    PerformanceMetrics, RdInvestments, RevenueMix, SectionRecord,
    ShareholdingPattern,
  },
  stock::Stock,
};

/// A stored section row: its id plus the section's columns, flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSection<T> {
  pub id:     i64,
  #[serde(flatten)]
  pub values: T,
}

/// The computed read model for a stock. Derived on read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchSnapshot {
  pub stock:                Stock,
  pub balance_sheet:        Option<StoredSection<BalanceSheet>>,
  pub details:              Option<StoredSection<Details>>,
  pub financial_ratios:     Option<StoredSection<FinancialRatios>>,
  pub income_statement:     Option<StoredSection<IncomeStatement>>,
  pub key_metrics:          Option<StoredSection<KeyMetrics>>,
  pub performance_metrics:  Option<StoredSection<PerformanceMetrics>>,
  pub rd_investments:       Option<StoredSection<RdInvestments>>,
  pub revenue_mix:          Option<StoredSection<RevenueMix>>,
  pub shareholding_pattern: Option<StoredSection<ShareholdingPattern>>,
}

impl ResearchSnapshot {
  pub fn new(stock: Stock) -> Self {
    Self {
      stock,
      balance_sheet: None,
      details: None,
      financial_ratios: None,
      income_statement: None,
      key_metrics: None,
      performance_metrics: None,
      rd_investments: None,
      revenue_mix: None,
      shareholding_pattern: None,
    }
  }

  /// Place `record` into its slot, replacing whatever was there.
  pub fn insert(&mut self, id: i64, record: SectionRecord) {
    fn stored<T>(id: i64, values: T) -> Option<StoredSection<T>> {
      Some(StoredSection { id, values })
    }
    match record {
      SectionRecord::BalanceSheet(v) => self.balance_sheet = stored(id, v),
      SectionRecord::Details(v) => self.details = stored(id, v),
      SectionRecord::FinancialRatios(v) => self.financial_ratios = stored(id, v),
      SectionRecord::IncomeStatement(v) => self.income_statement = stored(id, v),
      SectionRecord::KeyMetrics(v) => self.key_metrics = stored(id, v),
      SectionRecord::PerformanceMetrics(v) => {
        self.performance_metrics = stored(id, v)
      }
      SectionRecord::RdInvestments(v) => self.rd_investments = stored(id, v),
      SectionRecord::RevenueMix(v) => self.revenue_mix = stored(id, v),
      SectionRecord::ShareholdingPattern(v) => {
        self.shareholding_pattern = stored(id, v)
      }
    }
  }
}
