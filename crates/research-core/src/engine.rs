//! The section upsert engine.
//!
//! [`run`] applies every present section of a [`ResearchPayload`] inside one
//! transaction: resolve the stock by symbol, write each section, commit. Any
//! failure rolls the whole transaction back, so a request either lands in
//! full or not at all.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
  payload::ResearchPayload,
  section::{SectionKind, SectionRecord},
  unit::{Transaction, UnitOfWork},
};

/// Whether the request is a create or an update. Both upsert every section;
/// on update the details section is written with a plain update instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
  Create,
  Update,
}

/// Outcome of one section write.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionWrite {
  pub record:        SectionRecord,
  /// Row id reported by the store. Only populated for [`WriteMode::Create`].
  pub id:            Option<i64>,
  pub affected_rows: usize,
}

/// Outcome of a committed request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
  pub stock_id: i64,
  pub mode:     WriteMode,
  pub sections: Vec<SectionWrite>,
}

#[derive(Debug, Error)]
pub enum ApplyError<E: std::error::Error + 'static> {
  #[error("stock with symbol {0:?} not found")]
  StockNotFound(String),

  #[error("failed to write {section}: {source}")]
  Section {
    section: SectionKind,
    #[source]
    source:  E,
  },

  /// Acquiring the connection, resolving the stock, or committing failed.
  #[error("storage error: {0}")]
  Store(#[source] E),
}

/// Apply `payload` through `unit` as a single all-or-nothing transaction.
pub fn run<U: UnitOfWork>(
  unit: &mut U,
  mode: WriteMode,
  payload: &ResearchPayload,
) -> Result<ApplyReport, ApplyError<U::Error>> {
  let mut tx = unit.begin().map_err(ApplyError::Store)?;

  match write_sections(&mut tx, mode, payload) {
    Ok(report) => {
      tx.commit().map_err(ApplyError::Store)?;
      info!(
        symbol = %payload.stock.symbol,
        stock_id = report.stock_id,
        sections = report.sections.len(),
        ?mode,
        "research committed"
      );
      Ok(report)
    }
    Err(err) => {
      warn!(symbol = %payload.stock.symbol, error = %err, "rolling back research write");
      if let Err(rollback) = tx.rollback() {
        warn!(error = %rollback, "rollback failed; connection drop discards the transaction");
      }
      Err(err)
    }
  }
}

fn write_sections<T: Transaction>(
  tx: &mut T,
  mode: WriteMode,
  payload: &ResearchPayload,
) -> Result<ApplyReport, ApplyError<T::Error>> {
  let symbol = payload.stock.symbol.as_str();
  let stock_id = tx
    .stock_id(symbol)
    .map_err(ApplyError::Store)?
    .ok_or_else(|| ApplyError::StockNotFound(symbol.to_owned()))?;

  let mut sections = Vec::new();
  for record in payload.sections() {
    let section = record.kind();
    let outcome = match (mode, section) {
      (WriteMode::Update, SectionKind::Details) => {
        tx.update_by_stock(stock_id, &record)
      }
      _ => tx.upsert(stock_id, &record),
    }
    .map_err(|source| ApplyError::Section { section, source })?;

    debug!(%section, stock_id, affected = outcome.affected_rows, "section written");
    if outcome.affected_rows == 0 {
      warn!(%section, stock_id, "section write matched no rows");
    }

    sections.push(SectionWrite {
      record,
      id: match mode {
        WriteMode::Create => outcome.id,
        WriteMode::Update => None,
      },
      affected_rows: outcome.affected_rows,
    });
  }

  Ok(ApplyReport { stock_id, mode, sections })
}
