//! SQL schema for the research SQLite store.
//!
//! Executed once at connection startup. Every section table hangs off
//! `research_stocks` and carries a `UNIQUE` constraint on its natural key,
//! which is what the upsert's `ON CONFLICT` clause targets.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS research_stocks (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol       TEXT NOT NULL UNIQUE,
    company_name TEXT,
    exchange     TEXT,
    created_at   TEXT NOT NULL    -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS research_balance_sheet (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id                 INTEGER NOT NULL REFERENCES research_stocks(id),
    fiscal_year              INTEGER NOT NULL,
    equity_capital           REAL,
    reserves                 REAL,
    total_equity             REAL,
    long_term_borrowings     REAL,
    short_term_borrowings    REAL,
    total_liabilities        REAL,
    fixed_assets             REAL,
    capital_work_in_progress REAL,
    investments              REAL,
    current_assets           REAL,
    cash_and_equivalents     REAL,
    total_assets             REAL,
    currency                 TEXT,
    is_consolidated          INTEGER,
    created_at               TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at               TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, fiscal_year)
);

-- At most one write-up per stock.
CREATE TABLE IF NOT EXISTS research_stock_details (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id          INTEGER NOT NULL REFERENCES research_stocks(id),
    report_date       TEXT,            -- YYYY-MM-DD
    analyst_name      TEXT,
    rating            TEXT,
    target_price      REAL,
    current_price     REAL,
    upside_potential  REAL,
    sector            TEXT,
    industry          TEXT,
    investment_thesis TEXT,
    key_risks         TEXT,
    is_published      INTEGER,
    created_at        TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at        TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id)
);

CREATE TABLE IF NOT EXISTS research_financial_ratios (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id          INTEGER NOT NULL REFERENCES research_stocks(id),
    fiscal_year       INTEGER NOT NULL,
    period_type       TEXT NOT NULL,   -- 'Annual' | 'Quarterly' | 'Half-Yearly' | 'YTD'
    pe_ratio          REAL,
    pb_ratio          REAL,
    ev_to_ebitda      REAL,
    roe               REAL,
    roce              REAL,
    roa               REAL,
    debt_to_equity    REAL,
    current_ratio     REAL,
    quick_ratio       REAL,
    interest_coverage REAL,
    dividend_yield    REAL,
    dividend_payout   REAL,
    operating_margin  REAL,
    net_profit_margin REAL,
    created_at        TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at        TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, fiscal_year, period_type)
);

CREATE TABLE IF NOT EXISTS research_income_statement (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id           INTEGER NOT NULL REFERENCES research_stocks(id),
    fiscal_year        INTEGER NOT NULL,
    revenue            REAL,
    other_income       REAL,
    total_income       REAL,
    operating_expenses REAL,
    ebitda             REAL,
    depreciation       REAL,
    interest_expense   REAL,
    profit_before_tax  REAL,
    tax_expense        REAL,
    net_profit         REAL,
    eps                REAL,
    dividend_per_share REAL,
    created_at         TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at         TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, fiscal_year)
);

CREATE TABLE IF NOT EXISTS research_key_metrics (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id             INTEGER NOT NULL REFERENCES research_stocks(id),
    snapshot_date        TEXT NOT NULL,   -- YYYY-MM-DD
    market_cap           REAL,
    current_price        REAL,
    high_52_week         REAL,
    low_52_week          REAL,
    pe_ratio             REAL,
    pb_ratio             REAL,
    dividend_yield       REAL,
    book_value_per_share REAL,
    face_value           REAL,
    average_volume       INTEGER,
    beta                 REAL,
    created_at           TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at           TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, snapshot_date)
);

CREATE TABLE IF NOT EXISTS research_performance_metrics (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id         INTEGER NOT NULL REFERENCES research_stocks(id),
    period_type      TEXT NOT NULL,   -- '1D' .. '5Y' | 'YTD'
    as_of_date       TEXT,            -- YYYY-MM-DD
    stock_return     REAL,
    benchmark_return REAL,
    alpha            REAL,
    volatility       REAL,
    sharpe_ratio     REAL,
    max_drawdown     REAL,
    outperformed     INTEGER,
    created_at       TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at       TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, period_type)
);

CREATE TABLE IF NOT EXISTS research_rd_investments (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id        INTEGER NOT NULL REFERENCES research_stocks(id),
    fiscal_year     INTEGER NOT NULL,
    rd_expense      REAL,
    rd_to_revenue   REAL,
    capitalized_rd  REAL,
    patents_filed   INTEGER,
    patents_granted INTEGER,
    focus_areas     TEXT,
    created_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, fiscal_year)
);

CREATE TABLE IF NOT EXISTS research_revenue_mix (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id       INTEGER NOT NULL REFERENCES research_stocks(id),
    fiscal_year    INTEGER NOT NULL,
    mix_type       TEXT NOT NULL,
    category       TEXT NOT NULL,
    percentage     REAL,
    revenue_amount REAL,
    growth_rate    REAL,
    created_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, fiscal_year, mix_type, category)
);

CREATE TABLE IF NOT EXISTS research_shareholding_pattern (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_id            INTEGER NOT NULL REFERENCES research_stocks(id),
    period_month        INTEGER NOT NULL,
    period_year         INTEGER NOT NULL,
    promoter_holding    REAL,
    promoter_pledged    REAL,
    fii_holding         REAL,
    dii_holding         REAL,
    mutual_fund_holding REAL,
    retail_holding      REAL,
    other_holding       REAL,
    total_shareholders  INTEGER,
    created_at          TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at          TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (stock_id, period_month, period_year)
);

PRAGMA user_version = 1;
";
