//! CLI definition and dispatch.
//!
//! Each command reads its inputs, runs one calculator and writes plain text
//! lines. `execute` writes to any sink so the commands can be driven in tests.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::currency::CurrencyCode;
use crate::domain::error::EngineError;
use crate::domain::format::{format_compact_inr, format_currency, format_percent};
use crate::domain::freshness::{self, parse_date_like, StalenessThreshold};
use crate::domain::portfolio::{aggregate, aggregate_by_class, AssetClass, PortfolioSummary};
use crate::domain::snapshot::InstrumentSnapshot;
use crate::domain::strategy::{evaluate, CriterionStatus, Metrics, Score};
use crate::domain::strategy_config::{load_staleness, validate_strategy_config};
use crate::domain::{range, trend};
use crate::ports::record_port::RecordPort;

#[derive(Parser, Debug)]
#[command(name = "folioscope", about = "Technical signal and valuation calculators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Position of a price within its 52-week band (0-100)
    Position {
        #[arg(long, allow_negative_numbers = true)]
        current: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        low: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        high: Option<f64>,
    },
    /// Moving-average trend signal
    Trend {
        #[arg(long, allow_negative_numbers = true)]
        price: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        ma20: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        ma200: Option<f64>,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Score instrument snapshots against a strategy
    Score {
        #[arg(short, long)]
        strategy: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Aggregate holdings into invested/current totals
    Portfolio {
        #[arg(short, long)]
        data: PathBuf,
        /// Asset classes to include (default: all)
        #[arg(long, value_delimiter = ',')]
        class: Vec<AssetClass>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Format an amount in a currency
    Format {
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        #[arg(long)]
        currency: CurrencyCode,
        /// Lakh/crore abbreviation (INR only)
        #[arg(long)]
        compact: bool,
    },
    /// Staleness of a last-updated timestamp relative to now
    Freshness {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value_t = StalenessThreshold::RECOMMENDATION.days())]
        threshold: u32,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<(), EngineError> {
    match cli.command {
        Command::Position { current, low, high } => {
            match range::try_position(current, low, high) {
                Some(pos) => writeln!(out, "{:.2}", pos)?,
                None => writeln!(out, "no data")?,
            }
            Ok(())
        }
        Command::Trend { price, ma20, ma200 } => {
            writeln!(out, "{}", trend::classify(price, ma20, ma200))?;
            Ok(())
        }
        Command::Validate { strategy } => run_validate(&strategy, out),
        Command::Score {
            strategy,
            data,
            symbol,
        } => run_score(&strategy, &data, symbol.as_deref(), out),
        Command::Portfolio {
            data,
            class,
            config,
        } => run_portfolio(&data, &class, config.as_deref(), out),
        Command::Format {
            amount,
            currency,
            compact,
        } => {
            let text = if compact && currency == CurrencyCode::Inr {
                format_compact_inr(amount)
            } else {
                format_currency(amount, currency)
            };
            writeln!(out, "{}", text)?;
            Ok(())
        }
        Command::Freshness { date, threshold } => {
            let last_updated = match date.as_deref() {
                None => None,
                Some(raw) => Some(parse_date_like(raw).ok_or_else(|| EngineError::Records {
                    reason: format!("unrecognised date '{}'", raw),
                })?),
            };
            let f = freshness::classify(
                last_updated,
                Local::now().naive_local(),
                StalenessThreshold(threshold),
            );
            writeln!(out, "{}\t{}", f.label, if f.is_stale { "stale" } else { "fresh" })?;
            Ok(())
        }
    }
}

fn run_validate(strategy_path: &Path, out: &mut dyn Write) -> Result<(), EngineError> {
    info!("Loading strategy from {}", strategy_path.display());
    let config = FileConfigAdapter::from_file(strategy_path)?;
    let loaded = validate_strategy_config(&config)?;
    writeln!(
        out,
        "ok: {} strategy with {} criteria",
        loaded.definition.call_type,
        loaded.definition.formula.len()
    )?;
    Ok(())
}

fn run_score(
    strategy_path: &Path,
    data_dir: &Path,
    symbol: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), EngineError> {
    info!("Loading strategy from {}", strategy_path.display());
    let config = FileConfigAdapter::from_file(strategy_path)?;
    let loaded = validate_strategy_config(&config)?;

    let records = CsvAdapter::new(data_dir.to_path_buf());
    let snapshots: Vec<InstrumentSnapshot> = match symbol {
        Some(s) => records.fetch_snapshot(s)?.into_iter().collect(),
        None => records.fetch_snapshots()?,
    };
    if snapshots.is_empty() {
        return Err(EngineError::Records {
            reason: match symbol {
                Some(s) => format!("no snapshot for {}", s),
                None => "no snapshots".to_string(),
            },
        });
    }
    info!("Scoring {} instruments", snapshots.len());

    for instrument in &snapshots {
        let score = evaluate(
            &loaded.definition,
            &Metrics::from_instrument(instrument),
            &loaded.thresholds,
            loaded.policy,
        );
        writeln!(out, "{}", render_score(instrument, &score))?;
    }
    Ok(())
}

/// One line per instrument: symbol, composite, passed/total, band position, trend.
pub fn render_score(instrument: &InstrumentSnapshot, score: &Score) -> String {
    let band = range::try_position(
        instrument.prices.last_close,
        instrument.prices.low_52w,
        instrument.prices.high_52w,
    )
    .map(|p| format!("{:.1}", p))
    .unwrap_or_else(|| "-".to_string());
    let details: Vec<String> = score
        .outcomes
        .iter()
        .map(|o| {
            let mark = match o.status {
                CriterionStatus::Favorable => "pass",
                CriterionStatus::Unfavorable => "fail",
                CriterionStatus::MissingMetric => "n/a",
                CriterionStatus::Unscored => "unscored",
            };
            format!("{}={}", o.criterion, mark)
        })
        .collect();
    format!(
        "{}\tscore={:.2}\tpassed={}/{}\t52w={}\ttrend={}\t{}",
        instrument.symbol,
        score.composite,
        score.passed_count(),
        score.outcomes.len(),
        band,
        trend::classify_snapshot(&instrument.prices),
        details.join(" ")
    )
}

fn run_portfolio(
    data_dir: &Path,
    classes: &[AssetClass],
    config_path: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), EngineError> {
    let staleness = match config_path {
        Some(path) => load_staleness(
            &FileConfigAdapter::from_file(path)?,
            StalenessThreshold::HOLDING_PRICE,
        )?,
        None => StalenessThreshold::HOLDING_PRICE,
    };
    let include: HashSet<AssetClass> = if classes.is_empty() {
        AssetClass::all()
    } else {
        classes.iter().copied().collect()
    };

    let holdings = CsvAdapter::new(data_dir.to_path_buf()).fetch_holdings()?;
    info!("Loaded {} holdings", holdings.len());
    let currency = holdings
        .iter()
        .find(|h| include.contains(&h.asset_class))
        .map(|h| h.valuation.currency)
        .unwrap_or(CurrencyCode::Inr);

    let now = Local::now().naive_local();
    for holding in holdings.iter().filter(|h| include.contains(&h.asset_class)) {
        let f = freshness::classify(holding.last_updated, now, staleness);
        writeln!(
            out,
            "{}\t{}\t{}\t{}{}",
            holding.symbol,
            format_currency(holding.valuation.current_value(), holding.valuation.currency),
            format_percent(holding.valuation.profit_loss_pct()),
            f.label,
            if f.is_stale { " (stale)" } else { "" }
        )?;
    }

    let mut by_class: Vec<(AssetClass, PortfolioSummary)> = aggregate_by_class(&holdings)
        .into_iter()
        .filter(|(class, _)| include.contains(class))
        .collect();
    by_class.sort_by_key(|(class, _)| AssetClass::ALL.iter().position(|c| c == class));
    for (class, summary) in &by_class {
        writeln!(out, "[{}] {}", class, render_summary(summary, currency))?;
    }

    let total = aggregate(&holdings, &include);
    writeln!(out, "[total] {}", render_summary(&total, currency))?;
    Ok(())
}

pub fn render_summary(summary: &PortfolioSummary, currency: CurrencyCode) -> String {
    format!(
        "holdings={} invested={} current={} pnl={} ({})",
        summary.count,
        format_currency(summary.invested, currency),
        format_currency(summary.current, currency),
        format_currency(summary.profit_loss, currency),
        format_percent(summary.profit_loss_pct)
    )
}
