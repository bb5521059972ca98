//! CLI definition and dispatch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{
    build_backtest_config, build_data_settings, build_grid, build_strategy_params,
    parallel_enabled, validate_config,
};
use crate::domain::error::TradegridError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::optimizer::{GridOptimizer, SweepResults};
use crate::domain::params::ParameterSet;
use crate::domain::signal::{evaluate, Signal};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(
    name = "tradegrid",
    version,
    about = "Grid-search optimizer for an indicator-gated trading rule"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the parameter grid for the best-performing set
    Optimize {
        #[arg(short, long)]
        config: PathBuf,
        /// Override [data] symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Also print the N best results
        #[arg(long)]
        top: Option<usize>,
    },
    /// Evaluate the latest candle window and print BUY, SELL or HOLD
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Re-optimize on the loaded history instead of using [strategy]
        #[arg(long)]
        optimize: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Optimize {
            config,
            symbol,
            top,
        } => run_optimize(&config, symbol.as_deref(), top),
        Command::Signal {
            config,
            symbol,
            optimize,
        } => run_signal(&config, symbol.as_deref(), optimize),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradegridError> {
    info!(path = %path.display(), "Loading config");
    FileConfigAdapter::from_file(path)
}

fn csv_source(config: &dyn ConfigPort) -> Result<CsvAdapter, TradegridError> {
    let settings = build_data_settings(config)?;
    Ok(CsvAdapter::new(settings.path))
}

fn run_optimize(
    config_path: &Path,
    symbol: Option<&str>,
    top: Option<usize>,
) -> Result<(), TradegridError> {
    let config = load_config(config_path)?;
    let data_port = csv_source(&config)?;
    let results = optimize_pipeline(&config, &data_port, symbol)?;

    let best = results.best();
    println!("Best parameters: {}", best.params);
    println!("Terminal value:  {:.2}", best.terminal_value);
    println!("Return:          {:.2}%", best.return_pct() * 100.0);
    println!(
        "Trades:          {} fills, {} round trips",
        best.fills.len(),
        best.round_trips()
    );

    if let Some(n) = top.filter(|&n| n > 0) {
        println!();
        println!(
            "{:>4}  {:>16}  {:>9}  {:>6}  params",
            "rank", "terminal_value", "return", "fills"
        );
        for (rank, r) in results.ranked().into_iter().take(n).enumerate() {
            println!(
                "{:>4}  {:>16.2}  {:>8.2}%  {:>6}  {}",
                rank + 1,
                r.terminal_value,
                r.return_pct() * 100.0,
                r.fills.len(),
                r.params
            );
        }
    }
    Ok(())
}

fn run_signal(
    config_path: &Path,
    symbol: Option<&str>,
    optimize: bool,
) -> Result<(), TradegridError> {
    let config = load_config(config_path)?;
    let data_port = csv_source(&config)?;
    let report = signal_pipeline(&config, &data_port, symbol, optimize)?;
    println!("Parameters: {}", report.params);
    match report.unrealized_return {
        Some(r) => println!("Position:   IN (unrealized {:+.2}%)", r * 100.0),
        None => println!("Position:   OUT"),
    }
    println!("{}", report.signal);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TradegridError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;
    let grid = build_grid(&config)?;
    let valid = grid.combinations().count();

    println!("Config OK: {}", config_path.display());
    println!("Grid dimensions: {}", grid.dimensions().len());
    println!("Combinations:    {} ({} valid)", grid.len(), valid);
    if valid == 0 {
        warn!("no combination satisfies the parameter constraints");
    }
    Ok(())
}

fn load_series(
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
    symbol_override: Option<&str>,
) -> Result<PriceSeries, TradegridError> {
    let settings = build_data_settings(config)?;
    let symbol = symbol_override.unwrap_or(&settings.symbol);
    info!(symbol, limit = ?settings.limit, "Fetching price history");
    let series = data_port.fetch_candles(symbol, settings.limit)?;
    info!(symbol, candles = series.len(), "Price history loaded");
    Ok(series)
}

fn optimizer_for(config: &dyn ConfigPort) -> Result<GridOptimizer, TradegridError> {
    let backtest = build_backtest_config(config)?;
    Ok(GridOptimizer::new(backtest).with_parallelism(parallel_enabled(config)))
}

/// Loads config and data, then simulates every valid grid combination.
pub fn optimize_pipeline(
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
    symbol_override: Option<&str>,
) -> Result<SweepResults, TradegridError> {
    let optimizer = optimizer_for(config)?;
    let grid = build_grid(config)?;
    let series = load_series(config, data_port, symbol_override)?;

    let results = optimizer.sweep(&series, &grid)?;
    let best = results.best();
    info!(
        params = %best.params,
        terminal_value = best.terminal_value,
        "Best parameter set"
    );
    Ok(results)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalReport {
    pub params: ParameterSet,
    pub signal: Signal,
    /// Return on the open position at the last close; `None` when OUT.
    pub unrealized_return: Option<f64>,
}

/// Signal for the most recent candle.
///
/// Parameters come from `[strategy]`, or from a fresh grid search over
/// the loaded history when `optimize` is set. The position is the one the
/// simulator holds after replaying the whole history with those parameters.
pub fn signal_pipeline(
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
    symbol_override: Option<&str>,
    optimize: bool,
) -> Result<SignalReport, TradegridError> {
    let backtest = build_backtest_config(config)?;
    let series = load_series(config, data_port, symbol_override)?;

    let params = if optimize {
        let grid = build_grid(config)?;
        optimizer_for(config)?.optimize(&series, &grid)?
    } else {
        build_strategy_params(config)?
    };

    let needed = params.window_size() + 1;
    if series.len() < needed {
        warn!(
            candles = series.len(),
            needed, "history shorter than the signal window"
        );
    }
    let start = series.len().saturating_sub(needed);
    let signal = evaluate(&series[start..], &params);

    let replay = run_backtest(&series, &params, &backtest);
    let unrealized_return = replay
        .final_state
        .unrealized_return(series.last().close);
    info!(params = %params, %signal, ?unrealized_return, "Signal evaluated");
    Ok(SignalReport {
        params,
        signal,
        unrealized_return,
    })
}
