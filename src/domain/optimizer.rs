//! Grid search over parameter sets.
//!
//! Each valid combination is simulated independently against the same
//! read-only series. With the `parallel` feature the simulations fan out
//! over rayon; results are collected back in grid order, so the first-wins
//! tie-break is the same whether the sweep ran on one thread or many.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::backtest::{run_backtest, BacktestConfig, SimulationResult};
use crate::domain::error::OptimizeError;
use crate::domain::grid::ParameterGrid;
use crate::domain::ohlcv::{Candle, PriceSeries};
use crate::domain::params::ParameterSet;

/// Runs a backtest for every valid combination in a grid.
#[derive(Debug, Clone)]
pub struct GridOptimizer {
    config: BacktestConfig,
    parallel: bool,
}

impl GridOptimizer {
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            config,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    ///
    /// Without the `parallel` feature this has no effect.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Simulates every valid combination; results stay in grid order.
    ///
    /// `series` must be in ascending timestamp order. Only emptiness is
    /// checked here; build a [`PriceSeries`] to have ordering validated.
    pub fn sweep(
        &self,
        series: &[Candle],
        grid: &ParameterGrid,
    ) -> Result<SweepResults, OptimizeError> {
        self.sweep_with(series, grid, |params| run_backtest(series, params, &self.config))
    }

    /// Like [`sweep`](Self::sweep) with a caller-supplied simulation.
    pub fn sweep_with<F>(
        &self,
        series: &[Candle],
        grid: &ParameterGrid,
        simulate: F,
    ) -> Result<SweepResults, OptimizeError>
    where
        F: Fn(&ParameterSet) -> SimulationResult + Send + Sync,
    {
        if series.is_empty() {
            return Err(OptimizeError::EmptySeries);
        }

        let candidates: Vec<ParameterSet> = grid.combinations().collect();
        if candidates.is_empty() {
            return Err(OptimizeError::EmptyGrid);
        }

        info!(
            candles = series.len(),
            combinations = grid.len(),
            valid = candidates.len(),
            parallel = self.parallel,
            "Starting grid search"
        );

        let run = |params: &ParameterSet| {
            let result = simulate(params);
            debug!(
                params = %result.params,
                terminal_value = result.terminal_value,
                fills = result.fills.len(),
                "Simulated"
            );
            result
        };

        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                let results = candidates.par_iter().map(&run).collect();
                return Ok(SweepResults::new(results));
            }
        }

        let results = candidates.iter().map(&run).collect();
        Ok(SweepResults::new(results))
    }

    /// The parameter set with the greatest terminal value.
    pub fn optimize(
        &self,
        series: &[Candle],
        grid: &ParameterGrid,
    ) -> Result<ParameterSet, OptimizeError> {
        let results = self.sweep(series, grid)?;
        let best = results.into_best();
        info!(
            params = %best.params,
            terminal_value = best.terminal_value,
            "Grid search complete"
        );
        Ok(best.params)
    }
}

/// Grid search with the default fee rate, parallel where available.
pub fn optimize(
    series: &PriceSeries,
    grid: &ParameterGrid,
    initial_capital: f64,
) -> Result<ParameterSet, OptimizeError> {
    GridOptimizer::new(BacktestConfig::new(initial_capital)).optimize(series, grid)
}

/// Results from a sweep, in the grid's declared iteration order.
#[derive(Debug, Clone)]
pub struct SweepResults {
    results: Vec<SimulationResult>,
}

impl SweepResults {
    fn new(results: Vec<SimulationResult>) -> Self {
        Self { results }
    }

    pub fn all(&self) -> &[SimulationResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Position of the best result: strictly greatest terminal value,
    /// earliest in grid order on ties.
    fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, r) in self.results.iter().enumerate().skip(1) {
            if r.terminal_value > self.results[best].terminal_value {
                best = i;
            }
        }
        best
    }

    pub fn best(&self) -> &SimulationResult {
        &self.results[self.best_index()]
    }

    pub fn into_best(mut self) -> SimulationResult {
        let i = self.best_index();
        self.results.swap_remove(i)
    }

    /// Results by descending terminal value; ties keep grid order.
    pub fn ranked(&self) -> Vec<&SimulationResult> {
        let mut ranked: Vec<&SimulationResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| b.terminal_value.total_cmp(&a.terminal_value));
        ranked
    }
}
