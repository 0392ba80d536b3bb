//! CSV loaders for the fund attribute table and the monthly return panel.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use fund_bench_core::{Fund, MonthlyReturn};

/// Loads the fund attribute table.
///
/// Expected header:
/// `fund_id,fund_name,fund_type,currency_hedge,expense_ratio,aum`.
/// An empty `aum` field means the weight is absent, which is distinct from
/// a present zero.
///
/// # Errors
/// Returns an error if the file cannot be opened, a row fails to parse, or
/// a `fund_id` appears more than once.
pub fn load_funds(path: &Path) -> Result<Vec<Fund>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open fund attribute file: {}", path.display()))?;

    let mut funds = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (index, row) in reader.deserialize::<Fund>().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let fund = row.with_context(|| {
            format!("Invalid fund attribute row at line {}", index + 2)
        })?;
        if !seen.insert(fund.fund_id.clone()) {
            bail!("Duplicate fund_id in attribute table: {}", fund.fund_id);
        }
        funds.push(fund);
    }

    info!(count = funds.len(), path = %path.display(), "loaded fund attributes");
    Ok(funds)
}

/// Loads the monthly return panel.
///
/// Expected header: `fund_id,period_end,return_fraction` with ISO dates
/// and returns as decimal fractions (0.02 = 2%). Rows arrive in any order;
/// duplicate (fund, period) pairs are legal here and handled per window by
/// the engine.
///
/// # Errors
/// Returns an error if the file cannot be opened or a row fails to parse.
pub fn load_returns(path: &Path) -> Result<Vec<MonthlyReturn>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open return panel file: {}", path.display()))?;

    let mut returns = Vec::new();
    for (index, row) in reader.deserialize::<MonthlyReturn>().enumerate() {
        let record: MonthlyReturn = row.with_context(|| {
            format!("Invalid return panel row at line {}", index + 2)
        })?;
        returns.push(record);
    }

    info!(count = returns.len(), path = %path.display(), "loaded return panel");
    Ok(returns)
}
