//! Run-wide configuration fixed before the week loop begins.

use std::time::Duration;

/// Waitstaff on shift each operating day.
pub const SERVERS: usize = 2;
/// Kitchen workers on shift each operating day.
pub const COOKS: usize = 2;

// All simulated delays are small multiples of `time_unit`.
const PATIENCE_UNITS: u32 = 3;
const ADMITTING_BUDGET_UNITS: u32 = 15;

#[derive(Clone, Debug)]
pub struct Config {
    /// Admission cap for one business day.
    pub max_customers_per_day: u32,
    /// Active-pool ceiling for the table allocator.
    pub max_tables: usize,
    /// Per-ingredient replenishment ceiling.
    pub stock_ceiling: u32,
    /// Base duration every simulated delay scales from.
    pub time_unit: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_customers_per_day: 12,
            max_tables: 4,
            stock_ceiling: 5,
            time_unit: Duration::from_millis(100),
        }
    }
}

impl Config {
    pub fn units(&self, n: u32) -> Duration {
        self.time_unit * n
    }

    /// How long a customer waits for a table before giving up.
    pub fn patience(&self) -> Duration {
        self.units(PATIENCE_UNITS)
    }

    /// How long the supervisor keeps admitting new customers.
    pub fn admitting_budget(&self) -> Duration {
        self.units(ADMITTING_BUDGET_UNITS)
    }
}
