//! Day ledger and the weekly profit accumulator.

use std::sync::Mutex;

/// Totals reported once the seven-day loop completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeekReport {
    pub profit: u64,
    pub dishes_sold: u64,
    pub customers_admitted: u32,
}

/// Bookkeeping every actor reports into. Day counters are reset each
/// Opening; the weekly totals outlive individual days.
pub struct Ledger {
    inner: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    open: bool,
    admitted: u32,
    departed: u32,
    day_profit: u64,
    day_dishes: u64,
    week: WeekReport,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerState::default()),
        }
    }

    /// Reset the day counters and mark the restaurant open.
    pub fn open_day(&self) {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.open = true;
        guard.admitted = 0;
        guard.departed = 0;
        guard.day_profit = 0;
        guard.day_dishes = 0;
    }

    pub fn close_day(&self) {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.open = false;
    }

    pub fn record_admission(&self) {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.admitted += 1;
    }

    /// Every customer exit path reports here exactly once, whether it dined,
    /// abandoned its wait, or was turned away at closing.
    pub fn record_departure(&self) {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.departed += 1;
        debug_assert!(guard.departed <= guard.admitted, "departure without admission");
    }

    /// Called by the server at payment time.
    pub fn record_sale(&self, price: u64) {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.day_profit += price;
        guard.day_dishes += 1;
    }

    /// Fold the finished day into the weekly totals; returns the day profit.
    pub fn settle_day(&self) -> u64 {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        debug_assert!(!guard.open, "settled a day that was never closed");
        debug_assert_eq!(guard.admitted, guard.departed, "settled with customers in house");
        let day_profit = guard.day_profit;
        guard.week.profit += guard.day_profit;
        guard.week.dishes_sold += guard.day_dishes;
        guard.week.customers_admitted += guard.admitted;
        day_profit
    }

    pub fn week_report(&self) -> WeekReport {
        let guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.week
    }
}
