//! Ingredient stock with shortage escalation and batched replenishment.

use std::sync::{Condvar, Mutex};

use crate::types::DishId;

/// Replenishment trigger: anything at or below this level is reset to the
/// ceiling during a sweep, not only the ingredient that was reported short.
pub const LOW_WATER: u32 = 1;

/// Per-ingredient counters shared by the cooks and the stock keeper.
///
/// Counters persist across days; only the closed flag and shortage marks
/// are reset when a new day opens.
pub struct Stock {
    inner: Mutex<StockState>,
    /// Keeper sleeps here until some ingredient is reported short.
    shortage: Condvar,
    /// Cooks sleep here until a replenishment sweep completes.
    restocked: Condvar,
    ceiling: u32,
}

struct StockState {
    counts: Vec<u32>,
    short: Vec<bool>,
    closed: bool,
}

impl Stock {
    pub fn new(kinds: usize, ceiling: u32) -> Self {
        Self {
            inner: Mutex::new(StockState {
                counts: vec![ceiling; kinds],
                short: vec![false; kinds],
                closed: false,
            }),
            shortage: Condvar::new(),
            restocked: Condvar::new(),
            ceiling,
        }
    }

    /// Take one unit of the ingredient for `dish`, blocking on shortage.
    ///
    /// At zero the caller marks the shortage, wakes the keeper, and re-checks
    /// its own ingredient's count after every wake; a wake only means *some*
    /// sweep ran, not that this ingredient was restocked. Returns `false` if
    /// the stock room closed before the ingredient became available.
    pub fn take(&self, dish: DishId) -> bool {
        let mut guard = self.inner.lock().expect("stock mutex poisoned");
        loop {
            if guard.counts[dish] > 0 {
                guard.counts[dish] -= 1;
                return true;
            }
            if guard.closed {
                return false;
            }
            guard.short[dish] = true;
            self.shortage.notify_one();
            guard = self.restocked.wait(guard).expect("condvar wait failed");
        }
    }

    /// Keeper wait: block until a shortage is reported or the day is over.
    ///
    /// A shortage pending at close time is still reported so it gets one
    /// final sweep before the keeper goes home.
    pub fn await_shortage(&self) -> bool {
        let mut guard = self.inner.lock().expect("stock mutex poisoned");
        loop {
            if guard.short.iter().any(|&flagged| flagged) {
                return true;
            }
            if guard.closed {
                return false;
            }
            guard = self.shortage.wait(guard).expect("condvar wait failed");
        }
    }

    /// Reset every ingredient at or below the low-water mark to the ceiling,
    /// clear all shortage marks, and wake every blocked cook. Returns how
    /// many ingredients were restocked.
    pub fn restock_sweep(&self) -> usize {
        let mut guard = self.inner.lock().expect("stock mutex poisoned");
        let mut restocked = 0;
        for (dish, count) in guard.counts.iter_mut().enumerate() {
            if *count <= LOW_WATER {
                log::info!("[STOCK] ingredient {dish} restocked ({count} -> {})", self.ceiling);
                *count = self.ceiling;
                restocked += 1;
            }
        }
        for flagged in guard.short.iter_mut() {
            *flagged = false;
        }
        self.restocked.notify_all();
        restocked
    }

    /// Close the stock room and wake both the keeper and any blocked cooks.
    pub fn close(&self) {
        let mut guard = self.inner.lock().expect("stock mutex poisoned");
        guard.closed = true;
        self.shortage.notify_all();
        self.restocked.notify_all();
    }

    /// Reopen for a new day. Counters carry over from the previous day.
    pub fn reopen(&self) {
        let mut guard = self.inner.lock().expect("stock mutex poisoned");
        guard.closed = false;
        for flagged in guard.short.iter_mut() {
            *flagged = false;
        }
    }

    /// Current count for one ingredient.
    pub fn level(&self, dish: DishId) -> u32 {
        let guard = self.inner.lock().expect("stock mutex poisoned");
        guard.counts[dish]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn take_decrements_until_blocked() {
        let stock = Stock::new(1, 2);
        assert!(stock.take(0));
        assert!(stock.take(0));
        assert_eq!(stock.level(0), 0);
    }

    #[test]
    fn blocked_take_resumes_after_sweep() {
        let stock = Arc::new(Stock::new(1, 1));
        assert!(stock.take(0));
        assert_eq!(stock.level(0), 0);

        let (done_tx, done_rx) = mpsc::channel();
        let cook_side = Arc::clone(&stock);
        let cook = thread::spawn(move || {
            // Blocks until the keeper sweeps.
            let got = cook_side.take(0);
            done_tx.send(got).expect("send done");
        });

        // Keeper side: the cook's shortage mark must wake this wait.
        assert!(stock.await_shortage());
        assert_eq!(stock.restock_sweep(), 1);

        let got = done_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("cook never resumed");
        assert!(got);
        cook.join().expect("cook thread panicked");
        // Ceiling 1, taken once after the sweep.
        assert_eq!(stock.level(0), 0);
    }

    #[test]
    fn sweep_resets_everything_at_or_below_low_water() {
        let stock = Stock::new(3, 5);
        for _ in 0..5 {
            assert!(stock.take(0));
        }
        for _ in 0..4 {
            assert!(stock.take(1));
        }
        assert_eq!(stock.level(0), 0);
        assert_eq!(stock.level(1), 1);
        assert_eq!(stock.level(2), 5);

        // Both depleted ingredients are batched into one sweep.
        assert_eq!(stock.restock_sweep(), 2);
        assert_eq!(stock.level(0), 5);
        assert_eq!(stock.level(1), 5);
        assert_eq!(stock.level(2), 5);
    }

    #[test]
    fn blocked_take_unblocks_on_close() {
        let stock = Arc::new(Stock::new(1, 1));
        assert!(stock.take(0));

        let (ready_tx, ready_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let cook_side = Arc::clone(&stock);
        let cook = thread::spawn(move || {
            ready_tx.send(()).expect("ready");
            let got = cook_side.take(0);
            done_tx.send(got).expect("done");
        });

        ready_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("ready recv");
        stock.close();

        let got = done_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("cook never unblocked");
        assert!(!got);
        cook.join().expect("cook thread panicked");
    }

    #[test]
    fn pending_shortage_still_reported_after_close() {
        let stock = Stock::new(1, 1);
        assert!(stock.take(0));
        // Mark the shortage directly through a non-blocking path: a close
        // with a flagged shortage must still let the keeper sweep once.
        {
            let mut guard = stock.inner.lock().expect("stock mutex poisoned");
            guard.short[0] = true;
        }
        stock.close();
        assert!(stock.await_shortage());
        assert_eq!(stock.restock_sweep(), 1);
        assert!(!stock.await_shortage());
    }

    #[test]
    fn reopen_clears_closed_and_shortage_marks() {
        let stock = Stock::new(2, 3);
        stock.close();
        assert!(!stock.await_shortage());
        stock.reopen();
        assert!(stock.take(0));
        assert_eq!(stock.level(0), 2);
    }
}
