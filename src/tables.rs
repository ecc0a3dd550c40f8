//! The dining room: bounded table pool, timed seat waits, on-demand growth,
//! and reclamation of soiled tables.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::types::{CustomerId, Seating, TableId, TableStatus};

/// Snapshot of the floor counters, mainly for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorCounts {
    pub active: usize,
    pub occupied: usize,
    pub soiled: usize,
    pub waiting: usize,
}

/// Table pool plus the three wait points that coordinate around it:
/// customers waiting for a seat, the table manager waiting for demand,
/// and the cleaning crew waiting for a soiled table.
///
/// One mutex guards the whole floor; no caller ever holds it across a
/// simulated delay.
pub struct DiningRoom {
    inner: Mutex<FloorState>,
    /// Customers blocked for a seat; woken on vacancy, growth, or closing.
    seat_available: Condvar,
    /// Table manager blocked until there is demand it can act on.
    demand: Condvar,
    /// Cleaning crew blocked until a table is soiled.
    soiled_table: Condvar,
    max_tables: usize,
}

struct FloorState {
    /// Active pool; grows up to the cap, never shrinks within a day.
    tables: Vec<TableStatus>,
    occupied: usize,
    soiled: usize,
    waiting: usize,
    closed: bool,
}

impl FloorState {
    fn first_free(&self) -> Option<TableId> {
        self.tables
            .iter()
            .position(|&status| status == TableStatus::Free)
    }

    fn first_soiled(&self) -> Option<TableId> {
        self.tables
            .iter()
            .position(|&status| status == TableStatus::Soiled)
    }

    fn free(&self) -> usize {
        self.tables.len() - self.occupied - self.soiled
    }

    fn seat(&mut self, table: TableId) {
        debug_assert_eq!(self.tables[table], TableStatus::Free);
        self.tables[table] = TableStatus::Occupied;
        self.occupied += 1;
    }
}

impl DiningRoom {
    pub fn new(max_tables: usize) -> Self {
        Self {
            inner: Mutex::new(FloorState {
                tables: Vec::new(),
                occupied: 0,
                soiled: 0,
                waiting: 0,
                closed: false,
            }),
            seat_available: Condvar::new(),
            demand: Condvar::new(),
            soiled_table: Condvar::new(),
            max_tables,
        }
    }

    /// Try to get a table, waiting up to `patience` for one to open up.
    ///
    /// The wait is satisfied by a vacated table, by the manager growing the
    /// pool, or cut short by closing. Free tables are granted lowest index
    /// first; contending waiters race for it under the floor lock, so there
    /// is no fairness guarantee beyond every waiter being re-evaluated after
    /// every relevant change.
    pub fn request_table(&self, customer: CustomerId, patience: Duration) -> Seating {
        let mut guard = self.inner.lock().expect("dining room mutex poisoned");
        if guard.closed {
            return Seating::RestaurantClosed;
        }
        if let Some(table) = guard.first_free() {
            guard.seat(table);
            return Seating::Granted(table);
        }

        guard.waiting += 1;
        self.demand.notify_one();
        log::debug!("[FLOOR] customer {customer} queuing for a table");
        let deadline = Instant::now() + patience;
        loop {
            if guard.closed {
                guard.waiting -= 1;
                return Seating::RestaurantClosed;
            }
            if let Some(table) = guard.first_free() {
                guard.waiting -= 1;
                guard.seat(table);
                return Seating::Granted(table);
            }
            let now = Instant::now();
            if now >= deadline {
                guard.waiting -= 1;
                return Seating::Abandoned;
            }
            let (reacquired, _timed_out) = self
                .seat_available
                .wait_timeout(guard, deadline - now)
                .expect("condvar wait failed");
            // Timeout and predicate are both re-checked at the loop head.
            guard = reacquired;
        }
    }

    /// Vacate a table. A soiled table stays non-assignable and is handed to
    /// the cleaning crew; a clean one goes straight back into circulation.
    pub fn release_table(&self, table: TableId, soiled: bool) {
        let mut guard = self.inner.lock().expect("dining room mutex poisoned");
        debug_assert_eq!(guard.tables[table], TableStatus::Occupied);
        guard.occupied -= 1;
        if soiled {
            guard.tables[table] = TableStatus::Soiled;
            guard.soiled += 1;
            self.soiled_table.notify_one();
        } else {
            guard.tables[table] = TableStatus::Free;
            self.seat_available.notify_all();
            self.demand.notify_one();
        }
    }

    /// One cycle of the table manager: sleep until there is demand it can
    /// act on, then either point waiters at an existing vacancy or grow the
    /// pool by one table. Returns `false` when the day is over.
    pub fn manage_once(&self) -> bool {
        let mut guard = self.inner.lock().expect("dining room mutex poisoned");
        loop {
            if guard.closed {
                return false;
            }
            if guard.waiting > 0 && (guard.free() > 0 || guard.tables.len() < self.max_tables) {
                break;
            }
            // Full house and nothing to grow: waiters sit out their patience.
            guard = self.demand.wait(guard).expect("condvar wait failed");
        }

        if guard.free() == 0 {
            guard.tables.push(TableStatus::Free);
            log::info!("[FLOOR] new table {} opened (active: {})", guard.tables.len() - 1, guard.tables.len());
        } else {
            log::debug!("[FLOOR] vacancy available, waking the queue");
        }
        // First checker wins the table; the rest go back to waiting.
        self.seat_available.notify_all();
        true
    }

    /// Cleaning-crew wait: block until a table is soiled, returning the
    /// lowest-index one, or `None` once the day is over and nothing is left
    /// to clean. The table stays `Soiled` (non-assignable) while the crew
    /// scrubs it without holding the floor lock.
    pub fn await_soiled(&self) -> Option<TableId> {
        let mut guard = self.inner.lock().expect("dining room mutex poisoned");
        loop {
            if guard.soiled > 0 {
                return guard.first_soiled();
            }
            if guard.closed {
                return None;
            }
            guard = self.soiled_table.wait(guard).expect("condvar wait failed");
        }
    }

    /// Put a scrubbed table back into circulation, exactly as a direct
    /// clean vacancy would.
    pub fn finish_cleaning(&self, table: TableId) {
        let mut guard = self.inner.lock().expect("dining room mutex poisoned");
        debug_assert_eq!(guard.tables[table], TableStatus::Soiled);
        guard.tables[table] = TableStatus::Free;
        guard.soiled -= 1;
        self.seat_available.notify_all();
        self.demand.notify_one();
    }

    /// Declare closing and wake every wait point on the floor.
    pub fn close(&self) {
        let mut guard = self.inner.lock().expect("dining room mutex poisoned");
        guard.closed = true;
        self.seat_available.notify_all();
        self.demand.notify_all();
        self.soiled_table.notify_all();
    }

    pub fn counts(&self) -> FloorCounts {
        let guard = self.inner.lock().expect("dining room mutex poisoned");
        FloorCounts {
            active: guard.tables.len(),
            occupied: guard.occupied,
            soiled: guard.soiled,
            waiting: guard.waiting,
        }
    }
}
