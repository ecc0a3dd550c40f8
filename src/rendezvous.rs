//! Two-phase handshake between a customer and the server delivering its dish.
//!
//! Phase order is strict: the dish is served, the customer eats and asks for
//! the bill, the server collects payment, and only then does the customer
//! vacate the table. The handshake has no closed-exit: a ticket that reached
//! the ready queue is always delivered and paid for, because the supervisor
//! drains seated customers before telling the pipeline to shut down.

use std::sync::{Condvar, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    AwaitingDish,
    Served,
    BillRequested,
    Paid,
}

pub struct Rendezvous {
    phase: Mutex<Phase>,
    advanced: Condvar,
}

impl Rendezvous {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::AwaitingDish),
            advanced: Condvar::new(),
        }
    }

    fn advance_to(&self, next: Phase) {
        let mut guard = self.phase.lock().expect("rendezvous mutex poisoned");
        debug_assert!(*guard < next, "handshake phase moved backwards");
        *guard = next;
        self.advanced.notify_all();
    }

    fn wait_for(&self, wanted: Phase) {
        let mut guard = self.phase.lock().expect("rendezvous mutex poisoned");
        while *guard < wanted {
            guard = self.advanced.wait(guard).expect("condvar wait failed");
        }
    }

    // Server side.

    /// Hand the dish over and wake the waiting customer.
    pub fn serve(&self) {
        self.advance_to(Phase::Served);
    }

    /// Block until the customer finishes eating and asks for the bill.
    pub fn await_bill_request(&self) {
        self.wait_for(Phase::BillRequested);
    }

    /// Acknowledge payment; releases the customer to vacate its table.
    pub fn confirm_payment(&self) {
        self.advance_to(Phase::Paid);
    }

    // Customer side.

    /// Block until the dish arrives.
    pub fn await_dish(&self) {
        self.wait_for(Phase::Served);
    }

    /// Signal the server that this table is ready to pay.
    pub fn request_bill(&self) {
        self.advance_to(Phase::BillRequested);
    }

    /// Block until the server has taken the payment.
    pub fn await_receipt(&self) {
        self.wait_for(Phase::Paid);
    }
}
