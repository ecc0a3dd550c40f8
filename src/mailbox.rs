//! Lock-and-condvar FIFO mailboxes backing the order pipeline.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Wake policy applied to blocked consumers when a ticket is pushed.
///
/// The orders mailbox wakes one cook (any idle cook may take the ticket);
/// the ready mailbox wakes every server, since a single wake may land on a
/// worker that is mid-shutdown-check and the dish would sit unclaimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    One,
    All,
}

/// A synchronized FIFO handoff between one actor kind and another.
pub struct Mailbox<T> {
    inner: Mutex<MailboxState<T>>,
    available: Condvar,
    wake: Wake,
}

struct MailboxState<T> {
    queue: VecDeque<T>,
    closed: bool,
}

impl<T> Mailbox<T> {
    pub fn new(wake: Wake) -> Self {
        Self {
            inner: Mutex::new(MailboxState {
                queue: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
            wake,
        }
    }

    /// Push a ticket; returns the ticket back if the mailbox is closed.
    pub fn push(&self, ticket: T) -> Result<(), T> {
        let mut guard = self.inner.lock().expect("mailbox mutex poisoned");
        if guard.closed {
            return Err(ticket);
        }
        guard.queue.push_back(ticket);
        match self.wake {
            Wake::One => self.available.notify_one(),
            Wake::All => self.available.notify_all(),
        }
        Ok(())
    }

    /// Block until a ticket is available or the mailbox is closed and empty.
    ///
    /// `None` is the consumer's exit signal. Before returning it, the wait
    /// condition is re-signaled once so a sibling consumer blocked on the
    /// same condition also observes the shutdown regardless of wake order.
    pub fn pop_blocking_or_closed(&self) -> Option<T> {
        let mut guard = self.inner.lock().expect("mailbox mutex poisoned");
        loop {
            if let Some(ticket) = guard.queue.pop_front() {
                return Some(ticket);
            }
            if guard.closed {
                // Pass the torch to the next blocked sibling.
                self.available.notify_one();
                return None;
            }
            guard = self.available.wait(guard).expect("condvar wait failed");
        }
    }

    /// Close the mailbox and wake all blocked consumers.
    pub fn close(&self) {
        let mut guard = self.inner.lock().expect("mailbox mutex poisoned");
        guard.closed = true;
        self.available.notify_all();
    }

    /// Current number of queued tickets.
    pub fn len(&self) -> usize {
        let guard = self.inner.lock().expect("mailbox mutex poisoned");
        guard.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tickets_dequeue_in_fifo_order() {
        let mailbox = Mailbox::new(Wake::One);
        for id in 0..100u64 {
            mailbox.push(id).expect("mailbox closed");
        }
        for id in 0..100u64 {
            assert_eq!(mailbox.pop_blocking_or_closed(), Some(id));
        }
        assert!(mailbox.is_empty());
    }

    #[test]
    fn pop_wakes_on_push() {
        let mailbox = Arc::new(Mailbox::new(Wake::One));
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let mailbox_clone = Arc::clone(&mailbox);
        let handle = thread::spawn(move || {
            ready_tx.send(()).expect("send ready");
            let ticket = mailbox_clone
                .pop_blocking_or_closed()
                .expect("mailbox closed");
            tx.send(ticket).expect("send ticket");
        });

        ready_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("ready");
        // Pushing after the consumer blocks should wake it.
        mailbox.push(42u64).expect("mailbox closed");

        let received = rx.recv_timeout(Duration::from_secs(1)).expect("recv");
        assert_eq!(received, 42);
        handle.join().expect("consumer thread panicked");
    }

    #[test]
    fn blocked_consumers_each_get_unique_ticket() {
        let mailbox = Arc::new(Mailbox::new(Wake::All));
        let consumers = 4;
        let barrier = Arc::new(Barrier::new(consumers));
        let (ready_tx, ready_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let mut handles = Vec::new();
        for _ in 0..consumers {
            let mailbox = Arc::clone(&mailbox);
            let barrier = Arc::clone(&barrier);
            let ready_tx = ready_tx.clone();
            let done_tx = done_tx.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                ready_tx.send(()).expect("ready");
                let ticket = mailbox.pop_blocking_or_closed().expect("mailbox closed");
                done_tx.send(ticket).expect("done");
            }));
        }

        for _ in 0..consumers {
            ready_rx
                .recv_timeout(Duration::from_secs(1))
                .expect("ready recv");
        }

        for id in 0..consumers as u64 {
            mailbox.push(id).expect("mailbox closed");
        }

        let mut seen = std::collections::HashSet::new();
        for _ in 0..consumers {
            let id = done_rx
                .recv_timeout(Duration::from_secs(1))
                .expect("done recv");
            assert!(seen.insert(id));
        }

        for handle in handles {
            handle.join().expect("consumer thread panicked");
        }
        assert!(mailbox.is_empty());
    }

    #[test]
    fn close_unblocks_every_sibling() {
        let mailbox: Arc<Mailbox<u64>> = Arc::new(Mailbox::new(Wake::One));
        let consumers = 3;
        let (ready_tx, ready_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let mut handles = Vec::new();
        for _ in 0..consumers {
            let mailbox = Arc::clone(&mailbox);
            let ready_tx = ready_tx.clone();
            let done_tx = done_tx.clone();
            handles.push(thread::spawn(move || {
                ready_tx.send(()).expect("ready");
                let ticket = mailbox.pop_blocking_or_closed();
                done_tx.send(ticket.is_none()).expect("done");
            }));
        }

        for _ in 0..consumers {
            ready_rx
                .recv_timeout(Duration::from_secs(1))
                .expect("ready recv");
        }
        mailbox.close();

        for _ in 0..consumers {
            let exited = done_rx
                .recv_timeout(Duration::from_secs(1))
                .expect("done recv");
            assert!(exited);
        }
        for handle in handles {
            handle.join().expect("consumer thread panicked");
        }
    }

    #[test]
    fn last_ticket_and_close_race_leaves_no_sleeper() {
        let mailbox: Arc<Mailbox<u64>> = Arc::new(Mailbox::new(Wake::One));
        let (ready_tx, ready_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let mut handles = Vec::new();
        for _ in 0..2 {
            let mailbox = Arc::clone(&mailbox);
            let ready_tx = ready_tx.clone();
            let done_tx = done_tx.clone();
            handles.push(thread::spawn(move || {
                ready_tx.send(()).expect("ready");
                let ticket = mailbox.pop_blocking_or_closed();
                done_tx.send(ticket).expect("done");
            }));
        }
        for _ in 0..2 {
            ready_rx
                .recv_timeout(Duration::from_secs(1))
                .expect("ready recv");
        }

        // One wake lands on a consumer, the close must reach the other.
        mailbox.push(7).expect("mailbox closed");
        mailbox.close();

        let mut outcomes = Vec::new();
        for _ in 0..2 {
            outcomes.push(
                done_rx
                    .recv_timeout(Duration::from_secs(1))
                    .expect("done recv"),
            );
        }
        for handle in handles {
            handle.join().expect("consumer thread panicked");
        }
        outcomes.sort();
        assert_eq!(outcomes, vec![None, Some(7)]);
    }

    #[test]
    fn push_fails_after_close() {
        let mailbox = Mailbox::new(Wake::One);
        mailbox.close();
        assert_eq!(mailbox.push(1u64), Err(1));
    }
}
