//! Shared identifiers, the order ticket, and the week calendar.

use std::sync::Arc;

use crate::rendezvous::Rendezvous;

/// Unique identifier for a customer within a day.
pub type CustomerId = u32;
/// Index of a table in the active pool.
pub type TableId = usize;
/// Index into the fixed menu.
pub type DishId = usize;

/// Number of dish types on the menu; also the number of ingredient kinds.
pub const MENU_SIZE: usize = 5;

/// Status of one table in the active pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableStatus {
    Free,
    Occupied,
    /// Non-assignable until the cleaning crew frees it.
    Soiled,
}

/// Outcome of a customer's attempt to get a table.
///
/// `Abandoned` and `RestaurantClosed` are ordinary business outcomes,
/// not errors; the caller leaves without ordering.
#[derive(Debug, PartialEq, Eq)]
pub enum Seating {
    Granted(TableId),
    Abandoned,
    RestaurantClosed,
}

/// A single order moving through the pipeline.
///
/// Exactly one stage owns the ticket at a time: the customer creates it,
/// the orders mailbox holds it, a cook carries it to the ready mailbox,
/// and the delivering server consumes it.
pub struct Order {
    pub customer: CustomerId,
    pub dish: DishId,
    pub table: TableId,
    /// Handle the customer and the delivering server synchronize on.
    pub handshake: Arc<Rendezvous>,
}

/// Day of the simulated week. The restaurant does not operate on weekends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const WEEK: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn is_operating(self) -> bool {
        !matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}
