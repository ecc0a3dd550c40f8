//! Actor bodies and the day cycle: admission, closing broadcast, draining.
//!
//! Lock discipline: each shared resource (dining room, each mailbox, stock,
//! ledger, per-order handshake) has its own lock, and every actor takes at
//! most one of them at a time. Simulated delays always sleep with no lock
//! held.
//!
//! Closing happens in two stages. Stage one closes the dining room: blocked
//! table-waiters leave, the manager and (once nothing is soiled) the
//! cleaning crew go home, but seated customers keep dining. Once the whole
//! cohort has been joined the pipeline is quiescent, and stage two closes
//! the mailboxes and the stock room so cooks, servers, and the keeper all
//! observe closed-and-empty and exit. This ordering is what guarantees that
//! an accepted order is always cooked, delivered, and paid for.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use rand::Rng;

use crate::config::{COOKS, Config, SERVERS};
use crate::mailbox::{Mailbox, Wake};
use crate::rendezvous::Rendezvous;
use crate::state::{Ledger, WeekReport};
use crate::stock::Stock;
use crate::tables::DiningRoom;
use crate::types::{CustomerId, MENU_SIZE, Order, Seating, Weekday};

/// Shared handles for one business day. The dining room and mailboxes are
/// rebuilt every morning; stock, ledger, and menu persist across the week.
struct House {
    cfg: Config,
    floor: DiningRoom,
    orders: Mailbox<Order>,
    ready: Mailbox<Order>,
    stock: Arc<Stock>,
    ledger: Arc<Ledger>,
    prices: Arc<Vec<u64>>,
}

fn customer_life(house: &House, id: CustomerId) {
    let mut rng = rand::thread_rng();
    log::info!("[CUSTOMER] customer {id} arrived");
    let table = match house.floor.request_table(id, house.cfg.patience()) {
        Seating::Granted(table) => table,
        Seating::Abandoned => {
            log::info!("[CUSTOMER] customer {id} ran out of patience and left");
            house.ledger.record_departure();
            return;
        }
        Seating::RestaurantClosed => {
            log::info!("[CUSTOMER] customer {id} found the restaurant closed and left");
            house.ledger.record_departure();
            return;
        }
    };
    log::info!("[CUSTOMER] customer {id} seated at table {table}");

    let dish = rng.gen_range(0..MENU_SIZE);
    let handshake = Arc::new(Rendezvous::new());
    log::info!("[CUSTOMER] customer {id} ordered dish {dish}");
    let order = Order {
        customer: id,
        dish,
        table,
        handshake: Arc::clone(&handshake),
    };
    if house.orders.push(order).is_err() {
        // Kitchen is no longer taking orders; leave without eating.
        log::info!("[CUSTOMER] customer {id} could not order and left");
        house.floor.release_table(table, false);
        house.ledger.record_departure();
        return;
    }

    handshake.await_dish();
    log::info!("[CUSTOMER] customer {id} eating");
    thread::sleep(house.cfg.units(rng.gen_range(3..=6)));

    handshake.request_bill();
    handshake.await_receipt();

    let soiled = rng.gen_bool(0.5);
    house.floor.release_table(table, soiled);
    let condition = if soiled { "soiled" } else { "clean" };
    log::info!("[CUSTOMER] customer {id} paid and left table {table} {condition}");
    house.ledger.record_departure();
}

fn cook_shift(house: &House) {
    while let Some(order) = house.orders.pop_blocking_or_closed() {
        log::info!(
            "[KITCHEN] picked up order from customer {} (dish {})",
            order.customer,
            order.dish
        );
        if !house.stock.take(order.dish) {
            // Unreachable under the two-stage drain; kept so a blocked cook
            // can never outlive the day if the protocol is misused.
            log::warn!(
                "[KITCHEN] stock room closed mid-shortage, dropping order from customer {}",
                order.customer
            );
            break;
        }
        let prep = house.cfg.units(rand::thread_rng().gen_range(2..=4));
        // Cooking happens with no lock held.
        thread::sleep(prep);
        log::info!(
            "[KITCHEN] dish {} ready for customer {}",
            order.dish,
            order.customer
        );
        if let Err(order) = house.ready.push(order) {
            log::warn!(
                "[KITCHEN] service closed, dropping dish for customer {}",
                order.customer
            );
            break;
        }
    }
    log::info!("[KITCHEN] cook going home");
}

fn server_shift(house: &House) {
    while let Some(order) = house.ready.pop_blocking_or_closed() {
        log::info!(
            "[SERVICE] delivering dish {} to customer {} at table {}",
            order.dish,
            order.customer,
            order.table
        );
        thread::sleep(house.cfg.units(1));
        order.handshake.serve();
        // This server owns the table from delivery through payment.
        order.handshake.await_bill_request();
        thread::sleep(house.cfg.units(1));
        house.ledger.record_sale(house.prices[order.dish]);
        order.handshake.confirm_payment();
        log::info!("[SERVICE] payment collected from customer {}", order.customer);
    }
    log::info!("[SERVICE] server going home");
}

fn keeper_shift(house: &House) {
    while house.stock.await_shortage() {
        log::info!("[STOCK] keeper woken, sweeping the pantry");
        let restocked = house.stock.restock_sweep();
        log::info!("[STOCK] sweep done, {restocked} ingredient(s) restocked");
    }
    log::info!("[STOCK] keeper going home");
}

fn cleaner_shift(house: &House) {
    while let Some(table) = house.floor.await_soiled() {
        log::info!("[CLEANING] scrubbing table {table}");
        thread::sleep(house.cfg.units(2));
        house.floor.finish_cleaning(table);
        log::info!("[CLEANING] table {table} back in service");
    }
    log::info!("[CLEANING] crew going home");
}

fn manager_shift(house: &House) {
    while house.floor.manage_once() {}
    log::info!("[FLOOR] table manager going home");
}

fn spawn_staff(name: String, house: &Arc<House>, shift: fn(&House)) -> thread::JoinHandle<()> {
    let house = Arc::clone(house);
    thread::Builder::new()
        .name(name)
        .spawn(move || shift(&house))
        .expect("failed to spawn staff thread")
}

/// One business day: Opening, Admitting, Closing, Draining. Settling is the
/// caller's job once this returns.
fn run_day(day: Weekday, house: &Arc<House>) {
    log::info!("[DAY] {} open for business", day.label());
    house.ledger.open_day();
    house.stock.reopen();

    let mut staff = Vec::new();
    staff.push(spawn_staff("table-manager".to_string(), house, manager_shift));
    staff.push(spawn_staff("cleaner".to_string(), house, cleaner_shift));
    staff.push(spawn_staff("stock-keeper".to_string(), house, keeper_shift));
    for cook in 1..=COOKS {
        staff.push(spawn_staff(format!("cook-{cook}"), house, cook_shift));
    }
    for server in 1..=SERVERS {
        staff.push(spawn_staff(format!("server-{server}"), house, server_shift));
    }

    // Admitting: randomized arrivals, bounded by both the daily cap and the
    // elapsed-open budget; both triggers are re-checked every iteration.
    let mut diners = Vec::new();
    let opened_at = Instant::now();
    let budget = house.cfg.admitting_budget();
    let mut rng = rand::thread_rng();
    let mut admitted: CustomerId = 0;
    while admitted < house.cfg.max_customers_per_day && opened_at.elapsed() < budget {
        thread::sleep(house.cfg.units(rng.gen_range(1..=3)));
        if opened_at.elapsed() >= budget {
            break;
        }
        admitted += 1;
        house.ledger.record_admission();
        let id = admitted;
        let house_for_customer = Arc::clone(house);
        let handle = thread::Builder::new()
            .name(format!("customer-{id}"))
            .spawn(move || customer_life(&house_for_customer, id))
            .expect("failed to spawn customer thread");
        diners.push(handle);
    }
    log::info!("[DAY] admissions closed after {admitted} customer(s)");

    // Closing, stage one: no new seatings. Seated customers keep dining.
    house.ledger.close_day();
    house.floor.close();

    // Draining: the full join barrier over the day's customer cohort.
    for handle in diners {
        handle.join().expect("customer thread panicked");
    }

    // Closing, stage two: the floor is empty, so the mailboxes have drained
    // and no new shortage can appear. Send the staff home.
    house.orders.close();
    house.ready.close();
    house.stock.close();
    for handle in staff {
        handle.join().expect("staff thread panicked");
    }
    log::info!("[DAY] {} drained, everyone is out", day.label());
}

/// Run the full seven-day week and return the accumulated totals.
pub fn run_week(cfg: &Config) -> WeekReport {
    let mut rng = rand::thread_rng();
    let prices: Arc<Vec<u64>> = Arc::new((0..MENU_SIZE).map(|_| rng.gen_range(10..=50)).collect());
    for (dish, price) in prices.iter().enumerate() {
        log::info!("[WEEK] menu: dish {dish} sells at {price}");
    }
    let stock = Arc::new(Stock::new(MENU_SIZE, cfg.stock_ceiling));
    let ledger = Arc::new(Ledger::new());

    for day in Weekday::WEEK {
        if !day.is_operating() {
            log::info!("[WEEK] {} is a rest day", day.label());
            thread::sleep(cfg.units(2));
            continue;
        }
        let house = Arc::new(House {
            cfg: cfg.clone(),
            floor: DiningRoom::new(cfg.max_tables),
            orders: Mailbox::new(Wake::One),
            ready: Mailbox::new(Wake::All),
            stock: Arc::clone(&stock),
            ledger: Arc::clone(&ledger),
            prices: Arc::clone(&prices),
        });
        run_day(day, &house);
        let day_profit = ledger.settle_day();
        log::info!("[DAY] {} settled with profit {day_profit}", day.label());
    }

    let report = ledger.week_report();
    log::info!(
        "[WEEK] week closed: profit {}, {} dishes sold, {} customers through the door",
        report.profit,
        report.dishes_sold,
        report.customers_admitted
    );
    report
}
