mod config;
mod logging;
mod mailbox;
mod rendezvous;
mod sim;
mod state;
mod stock;
mod tables;
mod types;

use std::time::Duration;

use config::Config;

fn print_usage(program: &str) {
    let defaults = Config::default();
    println!("Osteria week simulator");
    println!("Usage:");
    println!("  {program} (run a week with defaults)");
    println!("  {program} run [customers_per_day] [max_tables] [stock_ceiling] [time_unit_ms]");
    println!("  {program} --help");
    println!();
    println!("Use \"-\" to keep a value at its default.");
    println!(
        "Defaults: customers_per_day={} max_tables={} stock_ceiling={} time_unit_ms={}",
        defaults.max_customers_per_day,
        defaults.max_tables,
        defaults.stock_ceiling,
        defaults.time_unit.as_millis()
    );
}

fn exit_with_usage(program: &str, message: &str) -> ! {
    eprintln!("{message}");
    print_usage(program);
    std::process::exit(2);
}

fn parse_override<T: std::str::FromStr>(program: &str, name: &str, arg: Option<String>) -> Option<T> {
    let arg = arg?;
    if arg == "-" {
        return None;
    }
    match arg.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => exit_with_usage(program, &format!("run: invalid {name} value: {arg}")),
    }
}

fn main() {
    logging::init();
    let program = std::env::args().next().unwrap_or_else(|| "osteria".to_string());
    let mut args = std::env::args().skip(1);

    let cfg = match args.next().as_deref() {
        Some("run") => {
            let mut cfg = Config::default();
            if let Some(value) = parse_override(&program, "customers_per_day", args.next()) {
                cfg.max_customers_per_day = value;
            }
            if let Some(value) = parse_override(&program, "max_tables", args.next()) {
                cfg.max_tables = value;
            }
            if let Some(value) = parse_override(&program, "stock_ceiling", args.next()) {
                cfg.stock_ceiling = value;
            }
            if let Some(value) = parse_override::<u64>(&program, "time_unit_ms", args.next()) {
                cfg.time_unit = Duration::from_millis(value);
            }
            if let Some(extra) = args.next() {
                exit_with_usage(&program, &format!("run: unexpected argument: {extra}"));
            }
            cfg
        }
        Some("--help") | Some("-h") | Some("help") => {
            print_usage(&program);
            return;
        }
        Some(other) => exit_with_usage(&program, &format!("unknown command: {other}")),
        None => Config::default(),
    };

    if cfg.max_tables == 0 {
        exit_with_usage(&program, "run error: max_tables must be > 0");
    }
    if cfg.stock_ceiling == 0 {
        // A ceiling of zero would leave a shortage no sweep can clear.
        exit_with_usage(&program, "run error: stock_ceiling must be > 0");
    }
    if cfg.time_unit.is_zero() {
        exit_with_usage(&program, "run error: time_unit_ms must be > 0");
    }

    let report = sim::run_week(&cfg);

    println!("WEEK SUMMARY");
    println!("weekly_profit={}", report.profit);
    println!("dishes_sold={}", report.dishes_sold);
    println!("customers_admitted={}", report.customers_admitted);
}
