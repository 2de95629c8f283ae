// ============================================================================
// Console Exchange
// Interactive command loop and SONY drain simulation over the matching engine
// ============================================================================
//
// Commands:
//   BUY|B [symbol] <qty> <price>
//   SELL|S [symbol] <qty> <price>
//   BOOK [symbol]   TRADES   ALLTRADES   POS   HELP   SIMSONY   QUIT
//
// Run with: cargo run --example console_exchange --features logging
// ============================================================================

use limit_order_exchange::prelude::*;
use rand::Rng;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_SYMBOL: &str = "SONY";
const SEED_SYMBOLS: [&str; 3] = ["SONY", "TM", "HMC"];
const HELP: &str = "Commands: <BUY|B> [symbol] <qty> <price>, <SELL|S> [symbol] <qty> <price>, \
                    BOOK [symbol], TRADES, ALLTRADES, POS, HELP, SIMSONY, QUIT. Default symbol: SONY";

const QTY_WIDTH: usize = 10;
const PRICE_WIDTH: usize = 10;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let engine = match MatchingEngineBuilder::new()
        .with_config(EngineConfig::console())
        .with_event_handler(Arc::new(LoggingEventHandler))
        .build()
    {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("failed to start engine: {}", err);
            return;
        },
    };

    println!("Demo Stock Exchange");
    println!("Pre-populating order book...");
    if let Err(err) = seed_books(&engine) {
        eprintln!("failed to seed books: {}", err);
        return;
    }
    println!("Order book pre-populated.");
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(command) = parts.first().map(|c| c.to_uppercase()) else {
            continue;
        };

        match command.as_str() {
            "QUIT" => break,
            "BOOK" => show_book(&engine, parts.get(1).copied()),
            "TRADES" => show_trades(&engine, false),
            "ALLTRADES" => show_trades(&engine, true),
            "POS" => show_positions(&engine),
            "HELP" => println!("{}", HELP),
            "SIMSONY" => run_sony_exhaust_simulation(&engine, &mut lines),
            "BUY" | "B" => place_order(&engine, Side::Buy, &command, &parts[1..]),
            "SELL" | "S" => place_order(&engine, Side::Sell, &command, &parts[1..]),
            _ => println!("Unknown command. Type HELP for options."),
        }
    }
}

/// Asks at 101..=110, bids at 90..=99, and one order per side at 100
fn seed_books(engine: &MatchingEngine) -> EngineResult<()> {
    let mut rng = rand::thread_rng();
    let mut quantity = || rng.gen_range(50..=200);

    for symbol in SEED_SYMBOLS {
        for price in 101..=110 {
            engine.submit_order(OrderInput::sell(symbol, quantity(), Decimal::from(price)))?;
        }
        for price in 90..=99 {
            engine.submit_order(OrderInput::buy(symbol, quantity(), Decimal::from(price)))?;
        }
        engine.submit_order(OrderInput::sell(symbol, quantity(), Decimal::from(100)))?;
        engine.submit_order(OrderInput::buy(symbol, quantity(), Decimal::from(100)))?;
    }
    Ok(())
}

fn place_order(engine: &MatchingEngine, side: Side, command: &str, params: &[&str]) {
    let (symbol, qty, price) = match params {
        [qty, price] => (DEFAULT_SYMBOL, *qty, *price),
        [symbol, qty, price] => (*symbol, *qty, *price),
        _ => {
            println!("Invalid order format. Use: <{}> [symbol] <qty> <price>", command);
            return;
        },
    };

    let (Ok(qty), Ok(price)) = (qty.parse::<i64>(), Decimal::from_str(price)) else {
        println!("Invalid quantity or price format.");
        return;
    };

    match engine.submit_order(OrderInput::new(side, symbol, qty, price)) {
        Ok(report) => println!("Order accepted: {}", report.order),
        Err(EngineError::InvalidQuantity(_) | EngineError::InvalidPrice(_)) => {
            println!("Quantity and price must be positive.")
        },
        Err(err) => println!("Order rejected: {}", err),
    }
}

fn show_book(engine: &MatchingEngine, symbol: Option<&str>) {
    println!("\nOrder Book Blotter:");

    let snapshots = match engine.snapshot(symbol) {
        Ok(snapshots) => snapshots,
        Err(EngineError::UnknownSymbol(symbol)) => {
            println!("  (No order book found for symbol: {})", symbol);
            return;
        },
        Err(err) => {
            println!("  ({})", err);
            return;
        },
    };

    if snapshots.is_empty() {
        println!("  (Empty)");
        return;
    }

    let rule = "-".repeat(QTY_WIDTH * 2 + PRICE_WIDTH + 6);
    for snapshot in snapshots {
        println!("\n--- {} ---", snapshot.symbol);
        println!(
            "{:<qw$} | {:<pw$} | {:<qw$}",
            "BID",
            "PRICE",
            "ASK",
            qw = QTY_WIDTH,
            pw = PRICE_WIDTH
        );
        println!(
            "{} | {} | {}",
            "-".repeat(QTY_WIDTH),
            "-".repeat(PRICE_WIDTH),
            "-".repeat(QTY_WIDTH)
        );

        if snapshot.is_empty() {
            println!("  (No orders for this symbol)");
        }
        for level in &snapshot.levels {
            println!(
                "{:<qw$} | {:<pw$} | {:<qw$}",
                blank_if_zero(level.bid_quantity),
                format!("{:.2}", level.price),
                blank_if_zero(level.ask_quantity),
                qw = QTY_WIDTH,
                pw = PRICE_WIDTH
            );
        }
        println!("{}", rule);
    }
}

fn blank_if_zero(quantity: Quantity) -> String {
    if quantity == 0 {
        String::new()
    } else {
        quantity.to_string()
    }
}

fn show_trades(engine: &MatchingEngine, show_all: bool) {
    let trades = if show_all {
        println!("\nAll Trades:");
        engine.all_trades()
    } else {
        println!(
            "\nRecent Trades (last {}):",
            engine.config().recent_trades_window
        );
        engine.default_recent_trades()
    };

    if trades.is_empty() {
        println!("  (No trades yet)");
    }
    for trade in trades {
        println!("  {}", trade);
    }
}

fn show_positions(engine: &MatchingEngine) {
    println!("\nNet Market Positions:");
    let positions = engine.positions();
    if positions.is_empty() {
        println!("  (No trades executed yet or no net positions)");
    }
    for (symbol, net) in positions {
        println!("  {}: {}", symbol, net);
    }
}

/// Drain SONY: hit the best ask with an exactly matching buy until no asks
/// remain, then do the same to the bids.
fn run_sony_exhaust_simulation<B: BufRead>(engine: &MatchingEngine, lines: &mut io::Lines<B>) {
    println!("\n--- Starting SONY Exhaustion Simulation ---");

    for side in [Side::Sell, Side::Buy] {
        let label = match side {
            Side::Sell => "ASKS",
            Side::Buy => "BIDS",
        };
        println!("\n--- Simulating: Exhausting {} for {} ---", label, DEFAULT_SYMBOL);

        loop {
            let best = match side {
                Side::Sell => engine.best_ask(DEFAULT_SYMBOL),
                Side::Buy => engine.best_bid(DEFAULT_SYMBOL),
            };
            let Ok(Some(best)) = best else {
                println!("No more {} for {} to exhaust.", label, DEFAULT_SYMBOL);
                break;
            };

            println!("\nSim: Current best {} for {}: {}", &label[..3], DEFAULT_SYMBOL, best);
            let input = OrderInput::new(
                side.opposite(),
                DEFAULT_SYMBOL,
                best.remaining_quantity,
                best.price,
            );
            match engine.submit_order(input) {
                Ok(report) => println!("Sim: Order {} placed.", report.order),
                Err(err) => {
                    println!("Sim: order rejected: {}", err);
                    break;
                },
            }

            show_book(engine, Some(DEFAULT_SYMBOL));
            show_trades(engine, false);
            print!("Press Enter to continue simulation...");
            let _ = io::stdout().flush();
            if !matches!(lines.next(), Some(Ok(_))) {
                return;
            }
        }
    }

    println!("\n--- SONY Exhaustion Simulation Finished ---");
}
