// ============================================================================
// Basic Usage Example
// ============================================================================

use limit_order_exchange::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() {
    println!("=== Matching Engine Example ===\n");

    let engine = MatchingEngineBuilder::new()
        .with_event_handler(Arc::new(LoggingEventHandler))
        .build()
        .expect("default configuration is valid");

    println!("Created matching engine ({})\n", engine.algorithm_name());

    // Add sell orders at different prices
    println!("Adding sell orders...");
    for i in 0i64..5 {
        let sell = OrderInput::sell("SONY", 10, Decimal::from(101 + i));
        let report = engine.submit_order(sell).expect("valid order");
        println!("  accepted {}", report.order);
    }

    // Add buy orders
    println!("Adding buy orders...");
    for i in 0i64..5 {
        let buy = OrderInput::buy("SONY", 10, Decimal::from(99 - i));
        let report = engine.submit_order(buy).expect("valid order");
        println!("  accepted {}", report.order);
    }

    println!("\n=== Order Book Snapshot ===");
    print_book(&engine);

    // Buy order that crosses the first two ask levels
    println!("\n=== Submitting Crossing Buy ===");
    let report = engine
        .submit_order(OrderInput::buy("SONY", 25, Decimal::from(102)))
        .expect("valid order");

    for trade in &report.trades {
        println!("  {}", trade);
    }
    println!(
        "  incoming {} ({:?}, rested: {})",
        report.order, report.order.status, report.rested
    );

    println!("\n=== Final Order Book ===");
    print_book(&engine);

    println!("\nPositions: {:?}", engine.positions());

    // Invalid orders are rejected without touching the book
    match engine.submit_order(OrderInput::sell("SONY", 0, Decimal::from(100))) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(err) => println!("Rejected: {}", err),
    }
}

fn print_book(engine: &MatchingEngine) {
    let snapshots = engine.snapshot(Some("SONY")).expect("SONY has a book");
    for snapshot in snapshots {
        for level in &snapshot.levels {
            println!(
                "  {:>5} | {:>8.2} | {:<5}",
                level.bid_quantity, level.price, level.ask_quantity
            );
        }
        println!("Spread: {:?}", snapshot.spread);
        println!("Mid Price: {:?}", snapshot.mid_price);
    }
}
