//! In-process demo: a fake kitchen feed drives a counter board while a
//! kiosk session builds a cart.
//!
//! Run with: cargo run -p prawn-client --example live_board

use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;

use prawn_client::{CartEngine, ChannelClient, Flow, LiveBoard, MemoryStore, SessionManager};
use shared::channel::ChannelEvent;
use shared::models::{Order, OrderLine, OrderPatch, OrderStatus};
use shared::money::format_cents;
use shared::util::{now_millis, snowflake_id};

fn kitchen_order(customer: &str, lines: Vec<(&str, i64, i32)>) -> Order {
    let lines: Vec<OrderLine> = lines
        .into_iter()
        .map(|(name, price_cents, quantity)| OrderLine {
            item_id: snowflake_id(),
            name: name.to_string(),
            price_cents,
            quantity,
        })
        .collect();
    Order {
        id: snowflake_id(),
        customer_name: Some(customer.to_string()),
        table_name: None,
        phone: None,
        payment_method: "CASH".to_string(),
        total_cents: lines
            .iter()
            .map(|l| l.price_cents * i64::from(l.quantity))
            .sum(),
        status: OrderStatus::Pending,
        lines,
        created_at: now_millis(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ========== Staff board over an in-memory feed ==========

    let (feed, _keep) = broadcast::channel::<String>(64);
    let channel = ChannelClient::memory(&feed);

    let mut board = LiveBoard::new(Flow::Counter);
    board.attach(&channel);

    let first = kitchen_order("Asha", vec![("Masala Dosa", 250, 2), ("Filter Coffee", 120, 1)]);
    let first_id = first.id;
    feed.send(ChannelEvent::NewOrder { order: first }.encode())?;
    feed.send(
        ChannelEvent::NewOrder {
            order: kitchen_order("Ravi", vec![("Filter Coffee", 120, 2)]),
        }
        .encode(),
    )?;
    feed.send(
        ChannelEvent::UpdateOrder {
            id: first_id,
            fields: OrderPatch {
                status: Some(OrderStatus::Completed),
                ..Default::default()
            },
        }
        .encode(),
    )?;
    // unknown discriminators are no-ops
    feed.send(r#"{"type":"printer_status","online":true}"#.to_string())?;

    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("Live orders (newest first):");
    for order in board.orders() {
        println!(
            "  #{} {}: {} [{:?}]",
            order.id,
            order.party().unwrap_or("-"),
            format_cents(order.total_cents),
            order.status,
        );
    }
    println!("Kitchen totals:");
    for item in board.aggregates() {
        println!("  {} × {}", item.quantity, item.name);
    }

    // ========== Kiosk flow: session + cart ==========

    let mut manager = SessionManager::with_ttl(MemoryStore::new(), Duration::from_secs(2));
    manager.begin("Meera", "9876543210", 1)?;
    manager.activate()?;
    let mut evictions = manager.subscribe_evictions();

    let mut cart = CartEngine::load(manager.storage())?;
    cart.add(1, "Masala Dosa", 250)?;
    cart.add(1, "Masala Dosa", 250)?;
    cart.add(2, "Filter Coffee", 120)?;
    cart.decrement(2)?;
    println!(
        "Kiosk cart: {} item(s), total {}",
        cart.cart().len(),
        format_cents(cart.total_cents()),
    );

    // let the short demo TTL run out instead of checking out
    evictions.recv().await?;
    println!("Session expired, cart cleared; back to the entry form.");

    board.detach();
    channel.shutdown();
    Ok(())
}
