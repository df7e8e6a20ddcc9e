// prawn-client/tests/reconciliation.rs
// Snapshot + push stream reconciliation, end to end over the in-memory feed.

use std::time::Duration;

use prawn_client::{ChannelClient, Flow, LiveBoard};
use shared::channel::ChannelEvent;
use shared::models::{Order, OrderLine, OrderPatch, OrderStatus};
use tokio::sync::broadcast;

fn order(id: i64, name: &str, price_cents: i64, quantity: i32) -> Order {
    Order {
        id,
        customer_name: Some("walk-in".to_string()),
        table_name: None,
        phone: None,
        payment_method: "CASH".to_string(),
        total_cents: price_cents * i64::from(quantity),
        status: OrderStatus::Pending,
        lines: vec![OrderLine {
            item_id: id,
            name: name.to_string(),
            price_cents,
            quantity,
        }],
        created_at: 0,
    }
}

async fn wait_until(mut pred: impl FnMut() -> bool) {
    for _ in 0..200 {
        if pred() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_board_applies_stream_in_arrival_order() {
    let (feed, _keep) = broadcast::channel::<String>(64);
    let channel = ChannelClient::memory(&feed);

    let mut board = LiveBoard::new(Flow::Counter);
    board.attach(&channel);

    feed.send(ChannelEvent::NewOrder { order: order(1, "Dosa", 250, 2) }.encode())
        .unwrap();
    feed.send(ChannelEvent::NewOrder { order: order(2, "Coffee", 120, 1) }.encode())
        .unwrap();
    wait_until(|| board.len() == 2).await;

    // newest first
    let ids: Vec<i64> = board.orders().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![2, 1]);

    feed.send(
        ChannelEvent::UpdateOrder {
            id: 1,
            fields: OrderPatch {
                status: Some(OrderStatus::Completed),
                ..Default::default()
            },
        }
        .encode(),
    )
    .unwrap();
    wait_until(|| {
        board
            .orders()
            .iter()
            .any(|o| o.id == 1 && o.status == OrderStatus::Completed)
    })
    .await;

    feed.send(ChannelEvent::DeleteOrder { id: 2 }.encode()).unwrap();
    wait_until(|| board.len() == 1).await;

    let totals = board.aggregates();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].name, "Dosa");
    assert_eq!(totals[0].quantity, 2);
}

#[tokio::test]
async fn test_malformed_and_unknown_frames_are_dropped() {
    let (feed, _keep) = broadcast::channel::<String>(64);
    let channel = ChannelClient::memory(&feed);

    let mut board = LiveBoard::new(Flow::Counter);
    board.attach(&channel);

    feed.send("{not json".to_string()).unwrap();
    feed.send(r#"{"type":"kitchen_display_ping","id":1}"#.to_string())
        .unwrap();
    feed.send(ChannelEvent::NewOrder { order: order(5, "Vada", 300, 1) }.encode())
        .unwrap();

    // the valid frame behind the bad ones still lands
    wait_until(|| board.len() == 1).await;
    assert_eq!(board.orders()[0].id, 5);
}

#[tokio::test]
async fn test_duplicate_create_frame_inserts_once() {
    let (feed, _keep) = broadcast::channel::<String>(64);
    let channel = ChannelClient::memory(&feed);

    let mut board = LiveBoard::new(Flow::Counter);
    board.attach(&channel);

    let frame = ChannelEvent::NewOrder { order: order(9, "Idli", 100, 4) }.encode();
    feed.send(frame.clone()).unwrap();
    feed.send(frame).unwrap();
    // force a round trip behind both frames
    feed.send(ChannelEvent::NewOrder { order: order(10, "Chai", 80, 1) }.encode())
        .unwrap();
    wait_until(|| board.len() == 2).await;

    assert_eq!(board.orders().iter().filter(|o| o.id == 9).count(), 1);
    // conservation over the whole board
    let emitted: i64 = board.aggregates().iter().map(|t| t.quantity).sum();
    assert_eq!(emitted, 5);
}

#[tokio::test]
async fn test_counter_board_ignores_table_flow() {
    let (feed, _keep) = broadcast::channel::<String>(64);
    let channel = ChannelClient::memory(&feed);

    let mut counter = LiveBoard::new(Flow::Counter);
    counter.attach(&channel);
    let mut tables = LiveBoard::new(Flow::Table);
    tables.attach(&channel);

    let mut table_order = order(3, "Thali", 1500, 1);
    table_order.customer_name = None;
    table_order.table_name = Some("T1".to_string());

    feed.send(ChannelEvent::NewTableOrder { order: table_order }.encode())
        .unwrap();
    wait_until(|| tables.len() == 1).await;

    assert!(counter.is_empty());
    assert_eq!(tables.orders()[0].table_name.as_deref(), Some("T1"));
}

#[tokio::test]
async fn test_detach_stops_applying() {
    let (feed, _keep) = broadcast::channel::<String>(64);
    let channel = ChannelClient::memory(&feed);

    let mut board = LiveBoard::new(Flow::Counter);
    board.attach(&channel);

    feed.send(ChannelEvent::NewOrder { order: order(1, "Dosa", 250, 1) }.encode())
        .unwrap();
    wait_until(|| board.len() == 1).await;

    board.detach();
    assert!(!board.is_attached());

    feed.send(ChannelEvent::NewOrder { order: order(2, "Coffee", 120, 1) }.encode())
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(board.len(), 1);
}
