//! Bot integration tests
//!
//! Each test runs the bot against a real WebSocket server on localhost.
//!
//! Run with: cargo test -p integration-tests --test bot_tests

use cqbot::{Bot, Command};
use cqbot_core::{ChatTarget, EventType};
use cqbot_gateway::codec::cq_code;
use cqbot_gateway::{on_message_id, ConnectionState, GatewayError, WebSocketConnector};
use integration_tests::{
    group_message, heartbeat, next_message_id, private_message, send_ok, test_config,
    unused_url, GatewayConnection, TestGateway, FRAME_TIMEOUT,
};
use std::time::Duration;
use tokio::sync::mpsc;

async fn connect_bot() -> (Bot, GatewayConnection) {
    let gateway = TestGateway::bind().await.unwrap();
    let bot = Bot::new(&test_config(&gateway.url()).unwrap());

    let (started, connection) = tokio::join!(bot.start(&WebSocketConnector), gateway.accept());
    started.unwrap();
    (bot, connection.unwrap())
}

async fn wait_for_state(bot: &Bot, state: ConnectionState) {
    tokio::time::timeout(FRAME_TIMEOUT, async {
        while bot.client().state() != state {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

// ============================================================================
// Connection lifecycle
// ============================================================================

#[tokio::test]
async fn test_connect_failure_stops_bot() {
    let bot = Bot::new(&test_config(&unused_url().await.unwrap()).unwrap());

    let result = bot.start(&WebSocketConnector).await;

    assert!(matches!(result, Err(GatewayError::Connect { .. })));
    assert_eq!(bot.client().state(), ConnectionState::Stopped);
}

#[tokio::test]
async fn test_gateway_close_stops_bot() {
    let (bot, mut connection) = connect_bot().await;
    assert_eq!(bot.client().state(), ConnectionState::Connected);

    connection.close().await.unwrap();
    wait_for_state(&bot, ConnectionState::Stopped).await;
}

#[tokio::test]
async fn test_bot_close_hangs_up() {
    let (bot, mut connection) = connect_bot().await;

    bot.close();

    assert!(connection.recv_json().await.unwrap().is_none());
}

// ============================================================================
// Commands
// ============================================================================

#[tokio::test]
async fn test_help_page_two() {
    let (bot, mut connection) = connect_bot().await;
    for name in ["ping", "roll", "echo", "time", "weather"] {
        bot.add_command(
            Command::new(name, |_| async { anyhow::Ok(()) }).with_description(format!("{name} command")),
        );
    }

    connection
        .send_json(&group_message(next_message_id(), 500, 42, ".help 2"))
        .await
        .unwrap();

    let frame = connection.expect_json().await.unwrap();
    assert_eq!(frame["action"], "send_group_msg");
    assert_eq!(frame["params"]["group_id"], 500);

    let text = cq_code::decode(frame["params"]["message"].as_str().unwrap()).plain_text();
    assert!(text.contains(".time\ntime command"));
    assert!(text.contains(".weather\nweather command"));
    assert!(!text.contains(".echo"));
    assert!(text.ends_with("page 2 of 2"));
}

#[tokio::test]
async fn test_unknown_command_in_private_chat() {
    let (_bot, mut connection) = connect_bot().await;
    let message_id = next_message_id();

    connection
        .send_json(&private_message(message_id, 77, ".foo bar"))
        .await
        .unwrap();

    let frame = connection.expect_json().await.unwrap();
    assert_eq!(frame["action"], "send_private_msg");
    assert_eq!(frame["params"]["user_id"], 77);
    assert_eq!(
        frame["params"]["message"],
        format!("[CQ:reply,id={message_id}]unknown command, send .help for the command list")
    );
}

#[tokio::test]
async fn test_command_handler_round_trip() {
    let (bot, mut connection) = connect_bot().await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    bot.add_command(
        Command::new("echo", move |ctx| {
            let tx = tx.clone();
            async move {
                let text = ctx.params.join(" ");
                ctx.bot
                    .client()
                    .send_text(
                        &ctx.source,
                        &text,
                        Some(on_message_id(move |id| async move {
                            tx.send(id)?;
                            anyhow::Ok(())
                        })),
                    )
                    .await?;
                anyhow::Ok(())
            }
        })
        .with_alias("say"),
    );

    connection
        .send_json(&group_message(next_message_id(), 600, 1, ".say hello  world"))
        .await
        .unwrap();

    let frame = connection.expect_json().await.unwrap();
    assert_eq!(frame["params"]["message"], "hello world");
    assert!(frame["echo"].is_u64());

    connection.send_json(&send_ok(&frame["echo"], 4242)).await.unwrap();

    let sent_id = tokio::time::timeout(FRAME_TIMEOUT, rx.recv()).await.unwrap();
    assert_eq!(sent_id, Some(4242));
    assert_eq!(bot.client().pending_requests(), 0);
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_heartbeat_reaches_listener() {
    let (bot, mut connection) = connect_bot().await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    bot.client().add_listener(EventType::HeartBeat, move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event)?;
            anyhow::Ok(())
        }
    });

    connection.send_json(&heartbeat(5000)).await.unwrap();

    let event = tokio::time::timeout(FRAME_TIMEOUT, rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.event_type(), EventType::HeartBeat);
}

#[tokio::test]
async fn test_garbage_frames_do_not_break_the_connection() {
    let (bot, mut connection) = connect_bot().await;

    connection
        .send_json(&serde_json::json!({"post_type": "notice", "notice_type": "group_increase"}))
        .await
        .unwrap();
    connection
        .send_json(&serde_json::json!({"echo": 1, "data": null}))
        .await
        .unwrap();
    connection
        .send_json(&group_message(next_message_id(), 1, 2, ".nope"))
        .await
        .unwrap();

    let frame = connection.expect_json().await.unwrap();
    assert!(frame["params"]["message"]
        .as_str()
        .unwrap()
        .contains("unknown command"));
    assert_eq!(bot.client().state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_send_to_invalid_target() {
    let (bot, _connection) = connect_bot().await;

    let result = bot
        .client()
        .send_text(&ChatTarget::group("general"), "hi", None)
        .await;

    assert!(matches!(result, Err(GatewayError::InvalidTarget(_))));
}
