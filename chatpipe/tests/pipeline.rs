//! End-to-end tests for the pipeline engine.

mod common;

use chatpipe::{
    BoxError, Bot, BotError, ChatMessage, CommandOptions, CommandResult, ConfigHandle,
    Invocation, OutboundMessage, Transport,
    testing::{CountingHandler, RecordingTransport, SpyStage},
};
use std::sync::{Arc, Mutex};
use common::{HOME, bot, home, with_logs};
use futures::stream;

#[tokio::test]
async fn command_reply_is_sent_to_home_room() {
    let (bot, transport, _) = bot();

    bot.process(vec![home("<p>!echo hi</p>")]).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "hi");
    assert_eq!(sent[0].channel, HOME);
    assert!(!sent[0].global);
    assert!(sent[0].show_badge);
}

#[tokio::test]
async fn records_are_processed_in_arrival_order() {
    let (bot, transport, _) = bot();

    bot.process(vec![home("!echo one"), home("!echo two"), home("!echo three")])
        .await;

    assert_eq!(transport.sent_texts(), vec!["one", "two", "three"]);
}

#[tokio::test]
async fn messages_from_other_rooms_are_dropped() {
    let (bot, transport, _) = bot();

    bot.process(vec![ChatMessage::new("beta", "!echo hi")]).await;

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn global_bot_answers_every_room_from_home() {
    let (bot, transport, config) = bot();
    config.set_global(true);

    bot.process(vec![ChatMessage::new("beta", "!echo hi")]).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].channel, HOME);
    assert!(sent[0].global);
}

#[tokio::test]
async fn plain_chatter_never_reaches_the_consumer() {
    let transport = RecordingTransport::new();
    let consumer = CountingHandler::returning(CommandResult::reply("pong"));
    let bot = Bot::builder(transport.clone())
        .config(chatpipe::BotConfig {
            room: HOME.into(),
            ..Default::default()
        })
        .consumer(consumer.clone())
        .build();

    bot.process(vec![home("hello there"), home("<p>!ping</p>")])
        .await;

    assert_eq!(consumer.count(), 1);
    assert_eq!(transport.sent_texts(), vec!["pong"]);
}

#[tokio::test]
async fn custom_stages_see_normalized_records_after_default_filters() {
    let transport = RecordingTransport::new();
    let transformed = SpyStage::new();
    let filtered = SpyStage::new();
    let bot = Bot::builder(transport.clone())
        .config(chatpipe::BotConfig {
            room: HOME.into(),
            ..Default::default()
        })
        .transformer(transformed.clone())
        .filter(filtered.clone())
        .build();
    bot.register(
        "echo",
        |inv: Invocation| async move { inv.rest() },
        CommandOptions::new(),
    );

    bot.process(vec![home("<p>just talking</p>"), home("<p>!echo hi</p>")])
        .await;

    let seen: Vec<String> = transformed.inputs().into_iter().map(|m| m.message).collect();
    assert_eq!(seen, vec!["just talking", "!echo hi"]);

    let gated: Vec<String> = filtered.inputs().into_iter().map(|m| m.message).collect();
    assert_eq!(gated, vec!["!echo hi"]);
    assert_eq!(transport.sent_texts(), vec!["hi"]);
}

#[tokio::test]
async fn vetoing_filter_stops_the_record() {
    let transport = RecordingTransport::new();
    let filtered = SpyStage::new();
    filtered.veto();
    let consumer = CountingHandler::new();
    let bot = Bot::builder(transport.clone())
        .without_default_stages()
        .filter(filtered.clone())
        .consumer(consumer.clone())
        .build();

    bot.process(vec![ChatMessage::new("anywhere", "anything")]).await;

    assert_eq!(filtered.call_count(), 1);
    assert_eq!(consumer.count(), 0);
}

#[test]
fn malformed_html_drops_only_that_record() {
    let (bot, transport, _) = bot();

    let ((), logs) = with_logs(bot.process(vec![
        home(r#"<p>!echo <img src="/e/broken.png"></p>"#),
        home("!echo still here"),
    ]));

    assert_eq!(transport.sent_texts(), vec!["still here"]);
    assert!(logs.contains("dropped message"), "{logs}");
    assert!(logs.contains("emote without alt text"), "{logs}");
}

#[test]
fn failing_handler_does_not_abort_the_batch() {
    let (bot, transport, _) = bot();
    bot.register(
        "fail",
        |_inv: Invocation| async move { Err::<String, _>(std::io::Error::other("backend down")) },
        CommandOptions::new(),
    );

    let ((), logs) = with_logs(bot.process(vec![home("!fail"), home("!echo after")]));

    assert_eq!(transport.sent_texts(), vec!["after"]);
    assert!(logs.contains("command `fail` failed: backend down"), "{logs}");
}

#[tokio::test]
async fn redirect_sends_elsewhere_and_restores_the_room() {
    let (bot, transport, config) = bot();
    bot.register(
        "shout",
        |inv: Invocation| async move { (inv.rest(), "beta".to_owned()) },
        CommandOptions::new(),
    );

    bot.process(vec![home("!shout over there"), home("!echo back home")])
        .await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!((sent[0].message.as_str(), sent[0].channel.as_str()), ("over there", "beta"));
    assert_eq!((sent[1].message.as_str(), sent[1].channel.as_str()), ("back home", HOME));
    assert_eq!(config.room(), HOME);
}

#[tokio::test]
async fn data_results_send_nothing() {
    let (bot, transport, _) = bot();
    bot.register(
        "stats",
        |_inv: Invocation| async move { serde_json::json!({ "viewers": 3 }) },
        CommandOptions::new(),
    );

    bot.process(vec![home("!stats")]).await;

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn start_connects_then_drains_the_stream() {
    let (bot, transport, config) = bot();
    config.set_credentials(Some("jwt".into()));

    let batches = stream::iter(vec![
        vec![home("!echo first")],
        vec![home("!echo second"), home("!echo third")],
    ]);
    bot.start(batches).await.unwrap();

    assert_eq!(
        transport.connections(),
        vec![(HOME.to_owned(), Some("jwt".to_owned()))]
    );
    assert_eq!(transport.sent_texts(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn transport_init_failure_is_fatal() {
    let (bot, transport, _) = bot();
    transport.fail_init("connection refused");

    let batches = stream::iter(vec![vec![home("!echo never")]]);
    let err = bot.start(batches).await.unwrap_err();

    assert!(matches!(err, BotError::TransportInit(_)));
    assert!(err.to_string().contains("connection refused"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn viewers_pass_through_to_the_transport() {
    let (bot, transport, _) = bot();
    transport.set_viewers(vec!["ana".into(), "bo".into()]);

    assert_eq!(bot.channel_viewers(), vec!["ana", "bo"]);
    bot.update_usernames().await.unwrap();
}

#[tokio::test]
async fn config_changes_apply_to_later_records_in_the_batch() {
    let (bot, transport, config) = bot();
    let handle = config.clone();
    bot.register(
        "move",
        move |_inv: Invocation| {
            let handle = handle.clone();
            async move { handle.set_room("beta") }
        },
        CommandOptions::new(),
    );

    bot.process(vec![
        home("!move"),
        ChatMessage::new("beta", "!echo hi"),
        home("!echo no"),
    ])
    .await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "hi");
    assert_eq!(sent[0].channel, "beta");
}

/// Records the home room it sees at every send.
struct RoomReadingTransport {
    config: ConfigHandle,
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

impl Transport for RoomReadingTransport {
    async fn init(&self, _room: &str, _credentials: Option<&str>) -> Result<(), BoxError> {
        Ok(())
    }

    fn send_message(&self, outbound: OutboundMessage) {
        let room = self.config.room();
        self.seen.lock().unwrap().push((outbound.channel, room));
    }
}

#[tokio::test]
async fn transport_may_read_config_while_redirecting() {
    let config = ConfigHandle::new(chatpipe::BotConfig {
        room: HOME.into(),
        ..Default::default()
    });
    let seen = Arc::new(Mutex::new(Vec::new()));
    let bot = Bot::builder(RoomReadingTransport {
        config: config.clone(),
        seen: seen.clone(),
    })
    .config(config)
    .build();

    bot.send_to_channel("psst", "beta");
    bot.send("hello");

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("beta".to_owned(), HOME.to_owned()),
            (HOME.to_owned(), HOME.to_owned())
        ]
    );
}
