//! Piped commands through the full pipeline.

mod common;

use chatpipe::{CommandOptions, CommandResult, Invocation};
use common::{bot, home};

#[tokio::test]
async fn output_threads_into_the_next_command() {
    let (bot, transport, _) = bot();

    bot.process(vec![home("!upper hi | !echo")]).await;

    assert_eq!(transport.sent_texts(), vec!["HI"]);
}

#[tokio::test]
async fn threaded_value_follows_the_stage_arguments() {
    let (bot, transport, _) = bot();

    bot.process(vec![home("<p>!echo world | !echo hello</p>")]).await;

    assert_eq!(transport.sent_texts(), vec!["hello world"]);
}

#[tokio::test]
async fn only_the_last_stage_is_sent() {
    let (bot, transport, _) = bot();

    bot.process(vec![home("!echo a | !upper | !echo b")]).await;

    assert_eq!(transport.sent_texts(), vec!["b A"]);
}

#[tokio::test]
async fn silent_stage_restarts_the_thread() {
    let (bot, transport, _) = bot();
    bot.register(
        "mute",
        |_inv: Invocation| async move { CommandResult::Silent },
        CommandOptions::new(),
    );

    bot.process(vec![home("!echo lost | !mute | !echo fresh")]).await;

    assert_eq!(transport.sent_texts(), vec!["fresh"]);
}

#[tokio::test]
async fn unknown_stage_restarts_the_thread() {
    let (bot, transport, _) = bot();

    bot.process(vec![home("!echo lost | !nope | !upper fresh")]).await;

    assert_eq!(transport.sent_texts(), vec!["FRESH"]);
}

#[tokio::test]
async fn redirect_at_the_end_goes_to_its_channel() {
    let (bot, transport, config) = bot();
    bot.register(
        "tell",
        |inv: Invocation| async move { CommandResult::redirect(inv.rest(), "beta") },
        CommandOptions::new(),
    );

    bot.process(vec![home("!upper psst | !tell")]).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "PSST");
    assert_eq!(sent[0].channel, "beta");
    assert_eq!(config.room(), common::HOME);
}

#[tokio::test]
async fn redirect_in_the_middle_threads_its_text() {
    let (bot, transport, _) = bot();
    bot.register(
        "tell",
        |inv: Invocation| async move { CommandResult::redirect(inv.rest(), "beta") },
        CommandOptions::new(),
    );

    bot.process(vec![home("!tell psst | !upper")]).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "PSST");
    assert_eq!(sent[0].channel, common::HOME);
}

#[tokio::test]
async fn disabled_pipes_pass_the_bar_through() {
    let (bot, transport, _) = bot();
    bot.parser().set_pipes_enabled(false);

    bot.process(vec![home("!echo a | b")]).await;

    assert_eq!(transport.sent_texts(), vec!["a | b"]);
}
