//! Demo commands.

use chatpipe::{Bot, CommandOptions, CommandResult, Invocation, Transport};
use std::sync::Arc;

pub fn install<T: Transport>(bot: &Bot<T>) {
    bot.register(
        "echo",
        |inv: Invocation| async move { inv.rest() },
        CommandOptions::new(),
    );
    bot.register(
        "upper",
        |inv: Invocation| async move { inv.rest().to_uppercase() },
        CommandOptions::new(),
    );
    bot.register(
        "rev",
        |inv: Invocation| async move { inv.rest().chars().rev().collect::<String>() },
        CommandOptions::new(),
    );
    bot.register(
        "tell",
        |inv: Invocation| async move {
            match inv.args.split_first() {
                Some((room, rest)) if !rest.is_empty() => {
                    CommandResult::redirect(rest.join(" "), room.as_str())
                }
                _ => CommandResult::reply("usage: !tell <room> <text>"),
            }
        },
        CommandOptions::new().scoped(),
    );

    // The registry owns `help`, so `help` only holds a weak handle back.
    let registry = Arc::downgrade(bot.registry());
    bot.register(
        "help",
        move |_inv: Invocation| {
            let names = registry.upgrade().map(|r| r.names()).unwrap_or_default();
            async move { format!("commands: {}", names.join(", ")) }
        },
        CommandOptions::new(),
    );
}
