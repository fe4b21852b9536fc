//! Example bots and the wiring that installs them on a connected client.

pub mod audit;
pub mod echo;
pub mod greeter;
pub mod presence;

use std::sync::Arc;

use anyhow::{Context, Result};
use symphony::SymBotClient;

use crate::config::Command;
use crate::events::EventEmitter;

pub use audit::AuditBot;
pub use echo::{AttachToNewChats, EchoBot};
pub use greeter::GreeterBot;
pub use presence::PresenceLogger;

/// Register the listeners for `command` and start the workers it needs.
pub async fn start(bot: &SymBotClient, command: &Command) -> Result<()> {
    match command {
        Command::Echo(args) => {
            let echo = Arc::new(EchoBot::new(
                bot.chat_service().clone(),
                bot.room_service().clone(),
            ));
            bot.chat_service().add_listener(Arc::new(AttachToNewChats::new(
                bot.chat_service().clone(),
                echo.clone(),
            )));
            bot.room_service().add_listener(echo);
            if args.auto_accept {
                bot.connections_service().set_auto_accept(true);
            }
            bot.start_datafeed();
            bot.start_connections();
        }
        Command::Greeter(args) => {
            bot.room_service().add_listener(Arc::new(GreeterBot::new(
                bot.room_service().clone(),
                args.message.clone(),
                bot.bot_user_id(),
            )));
            bot.start_datafeed();
            bot.start_room_sync();
        }
        Command::Presence(args) => {
            if !args.users.is_empty() {
                bot.presence_service()
                    .add_interest(&args.users)
                    .await
                    .context("failed to register presence interest")?;
            }
            bot.presence_service()
                .add_listener(Arc::new(PresenceLogger::new(&args.users)));
            bot.start_presence();
        }
        Command::Audit => {
            bot.add_firehose_listener(Arc::new(AuditBot::new(EventEmitter::stdout())));
            bot.start_firehose();
        }
    }

    tracing::info!(
        target = "symphony_bot",
        bot = command.name(),
        workers = ?bot.running_workers(),
        "bot started"
    );
    Ok(())
}
