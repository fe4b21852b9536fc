//! # Symphony Rust SDK
//!
//! Build bots for the Symphony messaging platform: authenticated REST clients
//! for messages, rooms, presence, connections, users and signals, plus polling
//! workers that read the datafeed and fan events out to listeners.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use symphony::{Chat, ChatServiceListener, OutboundMessage, SymBotClient, SymConfig};
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl ChatServiceListener for Greeter {
//!     async fn on_new_chat(&self, chat: &Chat) {
//!         println!("new chat {}", chat.stream_id);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SymConfig::load("bot-config.json")?;
//!     let bot = Arc::new(SymBotClient::connect(config).await?);
//!
//!     bot.chat_service().add_listener(Arc::new(Greeter));
//!     bot.start_datafeed();
//!
//!     let chat = bot.chat_service().start_chat(&[12345]).await?;
//!     bot.chat_service()
//!         .send_message(&chat.stream_id, &OutboundMessage::text("Hello from Rust!"))
//!         .await?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     bot.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Listening to events
//!
//! Implement any of the traits in [`listeners`] and register them with the
//! matching service. Messages written by the bot itself are dropped before
//! any listener sees them, and message ids already delivered within the
//! dedup window are never delivered twice.

pub mod auth;
pub mod bot;
pub mod cache;
pub mod client;
pub mod config;
pub mod connections;
pub mod dedup;
pub mod dispatch;
pub mod error;
pub mod feeds;
pub mod listeners;
pub mod messageml;
pub mod messages;
pub mod presence;
pub mod services;
pub mod signals;
pub mod streams;
pub mod types;
pub mod users;
pub mod workers;

pub use auth::{Authenticator, SymAuth};
pub use bot::SymBotClient;
pub use cache::{TtlCache, UserCache};
pub use client::{Host, HttpClient, RequestOptions};
pub use config::{SymConfig, WorkerSettings};
pub use connections::ConnectionsClient;
pub use dedup::DedupWindow;
pub use dispatch::{classify, Dispatcher, FeedEvent};
pub use error::{Result, SymError};
pub use feeds::{FeedClient, FeedKind};
pub use listeners::{
    ChatListener, ChatServiceListener, ConnectionsListener, DataFeedListener, FirehoseListener,
    PresenceListener, RoomListener, RoomServiceListener,
};
pub use messages::MessagesClient;
pub use presence::PresenceClient;
pub use services::{
    Chat, ChatService, ConnectionsService, PresenceService, Room, RoomService, RoomSync,
};
pub use signals::SignalsClient;
pub use streams::StreamsClient;
pub use users::UsersClient;
pub use workers::WorkerHandle;

pub use types::{
    ConnectionStatus, ElementsActionPayload, EventType, OutboundMessage, PresenceCategory,
    SessionInfo, StreamType, SymEvent, SymMessage, SymPresence, SymRoomAttributes,
    SymRoomDetail, SymStream, SymUser, SymUserConnection, UserId,
};

/// SDK version.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
