//! The bot client: REST clients, services and workers wired together.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::auth::Authenticator;
use crate::cache::UserCache;
use crate::client::HttpClient;
use crate::config::SymConfig;
use crate::connections::ConnectionsClient;
use crate::dedup::DedupWindow;
use crate::dispatch::Dispatcher;
use crate::error::{Result, SymError};
use crate::feeds::{FeedClient, FeedKind};
use crate::listeners::{DataFeedListener, FirehoseListener};
use crate::messages::MessagesClient;
use crate::presence::PresenceClient;
use crate::services::{ChatService, ConnectionsService, PresenceService, RoomService};
use crate::signals::SignalsClient;
use crate::streams::StreamsClient;
use crate::types::{SessionInfo, UserId};
use crate::users::UsersClient;
use crate::workers::{
    ConnectionsWorker, FeedWorker, PresenceWorker, Recovery, RoomWorker, WorkerHandle,
};

pub const DATAFEED_WORKER: &str = "datafeed";
pub const FIREHOSE_WORKER: &str = "firehose";
pub const PRESENCE_WORKER: &str = "presence";
pub const CONNECTIONS_WORKER: &str = "connections";
pub const ROOM_WORKER: &str = "rooms";

/// Entry point of the SDK.
///
/// Owns one authenticated transport shared by every REST client, the chat,
/// room, presence and connection services, the dispatcher and the polling
/// workers. Workers are started explicitly and stopped by [`shutdown`].
///
/// [`shutdown`]: SymBotClient::shutdown
pub struct SymBotClient {
    config: SymConfig,
    http: HttpClient,
    messages: MessagesClient,
    streams: StreamsClient,
    presence: PresenceClient,
    connections: ConnectionsClient,
    users: UsersClient,
    signals: SignalsClient,
    feeds: FeedClient,
    chat_service: Arc<ChatService>,
    room_service: Arc<RoomService>,
    presence_service: Arc<PresenceService>,
    connections_service: Arc<ConnectionsService>,
    dispatcher: Arc<Dispatcher>,
    session: Mutex<Option<SessionInfo>>,
    workers: Mutex<HashMap<&'static str, WorkerHandle>>,
}

impl SymBotClient {
    /// Build the client without touching the network. Authentication happens
    /// lazily on the first call; use [`connect`](Self::connect) to log in
    /// up front and enable self-filtering.
    pub fn new(mut config: SymConfig) -> Result<Self> {
        config.validate()?;
        let auth = Arc::new(Authenticator::new(&config)?);
        let http = HttpClient::new(&config, auth)?;
        let settings = &config.workers;

        let messages = MessagesClient::new(http.clone());
        let streams = StreamsClient::new(http.clone());
        let presence = PresenceClient::new(http.clone());
        let connections = ConnectionsClient::new(http.clone());
        let cache = Arc::new(UserCache::new(
            settings.user_cache_ttl(),
            settings.user_cache_max_entries,
        ));
        let users = UsersClient::new(http.clone(), cache);
        let signals = SignalsClient::new(http.clone());
        let feeds = FeedClient::new(http.clone(), settings.feed_read_timeout());

        let chat_service = Arc::new(ChatService::new(streams.clone(), messages.clone()));
        let room_service = Arc::new(RoomService::new(streams.clone(), messages.clone()));
        let presence_service = Arc::new(PresenceService::new(presence.clone()));
        let connections_service = Arc::new(ConnectionsService::new(
            connections.clone(),
            settings.auto_accept_connections,
        ));
        let dispatcher = Arc::new(Dispatcher::new(
            chat_service.clone(),
            room_service.clone(),
            connections_service.clone(),
            DedupWindow::new(settings.dedup_window(), settings.dedup_max_entries),
            settings.ignore_own_messages,
        ));

        Ok(Self {
            config,
            http,
            messages,
            streams,
            presence,
            connections,
            users,
            signals,
            feeds,
            chat_service,
            room_service,
            presence_service,
            connections_service,
            dispatcher,
            session: Mutex::new(None),
            workers: Mutex::new(HashMap::new()),
        })
    }

    /// Build the client, authenticate and resolve the bot's own user.
    pub async fn connect(config: SymConfig) -> Result<Self> {
        let bot = Self::new(config)?;
        bot.http.authenticator().authenticate().await?;
        let session = bot.users.session_user().await?;
        tracing::info!(
            target = "symphony::bot",
            user_id = session.id,
            username = session.username.as_deref().unwrap_or(""),
            "bot connected"
        );
        bot.dispatcher.set_own_id(session.id);
        *bot.session.lock() = Some(session);
        Ok(bot)
    }

    pub fn config(&self) -> &SymConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Session of the bot, once connected.
    pub fn session(&self) -> Option<SessionInfo> {
        self.session.lock().clone()
    }

    pub fn bot_user_id(&self) -> Option<UserId> {
        self.dispatcher.own_id()
    }

    pub fn messages(&self) -> &MessagesClient {
        &self.messages
    }

    pub fn streams(&self) -> &StreamsClient {
        &self.streams
    }

    pub fn presence(&self) -> &PresenceClient {
        &self.presence
    }

    pub fn connections(&self) -> &ConnectionsClient {
        &self.connections
    }

    pub fn users(&self) -> &UsersClient {
        &self.users
    }

    pub fn signals(&self) -> &SignalsClient {
        &self.signals
    }

    pub fn feeds(&self) -> &FeedClient {
        &self.feeds
    }

    pub fn chat_service(&self) -> &Arc<ChatService> {
        &self.chat_service
    }

    pub fn room_service(&self) -> &Arc<RoomService> {
        &self.room_service
    }

    pub fn presence_service(&self) -> &Arc<PresenceService> {
        &self.presence_service
    }

    pub fn connections_service(&self) -> &Arc<ConnectionsService> {
        &self.connections_service
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn add_datafeed_listener(&self, listener: Arc<dyn DataFeedListener>) {
        self.dispatcher.add_datafeed_listener(listener);
    }

    pub fn add_firehose_listener(&self, listener: Arc<dyn FirehoseListener>) {
        self.dispatcher.add_firehose_listener(listener);
    }

    // === Workers ===

    /// Start the datafeed worker. A no-op if it is already running.
    pub fn start_datafeed(&self) {
        let settings = &self.config.workers;
        let mut worker = FeedWorker::new(
            self.feeds.clone(),
            FeedKind::Datafeed,
            self.dispatcher.clone(),
            settings.retry_delay(),
        );
        if settings.recover_on_reconnect {
            worker = worker.with_recovery(Recovery {
                messages: self.messages.clone(),
                chats: self.chat_service.clone(),
                rooms: self.room_service.clone(),
            });
        }
        self.start_worker(DATAFEED_WORKER, |rx| worker.run(rx));
    }

    pub fn start_firehose(&self) {
        let worker = FeedWorker::new(
            self.feeds.clone(),
            FeedKind::Firehose,
            self.dispatcher.clone(),
            self.config.workers.retry_delay(),
        );
        self.start_worker(FIREHOSE_WORKER, |rx| worker.run(rx));
    }

    pub fn start_presence(&self) {
        let settings = &self.config.workers;
        let worker = PresenceWorker::new(
            self.presence.clone(),
            self.presence_service.clone(),
            settings.presence_interval(),
            settings.retry_delay(),
        );
        self.start_worker(PRESENCE_WORKER, |rx| worker.run(rx));
    }

    pub fn start_connections(&self) {
        let settings = &self.config.workers;
        let worker = ConnectionsWorker::new(
            self.connections.clone(),
            self.connections_service.clone(),
            settings.connections_interval(),
            settings.retry_delay(),
        );
        self.start_worker(CONNECTIONS_WORKER, |rx| worker.run(rx));
    }

    pub fn start_room_sync(&self) {
        let settings = &self.config.workers;
        let worker = RoomWorker::new(
            self.streams.clone(),
            self.room_service.clone(),
            settings.room_sync_interval(),
            settings.retry_delay(),
        );
        self.start_worker(ROOM_WORKER, |rx| worker.run(rx));
    }

    /// Start the datafeed, presence, connections and room workers. The
    /// firehose needs extra entitlements and is started separately.
    pub fn start_all(&self) {
        self.start_datafeed();
        self.start_presence();
        self.start_connections();
        self.start_room_sync();
    }

    /// Names of the workers currently registered.
    pub fn running_workers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.workers.lock().keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Stop one worker by name.
    pub async fn stop_worker(&self, name: &str) -> Result<()> {
        let handle = self.workers.lock().remove(name).ok_or(SymError::NotRunning)?;
        handle.stop().await;
        Ok(())
    }

    /// Stop every worker, then end the session. Logout failures are logged
    /// and otherwise ignored.
    pub async fn shutdown(&self) {
        let handles: Vec<WorkerHandle> = self.workers.lock().drain().map(|(_, h)| h).collect();
        for handle in handles {
            handle.stop().await;
        }
        if let Err(error) = self.http.authenticator().logout().await {
            tracing::warn!(target = "symphony::bot", error = %error, "logout failed");
        }
        tracing::info!(target = "symphony::bot", "bot shut down");
    }

    fn start_worker<F, Fut>(&self, name: &'static str, run: F)
    where
        F: FnOnce(tokio::sync::watch::Receiver<bool>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut workers = self.workers.lock();
        if let Some(existing) = workers.get(name) {
            if !existing.is_finished() {
                tracing::debug!(target = "symphony::bot", worker = name, "worker already running");
                return;
            }
        }
        workers.insert(name, WorkerHandle::spawn(name, run));
    }
}
