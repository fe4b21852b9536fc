//! Stateful services the dispatcher routes classified events to.
//!
//! Each service keeps its registry behind a `parking_lot` lock and snapshots
//! listeners before awaiting them, so callbacks may register or remove
//! listeners without deadlocking.

mod chat;
mod connections;
mod presence;
mod room;

pub use chat::{Chat, ChatService};
pub use connections::ConnectionsService;
pub use presence::PresenceService;
pub use room::{Room, RoomService, RoomSync};
