use std::sync::Arc;

use async_trait::async_trait;
use symphony::messageml::escape;
use symphony::{OutboundMessage, Room, RoomService, RoomServiceListener, SymUser, UserId};

const USER_PLACEHOLDER: &str = "{user}";

/// Render the welcome template as MessageML, mentioning `user_id` wherever
/// `{user}` appears.
pub fn render_welcome(template: &str, user_id: UserId) -> String {
    let mention = format!(r#"<mention uid="{user_id}"/>"#);
    let body = template
        .split(USER_PLACEHOLDER)
        .map(escape)
        .collect::<Vec<_>>()
        .join(&mention);
    format!("<messageML>{body}</messageML>")
}

/// Welcomes users joining active rooms.
pub struct GreeterBot {
    rooms: Arc<RoomService>,
    template: String,
    own_id: Option<UserId>,
}

impl GreeterBot {
    pub fn new(
        rooms: Arc<RoomService>,
        template: impl Into<String>,
        own_id: Option<UserId>,
    ) -> Self {
        Self {
            rooms,
            template: template.into(),
            own_id,
        }
    }
}

#[async_trait]
impl RoomServiceListener for GreeterBot {
    async fn on_user_joined(&self, room: &Room, user: &SymUser) {
        if Some(user.id) == self.own_id || !room.active {
            return;
        }
        let welcome = OutboundMessage::ml(render_welcome(&self.template, user.id));
        match self.rooms.send_message(&room.stream_id, &welcome).await {
            Ok(_) => tracing::info!(
                target = "symphony_bot::greeter",
                stream_id = %room.stream_id,
                user_id = user.id,
                "welcomed user"
            ),
            Err(error) => tracing::warn!(
                target = "symphony_bot::greeter",
                stream_id = %room.stream_id,
                error = %error,
                "failed to send welcome"
            ),
        }
    }
}
