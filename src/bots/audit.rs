use async_trait::async_trait;
use serde_json::Value;
use symphony::{FirehoseListener, SymEvent};

use crate::events::EventEmitter;

/// Writes every firehose event to an [`EventEmitter`].
pub struct AuditBot {
    emitter: EventEmitter,
}

impl AuditBot {
    pub fn new(emitter: EventEmitter) -> Self {
        Self { emitter }
    }
}

/// Wire name of the event type, e.g. `MESSAGESENT`.
pub fn event_type_name(event: &SymEvent) -> String {
    match serde_json::to_value(event.event_type) {
        Ok(Value::String(name)) => name,
        _ => "UNKNOWN".to_string(),
    }
}

#[async_trait]
impl FirehoseListener for AuditBot {
    async fn on_event(&self, event: &SymEvent) {
        self.emitter.emit(&event_type_name(event), event);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use symphony::{FirehoseListener, SymEvent};

    use super::{event_type_name, AuditBot};
    use crate::events::EventEmitter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn event(kind: &str) -> SymEvent {
        serde_json::from_value(json!({"id": "e1", "timestamp": 5, "type": kind})).unwrap()
    }

    #[test]
    fn names_known_event_types() {
        assert_eq!(event_type_name(&event("ROOMCREATED")), "ROOMCREATED");
    }

    #[tokio::test]
    async fn writes_events_as_json_lines() {
        let buffer = Buffer::default();
        let bot = AuditBot::new(EventEmitter::new(Box::new(buffer.clone())));
        bot.on_event(&event("USERJOINEDROOM")).await;

        let text = String::from_utf8(buffer.0.lock().clone()).unwrap();
        let line: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(line["type"], "USERJOINEDROOM");
        assert_eq!(line["payload"]["id"], "e1");
    }
}
