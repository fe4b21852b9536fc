use std::io::{self, Write};

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;

/// Writes one JSON object per line: timestamp, event type and payload.
pub struct EventEmitter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl EventEmitter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn emit<T: Serialize>(&self, event_type: &str, payload: T) {
        let line = json!({
            "ts": Utc::now().to_rfc3339(),
            "type": event_type,
            "payload": payload,
        });

        let mut out = self.out.lock();
        if let Err(error) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            tracing::warn!(
                target = "symphony_bot::events",
                error = %error,
                "failed to write event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::{json, Value};

    use super::EventEmitter;

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

    #[test]
    fn emits_one_json_line_per_event() {
        let buffer = Buffer::default();
        let emitter = EventEmitter::new(Box::new(buffer.clone()));
        emitter.emit("MESSAGESENT", json!({"id": "e1"}));
        emitter.emit("ROOMCREATED", "plain string payload");

        let text = String::from_utf8(buffer.0.lock().clone()).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "MESSAGESENT");
        assert_eq!(lines[0]["payload"]["id"], "e1");
        assert!(lines[1]["ts"].is_string());
    }
}
