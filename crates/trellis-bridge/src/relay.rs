//! One-way event egress toward the guest.
//!
//! The relay is best-effort: if no transport sink is attached (the guest
//! has not loaded yet, or the view was torn down) the event is dropped
//! silently -- there is no replay or queueing of pre-attachment events.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, trace, warn};

use trellis_interop::{EventSink, TypeTag};

use crate::envelope::Envelope;

/// The opaque one-way message channel into the guest. Implementors only
/// need to move a string across; delivery guarantees are theirs to define.
pub trait MessagePost: Send + Sync {
    fn post(&self, message: String);
}

/// Encodes event envelopes and hands them to whatever [`MessagePost`] sink
/// is currently attached.
#[derive(Default)]
pub struct EventRelay {
    sink: RwLock<Option<Arc<dyn MessagePost>>>,
}

impl EventRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the transport sink; replaces any previous one.
    pub fn attach(&self, sink: Arc<dyn MessagePost>) {
        *self.sink.write().unwrap() = Some(sink);
        debug!("event relay attached");
    }

    /// Detach the transport sink; subsequent sends no-op.
    pub fn detach(&self) {
        *self.sink.write().unwrap() = None;
        debug!("event relay detached");
    }

    pub fn is_attached(&self) -> bool {
        self.sink.read().unwrap().is_some()
    }
}

impl EventSink for EventRelay {
    fn send(&self, tag: TypeTag, payload: Value) {
        let sink = match self.sink.read().unwrap().as_ref() {
            Some(sink) => Arc::clone(sink),
            None => {
                trace!(tag = %tag, "no transport attached; event dropped");
                return;
            }
        };

        match Envelope::event(tag, payload).encode() {
            Ok(message) => sink.post(message),
            Err(e) => warn!(tag = %tag, error = %e, "event envelope encode failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPost {
        messages: Mutex<Vec<String>>,
    }

    impl MessagePost for RecordingPost {
        fn post(&self, message: String) {
            self.messages.lock().unwrap().push(message);
        }
    }

    #[test]
    fn send_without_sink_is_a_silent_no_op() {
        let relay = EventRelay::new();
        assert!(!relay.is_attached());
        relay.send(TypeTag::new("theme.changed"), json!({"theme_name": "Dark"}));
    }

    #[test]
    fn send_posts_an_event_envelope() {
        let relay = EventRelay::new();
        let sink = Arc::new(RecordingPost::default());
        relay.attach(Arc::clone(&sink) as Arc<dyn MessagePost>);
        assert!(relay.is_attached());

        relay.send(TypeTag::new("theme.changed"), json!({"theme_name": "Dark"}));

        let messages = sink.messages.lock().unwrap();
        assert_eq!(
            *messages,
            vec![r#"{"type":"event","name":"theme.changed","payload":{"theme_name":"Dark"}}"#]
        );
    }

    #[test]
    fn detached_relay_drops_events() {
        let relay = EventRelay::new();
        let sink = Arc::new(RecordingPost::default());
        relay.attach(Arc::clone(&sink) as Arc<dyn MessagePost>);
        relay.detach();

        relay.send(TypeTag::new("theme.changed"), json!({}));
        assert!(sink.messages.lock().unwrap().is_empty());
    }
}
