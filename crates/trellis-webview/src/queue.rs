//! Message queues between the WebView callbacks and the shell's event
//! loop.
//!
//! `wry` invokes its IPC handler on the platform's webview thread and the
//! relay may post from anywhere, while the WebView handle itself must stay
//! on the main thread. Both directions therefore go through shared queues
//! that the shell drains.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use trellis_bridge::MessagePost;

/// One decoded request envelope from the guest, waiting to be dispatched.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub name: String,
    pub payload: Value,
}

/// Requests pushed by the IPC handler, drained by the shell.
#[derive(Clone, Default)]
pub struct InboundQueue {
    inner: Arc<Mutex<Vec<InboundRequest>>>,
}

impl InboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, request: InboundRequest) {
        self.inner.lock().unwrap().push(request);
    }

    /// Take all pending requests, oldest first.
    pub fn drain(&self) -> Vec<InboundRequest> {
        let mut inner = self.inner.lock().unwrap();
        std::mem::take(&mut *inner)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Encoded envelopes waiting to be evaluated into the guest. Implements
/// [`MessagePost`] so the event relay can be attached directly to it.
#[derive(Clone, Default)]
pub struct OutboundQueue {
    inner: Arc<Mutex<Vec<String>>>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending messages, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut inner = self.inner.lock().unwrap();
        std::mem::take(&mut *inner)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessagePost for OutboundQueue {
    fn post(&self, message: String) {
        self.inner.lock().unwrap().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inbound_drains_in_arrival_order() {
        let queue = InboundQueue::new();
        queue.push(InboundRequest {
            name: "theme.change".into(),
            payload: json!({"theme_name": "Dark"}),
        });
        queue.push(InboundRequest {
            name: "settings.get".into(),
            payload: json!(null),
        });

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].name, "theme.change");
        assert_eq!(drained[1].name, "settings.get");
        assert!(queue.is_empty());
    }

    #[test]
    fn outbound_accepts_posts_through_the_trait() {
        let queue = OutboundQueue::new();
        let poster: &dyn MessagePost = &queue;
        poster.post("one".into());
        poster.post("two".into());

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec!["one", "two"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clones_share_the_same_backlog() {
        let queue = OutboundQueue::new();
        let clone = queue.clone();
        clone.post("shared".into());
        assert_eq!(queue.drain(), vec!["shared"]);
    }
}
