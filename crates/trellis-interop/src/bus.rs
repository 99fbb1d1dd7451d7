//! Fan-out of typed events to local handlers and, optionally, across the
//! boundary.
//!
//! Within one `publish` call the order is fixed and sequential: registry
//! handlers in registration order (each awaited before the next), then
//! dynamic subscribers in subscription order, then the relay. A handler
//! failure is caught and logged; it never aborts sibling handlers or the
//! relay step. Publishes from different call sites are independent and may
//! interleave freely.

use std::any::Any;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::message::{Event, EventSink};
use crate::registry::HandlerRegistry;
use crate::subscription::{Subscribers, Subscription};

pub struct EventBus {
    registry: Arc<HandlerRegistry>,
    subscribers: Subscribers,
    relay: Option<Arc<dyn EventSink>>,
}

impl EventBus {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            subscribers: Subscribers::new(),
            relay: None,
        }
    }

    /// Configure the one-way egress toward the guest. Events published
    /// without a relay stay local.
    pub fn with_relay(mut self, relay: Arc<dyn EventSink>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Attach a dynamic subscriber for event shape `E`. The returned handle
    /// must be disposed (or dropped) when its owner is torn down.
    pub fn subscribe<E, F>(&self, callback: F) -> Subscription
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Publish an event with no cancellation in play.
    pub async fn publish<E: Event>(&self, event: &E) {
        self.publish_with(event, &CancellationToken::new()).await
    }

    /// Publish an event, threading a cancellation signal through handler
    /// invocation. If cancellation is requested before the relay step, the
    /// event is not forwarded across the boundary.
    pub async fn publish_with<E: Event>(&self, event: &E, cancel: &CancellationToken) {
        let tag = E::TAG;

        for handler in self.registry.resolve_event(tag.as_str()) {
            if let Err(e) = handler
                .invoke(event as &(dyn Any + Send + Sync), cancel.clone())
                .await
            {
                warn!(tag = %tag, error = %e, "event handler failed");
            }
        }

        let notified = self.subscribers.notify(tag.as_str(), event);
        debug!(tag = %tag, subscribers = notified, "event published");

        if let Some(relay) = &self.relay {
            if cancel.is_cancelled() {
                debug!(tag = %tag, "cancelled before relay; event stays local");
                return;
            }
            match serde_json::to_value(event) {
                Ok(payload) => relay.send(tag, payload),
                Err(e) => warn!(tag = %tag, error = %e, "event encode failed; relay skipped"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::message::EventHandler;
    use crate::registry::RegistryBuilder;
    use crate::tag::TypeTag;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct ThemeChanged {
        theme_name: String,
    }

    impl Event for ThemeChanged {
        const TAG: TypeTag = TypeTag::new("theme.changed");
    }

    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
        label: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler<ThemeChanged> for Recorder {
        async fn handle(
            &self,
            event: &ThemeChanged,
            _cancel: &CancellationToken,
        ) -> Result<(), HandlerError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.theme_name));
            if self.fail {
                return Err("handler exploded".into());
            }
            Ok(())
        }
    }

    struct RecordingSink {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl EventSink for RecordingSink {
        fn send(&self, tag: TypeTag, payload: Value) {
            self.log
                .lock()
                .unwrap()
                .push(format!("relay:{tag}:{payload}"));
        }
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &'static str, fail: bool) -> Recorder {
        Recorder {
            log: Arc::clone(log),
            label,
            fail,
        }
    }

    #[tokio::test]
    async fn handlers_run_in_registration_order_before_relay() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = RegistryBuilder::new()
            .event(recorder(&log, "first", false))
            .event(recorder(&log, "second", false))
            .build()
            .unwrap();
        let bus = EventBus::new(Arc::new(registry)).with_relay(Arc::new(RecordingSink {
            log: Arc::clone(&log),
        }));

        bus.publish(&ThemeChanged {
            theme_name: "Dark".into(),
        })
        .await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], "first:Dark");
        assert_eq!(log[1], "second:Dark");
        // Relay runs strictly after every local handler has completed.
        assert_eq!(log[2], r#"relay:theme.changed:{"theme_name":"Dark"}"#);
    }

    #[tokio::test]
    async fn a_failing_handler_does_not_stop_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = RegistryBuilder::new()
            .event(recorder(&log, "first", true))
            .event(recorder(&log, "second", false))
            .build()
            .unwrap();
        let bus = EventBus::new(Arc::new(registry)).with_relay(Arc::new(RecordingSink {
            log: Arc::clone(&log),
        }));

        bus.publish(&ThemeChanged {
            theme_name: "Light".into(),
        })
        .await;

        let log = log.lock().unwrap();
        assert_eq!(log[0], "first:Light");
        assert_eq!(log[1], "second:Light");
        assert!(log[2].starts_with("relay:"));
    }

    #[tokio::test]
    async fn zero_handlers_is_silent_and_still_relays() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = RegistryBuilder::new().build().unwrap();
        let bus = EventBus::new(Arc::new(registry)).with_relay(Arc::new(RecordingSink {
            log: Arc::clone(&log),
        }));

        bus.publish(&ThemeChanged {
            theme_name: "Dark".into(),
        })
        .await;

        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancellation_before_relay_keeps_the_event_local() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = RegistryBuilder::new()
            .event(recorder(&log, "local", false))
            .build()
            .unwrap();
        let bus = EventBus::new(Arc::new(registry)).with_relay(Arc::new(RecordingSink {
            log: Arc::clone(&log),
        }));

        let cancel = CancellationToken::new();
        cancel.cancel();
        bus.publish_with(
            &ThemeChanged {
                theme_name: "Dark".into(),
            },
            &cancel,
        )
        .await;

        let log = log.lock().unwrap();
        assert_eq!(*log, vec!["local:Dark".to_string()]);
    }

    #[tokio::test]
    async fn dynamic_subscribers_run_between_handlers_and_relay() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = RegistryBuilder::new()
            .event(recorder(&log, "handler", false))
            .build()
            .unwrap();
        let bus = EventBus::new(Arc::new(registry)).with_relay(Arc::new(RecordingSink {
            log: Arc::clone(&log),
        }));

        let l = Arc::clone(&log);
        let sub = bus.subscribe(move |e: &ThemeChanged| {
            l.lock().unwrap().push(format!("sub:{}", e.theme_name));
        });

        bus.publish(&ThemeChanged {
            theme_name: "Dark".into(),
        })
        .await;

        sub.dispose();
        bus.publish(&ThemeChanged {
            theme_name: "Light".into(),
        })
        .await;

        let log = log.lock().unwrap();
        assert_eq!(log[0], "handler:Dark");
        assert_eq!(log[1], "sub:Dark");
        assert!(log[2].starts_with("relay:"));
        // After dispose: handler and relay only.
        assert_eq!(log[3], "handler:Light");
        assert!(log[4].starts_with("relay:"));
        assert_eq!(log.len(), 5);
    }

    #[tokio::test]
    async fn no_relay_configured_stays_local() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = RegistryBuilder::new()
            .event(recorder(&log, "only", false))
            .build()
            .unwrap();
        let bus = EventBus::new(Arc::new(registry));

        bus.publish(&ThemeChanged {
            theme_name: "Dark".into(),
        })
        .await;

        assert_eq!(*log.lock().unwrap(), vec!["only:Dark".to_string()]);
    }
}
