//! Event shapes the host publishes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trellis_interop::{Event, TypeTag};

use crate::tags;

/// The application theme changed; carries the new theme's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeChanged {
    pub theme_name: String,
}

impl Event for ThemeChanged {
    const TAG: TypeTag = tags::THEME_CHANGED;
}

/// A host-initiated notice for the guest (startup, window lifecycle, etc).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostNotification {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl HostNotification {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

impl Event for HostNotification {
    const TAG: TypeTag = tags::HOST_NOTIFICATION;
}
