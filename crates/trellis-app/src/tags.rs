//! The closed set of type tags this application speaks.
//!
//! Both sides route by these exact strings: the host registry is keyed by
//! them and the demo page calls `window.trellis.request(...)` /
//! `window.trellis.events.on(...)` with the same values. Add new tags
//! here and nowhere else.

use trellis_interop::TypeTag;

// -- Requests (guest → host) --

pub const CHANGE_THEME: TypeTag = TypeTag::new("theme.change");
pub const GET_AVAILABLE_THEMES: TypeTag = TypeTag::new("theme.list");
pub const CHANGE_BACKDROP: TypeTag = TypeTag::new("backdrop.change");
pub const GET_AVAILABLE_BACKDROPS: TypeTag = TypeTag::new("backdrop.list");
pub const GET_USER_SETTINGS: TypeTag = TypeTag::new("settings.get");
pub const SET_WINDOW_TITLE: TypeTag = TypeTag::new("window.set-title");
pub const CLOSE_SECOND_WINDOW: TypeTag = TypeTag::new("window.close-second");

// -- Events (host → guest) --

pub const THEME_CHANGED: TypeTag = TypeTag::new("theme.changed");
pub const HOST_NOTIFICATION: TypeTag = TypeTag::new("host.notification");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        let all = [
            CHANGE_THEME,
            GET_AVAILABLE_THEMES,
            CHANGE_BACKDROP,
            GET_AVAILABLE_BACKDROPS,
            GET_USER_SETTINGS,
            SET_WINDOW_TITLE,
            CLOSE_SECOND_WINDOW,
            THEME_CHANGED,
            HOST_NOTIFICATION,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b, "duplicate tag: {a}");
            }
        }
    }
}
