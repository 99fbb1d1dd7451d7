//! Shared host state addressed by request handlers.
//!
//! `WindowContext` is constructed once at startup and threaded into every
//! handler that needs it -- there is no process-wide singleton. Handlers
//! run off the main thread's control, so the context synchronizes its own
//! state and records window-touching work as [`HostAction`]s; the shell
//! drains those on the main thread, where the actual window handles live.

use std::sync::Mutex;

use crate::requests::UserSettings;
use crate::theme::{Backdrop, Theme, ThemeStore};

/// Deferred work that must run on the main thread against real windows.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    /// Re-apply the current theme to every open window and announce the
    /// change to the guest.
    ApplyTheme,
    /// Set the main window's title text.
    SetWindowTitle(String),
    /// Close the second window if it is open.
    CloseSecondWindow,
}

pub struct WindowContext {
    theme: Mutex<ThemeStore>,
    actions: Mutex<Vec<HostAction>>,
}

impl WindowContext {
    pub fn new(theme: ThemeStore) -> Self {
        Self {
            theme: Mutex::new(theme),
            actions: Mutex::new(Vec::new()),
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.theme.lock().unwrap().current().clone()
    }

    /// Switch themes. Returns false for an unknown name; on success an
    /// [`HostAction::ApplyTheme`] is queued for the shell.
    pub fn apply_theme(&self, name: &str) -> bool {
        let applied = self.theme.lock().unwrap().apply(name);
        if applied {
            self.push_action(HostAction::ApplyTheme);
        }
        applied
    }

    /// Change the active theme's backdrop material by name. Returns false
    /// for an unknown material.
    pub fn set_backdrop(&self, name: &str) -> bool {
        let Some(backdrop) = Backdrop::from_name(name) else {
            return false;
        };
        self.theme.lock().unwrap().set_backdrop(backdrop);
        self.push_action(HostAction::ApplyTheme);
        true
    }

    pub fn available_themes(&self) -> Vec<String> {
        self.theme.lock().unwrap().available_themes()
    }

    pub fn available_backdrops(&self) -> Vec<String> {
        ThemeStore::available_backdrops()
    }

    pub fn user_settings(&self) -> UserSettings {
        let theme = self.theme.lock().unwrap();
        let current = theme.current();
        UserSettings {
            theme: current.name.clone(),
            notifications_enabled: true,
            backdrop: current.backdrop.name().to_string(),
        }
    }

    pub fn set_window_title(&self, text: String) {
        self.push_action(HostAction::SetWindowTitle(text));
    }

    pub fn close_second_window(&self) {
        self.push_action(HostAction::CloseSecondWindow);
    }

    fn push_action(&self, action: HostAction) {
        self.actions.lock().unwrap().push(action);
    }

    /// Take all queued actions, oldest first. Called by the shell on the
    /// main thread.
    pub fn drain_actions(&self) -> Vec<HostAction> {
        let mut actions = self.actions.lock().unwrap();
        std::mem::take(&mut *actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> WindowContext {
        WindowContext::new(ThemeStore::new())
    }

    #[test]
    fn apply_theme_queues_an_action_on_success_only() {
        let ctx = context();
        assert!(ctx.apply_theme("Dark"));
        assert!(!ctx.apply_theme("Nope"));

        assert_eq!(ctx.drain_actions(), vec![HostAction::ApplyTheme]);
        assert!(ctx.drain_actions().is_empty());
        assert_eq!(ctx.current_theme().name, "Dark");
    }

    #[test]
    fn set_backdrop_validates_the_material_name() {
        let ctx = context();
        assert!(ctx.set_backdrop("Acrylic"));
        assert!(!ctx.set_backdrop("Frosted"));
        assert_eq!(ctx.current_theme().backdrop, Backdrop::Acrylic);
        assert_eq!(ctx.drain_actions(), vec![HostAction::ApplyTheme]);
    }

    #[test]
    fn user_settings_reflect_the_store() {
        let ctx = context();
        ctx.apply_theme("Dark Purple");
        let settings = ctx.user_settings();
        assert_eq!(settings.theme, "Dark Purple");
        assert_eq!(settings.backdrop, "Acrylic");
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn window_actions_drain_in_order() {
        let ctx = context();
        ctx.set_window_title("hello".into());
        ctx.close_second_window();

        assert_eq!(
            ctx.drain_actions(),
            vec![
                HostAction::SetWindowTitle("hello".into()),
                HostAction::CloseSecondWindow,
            ]
        );
    }
}
