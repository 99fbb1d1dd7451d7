//! Request shapes the guest may send, with their result types.

use serde::{Deserialize, Serialize};

use trellis_interop::{Request, TypeTag};

use crate::tags;

/// Switch the application theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeTheme {
    pub theme_name: String,
}

impl Request for ChangeTheme {
    type Output = bool;
    const TAG: TypeTag = tags::CHANGE_THEME;
}

/// List the available theme names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAvailableThemes;

impl Request for GetAvailableThemes {
    type Output = Vec<String>;
    const TAG: TypeTag = tags::GET_AVAILABLE_THEMES;
}

/// Change the active theme's backdrop material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeBackdrop {
    pub backdrop_name: String,
}

impl Request for ChangeBackdrop {
    type Output = bool;
    const TAG: TypeTag = tags::CHANGE_BACKDROP;
}

/// List the available backdrop material names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAvailableBackdrops;

impl Request for GetAvailableBackdrops {
    type Output = Vec<String>;
    const TAG: TypeTag = tags::GET_AVAILABLE_BACKDROPS;
}

/// Current user-visible settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub theme: String,
    pub notifications_enabled: bool,
    pub backdrop: String,
}

/// Retrieve the current user settings from the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUserSettings;

impl Request for GetUserSettings {
    type Output = UserSettings;
    const TAG: TypeTag = tags::GET_USER_SETTINGS;
}

/// Update the main window's title text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetWindowTitle {
    pub text: String,
}

impl Request for SetWindowTitle {
    type Output = bool;
    const TAG: TypeTag = tags::SET_WINDOW_TITLE;
}

/// Close the second window, if it is open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseSecondWindow;

impl Request for CloseSecondWindow {
    type Output = bool;
    const TAG: TypeTag = tags::CLOSE_SECOND_WINDOW;
}
