//! Request and event handlers backing the demo surface.
//!
//! Each handler owns an `Arc` to the window context; the bridge does not
//! serialize access to shared host state, so all synchronization lives in
//! the context itself.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use trellis_interop::{EventHandler, HandlerError, RequestHandler};

use crate::context::WindowContext;
use crate::events::ThemeChanged;
use crate::requests::{
    ChangeBackdrop, ChangeTheme, CloseSecondWindow, GetAvailableBackdrops, GetAvailableThemes,
    GetUserSettings, SetWindowTitle, UserSettings,
};

pub struct ChangeThemeHandler {
    ctx: Arc<WindowContext>,
}

impl ChangeThemeHandler {
    pub fn new(ctx: &Arc<WindowContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

#[async_trait]
impl RequestHandler<ChangeTheme> for ChangeThemeHandler {
    async fn handle(
        &self,
        request: ChangeTheme,
        _cancel: &CancellationToken,
    ) -> Result<bool, HandlerError> {
        Ok(self.ctx.apply_theme(&request.theme_name))
    }
}

pub struct GetAvailableThemesHandler {
    ctx: Arc<WindowContext>,
}

impl GetAvailableThemesHandler {
    pub fn new(ctx: &Arc<WindowContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

#[async_trait]
impl RequestHandler<GetAvailableThemes> for GetAvailableThemesHandler {
    async fn handle(
        &self,
        _request: GetAvailableThemes,
        _cancel: &CancellationToken,
    ) -> Result<Vec<String>, HandlerError> {
        Ok(self.ctx.available_themes())
    }
}

pub struct ChangeBackdropHandler {
    ctx: Arc<WindowContext>,
}

impl ChangeBackdropHandler {
    pub fn new(ctx: &Arc<WindowContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

#[async_trait]
impl RequestHandler<ChangeBackdrop> for ChangeBackdropHandler {
    async fn handle(
        &self,
        request: ChangeBackdrop,
        _cancel: &CancellationToken,
    ) -> Result<bool, HandlerError> {
        Ok(self.ctx.set_backdrop(&request.backdrop_name))
    }
}

pub struct GetAvailableBackdropsHandler {
    ctx: Arc<WindowContext>,
}

impl GetAvailableBackdropsHandler {
    pub fn new(ctx: &Arc<WindowContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

#[async_trait]
impl RequestHandler<GetAvailableBackdrops> for GetAvailableBackdropsHandler {
    async fn handle(
        &self,
        _request: GetAvailableBackdrops,
        _cancel: &CancellationToken,
    ) -> Result<Vec<String>, HandlerError> {
        Ok(self.ctx.available_backdrops())
    }
}

pub struct GetUserSettingsHandler {
    ctx: Arc<WindowContext>,
}

impl GetUserSettingsHandler {
    pub fn new(ctx: &Arc<WindowContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

#[async_trait]
impl RequestHandler<GetUserSettings> for GetUserSettingsHandler {
    async fn handle(
        &self,
        _request: GetUserSettings,
        _cancel: &CancellationToken,
    ) -> Result<UserSettings, HandlerError> {
        Ok(self.ctx.user_settings())
    }
}

pub struct SetWindowTitleHandler {
    ctx: Arc<WindowContext>,
}

impl SetWindowTitleHandler {
    pub fn new(ctx: &Arc<WindowContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

#[async_trait]
impl RequestHandler<SetWindowTitle> for SetWindowTitleHandler {
    async fn handle(
        &self,
        request: SetWindowTitle,
        _cancel: &CancellationToken,
    ) -> Result<bool, HandlerError> {
        self.ctx.set_window_title(request.text);
        Ok(true)
    }
}

pub struct CloseSecondWindowHandler {
    ctx: Arc<WindowContext>,
}

impl CloseSecondWindowHandler {
    pub fn new(ctx: &Arc<WindowContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

#[async_trait]
impl RequestHandler<CloseSecondWindow> for CloseSecondWindowHandler {
    async fn handle(
        &self,
        _request: CloseSecondWindow,
        _cancel: &CancellationToken,
    ) -> Result<bool, HandlerError> {
        self.ctx.close_second_window();
        Ok(true)
    }
}

/// Host-side observer for theme changes; the interesting fan-out (to the
/// guest) happens via the relay, this one just leaves a trace in the log.
pub struct ThemeChangedLog;

#[async_trait]
impl EventHandler<ThemeChanged> for ThemeChangedLog {
    async fn handle(
        &self,
        event: &ThemeChanged,
        _cancel: &CancellationToken,
    ) -> Result<(), HandlerError> {
        info!(theme = %event.theme_name, "theme changed");
        Ok(())
    }
}
