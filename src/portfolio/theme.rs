//! Persisted theme preference.

use std::sync::Arc;

use crate::db::{KeyValueStore, THEME_KEY};
use crate::errors::AppResult;
use crate::models::Theme;

/// Reads and writes the page theme under [`THEME_KEY`].
#[derive(Clone)]
pub struct ThemeController {
    store: Arc<dyn KeyValueStore>,
    prefers_dark: bool,
}

impl ThemeController {
    /// `prefers_dark` is the system colour-scheme preference used when
    /// nothing has been stored yet.
    pub fn new(store: Arc<dyn KeyValueStore>, prefers_dark: bool) -> Self {
        Self {
            store,
            prefers_dark,
        }
    }

    fn system_theme(&self) -> Theme {
        if self.prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Stored theme, or the system preference. An unrecognised stored value
    /// counts as absent.
    pub async fn current(&self) -> AppResult<Theme> {
        let stored = self.store.get(THEME_KEY).await?;
        Ok(stored
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_else(|| self.system_theme()))
    }

    /// Resolve the theme at startup and persist it, as the page does on load.
    pub async fn load(&self) -> AppResult<Theme> {
        let theme = self.current().await?;
        self.set(theme).await?;
        Ok(theme)
    }

    pub async fn set(&self, theme: Theme) -> AppResult<()> {
        self.store.set(THEME_KEY, theme.as_str()).await?;
        tracing::debug!(theme = %theme, "Theme set");
        Ok(())
    }

    /// Flip between dark and light, returning the new theme.
    pub async fn toggle(&self) -> AppResult<Theme> {
        let next = self.current().await?.toggled();
        self.set(next).await?;
        Ok(next)
    }
}
