//! Built-in themes and the theme store.

use serde::{Deserialize, Serialize};

/// Window backdrop material. `Solid` is the portable fallback; the others
/// map to platform compositor effects where available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    Solid,
    Mica,
    Acrylic,
    Tabbed,
}

impl Backdrop {
    pub const ALL: &'static [Backdrop] = &[
        Backdrop::Solid,
        Backdrop::Mica,
        Backdrop::Acrylic,
        Backdrop::Tabbed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Backdrop::Solid => "Solid",
            Backdrop::Mica => "Mica",
            Backdrop::Acrylic => "Acrylic",
            Backdrop::Tabbed => "Tabbed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}

/// One theme: window colors plus backdrop material. Colors are CSS hex
/// strings since they end up as CSS variables in the guest page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: String,
    pub foreground: String,
    pub accent: String,
    pub backdrop: Backdrop,
    pub dark: bool,
}

fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme {
            name: "Light".into(),
            background: "#ffffff".into(),
            foreground: "#000000".into(),
            accent: "#0078d7".into(),
            backdrop: Backdrop::Mica,
            dark: false,
        },
        Theme {
            name: "Light Blue".into(),
            background: "#f0f8ff".into(),
            foreground: "#141414".into(),
            accent: "#1e90ff".into(),
            backdrop: Backdrop::Acrylic,
            dark: false,
        },
        Theme {
            name: "Dark".into(),
            background: "#1e1e1e".into(),
            foreground: "#ffffff".into(),
            accent: "#2d78d2".into(),
            backdrop: Backdrop::Mica,
            dark: true,
        },
        Theme {
            name: "Dark Purple".into(),
            background: "#191423".into(),
            foreground: "#f0f0f5".into(),
            accent: "#8a2be2".into(),
            backdrop: Backdrop::Acrylic,
            dark: true,
        },
    ]
}

/// Holds the available themes and which one is active. Not a singleton:
/// the store lives inside the window context and is threaded into
/// whichever handler needs it.
pub struct ThemeStore {
    themes: Vec<Theme>,
    current: usize,
}

impl ThemeStore {
    /// Store with the built-in themes, starting on "Light".
    pub fn new() -> Self {
        Self {
            themes: builtin_themes(),
            current: 0,
        }
    }

    /// Store starting on the named theme; falls back to "Light" with a
    /// warning when the name is unknown.
    pub fn with_initial(name: &str) -> Self {
        let mut store = Self::new();
        if !store.apply(name) {
            tracing::warn!(theme = name, "unknown initial theme, using Light");
        }
        store
    }

    pub fn current(&self) -> &Theme {
        &self.themes[self.current]
    }

    /// Switch to the named theme. Returns false (and changes nothing) if
    /// no such theme exists.
    pub fn apply(&mut self, name: &str) -> bool {
        match self.themes.iter().position(|t| t.name == name) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Change the active theme's backdrop material in place.
    pub fn set_backdrop(&mut self, backdrop: Backdrop) {
        self.themes[self.current].backdrop = backdrop;
    }

    pub fn available_themes(&self) -> Vec<String> {
        self.themes.iter().map(|t| t.name.clone()).collect()
    }

    pub fn available_backdrops() -> Vec<String> {
        Backdrop::ALL.iter().map(|b| b.name().to_string()).collect()
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new()
    }
}
