use serde::{Deserialize, Serialize};

/// The closed set of pages the client can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Home,
    Todos,
    Login,
    Register,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Todos, Page::Login, Page::Register];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Todos => "todos",
            Self::Login => "login",
            Self::Register => "register",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Todos => "Todos",
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    /// Unknown names fall back to `Home`.
    #[must_use]
    pub fn from_name(raw: &str) -> Self {
        match raw.trim().trim_matches('/').to_ascii_lowercase().as_str() {
            "todos" => Self::Todos,
            "login" => Self::Login,
            "register" => Self::Register,
            _ => Self::Home,
        }
    }
}

/// Single mutable "current page" selector. Transitions happen only on explicit
/// navigation or on the session/registration events routed through `AppState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewRouter {
    current: Page,
}

impl ViewRouter {
    #[must_use]
    pub fn current(&self) -> Page {
        self.current
    }

    /// Returns true when the page actually changed.
    pub fn navigate(&mut self, page: Page) -> bool {
        if self.current == page {
            return false;
        }
        tracing::debug!(from = self.current.as_str(), to = page.as_str(), "navigate");
        self.current = page;
        true
    }
}
