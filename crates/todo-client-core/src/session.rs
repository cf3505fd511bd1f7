use thiserror::Error;

use crate::route::Page;
use crate::token_store::TokenStore;

/// In-memory view of the authenticated identity.
///
/// Authentication is derived from the token, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    fn from_token(token: Option<String>) -> Self {
        Self {
            token: token.filter(|value| !value.is_empty()),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Error)]
pub enum SessionError<E> {
    #[error("login requires a non-empty token")]
    EmptyToken,
    #[error("token store update failed: {0}")]
    Store(E),
}

/// Sole writer of the session. Every transition writes through to the token
/// store before the in-memory session changes.
#[derive(Debug)]
pub struct SessionController<S> {
    store: S,
    session: Session,
}

impl<S: TokenStore> SessionController<S> {
    /// Derives the session from whatever the store holds. An unreadable store
    /// starts the session logged out.
    pub fn initialize(store: S) -> Self {
        let token = match store.get() {
            Ok(token) => token,
            Err(error) => {
                tracing::warn!(%error, "token store unreadable; starting logged out");
                None
            }
        };
        let session = Session::from_token(token);
        tracing::debug!(authenticated = session.is_authenticated(), "session initialized");
        Self { store, session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists `token` and marks the session authenticated, replacing any
    /// previous token. Returns the page to navigate to.
    ///
    /// An empty token is a caller contract violation: nothing is mutated and
    /// `SessionError::EmptyToken` is returned for the caller to ignore.
    pub fn login(&mut self, token: &str) -> Result<Page, SessionError<S::Error>> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        self.store.set(token).map_err(SessionError::Store)?;
        self.session = Session::from_token(Some(token.to_string()));
        tracing::debug!("session authenticated");
        Ok(Page::Todos)
    }

    /// Clears the store, then the session. Safe to call when already logged
    /// out. A store that cannot be cleared leaves the session untouched.
    pub fn logout(&mut self) -> Result<Page, SessionError<S::Error>> {
        self.store.clear().map_err(SessionError::Store)?;
        self.session = Session::default();
        tracing::debug!("session cleared");
        Ok(Page::Login)
    }
}
