use std::convert::Infallible;
use std::sync::{Mutex, PoisonError};

/// Durable key the bearer token lives under in every host.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Durable slot for the single session token.
///
/// Implementations are bare persistence: no expiry, no encryption. An empty
/// stored value must read back as absent.
pub trait TokenStore {
    type Error: std::fmt::Display;

    fn get(&self) -> Result<Option<String>, Self::Error>;
    fn set(&self, token: &str) -> Result<(), Self::Error>;
    fn clear(&self) -> Result<(), Self::Error>;
}

impl<S: TokenStore + ?Sized> TokenStore for &S {
    type Error = S::Error;

    fn get(&self) -> Result<Option<String>, Self::Error> {
        (**self).get()
    }

    fn set(&self, token: &str) -> Result<(), Self::Error> {
        (**self).set(token)
    }

    fn clear(&self) -> Result<(), Self::Error> {
        (**self).clear()
    }
}

/// Process-local store, used by tests and as a fallback when no durable
/// storage is reachable.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    type Error = Infallible;

    fn get(&self) -> Result<Option<String>, Self::Error> {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(token.clone().filter(|value| !value.is_empty()))
    }

    fn set(&self, token: &str) -> Result<(), Self::Error> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
