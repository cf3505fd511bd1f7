//! Client core for the todo app: token persistence, session transitions,
//! feature flags, and the todo synchronization loop.
//!
//! Every network boundary is an async trait so the same core drives the
//! browser shell (`gloo-net`) and the native client (`reqwest`).

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod flags;
pub mod route;
pub mod session;
pub mod sync;
pub mod todo;
pub mod token_store;

pub use app::{AppAction, AppState, NavItem, PageView};
pub use auth::{AuthApiTransport, Credentials, LoginOutcome, RegistrationOutcome};
pub use error::{ApiError, FailureClass, UNAUTHORIZED_MESSAGE};
pub use flags::{FEATURE_LOGIN, FeatureFlagSet, FeatureFlagTransport};
pub use route::{Page, ViewRouter};
pub use session::{Session, SessionController, SessionError};
pub use sync::{ActionOutcome, EditDraft, SyncError, TodoApiTransport, TodoSync, TodoSyncState};
pub use todo::{Todo, TodoId};
pub use token_store::{MemoryTokenStore, TOKEN_STORAGE_KEY, TokenStore};
