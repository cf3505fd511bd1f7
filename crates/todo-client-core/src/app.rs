//! Application shell state: session, flags, and the page selector, driven by
//! a small action reducer so both hosts share one set of transitions.

use crate::flags::FeatureFlagSet;
use crate::route::{Page, ViewRouter};
use crate::session::{SessionController, SessionError};
use crate::token_store::TokenStore;

pub const LOADING_MESSAGE: &str = "Loading...";
pub const LOADING_TODOS_MESSAGE: &str = "Loading todos...";
pub const LOGIN_DISABLED_MESSAGE: &str = "Login feature is disabled.";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to manage todos.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    FlagsLoaded(FeatureFlagSet),
    Navigate(Page),
    LoggedIn(String),
    LoggedOut,
    Registered,
}

/// What the current page should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Loading,
    Home {
        flags_json: String,
        login_shortcut: bool,
    },
    Todos {
        token: String,
    },
    TodosLoginRequired,
    LoginForm,
    LoggedIn,
    LoginDisabled,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Page(Page),
    Logout,
}

impl NavItem {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Page(page) => page.label(),
            Self::Logout => "Logout",
        }
    }
}

#[derive(Debug)]
pub struct AppState<S> {
    session: SessionController<S>,
    flags: FeatureFlagSet,
    flags_loading: bool,
    router: ViewRouter,
}

impl<S: TokenStore> AppState<S> {
    /// Starts on `Home`, logged in iff the store holds a token, with flags
    /// still loading.
    pub fn initialize(store: S) -> Self {
        Self {
            session: SessionController::initialize(store),
            flags: FeatureFlagSet::default(),
            flags_loading: true,
            router: ViewRouter::default(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionController<S> {
        &self.session
    }

    #[must_use]
    pub fn flags(&self) -> &FeatureFlagSet {
        &self.flags
    }

    #[must_use]
    pub fn flags_loading(&self) -> bool {
        self.flags_loading
    }

    #[must_use]
    pub fn current_page(&self) -> Page {
        self.router.current()
    }

    /// Applies one transition. Returns true when anything visible changed.
    pub fn apply_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::FlagsLoaded(flags) => {
                if !self.flags_loading {
                    tracing::debug!("feature flags already loaded; ignoring reload");
                    return false;
                }
                self.flags = flags;
                self.flags_loading = false;
                true
            }
            AppAction::Navigate(page) => self.router.navigate(page),
            AppAction::LoggedIn(token) => match self.session.login(&token) {
                Ok(page) => {
                    self.router.navigate(page);
                    true
                }
                Err(SessionError::EmptyToken) => false,
                Err(SessionError::Store(error)) => {
                    tracing::warn!(%error, "failed to persist token; staying logged out");
                    false
                }
            },
            AppAction::LoggedOut => match self.session.logout() {
                Ok(page) => {
                    self.router.navigate(page);
                    true
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to clear token; staying logged in");
                    false
                }
            },
            AppAction::Registered => self.router.navigate(Page::Login),
        }
    }

    #[must_use]
    pub fn view(&self) -> PageView {
        if self.flags_loading {
            return PageView::Loading;
        }
        let login_enabled = self.flags.login_enabled();
        match self.router.current() {
            Page::Home => PageView::Home {
                flags_json: self.flags.to_pretty_json(),
                login_shortcut: login_enabled,
            },
            Page::Todos => match self.session.token() {
                Some(token) => PageView::Todos {
                    token: token.to_string(),
                },
                None => PageView::TodosLoginRequired,
            },
            Page::Login if !login_enabled => PageView::LoginDisabled,
            Page::Login if self.session.is_authenticated() => PageView::LoggedIn,
            Page::Login => PageView::LoginForm,
            Page::Register => PageView::Register,
        }
    }

    #[must_use]
    pub fn nav_items(&self) -> Vec<NavItem> {
        let mut items: Vec<NavItem> = Page::ALL.into_iter().map(NavItem::Page).collect();
        if self.session.is_authenticated() {
            items.push(NavItem::Logout);
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FEATURE_LOGIN;
    use crate::token_store::MemoryTokenStore;
    use std::collections::BTreeMap;

    fn flags(login: bool) -> FeatureFlagSet {
        FeatureFlagSet::new(BTreeMap::from([(FEATURE_LOGIN.to_string(), login)]))
    }

    fn ready_app(store: MemoryTokenStore, login: bool) -> AppState<MemoryTokenStore> {
        let mut app = AppState::initialize(store);
        app.apply_action(AppAction::FlagsLoaded(flags(login)));
        app
    }

    #[test]
    fn shows_loading_until_flags_arrive() {
        let mut app = AppState::initialize(MemoryTokenStore::default());
        assert_eq!(app.view(), PageView::Loading);

        app.apply_action(AppAction::FlagsLoaded(FeatureFlagSet::default()));
        assert!(matches!(app.view(), PageView::Home { .. }));
    }

    #[test]
    fn flags_are_immutable_after_first_load() {
        let mut app = ready_app(MemoryTokenStore::default(), true);
        assert!(!app.apply_action(AppAction::FlagsLoaded(FeatureFlagSet::default())));
        assert!(app.flags().login_enabled());
    }

    #[test]
    fn home_offers_login_shortcut_only_when_enabled() {
        let app = ready_app(MemoryTokenStore::default(), true);
        let PageView::Home {
            flags_json,
            login_shortcut,
        } = app.view()
        else {
            panic!("expected home view");
        };
        assert!(login_shortcut);
        assert!(flags_json.contains("\"feature-login\": true"));

        let app = ready_app(MemoryTokenStore::default(), false);
        assert!(matches!(
            app.view(),
            PageView::Home {
                login_shortcut: false,
                ..
            }
        ));
    }

    #[test]
    fn failed_flag_load_renders_login_disabled_placeholder() {
        let mut app = AppState::initialize(MemoryTokenStore::default());
        app.apply_action(AppAction::FlagsLoaded(FeatureFlagSet::default()));
        app.apply_action(AppAction::Navigate(Page::Login));

        assert_eq!(app.view(), PageView::LoginDisabled);
    }

    #[test]
    fn login_navigates_to_todos_with_token() {
        let mut app = ready_app(MemoryTokenStore::default(), true);
        app.apply_action(AppAction::Navigate(Page::Login));
        assert_eq!(app.view(), PageView::LoginForm);

        assert!(app.apply_action(AppAction::LoggedIn("tok123".to_string())));

        assert_eq!(app.current_page(), Page::Todos);
        assert_eq!(
            app.view(),
            PageView::Todos {
                token: "tok123".to_string()
            }
        );
        assert_eq!(
            app.session().store().get(),
            Ok(Some("tok123".to_string()))
        );
    }

    #[test]
    fn empty_login_token_is_ignored() {
        let mut app = ready_app(MemoryTokenStore::default(), true);
        assert!(!app.apply_action(AppAction::LoggedIn(String::new())));
        assert_eq!(app.current_page(), Page::Home);
        assert!(!app.session().is_authenticated());
    }

    #[test]
    fn logout_navigates_to_login_and_clears_store() {
        let mut app = ready_app(MemoryTokenStore::with_token("tok"), true);
        app.apply_action(AppAction::Navigate(Page::Todos));

        app.apply_action(AppAction::LoggedOut);

        assert_eq!(app.current_page(), Page::Login);
        assert_eq!(app.view(), PageView::LoginForm);
        assert_eq!(app.session().store().get(), Ok(None));
    }

    #[test]
    fn logout_that_cannot_clear_store_stays_logged_in() {
        struct UnclearableStore;

        impl TokenStore for UnclearableStore {
            type Error = String;

            fn get(&self) -> Result<Option<String>, Self::Error> {
                Ok(Some("tok".to_string()))
            }

            fn set(&self, _token: &str) -> Result<(), Self::Error> {
                Ok(())
            }

            fn clear(&self) -> Result<(), Self::Error> {
                Err("storage unavailable".to_string())
            }
        }

        let mut app = AppState::initialize(UnclearableStore);
        app.apply_action(AppAction::FlagsLoaded(flags(true)));
        app.apply_action(AppAction::Navigate(Page::Todos));

        assert!(!app.apply_action(AppAction::LoggedOut));
        assert_eq!(app.current_page(), Page::Todos);
        assert!(app.session().is_authenticated());
        assert_eq!(app.nav_items().last(), Some(&NavItem::Logout));
    }

    #[test]
    fn registration_navigates_to_login() {
        let mut app = ready_app(MemoryTokenStore::default(), true);
        app.apply_action(AppAction::Navigate(Page::Register));
        assert_eq!(app.view(), PageView::Register);

        app.apply_action(AppAction::Registered);
        assert_eq!(app.current_page(), Page::Login);
    }

    #[test]
    fn todos_page_requires_session() {
        let mut app = ready_app(MemoryTokenStore::default(), true);
        app.apply_action(AppAction::Navigate(Page::Todos));
        assert_eq!(app.view(), PageView::TodosLoginRequired);
    }

    #[test]
    fn login_page_shows_logged_in_state_without_redirect() {
        let mut app = ready_app(MemoryTokenStore::with_token("tok"), true);
        app.apply_action(AppAction::Navigate(Page::Login));

        assert_eq!(app.current_page(), Page::Login);
        assert_eq!(app.view(), PageView::LoggedIn);
    }

    #[test]
    fn logout_appears_in_nav_only_when_authenticated() {
        let app = ready_app(MemoryTokenStore::default(), true);
        assert!(!app.nav_items().contains(&NavItem::Logout));

        let app = ready_app(MemoryTokenStore::with_token("tok"), true);
        assert_eq!(app.nav_items().last(), Some(&NavItem::Logout));
        assert_eq!(app.nav_items().len(), 5);
    }
}
