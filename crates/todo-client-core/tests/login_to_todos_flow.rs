use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Value, json};
use todo_client_core::auth::{LoginForm, LoginResponse, SignupRequest, authenticate};
use todo_client_core::flags::load_feature_flags;
use todo_client_core::{
    ActionOutcome, ApiError, AppAction, AppState, AuthApiTransport, Credentials,
    FeatureFlagTransport, LoginOutcome, MemoryTokenStore, Page, PageView, TodoApiTransport,
    TodoId, TodoSync, TokenStore, UNAUTHORIZED_MESSAGE,
};

/// Backend double that answers every endpoint from fixed scripts.
struct Backend {
    flags: Result<Value, ApiError>,
    token: &'static str,
    list: Result<Value, ApiError>,
    seen_tokens: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl FeatureFlagTransport for Backend {
    async fn fetch_flags(&self) -> Result<Value, ApiError> {
        self.flags.clone()
    }
}

#[async_trait(?Send)]
impl AuthApiTransport for Backend {
    async fn signup(&self, _request: SignupRequest) -> Result<(), ApiError> {
        Ok(())
    }

    async fn login(&self, _form: LoginForm) -> Result<LoginResponse, ApiError> {
        Ok(LoginResponse {
            access_token: Some(self.token.to_string()),
        })
    }
}

#[async_trait(?Send)]
impl TodoApiTransport for Backend {
    async fn list_todos(&self, token: &str) -> Result<Value, ApiError> {
        self.seen_tokens.borrow_mut().push(token.to_string());
        self.list.clone()
    }

    async fn create_todo(&self, _token: &str, _title: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn update_todo(&self, _token: &str, _id: &TodoId, _title: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete_todo(&self, _token: &str, _id: &TodoId) -> Result<(), ApiError> {
        Ok(())
    }
}

#[tokio::test]
async fn login_then_unauthorized_list_surfaces_error_and_empty_list() {
    let backend = Rc::new(Backend {
        flags: Ok(json!({"feature-login": true})),
        token: "tok123",
        list: Err(ApiError::http(401, "Not authenticated")),
        seen_tokens: RefCell::new(Vec::new()),
    });
    let mut app = AppState::initialize(MemoryTokenStore::default());

    let flags = load_feature_flags(backend.as_ref()).await;
    app.apply_action(AppAction::FlagsLoaded(flags));
    app.apply_action(AppAction::Navigate(Page::Login));
    assert_eq!(app.view(), PageView::LoginForm);

    let credentials = Credentials::new("ada", "pw").expect("credentials");
    let LoginOutcome::Authenticated(token) = authenticate(backend.as_ref(), &credentials).await
    else {
        panic!("expected authenticated outcome");
    };
    app.apply_action(AppAction::LoggedIn(token));

    assert_eq!(app.current_page(), Page::Todos);
    let PageView::Todos { token } = app.view() else {
        panic!("expected todos view");
    };

    let sync = TodoSync::mount(Rc::clone(&backend), &token).expect("mounted");
    assert_eq!(sync.refresh().await, ActionOutcome::Unauthorized);

    assert_eq!(sync.state().error_message(), Some(UNAUTHORIZED_MESSAGE));
    assert!(sync.items().is_empty());
    assert_eq!(backend.seen_tokens.borrow().as_slice(), ["tok123"]);
}

#[tokio::test]
async fn flag_outage_disables_login_but_keeps_app_usable() {
    let backend = Backend {
        flags: Err(ApiError::transport("connection refused")),
        token: "unused",
        list: Ok(json!([])),
        seen_tokens: RefCell::new(Vec::new()),
    };
    let mut app = AppState::initialize(MemoryTokenStore::default());

    let flags = load_feature_flags(&backend).await;
    app.apply_action(AppAction::FlagsLoaded(flags));

    assert!(matches!(
        app.view(),
        PageView::Home {
            login_shortcut: false,
            ..
        }
    ));
    app.apply_action(AppAction::Navigate(Page::Login));
    assert_eq!(app.view(), PageView::LoginDisabled);
    app.apply_action(AppAction::Navigate(Page::Register));
    assert_eq!(app.view(), PageView::Register);
}

#[tokio::test]
async fn reload_restores_session_from_store() {
    let store = MemoryTokenStore::default();
    {
        let mut app = AppState::initialize(&store);
        app.apply_action(AppAction::FlagsLoaded(Default::default()));
        app.apply_action(AppAction::LoggedIn("persisted".to_string()));
    }

    let app = AppState::initialize(&store);
    assert!(app.session().is_authenticated());
    assert_eq!(app.session().token(), Some("persisted"));
    assert_eq!(store.get(), Ok(Some("persisted".to_string())));
}
