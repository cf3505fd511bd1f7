#[cfg(any(target_arch = "wasm32", test))]
mod markup;
#[cfg(any(target_arch = "wasm32", test))]
mod wasm_constants;
#[cfg(target_arch = "wasm32")]
mod wasm_state;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::future::Future;
    use std::rc::Rc;

    use todo_client_core::auth::{REGISTRATION_SUCCESS_MESSAGE, authenticate, register};
    use todo_client_core::config::resolve_compiled_base_url;
    use todo_client_core::flags::load_feature_flags;
    use todo_client_core::{
        ActionOutcome, AppAction, AppState, Credentials, LoginOutcome, Page, PageView,
        RegistrationOutcome, TOKEN_STORAGE_KEY, Todo, TodoSync, TodoSyncState, TokenStore,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Element, HtmlElement, HtmlInputElement};

    use crate::markup::{TodoPageInput, escape_html, render_main, render_nav};
    use crate::wasm_constants::*;
    use crate::wasm_state::{FormNotice, MountedTodos};

    mod dom;
    mod lifecycle;
    mod network;
    mod routing;

    use dom::*;
    use lifecycle::*;
    use network::*;
    use routing::*;

    thread_local! {
        static APP_STATE: RefCell<Option<AppState<LocalStorageTokenStore>>> = const { RefCell::new(None) };
        static TRANSPORT: RefCell<Option<Rc<BrowserTransport>>> = const { RefCell::new(None) };
        static MOUNTED_TODOS: RefCell<Option<MountedTodos<BrowserTransport>>> = const { RefCell::new(None) };
        static FORM_NOTICE: RefCell<Option<FormNotice>> = const { RefCell::new(None) };
        static ROOT_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static ROOT_INPUT_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        log_info("booting todo web shell");
        spawn_local(async {
            if let Err(error) = boot().await {
                set_boot_error(&error);
            }
        });
    }

    #[wasm_bindgen]
    pub fn current_page() -> String {
        with_app(|app| app.current_page().as_str().to_string()).unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn todo_state_json() -> String {
        let state = mounted_sync().map(|sync| sync.snapshot());
        serde_json::to_string(&state).unwrap_or_else(|_| "null".to_string())
    }

    async fn boot() -> Result<(), String> {
        let base_url = resolve_compiled_base_url(option_env!("TODO_BACKEND_URL"))
            .map_err(|error| format!("invalid backend base url: {error}"))?;
        log_info(&format!("backend: {base_url}"));

        let transport = Rc::new(BrowserTransport::new(base_url));
        TRANSPORT.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&transport)));
        APP_STATE.with(|slot| {
            *slot.borrow_mut() = Some(AppState::initialize(LocalStorageTokenStore));
        });

        ensure_shell_dom()?;
        install_root_handlers()?;
        render();

        let flags = load_feature_flags(transport.as_ref()).await;
        log_info(&format!("feature flags loaded: {}", flags.to_pretty_json()));
        dispatch(AppAction::FlagsLoaded(flags));
        Ok(())
    }

    fn with_app<R>(f: impl FnOnce(&mut AppState<LocalStorageTokenStore>) -> R) -> Option<R> {
        APP_STATE.with(|slot| slot.borrow_mut().as_mut().map(f))
    }

    fn transport() -> Option<Rc<BrowserTransport>> {
        TRANSPORT.with(|slot| slot.borrow().clone())
    }

    fn mounted_sync() -> Option<TodoSync<BrowserTransport>> {
        MOUNTED_TODOS.with(|slot| slot.borrow().as_ref().map(|mounted| mounted.sync.clone()))
    }

    fn set_new_title(title: String) {
        MOUNTED_TODOS.with(|slot| {
            if let Some(mounted) = slot.borrow_mut().as_mut() {
                mounted.new_title = title;
            }
        });
    }

    fn set_notice(message: impl Into<String>) {
        FORM_NOTICE.with(|slot| {
            *slot.borrow_mut() = Some(FormNotice {
                message: message.into(),
            });
        });
    }

    fn clear_notice() {
        FORM_NOTICE.with(|slot| slot.borrow_mut().take());
    }

    /// Applies an app transition and redraws.
    fn dispatch(action: AppAction) {
        with_app(|app| app.apply_action(action));
        render();
    }

    fn render() {
        let Some((view, nav)) = with_app(|app| (app.view(), app.nav_items())) else {
            return;
        };
        let todos = sync_todos_mount(&view);
        let notice = FORM_NOTICE.with(|slot| slot.borrow().clone());
        let page = todos.as_ref().map(|(state, new_title)| TodoPageInput {
            state,
            new_title,
        });
        let main = render_main(
            &view,
            page.as_ref(),
            notice.as_ref().map(|notice| notice.message.as_str()),
        );
        let result = set_inner_html(NAV_ID, &render_nav(&nav))
            .and_then(|()| set_inner_html(MAIN_ID, &main));
        if let Err(error) = result {
            log_warn(&error);
        }
    }

    /// Keeps exactly one synchronizer mounted while the todo page is shown,
    /// refreshing on mount.
    fn sync_todos_mount(view: &PageView) -> Option<(TodoSyncState, String)> {
        let PageView::Todos { token } = view else {
            MOUNTED_TODOS.with(|slot| slot.borrow_mut().take());
            return None;
        };

        let current = MOUNTED_TODOS.with(|slot| {
            slot.borrow()
                .as_ref()
                .filter(|mounted| mounted.token == *token)
                .map(|mounted| (mounted.sync.snapshot(), mounted.new_title.clone()))
        });
        if current.is_some() {
            return current;
        }

        let sync = TodoSync::mount(transport()?, token)?;
        MOUNTED_TODOS.with(|slot| {
            *slot.borrow_mut() = Some(MountedTodos {
                token: token.clone(),
                sync: sync.clone(),
                new_title: String::new(),
            });
        });
        run_todo_action("refresh", async move { sync.refresh().await });
        None
    }

    /// Runs one todo action off the event handler and redraws once it lands.
    fn run_todo_action<F>(action: &'static str, future: F)
    where
        F: Future<Output = ActionOutcome> + 'static,
    {
        spawn_local(async move {
            let outcome = future.await;
            if matches!(outcome, ActionOutcome::Unauthorized | ActionOutcome::Failed) {
                log_warn(&format!("todo {action} finished as {outcome:?}"));
            }
            render();
        });
        // Queued behind the action's first poll, so an in-flight read draws as loading.
        spawn_local(async {
            render();
        });
    }

    #[derive(Debug, Clone, Copy, Default)]
    struct LocalStorageTokenStore;

    fn local_storage() -> Result<web_sys::Storage, String> {
        let Some(window) = web_sys::window() else {
            return Err("window is unavailable for token storage".to_string());
        };
        window
            .local_storage()
            .map_err(|_| "failed to access local storage".to_string())?
            .ok_or_else(|| "local storage is unavailable".to_string())
    }

    impl TokenStore for LocalStorageTokenStore {
        type Error = String;

        fn get(&self) -> Result<Option<String>, Self::Error> {
            let token = local_storage()?
                .get_item(TOKEN_STORAGE_KEY)
                .map_err(|_| "failed to read token".to_string())?;
            Ok(token.filter(|token| !token.is_empty()))
        }

        fn set(&self, token: &str) -> Result<(), Self::Error> {
            local_storage()?
                .set_item(TOKEN_STORAGE_KEY, token)
                .map_err(|_| "failed to persist token".to_string())
        }

        fn clear(&self) -> Result<(), Self::Error> {
            local_storage()?
                .remove_item(TOKEN_STORAGE_KEY)
                .map_err(|_| "failed to clear token".to_string())
        }
    }
}
