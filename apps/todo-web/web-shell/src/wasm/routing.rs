use super::*;

/// Routes a click on any `[data-action]` control inside the shell.
pub(super) fn handle_click(event: web_sys::Event) {
    let Some(target) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return;
    };
    let Ok(Some(control)) = target.closest("[data-action]") else {
        return;
    };
    let Some(action) = control.get_attribute("data-action") else {
        return;
    };

    match action.as_str() {
        ACTION_NAVIGATE => {
            let page = control.get_attribute("data-page").unwrap_or_default();
            clear_notice();
            dispatch(AppAction::Navigate(Page::from_name(&page)));
        }
        ACTION_LOGOUT => {
            clear_notice();
            dispatch(AppAction::LoggedOut);
            if with_app(|app| app.session().is_authenticated()).unwrap_or(false) {
                log_warn("logout failed: stored token could not be cleared");
            }
        }
        ACTION_LOGIN => submit_login(),
        ACTION_REGISTER => submit_register(),
        ACTION_TODO_ADD => submit_new_todo(),
        ACTION_TODO_EDIT => {
            if let Some((sync, todo)) = todo_for_control(&control) {
                sync.begin_edit(&todo);
                render();
            }
        }
        ACTION_TODO_CANCEL => {
            if let Some(sync) = mounted_sync() {
                sync.cancel_edit();
                render();
            }
        }
        ACTION_TODO_SAVE => {
            if let Some(sync) = mounted_sync() {
                sync.set_edit_title(input_value(TODO_EDIT_TITLE_INPUT_ID));
                run_todo_action("update", async move { sync.save_edit().await });
            }
        }
        ACTION_TODO_DELETE => {
            if let Some((sync, todo)) = todo_for_control(&control) {
                run_todo_action("delete", async move { sync.delete(&todo.id).await });
            }
        }
        other => log_warn(&format!("unknown action: {other}")),
    }
}

/// Mirrors typing in the todo inputs into state so redraws keep it.
pub(super) fn handle_input(event: web_sys::Event) {
    let Some(input) = event
        .target()
        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    match input.id().as_str() {
        TODO_NEW_TITLE_INPUT_ID => set_new_title(input.value()),
        TODO_EDIT_TITLE_INPUT_ID => {
            if let Some(sync) = mounted_sync() {
                sync.set_edit_title(input.value());
            }
        }
        _ => {}
    }
}

/// Resolves a row control's `data-id` against the mounted list.
fn todo_for_control(control: &Element) -> Option<(TodoSync<BrowserTransport>, Todo)> {
    let id = control.get_attribute("data-id")?;
    let sync = mounted_sync()?;
    let todo = sync
        .items()
        .into_iter()
        .find(|todo| todo.id.to_string() == id)?;
    Some((sync, todo))
}

fn credentials_from_inputs(username_id: &str, password_id: &str) -> Option<Credentials> {
    match Credentials::new(input_value(username_id), input_value(password_id)) {
        Ok(credentials) => Some(credentials),
        Err(error) => {
            set_notice(error.to_string());
            render();
            None
        }
    }
}

fn submit_login() {
    let Some(credentials) = credentials_from_inputs(LOGIN_USERNAME_INPUT_ID, LOGIN_PASSWORD_INPUT_ID)
    else {
        return;
    };
    let Some(transport) = transport() else {
        return;
    };
    spawn_local(async move {
        match authenticate(transport.as_ref(), &credentials).await {
            LoginOutcome::Authenticated(token) => {
                clear_notice();
                dispatch(AppAction::LoggedIn(token));
            }
            LoginOutcome::Failed(message) => {
                set_notice(message);
                render();
            }
        }
    });
}

fn submit_register() {
    let Some(credentials) =
        credentials_from_inputs(REGISTER_USERNAME_INPUT_ID, REGISTER_PASSWORD_INPUT_ID)
    else {
        return;
    };
    let Some(transport) = transport() else {
        return;
    };
    spawn_local(async move {
        match register(transport.as_ref(), &credentials).await {
            RegistrationOutcome::Registered => {
                log_info(&format!("registered {}", credentials.username()));
                set_notice(REGISTRATION_SUCCESS_MESSAGE);
                dispatch(AppAction::Registered);
            }
            RegistrationOutcome::Failed(message) => {
                set_notice(message);
                render();
            }
        }
    });
}

fn submit_new_todo() {
    let Some(sync) = mounted_sync() else {
        return;
    };
    let title = input_value(TODO_NEW_TITLE_INPUT_ID);
    run_todo_action("create", async move {
        let outcome = sync.create(&title).await;
        if outcome == ActionOutcome::Completed {
            set_new_title(String::new());
        }
        outcome
    });
}
