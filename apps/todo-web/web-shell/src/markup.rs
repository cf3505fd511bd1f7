//! HTML for the shell's nav bar and page body. Pure string building so the
//! page contents can be checked without a browser.

use todo_client_core::app::{
    LOADING_MESSAGE, LOADING_TODOS_MESSAGE, LOGIN_DISABLED_MESSAGE, LOGIN_REQUIRED_MESSAGE,
};
use todo_client_core::{NavItem, Page, PageView, TodoSyncState};

use crate::wasm_constants::*;

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn nav_button(page: Page, label: &str) -> String {
    format!(
        "<button type=\"button\" data-action=\"{ACTION_NAVIGATE}\" data-page=\"{}\">{}</button>",
        page.as_str(),
        escape_html(label)
    )
}

pub(crate) fn render_nav(items: &[NavItem]) -> String {
    let mut html = String::from("<nav>");
    for item in items {
        match item {
            NavItem::Page(page) => html.push_str(&nav_button(*page, page.label())),
            NavItem::Logout => html.push_str(&format!(
                "<button type=\"button\" data-action=\"{ACTION_LOGOUT}\">{}</button>",
                item.label()
            )),
        }
    }
    html.push_str("</nav>");
    html
}

/// What the todo page draws from: the mounted list state and the new-todo
/// title typed but not yet submitted.
pub(crate) struct TodoPageInput<'a> {
    pub(crate) state: &'a TodoSyncState,
    pub(crate) new_title: &'a str,
}

/// Body for the current page. `todos` is the mounted todo page, if any;
/// `notice` is the last login/registration message.
pub(crate) fn render_main(
    view: &PageView,
    todos: Option<&TodoPageInput<'_>>,
    notice: Option<&str>,
) -> String {
    match view {
        PageView::Loading => format!("<p>{LOADING_MESSAGE}</p>"),
        PageView::Home {
            flags_json,
            login_shortcut,
        } => {
            let mut html = format!(
                "<h1>Home</h1><h2>Feature flags</h2><pre>{}</pre>",
                escape_html(flags_json)
            );
            if *login_shortcut {
                html.push_str(&nav_button(Page::Login, "Go to Login"));
            } else {
                html.push_str(&format!("<p>{LOGIN_DISABLED_MESSAGE}</p>"));
            }
            html
        }
        PageView::Todos { .. } => render_todos(todos),
        PageView::TodosLoginRequired => format!("<p>{LOGIN_REQUIRED_MESSAGE}</p>"),
        PageView::LoginForm => credentials_form(
            "Login",
            LOGIN_USERNAME_INPUT_ID,
            LOGIN_PASSWORD_INPUT_ID,
            ACTION_LOGIN,
            notice,
        ),
        PageView::LoggedIn => format!(
            "<h1>Login</h1><p>Logged in</p>\
             <button type=\"button\" data-action=\"{ACTION_LOGOUT}\">Logout</button>"
        ),
        PageView::LoginDisabled => format!("<p>{LOGIN_DISABLED_MESSAGE}</p>"),
        PageView::Register => credentials_form(
            "Register",
            REGISTER_USERNAME_INPUT_ID,
            REGISTER_PASSWORD_INPUT_ID,
            ACTION_REGISTER,
            notice,
        ),
    }
}

fn credentials_form(
    title: &str,
    username_id: &str,
    password_id: &str,
    action: &str,
    notice: Option<&str>,
) -> String {
    let mut html = format!(
        "<h1>{title}</h1>\
         <input id=\"{username_id}\" type=\"text\" placeholder=\"Username\" required>\
         <input id=\"{password_id}\" type=\"password\" placeholder=\"Password\" required>\
         <button type=\"button\" data-action=\"{action}\">{title}</button>"
    );
    if let Some(notice) = notice {
        html.push_str(&format!("<p>{}</p>", escape_html(notice)));
    }
    html
}

fn render_todos(page: Option<&TodoPageInput<'_>>) -> String {
    let mut html = String::from("<h1>Todos</h1>");
    let Some(TodoPageInput { state, new_title }) = page else {
        html.push_str(&format!("<p>{LOADING_TODOS_MESSAGE}</p>"));
        return html;
    };
    if state.loading {
        html.push_str(&format!("<p>{LOADING_TODOS_MESSAGE}</p>"));
    }
    if let Some(message) = state.error_message() {
        html.push_str(&format!("<p class=\"error\">{}</p>", escape_html(message)));
    }
    html.push_str(&format!(
        "<input id=\"{TODO_NEW_TITLE_INPUT_ID}\" type=\"text\" placeholder=\"New todo\" value=\"{}\">\
         <button type=\"button\" data-action=\"{ACTION_TODO_ADD}\">Add</button><ul>",
        escape_html(new_title)
    ));
    for todo in &state.items {
        let id = escape_html(&todo.id.to_string());
        if state.draft.is_editing(&todo.id) {
            html.push_str(&format!(
                "<li><input id=\"{TODO_EDIT_TITLE_INPUT_ID}\" type=\"text\" value=\"{}\">\
                 <button type=\"button\" data-action=\"{ACTION_TODO_SAVE}\">Save</button>\
                 <button type=\"button\" data-action=\"{ACTION_TODO_CANCEL}\">Cancel</button></li>",
                escape_html(&state.draft.edit_title)
            ));
        } else {
            html.push_str(&format!(
                "<li><span>{}</span>\
                 <button type=\"button\" data-action=\"{ACTION_TODO_EDIT}\" data-id=\"{id}\">Edit</button>\
                 <button type=\"button\" data-action=\"{ACTION_TODO_DELETE}\" data-id=\"{id}\">Delete</button></li>",
                escape_html(&todo.title)
            ));
        }
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_client_core::sync::{EditDraft, SyncError};
    use todo_client_core::{Todo, TodoId};

    fn todo(id: i64, title: &str) -> Todo {
        Todo {
            id: TodoId::Number(id),
            title: title.to_string(),
        }
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn nav_lists_logout_only_when_given() {
        let logged_out: Vec<NavItem> = Page::ALL.into_iter().map(NavItem::Page).collect();
        let html = render_nav(&logged_out);
        assert!(html.contains("data-page=\"register\""));
        assert!(!html.contains(ACTION_LOGOUT));

        let mut logged_in = logged_out;
        logged_in.push(NavItem::Logout);
        assert!(render_nav(&logged_in).contains(">Logout</button>"));
    }

    #[test]
    fn home_shows_flags_and_shortcut() {
        let html = render_main(
            &PageView::Home {
                flags_json: "{\"feature-login\": true}".to_string(),
                login_shortcut: true,
            },
            None,
            None,
        );
        assert!(html.contains("&quot;feature-login&quot;: true"));
        assert!(html.contains("data-page=\"login\""));

        let html = render_main(
            &PageView::Home {
                flags_json: "{}".to_string(),
                login_shortcut: false,
            },
            None,
            None,
        );
        assert!(html.contains(LOGIN_DISABLED_MESSAGE));
    }

    #[test]
    fn unmounted_todos_render_as_loading() {
        let html = render_main(
            &PageView::Todos {
                token: "tok".to_string(),
            },
            None,
            None,
        );
        assert!(html.contains(LOADING_TODOS_MESSAGE));
    }

    #[test]
    fn todos_render_error_rows_and_edit_draft() {
        let state = TodoSyncState {
            items: vec![todo(1, "<buy> milk"), todo(2, "walk dog")],
            last_error: Some(SyncError::Unauthorized),
            loading: false,
            draft: EditDraft {
                editing_id: Some(TodoId::Number(2)),
                edit_title: "walk cat".to_string(),
            },
        };
        let html = render_main(
            &PageView::Todos {
                token: "tok".to_string(),
            },
            Some(&TodoPageInput {
                state: &state,
                new_title: "",
            }),
            None,
        );

        assert!(html.contains("User can&#39;t perform this action"));
        assert!(html.contains("&lt;buy&gt; milk"));
        assert!(html.contains("data-id=\"1\""));
        assert!(html.contains("value=\"walk cat\""));
        assert!(!html.contains("data-id=\"2\""));
        assert!(!html.contains(LOADING_TODOS_MESSAGE));
    }

    #[test]
    fn redraw_keeps_unsent_new_title() {
        let state = TodoSyncState {
            items: vec![todo(1, "a")],
            last_error: None,
            loading: true,
            draft: EditDraft::default(),
        };
        let html = render_main(
            &PageView::Todos {
                token: "tok".to_string(),
            },
            Some(&TodoPageInput {
                state: &state,
                new_title: "buy \"oat\" milk",
            }),
            None,
        );

        assert!(html.contains(&format!(
            "id=\"{TODO_NEW_TITLE_INPUT_ID}\" type=\"text\" placeholder=\"New todo\" value=\"buy &quot;oat&quot; milk\""
        )));
        assert!(html.contains(LOADING_TODOS_MESSAGE));
    }

    #[test]
    fn forms_carry_notice() {
        let html = render_main(&PageView::LoginForm, None, Some("Login failed"));
        assert!(html.contains(LOGIN_USERNAME_INPUT_ID));
        assert!(html.contains("<p>Login failed</p>"));

        let html = render_main(&PageView::Register, None, None);
        assert!(html.contains(ACTION_REGISTER));
    }
}
