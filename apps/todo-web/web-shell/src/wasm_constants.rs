pub(crate) const ROOT_ID: &str = "todo-web-shell";
pub(crate) const NAV_ID: &str = "todo-web-shell-nav";
pub(crate) const MAIN_ID: &str = "todo-web-shell-main";
pub(crate) const LOGIN_USERNAME_INPUT_ID: &str = "todo-web-shell-login-username";
pub(crate) const LOGIN_PASSWORD_INPUT_ID: &str = "todo-web-shell-login-password";
pub(crate) const REGISTER_USERNAME_INPUT_ID: &str = "todo-web-shell-register-username";
pub(crate) const REGISTER_PASSWORD_INPUT_ID: &str = "todo-web-shell-register-password";
pub(crate) const TODO_NEW_TITLE_INPUT_ID: &str = "todo-web-shell-new-title";
pub(crate) const TODO_EDIT_TITLE_INPUT_ID: &str = "todo-web-shell-edit-title";

// Values of `data-action` on clickable controls.
pub(crate) const ACTION_NAVIGATE: &str = "navigate";
pub(crate) const ACTION_LOGOUT: &str = "logout";
pub(crate) const ACTION_LOGIN: &str = "login";
pub(crate) const ACTION_REGISTER: &str = "register";
pub(crate) const ACTION_TODO_ADD: &str = "todo-add";
pub(crate) const ACTION_TODO_EDIT: &str = "todo-edit";
pub(crate) const ACTION_TODO_SAVE: &str = "todo-save";
pub(crate) const ACTION_TODO_CANCEL: &str = "todo-cancel";
pub(crate) const ACTION_TODO_DELETE: &str = "todo-delete";
