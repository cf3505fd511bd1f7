use super::*;

const LOG_PREFIX: &str = "[todo-web]";

pub(super) fn log_info(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(&format!("{LOG_PREFIX} {message}")));
}

pub(super) fn log_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("{LOG_PREFIX} {message}")));
}

pub(super) fn set_boot_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(&format!(
        "{LOG_PREFIX} startup failed: {message}"
    )));
    let html = format!(
        "<p class=\"error\">Startup failed: {}</p>",
        escape_html(message)
    );
    if set_inner_html(MAIN_ID, &html).is_err() {
        if let Some(body) = document().ok().and_then(|document| document.body()) {
            body.set_inner_html(&html);
        }
    }
}
