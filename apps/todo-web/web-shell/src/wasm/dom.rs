use super::*;

pub(super) fn document() -> Result<web_sys::Document, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

fn create_section(
    document: &web_sys::Document,
    tag: &str,
    id: &str,
) -> Result<HtmlElement, String> {
    let element = document
        .create_element(tag)
        .map_err(|_| format!("failed to create #{id}"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("#{id} is not HtmlElement"))?;
    element.set_id(id);
    Ok(element)
}

pub(super) fn ensure_shell_dom() -> Result<(), String> {
    let document = document()?;
    if document.get_element_by_id(ROOT_ID).is_some() {
        return Ok(());
    }
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;

    let root = create_section(&document, "div", ROOT_ID)?;
    root.style()
        .set_property("max-width", "640px")
        .map_err(|_| "failed to style shell root".to_string())?;
    root.style()
        .set_property("margin", "0 auto")
        .map_err(|_| "failed to style shell root".to_string())?;
    root.style()
        .set_property("font-family", "system-ui, sans-serif")
        .map_err(|_| "failed to style shell root".to_string())?;

    let nav = create_section(&document, "header", NAV_ID)?;
    let main = create_section(&document, "main", MAIN_ID)?;
    root.append_child(&nav)
        .map_err(|_| "failed to mount nav".to_string())?;
    root.append_child(&main)
        .map_err(|_| "failed to mount main".to_string())?;
    body.append_child(&root)
        .map_err(|_| "failed to mount shell root".to_string())?;
    Ok(())
}

pub(super) fn set_inner_html(id: &str, html: &str) -> Result<(), String> {
    let element = document()?
        .get_element_by_id(id)
        .ok_or_else(|| format!("missing #{id}"))?;
    element.set_inner_html(html);
    Ok(())
}

/// Current value of an `<input>`, or empty when it is not on the page.
pub(super) fn input_value(id: &str) -> String {
    document()
        .ok()
        .and_then(|document| document.get_element_by_id(id))
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

type RootHandlerSlot = RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>>;

/// Delegated listeners on the shell root; page bodies are replaced
/// wholesale on every render, so per-control listeners would be lost.
pub(super) fn install_root_handlers() -> Result<(), String> {
    let root = document()?
        .get_element_by_id(ROOT_ID)
        .ok_or_else(|| "missing shell root".to_string())?;
    install_root_handler(&root, "click", &ROOT_CLICK_HANDLER, handle_click)?;
    install_root_handler(&root, "input", &ROOT_INPUT_HANDLER, handle_input)
}

fn install_root_handler(
    root: &Element,
    event_name: &str,
    slot: &'static std::thread::LocalKey<RootHandlerSlot>,
    handler: fn(web_sys::Event),
) -> Result<(), String> {
    slot.with(|slot| {
        if slot.borrow().is_some() {
            return Ok(());
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
        root.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
            .map_err(|_| format!("failed to attach {event_name} handler"))?;
        *slot.borrow_mut() = Some(callback);
        Ok(())
    })
}
