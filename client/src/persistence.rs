use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, Storage, Window};

use curious_ink_shared::svg::drawing_to_svg;
use curious_ink_shared::{Drawing, DRAWING_CACHE_KEY, SAVE_DELAY_MS};

use crate::error::ClientError;
use crate::state::{
    stroke_options, Settings, State, CANVAS_SIZE, EXPANDED_KEY, PREFIX_KEY, PROMPT_KEY,
    RESPONSE_KEY,
};

fn local_storage(window: &Window) -> Result<Storage, ClientError> {
    window
        .local_storage()?
        .ok_or(ClientError::StorageUnavailable)
}

fn read_json<T: DeserializeOwned>(storage: &Storage, key: &str) -> Option<T> {
    let text = storage.get_item(key).ok()??;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(error) => {
            web_sys::console::warn_1(&format!("Ignoring cached {key}: {error}").into());
            None
        }
    }
}

fn write_json<T: Serialize + ?Sized>(window: &Window, key: &str, value: &T) {
    let result = local_storage(window).and_then(|storage| {
        let text = serde_json::to_string(value).map_err(|e| ClientError::Js(e.to_string()))?;
        storage.set_item(key, &text).map_err(ClientError::from)
    });
    if let Err(error) = result {
        web_sys::console::error_1(&format!("Failed to save {key}: {error}").into());
    }
}

/// The cached drawing, or an empty one when nothing usable is stored.
pub fn load_drawing(window: &Window) -> Drawing {
    let Ok(storage) = local_storage(window) else {
        return Drawing::default();
    };
    let Ok(Some(text)) = storage.get_item(DRAWING_CACHE_KEY) else {
        return Drawing::default();
    };
    match Drawing::from_json(&text) {
        Ok(drawing) => drawing,
        Err(error) => {
            web_sys::console::warn_1(&format!("Ignoring cached drawing: {error}").into());
            Drawing::default()
        }
    }
}

pub fn save_drawing(window: &Window, drawing: &Drawing) {
    let result = local_storage(window).and_then(|storage| {
        storage
            .set_item(DRAWING_CACHE_KEY, &drawing.to_json())
            .map_err(ClientError::from)
    });
    if let Err(error) = result {
        web_sys::console::error_1(&format!("Failed to cache drawing: {error}").into());
    }
}

/// Restarts the quiet period after which the drawing is cached.
pub fn schedule_save(window: &Window, state: &Rc<RefCell<State>>) {
    let ticket = {
        let mut state = state.borrow_mut();
        if let Some(handle) = state.save_timer.take() {
            window.clear_timeout_with_handle(handle);
        }
        state.save_debounce.schedule()
    };
    let save_state = state.clone();
    let save_window = window.clone();
    let onsave = Closure::once_into_js(move || {
        let mut state = save_state.borrow_mut();
        if !state.save_debounce.fire(ticket) {
            return;
        }
        state.save_timer = None;
        save_drawing(&save_window, state.recorder.drawing());
    });
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        onsave.unchecked_ref(),
        SAVE_DELAY_MS,
    ) {
        Ok(handle) => state.borrow_mut().save_timer = Some(handle),
        Err(error) => {
            state.borrow_mut().save_debounce.cancel();
            web_sys::console::error_2(&"Failed to schedule save".into(), &error);
        }
    }
}

/// Writes a pending save immediately, e.g. when the page is going away.
pub fn flush_save(window: &Window, state: &Rc<RefCell<State>>) {
    let mut state = state.borrow_mut();
    if !state.save_debounce.is_pending() {
        return;
    }
    state.save_debounce.cancel();
    if let Some(handle) = state.save_timer.take() {
        window.clear_timeout_with_handle(handle);
    }
    save_drawing(window, state.recorder.drawing());
}

pub fn load_settings(window: &Window) -> (Settings, String) {
    let mut settings = Settings::default();
    let Ok(storage) = local_storage(window) else {
        return (settings, String::new());
    };
    if let Some(prompt) = read_json(&storage, PROMPT_KEY) {
        settings.prompt = prompt;
    }
    if let Some(prefix) = read_json(&storage, PREFIX_KEY) {
        settings.prefix = prefix;
    }
    if let Some(expanded) = read_json(&storage, EXPANDED_KEY) {
        settings.expanded = expanded;
    }
    let response = read_json(&storage, RESPONSE_KEY).unwrap_or_default();
    (settings, response)
}

pub fn save_prompt(window: &Window, prompt: &str) {
    write_json(window, PROMPT_KEY, prompt);
}

pub fn save_prefix(window: &Window, prefix: &str) {
    write_json(window, PREFIX_KEY, prefix);
}

pub fn save_expanded(window: &Window, expanded: bool) {
    write_json(window, EXPANDED_KEY, &expanded);
}

pub fn save_response(window: &Window, response: &str) {
    write_json(window, RESPONSE_KEY, response);
}

/// Offers the drawing as an SVG file download.
pub fn download_svg(document: &Document, drawing: &Drawing) -> Result<(), JsValue> {
    let svg = drawing_to_svg(drawing, CANVAS_SIZE, CANVAS_SIZE, &stroke_options());
    let href = format!(
        "data:image/svg+xml;charset=utf-8,{}",
        String::from(js_sys::encode_uri_component(&svg))
    );
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&href);
    anchor.set_download("drawing.svg");
    anchor.click();
    Ok(())
}
