use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Event, PointerEvent};

use curious_ink_shared::relay::strip_data_url_prefix;

use crate::dom::{event_to_point, set_hidden, Ui};
use crate::net::predict_image;
use crate::persistence::{
    download_svg, flush_save, load_drawing, load_settings, save_expanded, save_prefix,
    save_prompt, save_response, schedule_save,
};
use crate::render::{clear_surface, redraw};
use crate::results::render_results;
use crate::state::{State, CANVAS_SIZE};

fn document_ready_state(document: &Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn sync_ui(document: &Document, ui: &Ui, state: &State) {
    set_hidden(&ui.send_button, state.generating);
    set_hidden(&ui.generating, !state.generating);
    set_hidden(&ui.results, state.generating);
    render_results(document, &ui.results, &state.queries(), &state.settings.prefix);

    let expanded = state.settings.expanded;
    set_hidden(&ui.debug_panel, !expanded);
    ui.debug_toggle
        .set_text_content(Some(if expanded { "\u{2212} Debug" } else { "+ Debug" }));
    ui.raw_response.set_text_content(Some(&state.response));
    set_hidden(&ui.raw_response, state.response.is_empty());
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let ui = Ui::find(&document)?;

    let canvas = ui.canvas.clone();
    canvas.set_width(CANVAS_SIZE);
    canvas.set_height(CANVAS_SIZE);
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let mut state = State::new(canvas.clone(), ctx);
    let drawing = load_drawing(&window);
    web_sys::console::log_1(&format!("Loaded {} cached strokes", drawing.len()).into());
    state.recorder.adopt(drawing);
    let (settings, response) = load_settings(&window);
    state.settings = settings;
    state.response = response;
    ui.prompt_input.set_value(&state.settings.prompt);
    ui.prefix_input.set_value(&state.settings.prefix);
    redraw(&state);
    sync_ui(&document, &ui, &state);

    let state = Rc::new(RefCell::new(state));
    let active_pointer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let down_window = window.clone();
        let down_active_pointer = active_pointer.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            event.prevent_default();
            let Some(point) = event_to_point(&down_canvas, &event) else {
                return;
            };
            {
                let mut state = down_state.borrow_mut();
                // One stroke at a time; a second finger does not start another.
                if state.recorder.is_capturing() {
                    return;
                }
                if !state.recorder.pointer_down(point) {
                    return;
                }
                redraw(&state);
            }
            let _ = down_canvas.set_pointer_capture(event.pointer_id());
            down_active_pointer.set(Some(event.pointer_id()));
            schedule_save(&down_window, &down_state);
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let move_window = window.clone();
        let move_active_pointer = active_pointer.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if move_active_pointer.get() != Some(event.pointer_id()) {
                return;
            }
            event.prevent_default();
            let Some(point) = event_to_point(&move_canvas, &event) else {
                return;
            };
            {
                let mut state = move_state.borrow_mut();
                if !state.recorder.pointer_move(point) {
                    return;
                }
                redraw(&state);
            }
            schedule_save(&move_window, &move_state);
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let stop_canvas = canvas.clone();
        let stop_active_pointer = active_pointer.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if stop_active_pointer.get() != Some(event.pointer_id()) {
                return;
            }
            stop_active_pointer.set(None);
            if stop_canvas.has_pointer_capture(event.pointer_id()) {
                let _ = stop_canvas.release_pointer_capture(event.pointer_id());
            }
            stop_state.borrow_mut().recorder.pointer_up();
        });
        for name in ["pointerup", "pointercancel", "lostpointercapture"] {
            canvas.add_event_listener_with_callback(name, onstop.as_ref().unchecked_ref())?;
        }
        onstop.forget();
    }

    {
        let hide_state = state.clone();
        let hide_window = window.clone();
        let onpagehide = Closure::<dyn FnMut(Event)>::new(move |_| {
            flush_save(&hide_window, &hide_state);
        });
        window.add_event_listener_with_callback("pagehide", onpagehide.as_ref().unchecked_ref())?;
        onpagehide.forget();
    }

    {
        let clear_state = state.clone();
        let clear_window = window.clone();
        let clear_document = document.clone();
        let clear_ui = ui.clone();
        let clear_active_pointer = active_pointer.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            clear_active_pointer.set(None);
            {
                let mut state = clear_state.borrow_mut();
                state.recorder.clear();
                state.response.clear();
                clear_surface(&state);
                sync_ui(&clear_document, &clear_ui, &state);
            }
            save_response(&clear_window, "");
            schedule_save(&clear_window, &clear_state);
        });
        ui.clear_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let send_state = state.clone();
        let send_window = window.clone();
        let send_document = document.clone();
        let send_ui = ui.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let (image_data, prompt) = {
                let mut state = send_state.borrow_mut();
                if state.generating {
                    return;
                }
                let data_url = match state.canvas.to_data_url() {
                    Ok(data_url) => data_url,
                    Err(error) => {
                        web_sys::console::error_2(&"Failed to export canvas".into(), &error);
                        return;
                    }
                };
                state.generating = true;
                sync_ui(&send_document, &send_ui, &state);
                (
                    strip_data_url_prefix(&data_url).to_string(),
                    state.settings.prompt.clone(),
                )
            };

            let state = send_state.clone();
            let window = send_window.clone();
            let document = send_document.clone();
            let ui = send_ui.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = predict_image(&window, &image_data, &prompt).await;
                let failure = {
                    let mut state = state.borrow_mut();
                    let failure = match result {
                        Ok(text) => {
                            state.response = text;
                            None
                        }
                        Err(error) => {
                            state.response.clear();
                            Some(error.to_string())
                        }
                    };
                    state.generating = false;
                    save_response(&window, &state.response);
                    sync_ui(&document, &ui, &state);
                    failure
                };
                if let Some(message) = failure {
                    let _ = window.alert_with_message(&message);
                }
            });
        });
        ui.send_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let download_state = state.clone();
        let download_document = document.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let state = download_state.borrow();
            if let Err(error) = download_svg(&download_document, state.recorder.drawing()) {
                web_sys::console::error_2(&"Failed to export svg".into(), &error);
            }
        });
        ui.download_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let toggle_state = state.clone();
        let toggle_window = window.clone();
        let toggle_document = document.clone();
        let toggle_ui = ui.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = toggle_state.borrow_mut();
            state.settings.expanded = !state.settings.expanded;
            save_expanded(&toggle_window, state.settings.expanded);
            sync_ui(&toggle_document, &toggle_ui, &state);
        });
        ui.debug_toggle
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let prompt_state = state.clone();
        let prompt_window = window.clone();
        let prompt_input = ui.prompt_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let prompt = prompt_input.value();
            save_prompt(&prompt_window, &prompt);
            prompt_state.borrow_mut().settings.prompt = prompt;
        });
        ui.prompt_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let prefix_state = state.clone();
        let prefix_window = window.clone();
        let prefix_document = document.clone();
        let prefix_ui = ui.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let prefix = prefix_ui.prefix_input.value();
            save_prefix(&prefix_window, &prefix);
            let mut state = prefix_state.borrow_mut();
            state.settings.prefix = prefix;
            sync_ui(&prefix_document, &prefix_ui, &state);
        });
        ui.prefix_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    Ok(())
}
