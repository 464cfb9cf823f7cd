use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, PointerEvent,
};

use curious_ink_shared::SamplePoint;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Handles to every element the app touches.
#[derive(Clone)]
pub struct Ui {
    pub canvas: HtmlCanvasElement,
    pub clear_button: HtmlButtonElement,
    pub send_button: HtmlButtonElement,
    pub download_button: HtmlButtonElement,
    pub generating: HtmlElement,
    pub results: HtmlElement,
    pub debug_toggle: HtmlButtonElement,
    pub debug_panel: HtmlElement,
    pub raw_response: HtmlElement,
    pub prompt_input: HtmlTextAreaElement,
    pub prefix_input: HtmlInputElement,
}

impl Ui {
    pub fn find(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            canvas: get_element(document, "board")?,
            clear_button: get_element(document, "clear")?,
            send_button: get_element(document, "send")?,
            download_button: get_element(document, "download")?,
            generating: get_element(document, "generating")?,
            results: get_element(document, "results")?,
            debug_toggle: get_element(document, "debug-toggle")?,
            debug_panel: get_element(document, "debug-panel")?,
            raw_response: get_element(document, "raw-response")?,
            prompt_input: get_element(document, "prompt")?,
            prefix_input: get_element(document, "prefix")?,
        })
    }
}

pub fn set_hidden(element: &HtmlElement, hidden: bool) {
    element.set_hidden(hidden);
}

/// Canvas-relative sample for a pointer event. Pressure is not sensed.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<SamplePoint> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    let point = SamplePoint::at(
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    );
    point.is_finite().then_some(point)
}
