use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use curious_ink_shared::reply::{DEFAULT_PROMPT, DEFAULT_SEARCH_PREFIX};
use curious_ink_shared::{Debounce, Recorder, StrokeOptions};

pub const CANVAS_SIZE: u32 = 512;
pub const STROKE_SIZE: f64 = 4.0;

pub const PROMPT_KEY: &str = "prompt-2";
pub const PREFIX_KEY: &str = "prefix";
pub const RESPONSE_KEY: &str = "response-1";
pub const EXPANDED_KEY: &str = "expanded";

pub fn stroke_options() -> StrokeOptions {
    StrokeOptions::pen(STROKE_SIZE)
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub prompt: String,
    pub prefix: String,
    pub expanded: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            prefix: DEFAULT_SEARCH_PREFIX.to_string(),
            expanded: true,
        }
    }
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub recorder: Recorder,
    pub settings: Settings,
    pub response: String,
    pub generating: bool,
    pub save_timer: Option<i32>,
    pub save_debounce: Debounce,
}

impl State {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            recorder: Recorder::default(),
            settings: Settings::default(),
            response: String::new(),
            generating: false,
            save_timer: None,
            save_debounce: Debounce::new(),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        curious_ink_shared::parse_queries(&self.response)
    }
}
