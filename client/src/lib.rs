mod app;
mod dom;
mod error;
mod net;
mod persistence;
mod render;
mod results;
mod state;

pub use app::run;
