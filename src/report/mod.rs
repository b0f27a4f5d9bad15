mod duration;
mod render;

pub use render::{render_json, render_text};
