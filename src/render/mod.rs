pub mod renderer;

pub use renderer::{HandStatus, Renderer};
