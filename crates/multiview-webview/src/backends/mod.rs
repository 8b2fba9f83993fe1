//! Surface backends.

pub mod headless;

#[cfg(feature = "wry")]
pub mod wry;

pub use headless::{HeadlessFactory, HeadlessSurface, SurfaceCall};
