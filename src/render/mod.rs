//! Presentation layer
//!
//! The simulation emits pure data snapshots; this module owns every visual
//! element's lifecycle. Nothing in `sim` touches the DOM.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;
