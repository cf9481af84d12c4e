//! Deterministic text renderers for extraction results.

#![forbid(unsafe_code)]

mod beancount;
mod identify;

pub use beancount::{render_directive, render_extraction};
pub use identify::render_identify;
