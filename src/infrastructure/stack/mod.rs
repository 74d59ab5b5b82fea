//! Application stack implementations

mod compose;

pub use compose::ComposeStack;
