// file: src/shell/mod.rs
// description: interactive shell module exports
// reference: internal module structure

pub mod input;
pub mod menu;

pub use input::{EanInputMode, MenuChoice, Prompt};
pub use menu::{Flow, Shell, run_until};
