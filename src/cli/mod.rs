//! CLI command handlers

pub mod commands;

pub use commands::{add, export, import, list, remove, render, RenderOptions};
