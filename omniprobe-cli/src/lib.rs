//! omniprobe command-line surface
//!
//! Parsing lives in [`cli`], handlers in [`commands`], rendering in [`output`].

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
