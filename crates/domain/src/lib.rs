//! Shared types for the nexrelay workspace: conversation turns, the user
//! memory record, mode settings, streaming events, configuration, and the
//! common error type.

pub mod capability;
pub mod chat;
pub mod config;
pub mod error;
pub mod memory;
pub mod mode;
pub mod stream;
pub mod trace;
