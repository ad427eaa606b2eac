//! MCP tool handlers
//!
//! One file per dashboard view. Each handler parses its parameters, talks to
//! the store through `access` (reads) or `Store` (writes), persists the
//! snapshot after a mutation, and renders text through `formatting`.

pub mod activity;
pub mod attendance;
pub mod projects;
pub mod settings;
pub mod tasks;
pub mod team;
pub mod time;
