//! Scripted FAQ chat: an ordered keyword→reply rule table.

pub mod script;

pub use script::{reply, Rule, FALLBACK, GREETING, SCRIPT};
