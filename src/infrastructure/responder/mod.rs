//! Responder adapters

mod scripted;

pub use scripted::ScriptedResponder;
