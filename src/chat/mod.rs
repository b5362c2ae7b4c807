//! Inventory assistant chat
//!
//! - **message**: [`ChatMessage`] and the welcome seed
//! - **history**: [`ChatHistory`], the persisted conversation log
//! - **responder**: [`respond`], keyword-matched replies over the data lists

pub mod history;
pub mod message;
pub mod responder;

pub use history::{ChatHistory, CHAT_HISTORY_KEY};
pub use message::{ChatMessage, WELCOME_MESSAGE};
pub use responder::{respond, Topic};
