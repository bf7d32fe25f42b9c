//! Request and response bodies of the HTTP API

mod card;
mod chat;
mod fortune;

pub use card::*;
pub use chat::*;
pub use fortune::*;
