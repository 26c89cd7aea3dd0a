mod event;
mod sender;

pub use event::{ChatMessage, InboundEvent};
pub use sender::{CloudApiSender, MessageSender, SendError};
