mod channel;
pub mod packet;
mod types;

pub use channel::ProgressChannel;
pub use types::{ChannelEvent, ConnectionStatus, ProgressMessage};
