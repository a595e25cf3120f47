//! Chat room membership for IRC connections: who is in a channel and which
//! privileges the server has given them.

pub mod channel;
pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod session;
mod test_helpers;

pub use channel::{
    Channel, ChannelMember, ChatRoomMember, DirectiveAction, MemberRole, RoleDirective,
};
pub use connection::Connection;
pub use error::{IrcError, IrcResult};
