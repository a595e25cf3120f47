use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::connection::Connection;
use crate::error::{IrcError, IrcResult};

mod directive;
mod member;
mod role;

pub use directive::{DirectiveAction, RoleDirective};
pub use member::{ChannelMember, ChannelMemberBuilder, ChatRoomMember};
pub use role::MemberRole;

/// A channel as seen from our side of one connection.
pub struct Channel {
    name: String,
    connection: Arc<Connection>,
    members: RwLock<HashMap<String, Arc<ChannelMember>>>, // keyed by nickname
}

impl Channel {
    pub fn new(name: impl Into<String>, connection: &Arc<Connection>) -> Arc<Self> {
        let name = name.into();
        debug!(parent: connection.span(), "Creating new channel: {}", name);
        Arc::new(Self {
            name,
            connection: Arc::clone(connection),
            members: RwLock::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Admit a member after the server reported them joining.
    pub fn join(
        self: &Arc<Self>,
        nickname: &str,
        role: MemberRole,
    ) -> IrcResult<Arc<ChannelMember>> {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        if members.contains_key(nickname) {
            return Err(IrcError::Channel(format!("{} is already on {}", nickname, self.name)));
        }

        let member = Arc::new(
            ChannelMember::builder()
                .connection(&self.connection)
                .channel(self)
                .nickname(nickname)
                .role(role)
                .build()?,
        );
        members.insert(nickname.to_string(), Arc::clone(&member));
        debug!(
            parent: self.connection.span(),
            "Channel {} now has {} members", self.name, members.len()
        );
        Ok(member)
    }

    pub fn part(&self, nickname: &str) -> Option<Arc<ChannelMember>> {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        let removed = members.remove(nickname);
        if removed.is_some() {
            debug!(
                parent: self.connection.span(),
                "Removed {} from channel {}", nickname, self.name
            );
        }
        removed
    }

    pub fn member(&self, nickname: &str) -> Option<Arc<ChannelMember>> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(nickname)
            .cloned()
    }

    /// Members ordered by effective role, then nickname.
    pub fn members(&self) -> Vec<Arc<ChannelMember>> {
        let members: Vec<_> = self
            .members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut ranked: Vec<_> = members
            .into_iter()
            .map(|m| ((m.role(), m.name()), m))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0));
        ranked.into_iter().map(|(_, m)| m).collect()
    }

    /// Roster in the style of a NAMES reply, e.g. `@alice +bob carol`.
    pub fn names(&self) -> String {
        self.members()
            .iter()
            .map(|m| match m.role().prefix() {
                Some(prefix) => format!("{}{}", prefix, m.name()),
                None => m.name(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Apply a NICK change reported by the server.
    pub fn rename_member(&self, old: &str, new: &str) -> IrcResult<()> {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        let member = members
            .get(old)
            .cloned()
            .ok_or_else(|| IrcError::Channel(format!("{} is not on {}", old, self.name)))?;
        if old != new && members.contains_key(new) {
            return Err(IrcError::Channel(format!("{} is already on {}", new, self.name)));
        }

        member.set_nickname(new)?;
        members.remove(old);
        members.insert(new.to_string(), member);
        Ok(())
    }
}
