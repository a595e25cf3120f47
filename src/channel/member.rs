use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use chrono::{DateTime, Utc};
use tracing::{debug, debug_span, Span};

use crate::channel::{Channel, MemberRole};
use crate::connection::Connection;
use crate::error::{IrcError, IrcResult};

/// What any protocol exposes about a participant of a chat room.
pub trait ChatRoomMember {
    type Room;
    type Connection;
    type Contact;

    /// The room this member is in, if it is still alive.
    fn room(&self) -> Option<Arc<Self::Room>>;

    fn connection(&self) -> &Arc<Self::Connection>;

    /// Address identifying the member on the protocol.
    fn contact_address(&self) -> String;

    /// Name of the member as known in the room.
    fn name(&self) -> String;

    /// The single role the rest of the application should act on.
    fn role(&self) -> MemberRole;

    /// Ask for the member's role to be changed.
    fn set_role(&self, role: MemberRole);

    fn avatar(&self) -> Option<Vec<u8>>;

    fn contact(&self) -> Option<Self::Contact>;
}

/// A nickname in an IRC channel together with the privileges the server
/// has given it.
///
/// Roles only change in response to server MODE notifications, delivered
/// through [`Channel::apply_directive`]. The role set is never empty.
pub struct ChannelMember {
    connection: Arc<Connection>,
    channel: Weak<Channel>,
    nickname: RwLock<String>,
    roles: RwLock<BTreeSet<MemberRole>>,
    joined_at: DateTime<Utc>,
    span: Span,
}

#[derive(Default)]
pub struct ChannelMemberBuilder {
    connection: Option<Arc<Connection>>,
    channel: Option<Arc<Channel>>,
    nickname: Option<String>,
    role: Option<MemberRole>,
    span: Option<Span>,
}

impl ChannelMemberBuilder {
    pub fn connection(mut self, connection: &Arc<Connection>) -> Self {
        self.connection = Some(Arc::clone(connection));
        self
    }

    pub fn channel(mut self, channel: &Arc<Channel>) -> Self {
        self.channel = Some(Arc::clone(channel));
        self
    }

    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn role(mut self, role: MemberRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Span the member logs under. Defaults to a child of the connection span.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn build(self) -> IrcResult<ChannelMember> {
        let connection = self
            .connection
            .ok_or(IrcError::InvalidArgument("connection"))?;
        let channel = self.channel.ok_or(IrcError::InvalidArgument("channel"))?;
        let nickname = self
            .nickname
            .filter(|nick| !nick.is_empty())
            .ok_or(IrcError::InvalidArgument("nickname"))?;
        let role = self.role.ok_or(IrcError::InvalidArgument("role"))?;

        let span = self.span.unwrap_or_else(|| {
            debug_span!(
                parent: connection.span(),
                "member",
                channel = %channel.name(),
                nick = %nickname
            )
        });
        debug!(
            parent: &span,
            "Creating member {} in {} with role {}", nickname, channel.name(), role
        );

        Ok(ChannelMember {
            connection,
            channel: Arc::downgrade(&channel),
            nickname: RwLock::new(nickname),
            roles: RwLock::new(BTreeSet::from([role])),
            joined_at: Utc::now(),
            span,
        })
    }
}

impl ChannelMember {
    pub fn builder() -> ChannelMemberBuilder {
        ChannelMemberBuilder::default()
    }

    /// Every role currently held, most privileged first.
    pub fn roles(&self) -> Vec<MemberRole> {
        self.read_roles().iter().copied().collect()
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Rebind the nickname after the server announced a NICK change.
    /// Collisions are the channel's problem, not ours.
    pub(crate) fn set_nickname(&self, new_name: &str) -> IrcResult<()> {
        if new_name.is_empty() {
            return Err(IrcError::InvalidArgument("nickname"));
        }
        let mut nickname = self.nickname.write().unwrap_or_else(PoisonError::into_inner);
        debug!(parent: &self.span, "Renaming member {} to {}", nickname, new_name);
        *nickname = new_name.to_string();
        Ok(())
    }

    pub(crate) fn grant_role(&self, role: MemberRole) {
        let mut roles = self.write_roles();
        if roles.insert(role) {
            debug!(parent: &self.span, "Granted role {}", role);
        }
    }

    /// Revoking the last held role leaves the member as `Regular`.
    pub(crate) fn revoke_role(&self, role: MemberRole) {
        let mut roles = self.write_roles();
        if roles.remove(&role) {
            debug!(parent: &self.span, "Revoked role {}", role);
        }
        if roles.is_empty() {
            debug!(parent: &self.span, "No roles left, falling back to {}", MemberRole::Regular);
            roles.insert(MemberRole::Regular);
        }
    }

    fn read_roles(&self) -> RwLockReadGuard<'_, BTreeSet<MemberRole>> {
        self.roles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_roles(&self) -> RwLockWriteGuard<'_, BTreeSet<MemberRole>> {
        self.roles.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatRoomMember for ChannelMember {
    type Room = Channel;
    type Connection = Connection;
    // IRC has no contact object beyond the nickname in the channel.
    type Contact = Infallible;

    fn room(&self) -> Option<Arc<Channel>> {
        self.channel.upgrade()
    }

    fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    fn contact_address(&self) -> String {
        self.name()
    }

    fn name(&self) -> String {
        self.nickname
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn role(&self) -> MemberRole {
        self.read_roles()
            .first()
            .copied()
            .unwrap_or(MemberRole::Regular)
    }

    fn set_role(&self, role: MemberRole) {
        // Only the server may change roles.
        debug!(parent: &self.span, "Ignoring request to set member role to {}", role);
    }

    fn avatar(&self) -> Option<Vec<u8>> {
        None
    }

    fn contact(&self) -> Option<Infallible> {
        None
    }
}

impl PartialEq for ChannelMember {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.connection == other.connection && self.name() == other.name()
    }
}

impl Eq for ChannelMember {}

impl Hash for ChannelMember {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.connection.hash(state);
    }
}

impl fmt::Debug for ChannelMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelMember")
            .field("nickname", &self.name())
            .field("connection", &self.connection.id())
            .field("roles", &self.roles())
            .finish()
    }
}
