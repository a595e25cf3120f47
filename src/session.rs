use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

use crate::channel::{Channel, ChatRoomMember, MemberRole, RoleDirective};
use crate::config::{SessionConfig, Step};
use crate::connection::Connection;
use crate::error::{IrcError, IrcResult};

/// The channels joined on one connection, fed by replayed server notifications.
pub struct Session {
    connection: Arc<Connection>,
    channels: HashMap<String, Arc<Channel>>,
}

#[derive(Debug, Serialize)]
pub struct RosterEntry {
    pub channel: String,
    pub nickname: String,
    pub role: MemberRole,
    pub roles: Vec<MemberRole>,
    pub joined_at: DateTime<Utc>,
}

impl Session {
    pub fn from_config(config: &SessionConfig) -> IrcResult<Self> {
        let connection = Connection::new(&config.connection.server, &config.connection.nickname);
        let mut channels = HashMap::new();

        for channel_config in &config.channels {
            if channels.contains_key(&channel_config.name) {
                return Err(IrcError::Channel(format!(
                    "{} is listed twice",
                    channel_config.name
                )));
            }
            let channel = Channel::new(&channel_config.name, &connection);
            for member in &channel_config.members {
                channel.join(&member.nickname, member.role)?;
            }
            info!(
                parent: connection.span(),
                "Joined {} with {} members",
                channel.name(),
                channel_config.members.len()
            );
            channels.insert(channel_config.name.clone(), channel);
        }

        Ok(Self { connection, channels })
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn get_channel(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels.get(name).cloned()
    }

    pub fn apply(&self, step: &Step) -> IrcResult<()> {
        debug!(parent: self.connection.span(), "Applying step {:?}", step);
        match step {
            Step::Grant { channel, nickname, role } => self
                .require_channel(channel)?
                .apply_directive(&RoleDirective::grant(nickname.as_str(), *role)),
            Step::Revoke { channel, nickname, role } => self
                .require_channel(channel)?
                .apply_directive(&RoleDirective::revoke(nickname.as_str(), *role)),
            Step::Rename { nickname, new_nickname } => self.rename_member(nickname, new_nickname),
            Step::Request { channel, nickname, role } => {
                let member = self.require_channel(channel)?.member(nickname).ok_or_else(|| {
                    IrcError::Channel(format!("{} is not on {}", nickname, channel))
                })?;
                member.set_role(*role);
                Ok(())
            }
        }
    }

    /// Apply a NICK change in every channel the old nickname is on.
    /// Nothing is renamed if the new nickname collides in any of them.
    pub fn rename_member(&self, old: &str, new: &str) -> IrcResult<()> {
        if new.is_empty() {
            return Err(IrcError::InvalidArgument("nickname"));
        }

        let affected: Vec<_> = self
            .channels
            .values()
            .filter(|channel| channel.member(old).is_some())
            .cloned()
            .collect();
        if affected.is_empty() {
            return Err(IrcError::Channel(format!("{} is not on any channel", old)));
        }
        if old != new {
            if let Some(channel) = affected.iter().find(|channel| channel.member(new).is_some()) {
                return Err(IrcError::Channel(format!(
                    "{} is already on {}",
                    new,
                    channel.name()
                )));
            }
        }

        for channel in &affected {
            channel.rename_member(old, new)?;
        }
        debug!(
            parent: self.connection.span(),
            "Renamed {} to {} in {} channels", old, new, affected.len()
        );
        Ok(())
    }

    /// Apply steps as they arrive until the sender goes away.
    /// Returns how many applied cleanly.
    pub async fn process(self: Arc<Self>, mut rx: Receiver<Step>) -> usize {
        let mut applied = 0;
        while let Some(step) = rx.recv().await {
            match self.apply(&step) {
                Ok(()) => applied += 1,
                Err(e) => warn!(parent: self.connection.span(), "Error applying {:?}: {}", step, e),
            }
        }
        applied
    }

    /// Every member of every channel, channels by name.
    pub fn roster(&self) -> Vec<RosterEntry> {
        let mut names: Vec<_> = self.channels.keys().collect();
        names.sort();

        names
            .into_iter()
            .filter_map(|name| self.channels.get(name))
            .flat_map(|channel| {
                channel.members().into_iter().map(move |member| RosterEntry {
                    channel: channel.name().to_string(),
                    nickname: member.name(),
                    role: member.role(),
                    roles: member.roles(),
                    joined_at: member.joined_at(),
                })
            })
            .collect()
    }

    /// NAMES-style line per channel, channels by name.
    pub fn names(&self) -> Vec<(String, String)> {
        let mut lines: Vec<_> = self
            .channels
            .values()
            .map(|channel| (channel.name().to_string(), channel.names()))
            .collect();
        lines.sort();
        lines
    }

    fn require_channel(&self, name: &str) -> IrcResult<Arc<Channel>> {
        self.get_channel(name)
            .ok_or_else(|| IrcError::Channel(format!("No such channel {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::generate_example_config;
    use tokio::sync::mpsc;

    fn example_session() -> (SessionConfig, Arc<Session>) {
        let config = SessionConfig::parse(&generate_example_config()).unwrap();
        let session = Arc::new(Session::from_config(&config).unwrap());
        (config, session)
    }

    #[test]
    fn test_from_config_joins_members() {
        let (_config, session) = example_session();
        assert_eq!(
            session.names(),
            vec![("#rust".to_string(), "~alice +bob carol".to_string())]
        );
        assert_eq!(session.connection().nickname(), "me");
    }

    #[test]
    fn test_duplicate_member_in_config() {
        let contents = r##"
[connection]
server = "irc.example.com"
nickname = "me"

[[channels]]
name = "#rust"
members = [{ nickname = "bob" }, { nickname = "bob", role = "voice" }]
"##;
        let config = SessionConfig::parse(contents).unwrap();
        assert!(matches!(Session::from_config(&config), Err(IrcError::Channel(_))));
    }

    #[test]
    fn test_duplicate_channel_in_config() {
        let contents = r##"
[connection]
server = "irc.example.com"
nickname = "me"

[[channels]]
name = "#rust"
members = [{ nickname = "alice", role = "owner" }]

[[channels]]
name = "#rust"
members = [{ nickname = "bob" }]
"##;
        let config = SessionConfig::parse(contents).unwrap();
        assert!(matches!(Session::from_config(&config), Err(IrcError::Channel(_))));
    }

    fn two_channel_session() -> Session {
        let contents = r##"
[connection]
server = "irc.example.com"
nickname = "me"

[[channels]]
name = "#rust"
members = [{ nickname = "alice", role = "operator" }, { nickname = "bob" }]

[[channels]]
name = "#irc"
members = [{ nickname = "alice", role = "voice" }, { nickname = "dave" }]
"##;
        Session::from_config(&SessionConfig::parse(contents).unwrap()).unwrap()
    }

    #[test]
    fn test_rename_applies_to_every_channel() {
        let session = two_channel_session();
        let rust = session.get_channel("#rust").unwrap();
        let irc = session.get_channel("#irc").unwrap();

        let step = Step::Rename {
            nickname: "alice".to_string(),
            new_nickname: "alicia".to_string(),
        };
        session.apply(&step).unwrap();

        assert!(rust.member("alice").is_none());
        assert!(irc.member("alice").is_none());
        let in_rust = rust.member("alicia").unwrap();
        let in_irc = irc.member("alicia").unwrap();
        assert_eq!(*in_rust, *in_irc);
        assert_eq!(in_rust.role(), MemberRole::Operator);
        assert_eq!(in_irc.role(), MemberRole::Voice);
    }

    #[test]
    fn test_rename_collision_renames_nothing() {
        let session = two_channel_session();

        let err = session.rename_member("alice", "dave").unwrap_err();
        assert!(matches!(err, IrcError::Channel(_)));
        assert!(session.get_channel("#rust").unwrap().member("alice").is_some());
        assert!(session.get_channel("#irc").unwrap().member("alice").is_some());

        assert!(matches!(session.rename_member("ghost", "spook"), Err(IrcError::Channel(_))));
        assert!(matches!(
            session.rename_member("alice", ""),
            Err(IrcError::InvalidArgument("nickname"))
        ));
    }

    #[test]
    fn test_apply_unknown_channel() {
        let (_config, session) = example_session();
        let step = Step::Grant {
            channel: "#nope".to_string(),
            nickname: "bob".to_string(),
            role: MemberRole::Voice,
        };
        assert!(matches!(session.apply(&step), Err(IrcError::Channel(_))));
    }

    #[tokio::test]
    async fn test_process_example_steps() {
        let (config, session) = example_session();
        let (tx, rx) = mpsc::channel(8);

        let transport = tokio::spawn(Arc::clone(&session).process(rx));
        for step in config.steps.iter().cloned() {
            tx.send(step).await.unwrap();
        }
        tx.send(Step::Revoke {
            channel: "#rust".to_string(),
            nickname: "ghost".to_string(),
            role: MemberRole::Voice,
        })
        .await
        .unwrap();
        drop(tx);

        assert_eq!(transport.await.unwrap(), config.steps.len());
        assert_eq!(
            session.names(),
            vec![("#rust".to_string(), "~alice @bob caroline".to_string())]
        );

        let roster = session.roster();
        let bob = roster.iter().find(|e| e.nickname == "bob").unwrap();
        assert_eq!(bob.roles, vec![MemberRole::Operator]);
        let caroline = roster.iter().find(|e| e.nickname == "caroline").unwrap();
        assert_eq!(caroline.role, MemberRole::Regular);
    }
}
