use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::channel::MemberRole;
use crate::error::IrcResult;

#[derive(Deserialize)]
pub struct SessionConfig {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Deserialize)]
pub struct ConnectionConfig {
    pub server: String,
    pub nickname: String,
}

#[derive(Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

#[derive(Deserialize)]
pub struct MemberConfig {
    pub nickname: String,
    #[serde(default = "default_role")]
    pub role: MemberRole,
}

fn default_role() -> MemberRole {
    MemberRole::Regular
}

/// One server notification to replay against the session.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    Grant {
        channel: String,
        nickname: String,
        role: MemberRole,
    },
    Revoke {
        channel: String,
        nickname: String,
        role: MemberRole,
    },
    /// NICK changes apply to the whole connection.
    Rename {
        nickname: String,
        new_nickname: String,
    },
    /// A local request to change a role, which members ignore.
    Request {
        channel: String,
        nickname: String,
        role: MemberRole,
    },
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> IrcResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> IrcResult<Self> {
        let config: SessionConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
