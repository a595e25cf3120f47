use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::channel::{Channel, MemberRole};
use crate::error::{IrcError, IrcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveAction {
    Grant,
    Revoke,
}

/// A membership mode change the transport has verified came from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDirective {
    pub nickname: String,
    pub role: MemberRole,
    pub action: DirectiveAction,
}

impl RoleDirective {
    pub fn grant(nickname: impl Into<String>, role: MemberRole) -> Self {
        Self {
            nickname: nickname.into(),
            role,
            action: DirectiveAction::Grant,
        }
    }

    pub fn revoke(nickname: impl Into<String>, role: MemberRole) -> Self {
        Self {
            nickname: nickname.into(),
            role,
            action: DirectiveAction::Revoke,
        }
    }
}

impl Channel {
    pub fn apply_directive(&self, directive: &RoleDirective) -> IrcResult<()> {
        let Some(member) = self.member(&directive.nickname) else {
            warn!(
                parent: self.connection().span(),
                "Role change for unknown member {} on {}", directive.nickname, self.name()
            );
            return Err(IrcError::Channel(format!(
                "{} is not on {}",
                directive.nickname,
                self.name()
            )));
        };

        debug!(
            parent: self.connection().span(),
            "Applying {:?} {} to {} on {}",
            directive.action,
            directive.role,
            directive.nickname,
            self.name()
        );
        match directive.action {
            DirectiveAction::Grant => member.grant_role(directive.role),
            DirectiveAction::Revoke => member.revoke_role(directive.role),
        }
        Ok(())
    }
}
