use std::fmt;

use serde::{Deserialize, Serialize};

/// Privilege a member holds in a channel.
///
/// Variants are declared highest privilege first, so the derived ordering
/// puts the most privileged role at the front of a `BTreeSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Operator,
    HalfOp,
    Voice,
    Regular,
}

impl MemberRole {
    /// Role granted by a channel membership mode such as `+o`.
    pub fn from_mode_char(mode: char) -> Option<Self> {
        match mode {
            'q' => Some(MemberRole::Owner),
            'a' => Some(MemberRole::Admin),
            'o' => Some(MemberRole::Operator),
            'h' => Some(MemberRole::HalfOp),
            'v' => Some(MemberRole::Voice),
            _ => None,
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            '~' => Some(MemberRole::Owner),
            '&' => Some(MemberRole::Admin),
            '@' => Some(MemberRole::Operator),
            '%' => Some(MemberRole::HalfOp),
            '+' => Some(MemberRole::Voice),
            _ => None,
        }
    }

    pub fn mode_char(&self) -> Option<char> {
        match self {
            MemberRole::Owner => Some('q'),
            MemberRole::Admin => Some('a'),
            MemberRole::Operator => Some('o'),
            MemberRole::HalfOp => Some('h'),
            MemberRole::Voice => Some('v'),
            MemberRole::Regular => None,
        }
    }

    /// Nickname prefix shown in NAMES replies.
    pub fn prefix(&self) -> Option<char> {
        match self {
            MemberRole::Owner => Some('~'),
            MemberRole::Admin => Some('&'),
            MemberRole::Operator => Some('@'),
            MemberRole::HalfOp => Some('%'),
            MemberRole::Voice => Some('+'),
            MemberRole::Regular => None,
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Operator => "operator",
            MemberRole::HalfOp => "halfop",
            MemberRole::Voice => "voice",
            MemberRole::Regular => "regular",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_rank_order() {
        let roles: BTreeSet<_> = [MemberRole::Voice, MemberRole::Owner, MemberRole::Regular]
            .into_iter()
            .collect();
        assert_eq!(roles.first(), Some(&MemberRole::Owner));
        assert!(MemberRole::Operator < MemberRole::Voice);
        assert!(MemberRole::HalfOp < MemberRole::Voice);
    }

    #[test]
    fn test_mode_and_prefix_mapping() {
        for mode in ['q', 'a', 'o', 'h', 'v'] {
            let role = MemberRole::from_mode_char(mode).unwrap();
            assert_eq!(role.mode_char(), Some(mode));
            assert_eq!(MemberRole::from_prefix(role.prefix().unwrap()), Some(role));
        }
        assert_eq!(MemberRole::from_mode_char('b'), None);
        assert_eq!(MemberRole::Regular.prefix(), None);
        assert_eq!(MemberRole::from_prefix('@'), Some(MemberRole::Operator));
    }

    #[test]
    fn test_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            role: MemberRole,
        }
        let parsed: Wrapper = toml::from_str("role = \"halfop\"").unwrap();
        assert_eq!(parsed.role, MemberRole::HalfOp);
        assert_eq!(MemberRole::HalfOp.to_string(), "halfop");
    }
}
