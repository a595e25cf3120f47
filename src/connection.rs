use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::{debug, info_span, Span};

static NEXT_CONNECTION_ID: AtomicU32 = AtomicU32::new(1);

fn generate_connection_id() -> u32 {
    NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed)
}

/// A session with one IRC server.
///
/// Two handles are the same connection only if they share an id, regardless
/// of which server they point at.
pub struct Connection {
    id: u32,
    server_name: String,
    nickname: String,
    span: Span,
}

impl Connection {
    pub fn new(server_name: impl Into<String>, nickname: impl Into<String>) -> Arc<Self> {
        let id = generate_connection_id();
        let server_name = server_name.into();
        let span = info_span!("connection", id, server = %server_name);
        debug!(parent: &span, "Creating connection {} to {}", id, server_name);

        Arc::new(Self {
            id,
            server_name,
            nickname: nickname.into(),
            span,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Our own nickname on this connection.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("server_name", &self.server_name)
            .field("nickname", &self.nickname)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_identity() {
        let a = Connection::new("irc.example.com", "me");
        let b = Connection::new("irc.example.com", "me");

        assert_eq!(*a, *a);
        assert_ne!(*a, *b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.server_name(), "irc.example.com");
        assert_eq!(b.nickname(), "me");
    }
}
