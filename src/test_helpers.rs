#[cfg(test)]
pub(crate) mod test {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::sync::Arc;

    use crate::channel::Channel;
    use crate::connection::Connection;

    pub fn test_connection() -> Arc<Connection> {
        Connection::new("test.server", "tester")
    }

    pub fn test_channel(name: &str) -> (Arc<Connection>, Arc<Channel>) {
        let connection = test_connection();
        let channel = Channel::new(name, &connection);
        (connection, channel)
    }

    pub fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }
}
