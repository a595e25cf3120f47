use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the session file to replay
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Generate an example session file and exit
    #[arg(short, long)]
    pub generate_config: bool,

    /// Set the log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Print the final rosters as JSON instead of NAMES lines
    #[arg(long)]
    pub json: bool,
}

pub fn generate_example_config() -> String {
    r##"# ircroom example session

[connection]
server = "irc.example.com" # Server the session is connected to
nickname = "me"            # Our own nickname

[[channels]]
name = "#rust"
members = [
    { nickname = "alice", role = "owner" },
    { nickname = "bob", role = "voice" },
    { nickname = "carol" },              # Defaults to regular
]

# Server notifications, replayed in order.
# action is one of grant, revoke, rename or request.
[[steps]]
action = "grant"
channel = "#rust"
nickname = "bob"
role = "operator"

[[steps]]
action = "request"          # Local requests never change roles
channel = "#rust"
nickname = "carol"
role = "admin"

[[steps]]
action = "revoke"
channel = "#rust"
nickname = "bob"
role = "voice"

[[steps]]
action = "rename"           # Applies in every channel carol is on
nickname = "carol"
new_nickname = "caroline"
"##.to_string()
}
