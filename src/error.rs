use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrcError {
    #[error("Invalid argument: {0} is missing")]
    InvalidArgument(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<toml::de::Error> for IrcError {
    fn from(e: toml::de::Error) -> Self {
        IrcError::Config(e.to_string())
    }
}

pub type IrcResult<T> = Result<T, IrcError>;
