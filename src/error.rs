use thiserror::Error;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Errors from resolving, encoding and transmitting a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Target or command name not known.
    #[error("Unknown command: {target} {command}")]
    UnknownCommand { target: String, command: String },

    /// A command needing an argument was given none.
    #[error("Missing argument for {0}")]
    MissingArgument(String),

    /// Argument is not an integer.
    #[error("Invalid argument: '{0}'")]
    InvalidArgument(String),

    /// Argument does not fit in a byte.
    #[error("Argument out of range (0-255): {0}")]
    ArgumentOutOfRange(String),

    /// Payload does not fit in a frame.
    #[error("Frame too long: {len} bytes, max {max}")]
    FrameTooLong { len: usize, max: usize },

    #[error("Transport failure: {0}")]
    TransportFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn unknown_command(target: &str, command: &str) -> Self {
        Error::UnknownCommand {
            target: target.to_string(),
            command: command.to_string(),
        }
    }
}
