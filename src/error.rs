//! Errors surfaced by the customer-service message builder

/// Failures raised while building or sending a customer-service message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A constructor was handed input it cannot represent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `send` was called before any message was set.
    #[error("no message to send")]
    NoMessage,

    /// The message could not be shaped into wire fields.
    #[error("failed to transform {msgtype} message")]
    Transform {
        msgtype: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The delegated client call failed; passed through untouched.
    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
