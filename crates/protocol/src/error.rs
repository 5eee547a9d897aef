use thiserror::Error;

/// Why an incoming value is not a sandbox message this host understands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Not an envelope: {0}")]
    NotAnEnvelope(&'static str),

    #[error("Foreign channel: {0}")]
    ForeignChannel(String),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u64),

    #[error("Malformed message: {0}")]
    Malformed(String),
}

impl ProtocolError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Mismatches that are expected traffic rather than broken senders
    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::NotAnEnvelope(_) | Self::ForeignChannel(_))
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
