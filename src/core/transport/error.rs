use thiserror::Error;

pub type TransportResult<T> = Result<T, TransportError>;

/// Failures that stop the server from serving at all. Tool failures never
/// surface here; they are returned to the client as error results.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP handshake with the client failed.
    #[error("MCP initialization failed: {0}")]
    Init(String),

    #[error("HTTP server error: {0}")]
    Http(String),

    /// The rmcp service loop ended abnormally.
    #[error("MCP service error: {0}")]
    Service(String),
}

impl TransportError {
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_names_address() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = TransportError::bind("127.0.0.1:3000", io);
        assert_eq!(
            err.to_string(),
            "Failed to bind to 127.0.0.1:3000: address in use"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_init_error_message() {
        let err = TransportError::init("client sent no initialize");
        assert_eq!(
            err.to_string(),
            "MCP initialization failed: client sent no initialize"
        );
    }
}
