use thiserror::Error;

/// Startup and serve errors mapped to exit codes.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Validation(#[from] ferrocast_core::ValidationError),

    #[error(transparent)]
    Font(#[from] ferrocast_core::RenderError),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl WebError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Font(_) => 3,
            Self::Bind { .. } => 10,
            Self::Serve(_) => 11,
            Self::Logging(_) => 12,
        }
    }
}
