use std::error::Error;
use std::fmt;

/// Boxed cause of a transport failure.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors that can occur when fetching readings from the remote service.
#[derive(Debug)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, body read).
    Transport(BoxError),
    /// The service answered with a non-success status code.
    Status(u16),
    /// The body was not a JSON array of readings.
    Decode(serde_json::Error),
}

impl FetchError {
    pub fn transport<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        FetchError::Transport(cause.into())
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request failed: {}", e),
            FetchError::Status(code) => write!(f, "bad response status: {}", code),
            FetchError::Decode(e) => write!(f, "could not decode readings: {}", e),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e.as_ref()),
            FetchError::Status(_) => None,
            FetchError::Decode(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}

#[cfg(test)]
mod tests {
    use super::FetchError;
    use std::error::Error;

    #[test]
    fn test_display_and_source() {
        let err = FetchError::transport("connection reset");
        assert_eq!(err.to_string(), "request failed: connection reset");
        assert!(err.source().is_some());

        let err = FetchError::Status(503);
        assert_eq!(err.to_string(), "bad response status: 503");
        assert!(err.source().is_none());
    }
}
