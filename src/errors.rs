use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}: {fragment:?}")]
    Format { message: String, fragment: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ReplayError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> ReplayError {
        ReplayError::Io { context: context.into(), source }
    }

    pub fn format(message: impl Into<String>, fragment: impl Into<String>) -> ReplayError {
        ReplayError::Format {
            message: message.into(),
            fragment: fragment.into(),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, ReplayError::Format { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReplayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_shows_fragment() {
        let err = ReplayError::format("malformed request supplied", "GET /x");
        assert_eq!(err.to_string(), "malformed request supplied: \"GET /x\"");
        assert!(err.is_format());
    }

    #[test]
    fn io_error_shows_context() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ReplayError::io("could not open request file req.txt", source);
        assert_eq!(err.to_string(), "could not open request file req.txt: no such file");
        assert!(!err.is_format());
    }
}
