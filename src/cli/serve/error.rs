//! Request-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("failed to render {name}")]
    Render {
        name: &'static str,
        #[source]
        source: tera::Error,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl HttpError {
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::Render { .. } | Self::Internal(_) => 500,
        }
    }

    /// Message shown to the client. Server errors stay generic unless
    /// `debug` is set.
    pub fn public_message(&self, debug: bool) -> String {
        if self.status() >= 500 && !debug {
            return "Internal Server Error".to_string();
        }
        anyhow::Chain::new(self)
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(HttpError::NotFound.status(), 404);
        assert_eq!(HttpError::MethodNotAllowed { allow: "GET" }.status(), 405);
        assert_eq!(HttpError::Internal(anyhow::anyhow!("boom")).status(), 500);
    }

    #[test]
    fn test_public_message() {
        assert_eq!(HttpError::NotFound.public_message(false), "Not Found");

        let err = HttpError::Internal(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.public_message(false), "Internal Server Error");
        assert_eq!(err.public_message(true), "disk on fire");
    }

    #[test]
    fn test_render_message_includes_cause() {
        let err = HttpError::Render {
            name: "post.html",
            source: tera::Error::msg("bad filter"),
        };
        let message = err.public_message(true);
        assert!(message.starts_with("failed to render post.html: "));
        assert!(message.contains("bad filter"));
    }
}
