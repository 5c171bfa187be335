use std::borrow::Cow;

/// A boxed error, as returned by a [`Transport`](crate::fetcher::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving a video identifier into its streams.
///
/// Every variant is terminal for the resolution it occurred in. Nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("the provided raw id is not a valid video identifier: {0}")]
    InvalidIdentifier(Cow<'static, str>),
    #[error("failed to fetch the video info")]
    Fetch(#[source] BoxError),

    #[error("the video info response is not a valid query string: {0}")]
    MalformedEnvelope(Cow<'static, str>),
    #[error("the video info response contains no `status`")]
    MissingStatus,
    #[error("the video info response contains no `player_response`")]
    MissingPlayerResponse,
    #[error("YouTube rejected the request: `{0}`")]
    ProviderRejected(String),
    #[error("YouTube returned an unexpected status: `{0}`")]
    UnexpectedStatus(String),
    #[error("the player response does not match the known schema anymore")]
    SchemaChanged(#[source] serde_json::Error),
    #[error("the video cannot be played or downloaded: {0}")]
    Unplayable(String),

    #[error("could not decipher the stream signature: {0}")]
    Cipher(Cow<'static, str>),
    #[error("the video contains no streams")]
    NoStreams,

    #[error(transparent)]
    JsonSerialization(#[from] serde_json::Error),
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),
}

impl Error {
    /// Whether the error suggests that YouTube changed the shape of its responses, rather than
    /// the request being invalid or the video being unavailable.
    pub fn is_upstream_drift(&self) -> bool {
        matches!(
            self,
            Error::MalformedEnvelope(_)
                | Error::MissingStatus
                | Error::MissingPlayerResponse
                | Error::UnexpectedStatus(_)
                | Error::SchemaChanged(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_is_told_apart_from_caller_errors() {
        let schema = serde_json::from_str::<u8>("{").unwrap_err();

        assert!(Error::SchemaChanged(schema).is_upstream_drift());
        assert!(Error::UnexpectedStatus("maybe".into()).is_upstream_drift());
        assert!(!Error::InvalidIdentifier("too short".into()).is_upstream_drift());
        assert!(!Error::ProviderRejected("private video".into()).is_upstream_drift());
        assert!(!Error::NoStreams.is_upstream_drift());
    }

    #[test]
    fn provider_reason_is_part_of_the_message() {
        let err = Error::ProviderRejected("private video".to_owned());
        assert!(err.to_string().contains("private video"));
    }
}
