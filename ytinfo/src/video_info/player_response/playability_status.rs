use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayabilityStatus {
    #[serde(rename_all = "camelCase")]
    Ok {
        #[serde(default)]
        playable_in_embed: bool,
    },
    Unplayable {
        #[serde(default)]
        reason: Option<String>,
    },
    LoginRequired {
        #[serde(default)]
        reason: Option<String>,
    },
    LiveStreamOffline {
        #[serde(default)]
        reason: Option<String>,
    },
    Error {
        #[serde(default)]
        reason: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl PlayabilityStatus {
    #[inline]
    pub fn is_playable(&self) -> bool {
        matches!(self, PlayabilityStatus::Ok { .. } | PlayabilityStatus::Unknown)
    }

    /// The reason YouTube gave, or the status itself, if there is none.
    pub fn reason(&self) -> &str {
        match self {
            PlayabilityStatus::Unplayable { reason: Some(reason) }
            | PlayabilityStatus::LoginRequired { reason: Some(reason) }
            | PlayabilityStatus::LiveStreamOffline { reason: Some(reason) }
            | PlayabilityStatus::Error { reason: Some(reason) } => reason,
            PlayabilityStatus::Ok { .. } => "OK",
            PlayabilityStatus::Unplayable { .. } => "UNPLAYABLE",
            PlayabilityStatus::LoginRequired { .. } => "LOGIN_REQUIRED",
            PlayabilityStatus::LiveStreamOffline { .. } => "LIVE_STREAM_OFFLINE",
            PlayabilityStatus::Error { .. } => "ERROR",
            PlayabilityStatus::Unknown => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let ok: PlayabilityStatus = serde_json::from_str(r#"{"status":"OK","playableInEmbed":true}"#).unwrap();
        assert_eq!(ok, PlayabilityStatus::Ok { playable_in_embed: true });
        assert!(ok.is_playable());

        let login: PlayabilityStatus = serde_json::from_str(
            r#"{"status":"LOGIN_REQUIRED","reason":"Sign in to confirm your age","messages":["x"]}"#
        ).unwrap();
        assert!(!login.is_playable());
        assert_eq!(login.reason(), "Sign in to confirm your age");

        let error: PlayabilityStatus = serde_json::from_str(r#"{"status":"ERROR"}"#).unwrap();
        assert_eq!(error.reason(), "ERROR");

        let unknown: PlayabilityStatus = serde_json::from_str(r#"{"status":"CONTENT_CHECK_REQUIRED"}"#).unwrap();
        assert_eq!(unknown, PlayabilityStatus::Unknown);
        assert!(unknown.is_playable());
    }
}
