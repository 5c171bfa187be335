//! All the types, that hold video information, and the decoding of the `get_video_info` response.
//!
//! The response is encoded twice: the body is a flat query string (the envelope), and its
//! `player_response` value is a JSON document. Both layers are parsed in separate steps, so a
//! broken envelope ([`Error::MalformedEnvelope`]) can be told apart from a changed JSON schema
//! ([`Error::SchemaChanged`]).

use std::collections::HashMap;

use serde::Deserialize;
use url::form_urlencoded;

use player_response::video_details::VideoDetails;
use player_response::PlayerResponse;

use crate::{Error, Result};

pub mod player_response;

/// The decoded `get_video_info` response of a playable video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    pub player_response: PlayerResponse,
    /// Title and author, extracted on a best-effort basis.
    pub video_details: VideoDetails,
}

impl VideoInfo {
    /// Decodes the raw `get_video_info` response body.
    ///
    /// ### Errors
    /// - [`Error::MalformedEnvelope`] when the body is no valid query string.
    /// - [`Error::MissingStatus`] when the envelope has no `status`.
    /// - [`Error::ProviderRejected`] when the `status` is `fail`.
    /// - [`Error::UnexpectedStatus`] when the `status` is neither `ok` nor `fail`.
    /// - [`Error::MissingPlayerResponse`] when the envelope has no `player_response`.
    /// - [`Error::SchemaChanged`] when the `player_response` does not deserialize.
    /// - [`Error::Unplayable`] when YouTube marked the video as not playable.
    pub fn from_envelope(raw: &str) -> Result<Self> {
        let envelope = Envelope::parse(raw)?;

        match envelope.status()? {
            ProviderStatus::Ok => {}
            ProviderStatus::Fail { reason } => return Err(Error::ProviderRejected(
                reason.unwrap_or_else(|| "no reason given".to_owned())
            )),
            ProviderStatus::Other(status) => return Err(Error::UnexpectedStatus(status)),
        }

        let player_response = envelope
            .first("player_response")
            .ok_or(Error::MissingPlayerResponse)?;

        // parsed once, read twice: strictly for the playability and the formats, leniently for
        // the title and the author
        let document = serde_json::from_str::<serde_json::Value>(player_response)
            .map_err(Error::SchemaChanged)?;
        let player_response = PlayerResponse::deserialize(&document)
            .map_err(Error::SchemaChanged)?;

        player_response.check_playability()?;
        let video_details = VideoDetails::from_document(&document);

        Ok(Self {
            player_response,
            video_details,
        })
    }

    /// The title of the video, or an empty string, if YouTube didn't provide one.
    #[inline]
    pub fn title(&self) -> &str {
        &self.video_details.title
    }

    /// The author of the video, or an empty string, if YouTube didn't provide one.
    #[inline]
    pub fn author(&self) -> &str {
        &self.video_details.author
    }

    /// Splits the info into the video details and the undecoded format entries, in the order
    /// YouTube listed them.
    #[inline]
    pub fn into_parts(self) -> (VideoDetails, Vec<serde_json::Value>) {
        let formats = self.player_response
            .streaming_data
            .map(|streaming_data| streaming_data.formats)
            .unwrap_or_default();

        (self.video_details, formats)
    }
}

/// The value of the `status` key of the envelope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProviderStatus {
    Ok,
    Fail { reason: Option<String> },
    Other(String),
}

/// The outer layer of the response: a flat mapping from keys to all their values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Envelope(HashMap<String, Vec<String>>);

impl Envelope {
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        for pair in raw.split('&') {
            check_pair(pair)?;
        }

        let mut map = HashMap::<String, Vec<String>>::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            map
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        log::trace!("envelope keys: {:?}", map.keys().collect::<Vec<_>>());
        Ok(Self(map))
    }

    /// The first value of `key`.
    #[inline]
    pub(crate) fn first(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub(crate) fn status(&self) -> Result<ProviderStatus> {
        let status = self
            .first("status")
            .ok_or(Error::MissingStatus)?;

        Ok(match status {
            "ok" => ProviderStatus::Ok,
            "fail" => ProviderStatus::Fail {
                reason: self.first("reason").map(str::to_owned),
            },
            other => ProviderStatus::Other(other.to_owned()),
        })
    }
}

/// Rejects `;` separators and broken percent escapes, which a lenient decoder would silently
/// pass through.
fn check_pair(pair: &str) -> Result<()> {
    if pair.contains(';') {
        return Err(Error::MalformedEnvelope(
            format!("invalid semicolon separator in `{}`", pair).into()
        ));
    }

    let bytes = pair.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|&(_, &b)| b == b'%') {
        let escape = bytes.get(i + 1..i + 3);
        let valid = matches!(escape, Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
        if !valid {
            return Err(Error::MalformedEnvelope(
                format!("invalid percent escape in `{}`", pair).into()
            ));
        }
    }

    Ok(())
}
