use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub use cipher::{Cipher, Transform};

use crate::{IdBuf, Stream, Video, VideoInfo};
use crate::error::Error;
use crate::video_info::player_response::streaming_data::{CipherPayload, RawFormat};
use crate::video_info::player_response::video_details::VideoDetails;

mod cipher;

/// Reconstructs the url of a format, for which YouTube only provided a [`CipherPayload`].
///
/// The signature transformation is defined by YouTube's player and changes with it. Implement
/// this trait to plug in another transformation without touching the rest of the pipeline.
/// [`Cipher`] is the implementation shipped with this crate.
pub trait Decipher: Send + Sync {
    /// Turns the scrambled signature into the one YouTube expects.
    fn decrypt_signature(&self, signature: &str) -> crate::Result<String>;

    /// Appends the decrypted signature to the url of the payload, under the parameter name the
    /// payload asks for.
    fn decipher(&self, payload: &CipherPayload) -> crate::Result<Url> {
        if payload.s.is_empty() {
            return Err(Error::Cipher("the cipher payload contains an empty signature".into()));
        }

        let signature = self.decrypt_signature(&payload.s)?;
        let mut url = payload.url.clone();
        url
            .query_pairs_mut()
            .append_pair(&payload.sp, &signature);

        Ok(url)
    }
}

/// A descrambler used to turn the [`VideoInfo`] fetched by [`VideoFetcher`] into [`Stream`]s.
///
/// You will probably rarely use this type directly, and use [`Video`] instead.
/// The only way of getting one is by calling [`VideoFetcher::fetch`].
///
/// # How it works
/// After `fetch` decoded the response, we are left with a list of [`RawFormat`]s. Those come in
/// two flavours: pre-signed and ciphered ones. Pre-signed formats already contain a valid url.
/// Ciphered formats contain a [`CipherPayload`] instead: an url without a signature, and a
/// scrambled signature, which first has to be run through a [`Decipher`] before it's appended
/// to the url.
///
/// `descramble` walks the formats in the order YouTube listed them, skips the ones YouTube
/// couldn't decode itself (empty MIME type), and turns every other one into a [`Stream`].
///
/// [`VideoFetcher`]: crate::fetcher::VideoFetcher
/// [`VideoFetcher::fetch`]: crate::fetcher::VideoFetcher::fetch
#[derive(Clone, derive_more::Display, derivative::Derivative)]
#[display(fmt = "VideoDescrambler({})", video_id)]
#[derivative(Debug)]
pub struct VideoDescrambler {
    pub(crate) video_id: IdBuf,
    pub(crate) video_info: VideoInfo,
    #[derivative(Debug = "ignore")]
    pub(crate) decipher: Option<Arc<dyn Decipher>>,
}

impl VideoDescrambler {
    /// Resolves all usable formats into [`Stream`]s.
    ///
    /// ### Errors
    /// - When a ciphered format can't be deciphered. A single failing format fails the whole
    ///   video.
    /// - When no usable format is left ([`Error::NoStreams`]).
    #[log_derive::logfn(ok = "Trace", err = "Error")]
    pub fn descramble(self) -> crate::Result<Video> {
        let (video_details, formats) = self.video_info.into_parts();
        let streams = resolve_streams(&video_details, formats, self.decipher.as_deref())?;

        Ok(Video {
            video_id: self.video_id,
            video_details,
            streams,
        })
    }

    /// The [`VideoInfo`] of the video.
    #[inline]
    pub fn video_info(&self) -> &VideoInfo {
        &self.video_info
    }

    /// The [`Id`](crate::Id) of the video.
    #[inline]
    pub fn video_id(&self) -> &IdBuf {
        &self.video_id
    }

    /// The title of the video.
    #[inline]
    pub fn video_title(&self) -> &str {
        self.video_info.title()
    }
}

/// Converts the format entries YouTube listed into streams, keeping their order.
///
/// Entries with an empty MIME type, entries that don't decode into a [`RawFormat`], and entries
/// with neither an url nor a cipher are skipped.
pub fn resolve_streams(
    video_details: &VideoDetails,
    formats: Vec<Value>,
    decipher: Option<&dyn Decipher>,
) -> crate::Result<Vec<Stream>> {
    let mut streams = Vec::with_capacity(formats.len());

    for (index, entry) in formats.into_iter().enumerate() {
        let mime_type = entry
            .get("mimeType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if mime_type.is_empty() {
            log::debug!("skipping format #{}: YouTube failed to decode it", index);
            continue;
        }

        let format = match RawFormat::deserialize(entry) {
            Ok(format) => format,
            Err(e) => {
                log::warn!("skipping format #{}: {}", index, e);
                continue;
            }
        };

        let url = match (format.direct_url(), format.cipher_payload()?) {
            (Some(url), _) => url.to_owned(),
            (None, Some(payload)) => decipher
                .ok_or_else(|| Error::Cipher(format!(
                    "format {} is ciphered, but no decipher is configured", format.itag
                ).into()))?
                .decipher(&payload)?
                .into(),
            (None, None) => {
                log::warn!("skipping format {}: it has neither an url nor a cipher", format.itag);
                continue;
            }
        };

        streams.push(Stream {
            author: video_details.author.clone(),
            quality: format.quality,
            title: video_details.title.clone(),
            mime_type: format.mime_type,
            url,
            duration: format.approx_duration_ms,
        });
    }

    if streams.is_empty() {
        return Err(Error::NoStreams);
    }

    Ok(streams)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Reverses the signature.
    struct Reverse;

    impl Decipher for Reverse {
        fn decrypt_signature(&self, signature: &str) -> crate::Result<String> {
            Ok(signature.chars().rev().collect())
        }
    }

    struct Broken;

    impl Decipher for Broken {
        fn decrypt_signature(&self, _: &str) -> crate::Result<String> {
            Err(Error::Cipher("unknown transform".into()))
        }
    }

    fn details() -> VideoDetails {
        VideoDetails {
            title: "A title".to_owned(),
            author: "An author".to_owned(),
        }
    }

    fn direct(itag: u64, mime_type: &str) -> Value {
        json!({
            "itag": itag,
            "mimeType": mime_type,
            "quality": "medium",
            "approxDurationMs": "212091",
            "url": format!("https://r1.example.com/videoplayback?itag={}", itag),
        })
    }

    fn ciphered(itag: u64) -> Value {
        json!({
            "itag": itag,
            "mimeType": "video/webm",
            "quality": "hd720",
            "approxDurationMs": "212091",
            "signatureCipher": "s=CBA&sp=sig&url=https%3A%2F%2Fr2.example.com%2Fvideoplayback%3Fitag%3D22",
        })
    }

    #[test_env_log::test]
    fn skips_empty_mime_types_and_keeps_the_order() {
        let formats = vec![direct(17, ""), direct(18, "video/mp4"), ciphered(22)];
        let streams = resolve_streams(&details(), formats, Some(&Reverse)).unwrap();

        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].url, "https://r1.example.com/videoplayback?itag=18");
        assert_eq!(streams[0].mime_type, "video/mp4");
        assert_eq!(streams[1].url, "https://r2.example.com/videoplayback?itag=22&sig=ABC");
        assert_eq!(streams[1].quality, "hd720");
        for stream in streams.iter() {
            assert_eq!(stream.title, "A title");
            assert_eq!(stream.author, "An author");
            assert_eq!(stream.duration, "212091");
        }
    }

    #[test]
    fn no_usable_format_is_an_error() {
        let mut broken = ciphered(22);
        broken["mimeType"] = json!("");
        let formats = vec![direct(17, ""), direct(18, ""), broken];
        assert!(matches!(resolve_streams(&details(), formats, Some(&Reverse)), Err(Error::NoStreams)));
        assert!(matches!(resolve_streams(&details(), Vec::new(), None), Err(Error::NoStreams)));
    }

    #[test]
    fn one_failing_decipher_fails_all() {
        let formats = vec![direct(18, "video/mp4"), ciphered(22)];
        assert!(matches!(resolve_streams(&details(), formats, Some(&Broken)), Err(Error::Cipher(_))));
    }

    #[test]
    fn ciphered_formats_need_a_decipher() {
        let formats = vec![direct(18, "video/mp4"), ciphered(22)];
        assert!(matches!(resolve_streams(&details(), formats, None), Err(Error::Cipher(_))));
    }

    #[test]
    fn formats_without_url_and_cipher_are_skipped() {
        let mut malformed = direct(36, "video/3gpp");
        malformed["url"] = json!("");
        let formats = vec![malformed, direct(18, "video/mp4")];

        let streams = resolve_streams(&details(), formats, None).unwrap();
        assert_eq!(streams.len(), 1);
        assert!(streams[0].url.ends_with("itag=18"));
    }

    #[test]
    fn empty_signatures_are_rejected() {
        let mut payload = RawFormat::deserialize(ciphered(22)).unwrap().cipher_payload().unwrap().unwrap();
        payload.s.clear();
        assert!(matches!(Reverse.decipher(&payload), Err(Error::Cipher(_))));
    }

    #[test_env_log::test]
    fn malformed_entries_only_cost_themselves() {
        let formats = vec![
            json!({ "itag": 17, "mimeType": "", "signatureCipher": "sp=sig" }),
            json!({ "itag": "eighteen", "mimeType": "video/mp4", "url": "https://a.example.com/v" }),
            json!({ "itag": 36, "mimeType": "video/3gpp", "approxDurationMs": 212091, "url": "https://a.example.com/w" }),
            direct(18, "video/mp4"),
        ];

        let streams = resolve_streams(&details(), formats, None).unwrap();
        assert_eq!(streams.len(), 1);
        assert!(streams[0].url.ends_with("itag=18"));
    }

    #[test]
    fn undecodable_ciphers_are_cipher_errors() {
        let formats = vec![
            direct(18, "video/mp4"),
            json!({ "itag": 22, "mimeType": "video/mp4", "signatureCipher": "sp=sig" }),
        ];
        assert!(matches!(resolve_streams(&details(), formats, Some(&Reverse)), Err(Error::Cipher(_))));
    }
}
