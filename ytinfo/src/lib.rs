#![allow(clippy::nonstandard_macro_braces)]
#![warn(
rust_2018_idioms,
unreachable_pub
)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Resolves YouTube video identifiers into directly fetchable streams.
//!
//! ## Just show me the code!
//! ```no_run
//!# #[tokio::main]
//!# async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&ab_channel=RickAstley";
//! for stream in ytinfo::get_video_info(url).await? {
//!     println!("{}", stream);
//! }
//!# Ok(())
//!# }
//! ```
//! And with the `blocking` feature enabled (it is by default), you don't even have to bring your
//! own runtime:
//! ```no_run
//!# fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = ytinfo::blocking::get_video_info_as_json("https://youtu.be/dQw4w9WgXcQ")?;
//!# Ok(())
//!# }
//! ```
//!
//! ## The steps in between
//! Resolving a video happens in four steps, each of which you can also drive yourself:
//! 1. [`Id::from_raw`] extracts the 11 character id from an arbitrary identifier, like an url.
//! 2. [`VideoFetcher::fetch`] requests the video info from YouTube and decodes it into a
//!    [`VideoInfo`]. The request goes through a [`Transport`], [`HttpTransport`] by default.
//! 3. [`VideoDescrambler::descramble`] turns the formats of the [`VideoInfo`] into [`Stream`]s.
//! 4. Formats without a direct url are handed to a [`Decipher`], if one is set via
//!    [`VideoFetcher::with_decipher`].
//!
//! ```no_run
//!# use std::sync::Arc;
//!# use ytinfo::{Cipher, Id, VideoFetcher};
//!# #[tokio::main]
//!# async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let id = Id::from_raw("https://www.youtube.com/embed/dQw4w9WgXcQ")?;
//! let fetcher = VideoFetcher::from_id(id.into_owned())?;
//! let cipher = Cipher::from_js(&fetcher.fetch_player_js().await?)?;
//!
//! let descrambler = fetcher
//!     .with_decipher(Arc::new(cipher))
//!     .fetch()
//!     .await?;
//! println!("{}", descrambler.video_title());
//!
//! let video = descrambler.descramble()?;
//!# Ok(())
//!# }
//! ```
//!
//! ## Feature flags
//! - `blocking`: \[default\] Enables the [`blocking`] API, which internally creates a [`tokio`]
//!   runtime for you.
//! - `rustls-tls`: \[default\] Uses `rustls` for the default [`HttpTransport`].
//! - `default-tls`, `native-tls`: Use the respective TLS backend of [`reqwest`] instead.

#[cfg(feature = "blocking")]
pub use tokio;
pub use url;

pub use crate::config::FetchConfig;
pub use crate::descrambler::{Cipher, Decipher, Transform, VideoDescrambler};
pub use crate::error::Error;
pub use crate::fetcher::{HttpTransport, Transport, VideoFetcher};
pub use crate::id::{Id, IdBuf};
pub use crate::stream::Stream;
pub use crate::video::Video;
#[doc(inline)]
pub use crate::video_info::{
    player_response::{
        playability_status::PlayabilityStatus,
        streaming_data::{CipherPayload, RawFormat},
        video_details::VideoDetails,
        PlayerResponse,
    },
    ProviderStatus,
    VideoInfo,
};

/// Alias for `Result`, with the default error type [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(feature = "blocking")]
pub mod blocking;
mod config;
pub mod descrambler;
pub mod error;
pub mod fetcher;
mod id;
mod serde_impl;
pub mod stream;
mod video;
mod video_info;

/// Resolves an arbitrary video identifier, like an url, into the [`Stream`]s of the video.
///
/// ### Errors
/// See [`Error`]. Formats without a direct url fail with [`Error::Cipher`], since no
/// [`Decipher`] is set. Use [`VideoFetcher::with_decipher`] for those.
#[inline]
pub async fn get_video_info(raw: &str) -> Result<Vec<Stream>> {
    Ok(Video::from_raw(raw).await?.into_streams())
}

/// Like [`get_video_info`], but returns the [`Stream`]s as JSON bytes.
#[inline]
pub async fn get_video_info_as_bytes(raw: &str) -> Result<Vec<u8>> {
    stream::to_json_vec(&get_video_info(raw).await?)
}

/// Like [`get_video_info`], but returns the [`Stream`]s as a JSON string.
#[inline]
pub async fn get_video_info_as_json(raw: &str) -> Result<String> {
    stream::to_json(&get_video_info(raw).await?)
}

/// Like [`get_video_info_as_json`], but returns an empty string on any error.
///
/// The error is still logged.
pub async fn get_video_info_as_json_or_default(raw: &str) -> String {
    get_video_info_as_json(raw)
        .await
        .unwrap_or_else(|e| {
            log::error!("resolving `{}` failed: {}", raw, e);
            String::new()
        })
}
