use std::ops::Deref;

use crate::{IdBuf, Stream, Video as AsyncVideo};

/// A synchronous wrapper around [`Video`](crate::Video).
#[derive(Clone, Debug, derive_more::Display, PartialEq, Eq)]
pub struct Video(pub(super) AsyncVideo);

impl Video {
    /// A synchronous wrapper around [`Video::from_raw`](crate::Video::from_raw).
    ///
    /// Creates a [`Video`] from an arbitrary video identifier, like an url.
    /// ### Errors
    /// - When [`Id::from_raw`](crate::Id::from_raw) fails.
    /// - When [`VideoFetcher::fetch`](crate::VideoFetcher::fetch) fails.
    /// - When [`VideoDescrambler::descramble`](crate::VideoDescrambler::descramble) fails.
    #[inline]
    pub fn from_raw(raw: &str) -> crate::Result<Self> {
        Ok(Self(block!(AsyncVideo::from_raw(raw))?))
    }

    /// A synchronous wrapper around [`Video::from_id`](crate::Video::from_id).
    ///
    /// Creates a [`Video`] from an [`Id`](crate::Id).
    /// ### Errors
    /// - When [`VideoFetcher::fetch`](crate::VideoFetcher::fetch) fails.
    /// - When [`VideoDescrambler::descramble`](crate::VideoDescrambler::descramble) fails.
    #[inline]
    pub fn from_id(id: IdBuf) -> crate::Result<Self> {
        Ok(Self(block!(AsyncVideo::from_id(id))?))
    }

    /// Takes all [`Stream`]s of the video.
    #[inline]
    pub fn into_streams(self) -> Vec<Stream> {
        self.0.into_streams()
    }

    #[inline]
    pub fn into_inner(self) -> AsyncVideo {
        self.0
    }
}

impl Deref for Video {
    type Target = AsyncVideo;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
