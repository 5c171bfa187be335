use derive_more::Display;

use crate::video_info::player_response::video_details::VideoDetails;
use crate::{IdBuf, Stream};

/// A resolved YouTube video: its id, title, author, and all directly fetchable [`Stream`]s.
///
/// An instance always holds at least one stream.
///
/// There are two ways of constructing a [`Video`]:
/// 1. By using the asynchronous `Video::from_*` methods, which extract the id, fetch the video
///    info and descramble it in one go.
/// 2. By calling [`VideoDescrambler::descramble`] on the result of [`VideoFetcher::fetch`]. This
///    gives you more control over the process, i.e. for plugging in a
///    [`Decipher`](crate::descrambler::Decipher).
///
/// # Example
/// ```no_run
///# use ytinfo::Video;
///# #[tokio::main]
///# async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let video = Video::from_raw("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
/// for stream in video.streams() {
///     println!("{} {}: {}", stream.quality, stream.mime_type, stream.url);
/// }
///# Ok(())
///# }
/// ```
/// [`VideoFetcher::fetch`]: crate::VideoFetcher::fetch
/// [`VideoDescrambler::descramble`]: crate::VideoDescrambler::descramble
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "Video({}, streams: {})", video_id, "streams.len()")]
pub struct Video {
    pub(crate) video_id: IdBuf,
    pub(crate) video_details: VideoDetails,
    pub(crate) streams: Vec<Stream>,
}

impl Video {
    /// Creates a [`Video`] from an arbitrary video identifier, like an url.
    /// ### Errors
    /// - When [`Id::from_raw`](crate::Id::from_raw) fails.
    /// - When [`VideoFetcher::fetch`](crate::VideoFetcher::fetch) fails.
    /// - When [`VideoDescrambler::descramble`](crate::VideoDescrambler::descramble) fails.
    #[inline]
    pub async fn from_raw(raw: &str) -> crate::Result<Self> {
        crate::VideoFetcher::from_raw(raw)?
            .fetch()
            .await?
            .descramble()
    }

    /// Creates a [`Video`] from an [`Id`](crate::Id).
    /// ### Errors
    /// - When [`VideoFetcher::fetch`](crate::VideoFetcher::fetch) fails.
    /// - When [`VideoDescrambler::descramble`](crate::VideoDescrambler::descramble) fails.
    #[inline]
    pub async fn from_id(id: IdBuf) -> crate::Result<Self> {
        crate::VideoFetcher::from_id(id)?
            .fetch()
            .await?
            .descramble()
    }

    /// The id of the video.
    #[inline]
    pub fn id(&self) -> &IdBuf {
        &self.video_id
    }

    /// The title of the video. Empty, if YouTube didn't provide one.
    #[inline]
    pub fn title(&self) -> &str {
        &self.video_details.title
    }

    /// The author of the video. Empty, if YouTube didn't provide one.
    #[inline]
    pub fn author(&self) -> &str {
        &self.video_details.author
    }

    /// All [`Stream`]s of the video, in the order YouTube listed them.
    #[inline]
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Takes all [`Stream`]s of the video.
    #[inline]
    pub fn into_streams(self) -> Vec<Stream> {
        self.streams
    }
}
