//! Blocking wrappers for using `ytinfo` in a synchronous context.
//!
//! Everything works exactly like described for the asynchronous API in the [`crate`]
//! documentation, the functions here just block on the shared runtime [`RT`]:
//! ```no_run
//!# use ytinfo::blocking::Video;
//!# fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let video = Video::from_raw("https://youtube.com/watch?v=dQw4w9WgXcQ")?;
//! println!("{} by {}", video.title(), video.author());
//!#  Ok(())
//!# }
//!```
//!
//! For everything else, like fetching the player JavaScript, there's the [`block`] macro:
//! ```no_run
//!# use ytinfo::{block, Cipher, VideoFetcher};
//!# fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = VideoFetcher::from_raw("https://youtu.be/dQw4w9WgXcQ")?;
//! let cipher = Cipher::from_js(&block!(fetcher.fetch_player_js())?)?;
//!#  Ok(())
//!# }
//!```
//!
//! This macro will utilize the [`Runtime`](tokio::runtime::Runtime) created for you by `ytinfo`,
//! and block on the provided future (You can also use it for other asynchronous stuff, not related
//! to `ytinfo`).

use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

use crate::Stream;

#[doc(inline)]
pub use video::Video;

/// A [`Runtime`](tokio::runtime::Runtime) for executing asynchronous code.
pub static RT: Lazy<Runtime> = Lazy::new(||
    Runtime::new().expect("Unable to start the tokio Runtime")
);

/// A convenient macro for executing asynchronous code in a synchronous context.
#[macro_export]
macro_rules! block {
    (async $future:block) => { $crate::blocking::RT.block_on(async $future) };
    (async move $future:block) => { $crate::blocking::RT.block_on(async move $future) };
    ($future:expr) => {
        $crate::blocking::RT.block_on(async {
            $future.await
        })
    };
}

#[doc(hidden)]
pub mod video;

/// A synchronous wrapper around [`get_video_info`](crate::get_video_info).
#[inline]
pub fn get_video_info(raw: &str) -> crate::Result<Vec<Stream>> {
    block!(crate::get_video_info(raw))
}

/// A synchronous wrapper around [`get_video_info_as_bytes`](crate::get_video_info_as_bytes).
#[inline]
pub fn get_video_info_as_bytes(raw: &str) -> crate::Result<Vec<u8>> {
    block!(crate::get_video_info_as_bytes(raw))
}

/// A synchronous wrapper around [`get_video_info_as_json`](crate::get_video_info_as_json).
#[inline]
pub fn get_video_info_as_json(raw: &str) -> crate::Result<String> {
    block!(crate::get_video_info_as_json(raw))
}

/// A synchronous wrapper around
/// [`get_video_info_as_json_or_default`](crate::get_video_info_as_json_or_default).
#[inline]
pub fn get_video_info_as_json_or_default(raw: &str) -> String {
    block!(crate::get_video_info_as_json_or_default(raw))
}
