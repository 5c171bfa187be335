use serde::Deserialize;

use playability_status::PlayabilityStatus;
use streaming_data::StreamingData;

use crate::{Error, Result};

pub mod video_details;
pub mod streaming_data;
pub mod playability_status;

/// The structured part of the `player_response` document.
///
/// Only the fields the stream resolution depends on are modelled. Everything else YouTube sends
/// along is ignored, so additions on their side don't break decoding.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub streaming_data: Option<StreamingData>,
}

impl PlayerResponse {
    /// Fails with [`Error::Unplayable`], if YouTube marked the video as not playable.
    pub(crate) fn check_playability(&self) -> Result<()> {
        match self.playability_status {
            None => {
                log::warn!("the player response contains no playability status");
                Ok(())
            }
            Some(PlayabilityStatus::Unknown) => {
                log::warn!("unknown playability status, assuming the video is playable");
                Ok(())
            }
            Some(ref status) if status.is_playable() => Ok(()),
            Some(ref status) => Err(Error::Unplayable(status.reason().to_owned())),
        }
    }
}
