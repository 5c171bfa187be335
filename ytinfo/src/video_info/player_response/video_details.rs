use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The cosmetic details of a video.
///
/// Those are not essential for resolving the streams, so they never fail the decoding. If
/// either of them is missing, both are left empty.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct VideoDetails {
    pub title: String,
    pub author: String,
}

impl VideoDetails {
    pub(crate) fn from_document(document: &Value) -> Self {
        let details = document.get("videoDetails");
        let field = |name: &str| details
            .and_then(|details| details.get(name))
            .and_then(Value::as_str);

        match (field("title"), field("author")) {
            (Some(title), Some(author)) => Self {
                title: title.to_owned(),
                author: author.to_owned(),
            },
            _ => {
                log::debug!("the player response contains no complete video details");
                Self::default()
            }
        }
    }
}
