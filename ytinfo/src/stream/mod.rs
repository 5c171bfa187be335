//! The resolved streams of a video, and their JSON representation.

use serde::{Deserialize, Serialize};

use crate::Result;

/// One directly fetchable variant of a video.
///
/// All fields are kept as YouTube sent them. `duration` in particular is the approximate
/// duration in milliseconds, as decimal text.
#[derive(Clone, Debug, Default, derive_more::Display, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[display(fmt = "Stream({}, {}, {})", quality, mime_type, url)]
pub struct Stream {
    pub author: String,
    pub quality: String,
    pub title: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub url: String,
    pub duration: String,
}

/// Serializes the streams into a JSON array.
#[inline]
pub fn to_json(streams: &[Stream]) -> Result<String> {
    Ok(serde_json::to_string(streams)?)
}

/// Serializes the streams into the bytes of a JSON array.
#[inline]
pub fn to_json_vec(streams: &[Stream]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(streams)?)
}

/// Deserializes streams previously serialized with [`to_json`].
#[inline]
pub fn from_json(json: &str) -> Result<Vec<Stream>> {
    Ok(serde_json::from_str(json)?)
}

/// Deserializes streams previously serialized with [`to_json_vec`].
#[inline]
pub fn from_json_slice(json: &[u8]) -> Result<Vec<Stream>> {
    Ok(serde_json::from_slice(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streams() -> Vec<Stream> {
        vec![
            Stream {
                author: "An author".to_owned(),
                quality: "medium".to_owned(),
                title: "A \"quoted\" title, with ünicode".to_owned(),
                mime_type: r#"video/mp4; codecs="avc1.42001E, mp4a.40.2""#.to_owned(),
                url: "https://r1.example.com/videoplayback?itag=18&sig=ABC".to_owned(),
                duration: "212091".to_owned(),
            },
            Stream {
                author: "An author".to_owned(),
                quality: "hd720".to_owned(),
                title: "A \"quoted\" title, with ünicode".to_owned(),
                mime_type: "video/webm".to_owned(),
                url: "https://r2.example.com/videoplayback?itag=22".to_owned(),
                duration: String::new(),
            },
        ]
    }

    #[test]
    fn round_trips() {
        let streams = streams();

        assert_eq!(from_json(&to_json(&streams).unwrap()).unwrap(), streams);
        assert_eq!(from_json_slice(&to_json_vec(&streams).unwrap()).unwrap(), streams);
    }

    #[test]
    fn field_names() {
        let json = to_json(&streams()[1..]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value[0].as_object().unwrap();

        let mut keys = object.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(keys, ["author", "duration", "quality", "title", "type", "url"]);
        assert_eq!(object["type"], "video/webm");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(from_json("[{\"author\": 1}]").is_err());
        assert!(from_json("").is_err());
    }
}
