use std::borrow::Cow;
use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{
    de::{Error as SerdeError, Unexpected},
    Deserialize, Deserializer, Serialize,
};
use url::Url;

use crate::{Error, Result};

/// Alias for an owned [`Id`].
pub type IdBuf = Id<'static>;

/// Ids shorter than this are rejected.
pub const MIN_ID_LEN: usize = 10;

/// Characters an extracted id must never contain.
const FORBIDDEN_CHARS: &[char] = &['?', '&', '/', '<', '%', '='];

/// Characters (besides the `youtu` marker) that tell a raw input apart from a bare id.
const URL_CHARS: &[char] = &['"', '?', '&', '/', '<', '%', '='];

/// The id extraction cascade, from the strictest to the most permissive pattern.
///
/// ## Guarantees:
/// - each pattern has exactly one capture group, which captures whenever the pattern matches
/// - the captured value is 11 characters long and contains none of `" & ? / = %`
pub static ID_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| [
    // after a marker (i.e. `watch?v=<ID>`, `embed/<ID>`, `v/<ID>`)
    Regex::new(r#"(?:v|embed|watch\?v)(?:=|/)([^"&?/=%]{11})"#).unwrap(),
    // after any `=` or `/`
    Regex::new(r#"(?:=|/)([^"&?/=%]{11})"#).unwrap(),
    // anywhere
    Regex::new(r#"([^"&?/=%]{11})"#).unwrap(),
]);

/// A wrapper around a `Cow<'a, str>` that makes sure the contained video id is well formed.
///
/// ## Guaranties:
/// - The id is at least [`MIN_ID_LEN`] bytes long
/// - The id contains none of `? & / < % =`, so it can be used as an url segment or parameter
///
/// ## Ownership
/// [`Id::from_raw`] and [`Id::from_str`] borrow from their input. Use [`Id::into_owned`] or
/// [`Id::as_owned`] to get an [`IdBuf`].
#[derive(Clone, Debug, Serialize, Hash)]
pub struct Id<'a>(Cow<'a, str>);

#[allow(clippy::should_implement_trait)]
impl<'a> Id<'a> {
    /// Extracts an id from an arbitrary video identifier, like a watch, embed or share url, or a
    /// bare id.
    ///
    /// Inputs without any url-ish character are taken as they are. All other inputs are run
    /// through [`ID_PATTERNS`], where each matching pattern narrows down the value the next one
    /// sees. The result is validated afterwards.
    pub fn from_raw(raw: &'a str) -> Result<Self> {
        let id = if looks_like_url(raw) {
            ID_PATTERNS
                .iter()
                .fold(raw, |working, pattern| narrow(pattern, working))
        } else {
            raw
        };

        log::trace!("extracted id `{}` from `{}`", id, raw);
        Self::from_str(id)
    }

    /// Validates an already extracted id.
    #[inline]
    pub fn from_str(id: &'a str) -> Result<Self> {
        check_str(id)?;
        Ok(Self(Cow::Borrowed(id)))
    }
}

/// Applies one stage of the extraction cascade.
#[inline]
fn narrow<'a>(pattern: &Regex, working: &'a str) -> &'a str {
    pattern
        .captures(working)
        .and_then(|c| c.get(1))
        .map_or(working, |m| m.as_str())
}

#[inline]
fn looks_like_url(raw: &str) -> bool {
    raw.contains("youtu") || raw.contains(URL_CHARS)
}

fn check_str(id: &str) -> Result<()> {
    if id.contains(FORBIDDEN_CHARS) {
        return Err(Error::InvalidIdentifier(
            format!("`{}` contains invalid characters", id).into()
        ));
    }
    if id.len() < MIN_ID_LEN {
        return Err(Error::InvalidIdentifier(
            format!("`{}` is shorter than {} characters", id, MIN_ID_LEN).into()
        ));
    }
    Ok(())
}

impl<'a> Id<'a> {
    #[inline]
    #[must_use]
    pub fn into_owned(self) -> IdBuf {
        Id(Cow::Owned(self.0.into_owned()))
    }

    #[inline]
    #[must_use]
    pub fn as_owned(&self) -> IdBuf {
        self
            .clone()
            .into_owned()
    }

    #[inline]
    #[must_use]
    pub fn as_borrowed(&self) -> Id<'_> {
        Id(Cow::Borrowed(&self.0))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn watch_url(&self) -> Url {
        Url::parse_with_params(
            "https://www.youtube.com/watch",
            &[("v", self.as_str())],
        ).unwrap()
    }

    #[inline]
    #[must_use]
    pub fn embed_url(&self) -> Url {
        let mut url = Url::parse("https://www.youtube.com/embed")
            .unwrap();
        url
            .path_segments_mut()
            .unwrap()
            .push(self.as_str());
        url
    }

    #[inline]
    #[must_use]
    pub fn share_url(&self) -> Url {
        let mut url = Url::parse("https://youtu.be")
            .unwrap();
        url
            .path_segments_mut()
            .unwrap()
            .push(self.as_str());
        url
    }
}

impl IdBuf {
    /// Validates an owned id. Gives the string back if it's not a valid id.
    #[inline]
    pub fn from_string(id: String) -> Result<Self, String> {
        match check_str(&id) {
            Ok(()) => Ok(Self(Cow::Owned(id))),
            Err(_) => Err(id),
        }
    }
}

impl<'de> Deserialize<'de> for Id<'static> {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
        where
            D: Deserializer<'de> {
        let raw = String::deserialize(deserializer)?;
        Self::from_string(raw)
            .map_err(|s| D::Error::invalid_value(
                Unexpected::Str(&s),
                &"expected a valid youtube video identifier",
            ))
    }
}

impl std::fmt::Display for Id<'_> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::ops::Deref for Id<'_> {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Id<'_> {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> PartialEq<T> for Id<'_>
    where
        T: AsRef<str> {
    #[inline]
    fn eq(&self, other: &T) -> bool {
        self.as_str() == other.as_ref()
    }
}

impl Eq for Id<'_> {}

impl Ord for Id<'_> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl<T> PartialOrd<T> for Id<'_>
    where
        T: AsRef<str> {
    #[inline]
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        self.as_str().partial_cmp(other.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    const ID: &str = "dQw4w9WgXcQ";
    const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

    fn random_id(rng: &mut impl Rng) -> String {
        (0..11)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }

    #[test_env_log::test]
    fn bare_ids_are_returned_unchanged() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let raw = random_id(&mut rng);
            let id = Id::from_raw(&raw).unwrap();
            assert_eq!(id, raw);
        }
    }

    #[test_env_log::test]
    fn urls_resolve_to_the_same_id() {
        let inputs = [
            ID.to_owned(),
            format!("https://www.youtube.com/watch?v={}", ID),
            format!("youtube.com/watch?v={}", ID),
            format!("https://www.youtube.com/embed/{}", ID),
            format!("https://www.youtube.com/embed/{}?rel=0&autoplay=1", ID),
            format!("https://youtu.be/{}", ID),
            format!("https://www.youtube.com/v/{}", ID),
            format!(
                "https://www.youtube.com/watch?feature=share&list=PLabc&index=3&v={}&t=42s&ab_channel=Someone",
                ID
            ),
        ];

        for raw in inputs.iter() {
            let id = Id::from_raw(raw).unwrap();
            assert_eq!(id, ID, "input: {}", raw);
        }
    }

    #[test]
    fn each_stage_narrows_the_previous_value() {
        let raw = format!("https://www.youtube.com/embed/{}?start=10", ID);

        let first = narrow(&ID_PATTERNS[0], &raw);
        assert_eq!(first, ID);
        // later stages only ever see what the previous one left behind
        let second = narrow(&ID_PATTERNS[1], first);
        assert_eq!(second, ID);
        let third = narrow(&ID_PATTERNS[2], second);
        assert_eq!(third, ID);
    }

    #[test]
    fn second_stage_applies_without_marker() {
        let raw = format!("https://youtu.be/{}", ID);
        assert_eq!(narrow(&ID_PATTERNS[0], &raw), raw);
        assert_eq!(narrow(&ID_PATTERNS[1], &raw), ID);
    }

    #[test]
    fn third_stage_matches_anywhere() {
        assert_eq!(narrow(&ID_PATTERNS[2], "\"dQw4w9WgXcQ\""), ID);
        assert_eq!(narrow(&ID_PATTERNS[2], "short"), "short");
    }

    #[test]
    fn too_short_ids_are_rejected() {
        assert!(matches!(Id::from_raw("abc123"), Err(Error::InvalidIdentifier(_))));
        assert!(matches!(Id::from_raw("123456789"), Err(Error::InvalidIdentifier(_))));
        // no stage matches, so the whole url is left behind
        assert!(matches!(
            Id::from_raw("https://youtu.be/abc"),
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn ten_characters_are_enough() {
        assert_eq!(Id::from_raw("abcdefghij").unwrap(), "abcdefghij");
    }

    #[test]
    fn forbidden_characters_are_rejected() {
        for raw in ["abcdef<ghijk", "a?b", "abc&def&ghi", "a/b/c/d/e/f"].iter() {
            assert!(
                matches!(Id::from_raw(raw), Err(Error::InvalidIdentifier(_))),
                "input: {}", raw
            );
        }
        assert!(matches!(Id::from_str("abcdefghij%"), Err(Error::InvalidIdentifier(_))));
        assert!(matches!(Id::from_str("abcdefghij="), Err(Error::InvalidIdentifier(_))));
    }

    #[test]
    fn urls() {
        let id = Id::from_str(ID).unwrap();
        assert_eq!(id.watch_url().as_str(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(id.embed_url().as_str(), "https://www.youtube.com/embed/dQw4w9WgXcQ");
        assert_eq!(id.share_url().as_str(), "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn deserialization_validates() {
        let id: IdBuf = serde_json::from_str("\"dQw4w9WgXcQ\"").unwrap();
        assert_eq!(id, ID);
        assert!(serde_json::from_str::<IdBuf>("\"a?b\"").is_err());
    }
}
