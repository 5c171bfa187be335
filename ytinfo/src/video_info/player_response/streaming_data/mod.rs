use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::Result;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamingData {
    /// The formats as YouTube listed them. Each entry is decoded into a [`RawFormat`] on its own
    /// while resolving the streams, so a malformed entry only costs itself.
    #[serde(default)]
    pub formats: Vec<Value>,
}

/// One quality / encoding variant, as listed by YouTube.
///
/// A format comes either with a direct `url`, or with a `signatureCipher` query string, from
/// which the url still has to be deciphered (see [`RawFormat::cipher_payload`]).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawFormat {
    #[serde(default)]
    pub itag: u64,
    /// Empty, if YouTube failed to decode this variant on their side.
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub quality: String,
    pub quality_label: Option<String>,
    /// The duration in milliseconds, as decimal text.
    #[serde(default)]
    pub approx_duration_ms: String,
    pub url: Option<String>,
    #[serde(default, alias = "cipher")]
    pub signature_cipher: Option<String>,
}

impl RawFormat {
    /// The direct url, if YouTube provided a non-empty one.
    #[inline]
    pub fn direct_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    /// Decodes the `signatureCipher` query string. `None`, if there is no (or an empty) one.
    /// ### Errors
    /// [`Error::Cipher`](crate::Error::Cipher), if the query string lacks the url or the
    /// signature.
    pub fn cipher_payload(&self) -> Result<Option<CipherPayload>> {
        match self.signature_cipher.as_deref() {
            Some(raw) if !raw.is_empty() => crate::serde_impl::signature_cipher::parse(raw).map(Some),
            _ => Ok(None),
        }
    }
}

/// The parameters needed to reconstruct the url of a ciphered format.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct CipherPayload {
    /// The stream url, lacking the signature.
    pub url: Url,
    /// The scrambled signature.
    pub s: String,
    /// The name of the query parameter the signature has to be appended as.
    #[serde(default = "default_signature_parameter")]
    pub sp: String,
}

fn default_signature_parameter() -> String {
    "signature".to_owned()
}
