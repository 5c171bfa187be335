use crate::video_info::player_response::streaming_data::CipherPayload;
use crate::{Error, Result};

/// Decodes the query string of a `signatureCipher` (or legacy `cipher`) field.
pub(crate) fn parse(raw: &str) -> Result<CipherPayload> {
    serde_qs::from_str::<CipherPayload>(raw)
        .map_err(|e| Error::Cipher(format!(
            "`{}` is not a valid signature cipher: {}", raw, e
        ).into()))
}

#[cfg(test)]
mod tests {
    use crate::video_info::player_response::streaming_data::RawFormat;
    use crate::Error;

    #[test]
    fn decodes_the_query_string() {
        let format: RawFormat = serde_json::from_str(r#"{
            "itag": 22,
            "mimeType": "video/mp4",
            "signatureCipher": "s=ABCDEFGHIJ%3D&sp=sig&url=https%3A%2F%2Fr1.example.com%2Fvideoplayback%3Fitag%3D22%26id%3Dxyz"
        }"#).unwrap();

        assert_eq!(format.direct_url(), None);
        let cipher = format.cipher_payload().unwrap().unwrap();
        assert_eq!(cipher.s, "ABCDEFGHIJ=");
        assert_eq!(cipher.sp, "sig");
        assert_eq!(cipher.url.as_str(), "https://r1.example.com/videoplayback?itag=22&id=xyz");
    }

    #[test]
    fn legacy_field_name_and_default_parameter() {
        let format: RawFormat = serde_json::from_str(r#"{
            "mimeType": "video/mp4",
            "cipher": "s=XYZ&url=https%3A%2F%2Fr2.example.com%2Fvideoplayback"
        }"#).unwrap();

        let cipher = format.cipher_payload().unwrap().unwrap();
        assert_eq!(cipher.sp, "signature");
    }

    #[test]
    fn missing_or_empty_cipher() {
        let format: RawFormat = serde_json::from_str(r#"{"mimeType":"video/mp4","url":"https://a.example.com/v"}"#).unwrap();
        assert_eq!(format.cipher_payload().unwrap(), None);
        assert_eq!(format.direct_url(), Some("https://a.example.com/v"));

        let format: RawFormat = serde_json::from_str(r#"{"mimeType":"video/mp4","url":"","signatureCipher":""}"#).unwrap();
        assert_eq!(format.cipher_payload().unwrap(), None);
        assert_eq!(format.direct_url(), None);
    }

    #[test]
    fn invalid_cipher_is_a_cipher_error() {
        let format: RawFormat = serde_json::from_str(r#"{"mimeType":"video/mp4","signatureCipher":"sp=sig"}"#).unwrap();
        assert!(matches!(format.cipher_payload(), Err(Error::Cipher(_))));
    }
}
