use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::descrambler::{Decipher, VideoDescrambler};
use crate::error::BoxError;
use crate::{Error, FetchConfig, Id, IdBuf, VideoInfo};

/// Performs the GET requests of a [`VideoFetcher`].
///
/// Implementations must only return a body for a `200 OK` response, and an error for everything
/// else. They must not retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Bytes, BoxError>;
}

/// The default [`Transport`], backed by a [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client with the timeouts and headers of `config`, and the consent cookie
    /// YouTube asks for.
    /// ### Errors
    /// When [`reqwest`] fails to initialize a new [`Client`].
    pub fn from_config(config: &FetchConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .default_headers(recommended_headers(config))
            .cookie_provider(Arc::new(recommended_cookies()))
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .pool_idle_timeout(config.pool_idle_timeout())
            .tcp_keepalive(config.tcp_keepalive())
            .build()
            .map_err(|e| Error::Fetch(e.into()))?;

        Ok(Self::from_client(client))
    }

    /// Wraps an existing [`Client`]. There are no special constraints on what it has to look like.
    #[inline]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Bytes, BoxError> {
        let response = self.client
            .get(url.as_str())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.bytes().await?),
            status => Err(format!("GET {} returned {}", url, status).into()),
        }
    }
}

/// A fetcher used to download the video info from YouTube, which then could be used to extract
/// the stream urls.
///
/// You will probably rarely use this type directly, and use [`Video`] instead.
///
/// # Example
///```no_run
///# use ytinfo::VideoFetcher;
/// let fetcher = VideoFetcher::from_raw("https://youtu.be/dQw4w9WgXcQ").unwrap();
/// assert_eq!(fetcher.video_id().as_str(), "dQw4w9WgXcQ");
/// ```
/// # How it works
/// All we need is the video's [`Id`]. With it, exactly one request goes to
/// `https://www.youtube.com/get_video_info`, which answers with a query string. Besides a
/// `status`, this query string carries a `player_response`: a JSON document that tells whether
/// the video is playable, its title and author, and the list of its formats.
///
/// `fetch` only requests and decodes this response. Turning the formats into urls is left to
/// [`VideoDescrambler`].
///
/// [`Video`]: crate::Video
#[derive(Clone, derive_more::Display, derivative::Derivative)]
#[display(fmt = "VideoFetcher({})", video_id)]
#[derivative(Debug)]
pub struct VideoFetcher {
    video_id: IdBuf,
    video_info_url: Url,
    #[derivative(Debug = "ignore")]
    transport: Arc<dyn Transport>,
    #[derivative(Debug = "ignore")]
    decipher: Option<Arc<dyn Decipher>>,
}

impl VideoFetcher {
    /// Constructs a [`VideoFetcher`] from an arbitrary video identifier, like an url.
    /// ### Errors
    /// - When [`Id::from_raw`] fails to extract the video's id.
    /// - When [`reqwest`] fails to initialize a new [`Client`].
    #[inline]
    pub fn from_raw(raw: &str) -> crate::Result<Self> {
        let id = Id::from_raw(raw)?
            .into_owned();
        Self::from_id(id)
    }

    /// Constructs a [`VideoFetcher`] from an `Id`, using an [`HttpTransport`] with the default
    /// [`FetchConfig`].
    /// ### Errors
    /// When [`reqwest`] fails to initialize a new [`Client`].
    #[inline]
    pub fn from_id(video_id: IdBuf) -> crate::Result<Self> {
        let transport = HttpTransport::from_config(&FetchConfig::default())?;
        Ok(Self::from_id_with_transport(video_id, Arc::new(transport)))
    }

    /// Constructs a [`VideoFetcher`] from an [`Id`] and an existing [`Transport`].
    #[inline]
    pub fn from_id_with_transport(video_id: IdBuf, transport: Arc<dyn Transport>) -> Self {
        Self {
            video_info_url: video_info_url(video_id.as_borrowed()),
            video_id,
            transport,
            decipher: None,
        }
    }

    /// Sets the [`Decipher`] used for formats without a direct url.
    #[inline]
    #[must_use]
    pub fn with_decipher(mut self, decipher: Arc<dyn Decipher>) -> Self {
        self.decipher = Some(decipher);
        self
    }

    /// Fetches and decodes the video info.
    ///
    /// ### Errors
    /// - When the request fails, or YouTube answers with anything but `200 OK`.
    /// - When decoding the response fails (see [`VideoInfo::from_envelope`]).
    #[log_derive::logfn(ok = "Trace", err = "Error")]
    #[log_derive::logfn_inputs(Trace)]
    pub async fn fetch(self) -> crate::Result<VideoDescrambler> {
        let raw = self.fetch_raw().await?;
        let video_info = VideoInfo::from_envelope(&raw)?;

        Ok(VideoDescrambler {
            video_id: self.video_id,
            video_info,
            decipher: self.decipher,
        })
    }

    /// Fetches the raw, undecoded video info.
    /// ### Errors
    /// - When the request fails, or YouTube answers with anything but `200 OK`.
    /// - When the body is not valid utf-8.
    #[log_derive::logfn(ok = "Trace", err = "Error", fmt = "fetch_raw() => `{:?}`")]
    pub async fn fetch_raw(&self) -> crate::Result<String> {
        let body = self.get(&self.video_info_url).await?;

        String::from_utf8(body.to_vec())
            .map_err(|_| Error::MalformedEnvelope("the response body is not valid utf-8".into()))
    }

    /// Fetches the player JavaScript, from which a [`Cipher`](crate::descrambler::Cipher) can be
    /// built. This costs two extra requests: the embed page, and the script itself.
    /// ### Errors
    /// - When one of the requests fails.
    /// - When the embed page does not reference a player script.
    pub async fn fetch_player_js(&self) -> crate::Result<String> {
        let embed_html = self.get(&self.video_id.embed_url()).await?;
        let embed_html = String::from_utf8_lossy(&embed_html);
        let js_url = player_js_url(&embed_html)?;
        log::debug!("player JavaScript: {}", js_url);

        let js = self.get(&js_url).await?;
        Ok(String::from_utf8_lossy(&js).into_owned())
    }

    /// The id of the video.
    #[inline]
    pub fn video_id(&self) -> Id<'_> {
        self.video_id.as_borrowed()
    }

    /// The url, under which the video info is requested.
    #[inline]
    pub fn video_info_url(&self) -> &Url {
        &self.video_info_url
    }

    #[inline]
    async fn get(&self, url: &Url) -> crate::Result<Bytes> {
        log::trace!("GET {}", url);
        self.transport
            .get(url)
            .await
            .map_err(Error::Fetch)
    }
}

/// Generates the url under which the video info of a video can be requested.
pub fn video_info_url(video_id: Id<'_>) -> Url {
    let eurl = format!("https://youtube.googleapis.com/v/{}", video_id.as_str());
    let params: &[(&str, &str)] = &[
        ("video_id", video_id.as_str()),
        ("eurl", eurl.as_str()),
        ("html5", "1"),
        ("c", "TVHTML5"),
        ("cver", "7.20211231"),
    ];

    Url::parse_with_params("https://www.youtube.com/get_video_info", params)
        .expect("the base url is valid")
}

/// Extracts the url of the player JavaScript from a watch or embed page.
fn player_js_url(html: &str) -> crate::Result<Url> {
    static JS_URL_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| [
        Regex::new(r#""jsUrl"\s*:\s*"([^"]+)""#).unwrap(),
        Regex::new(r"(/s/player/[\w\d]+/[\w\d_/.]+/base\.js)").unwrap(),
    ]);

    let path = JS_URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(html))
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::Cipher(
            "could not extract the player JavaScript url from the embed page".into()
        ))?
        .as_str();

    Ok(Url::parse("https://www.youtube.com")?.join(path)?)
}

/// The consent cookie, without which YouTube may answer with a consent page.
pub fn recommended_cookies() -> reqwest::cookie::Jar {
    static URL: Lazy<Url> = Lazy::new(|| "https://youtube.com".parse().unwrap());
    let cookie = "CONSENT=YES+; Path=/; Domain=youtube.com; Secure; Expires=Fri, 01 Jan 2038 00:00:00 GMT;";

    let jar = reqwest::cookie::Jar::default();
    jar.add_cookie_str(cookie, &URL);
    jar
}

pub fn recommended_headers(config: &FetchConfig) -> reqwest::header::HeaderMap {
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};

    let mut headers = HeaderMap::new();
    let mut insert = |name: HeaderName, value: &str| match HeaderValue::from_str(value) {
        Ok(value) => { headers.insert(name, value); }
        Err(_) => log::warn!("ignoring invalid {} header `{}`", name, value),
    };

    insert(ACCEPT_LANGUAGE, &config.accept_language);
    insert(USER_AGENT, &config.user_agent);

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_info_url_embeds_the_id_twice() {
        let id = Id::from_str("dQw4w9WgXcQ").unwrap();
        let url = video_info_url(id);

        assert_eq!(url.host_str(), Some("www.youtube.com"));
        assert_eq!(url.path(), "/get_video_info");

        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
        assert!(pairs.contains(&("video_id".to_owned(), "dQw4w9WgXcQ".to_owned())));
        assert!(pairs.contains(&("eurl".to_owned(), "https://youtube.googleapis.com/v/dQw4w9WgXcQ".to_owned())));
    }

    #[test]
    fn player_js_url_from_embed_page() {
        let html = r#"<script>ytcfg.set({"PLAYER_JS_URL":"x","jsUrl":"/s/player/4fbb4d5b/player_ias.vflset/en_US/base.js"});</script>"#;
        assert_eq!(
            player_js_url(html).unwrap().as_str(),
            "https://www.youtube.com/s/player/4fbb4d5b/player_ias.vflset/en_US/base.js"
        );

        let html = r#"<script src="/s/player/4fbb4d5b/player_ias.vflset/en_US/base.js"></script>"#;
        assert!(player_js_url(html).unwrap().path().ends_with("base.js"));

        assert!(matches!(player_js_url("<html></html>"), Err(Error::Cipher(_))));
    }

    #[test]
    fn headers_follow_the_config() {
        let mut config = FetchConfig::default();
        config.user_agent = "ytinfo-test".to_owned();
        let headers = recommended_headers(&config);

        assert_eq!(headers[reqwest::header::USER_AGENT], "ytinfo-test");
        assert_eq!(headers[reqwest::header::ACCEPT_LANGUAGE], "en-US,en");
    }

    #[test]
    fn transport_builds_from_the_default_config() {
        assert!(HttpTransport::from_config(&FetchConfig::default()).is_ok());
    }
}
