use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{FolioError, Result};

use super::{ApiRequest, ApiResponse, ApiTransport};

/// Transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| FolioError::Config(format!("invalid API base URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FolioError::Config(format!(
                "API base URL '{base_url}' cannot be used as a base"
            )));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve `path` under the base URL, keeping any path the base carries.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!(
            "{}/{}",
            self.base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}

/// Decode a raw body. Bodies that are not JSON are kept as a string so callers
/// can report them.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(status = status.as_u16(), len = bytes.len(), "received response");
        Ok(ApiResponse::new(status, decode_body(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_for_root_base() {
        let t = transport("http://localhost:3000");
        assert_eq!(
            t.url_for("/api/posts").as_str(),
            "http://localhost:3000/api/posts"
        );
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let t = transport("https://example.com/cms/");
        assert_eq!(
            t.url_for("/api/posts/42").as_str(),
            "https://example.com/cms/api/posts/42"
        );
    }

    #[test]
    fn test_url_for_keeps_escaped_segment() {
        let t = transport("http://localhost:3000");
        let url = t.url_for("/api/posts/a%2Fb%3Fc%23d");
        assert_eq!(url.as_str(), "http://localhost:3000/api/posts/a%2Fb%3Fc%23d");
        assert_eq!(url.path_segments().unwrap().count(), 3);
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpTransport::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
        assert!(HttpTransport::new("mailto:me@example.com", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b"  \n"), None);
        assert_eq!(decode_body(br#"{"id":"1"}"#), Some(json!({ "id": "1" })));
        assert_eq!(
            decode_body(b"<html>oops</html>"),
            Some(Value::String("<html>oops</html>".to_string()))
        );
    }
}
