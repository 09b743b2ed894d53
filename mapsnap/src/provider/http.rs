//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use super::types::ProviderError;

/// Client identifier sent with every tile request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("mapsnap/", env!("CARGO_PKG_VERSION"));

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs a blocking HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The full response body as bytes, or an error for transport failures
    /// and non-2xx statuses.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient sending [`DEFAULT_USER_AGENT`].
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_options(DEFAULT_USER_AGENT, None)
    }

    /// Creates a client with a custom identifier and optional timeout.
    ///
    /// With `timeout` set to `None` the reqwest default applies.
    pub fn with_options(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| ProviderError::HttpError(format!("Invalid user agent: {}", e)))?;
        headers.insert(USER_AGENT, agent);

        let mut builder = reqwest::blocking::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(ProviderError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        // Read response body
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};
    use parking_lot::Mutex;

    /// HTTP client replaying a script of responses and recording URLs.
    ///
    /// Once the script is exhausted the fallback response is returned.
    pub struct ScriptedHttpClient {
        script: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
        fallback: Result<Vec<u8>, ProviderError>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedHttpClient {
        pub fn new(
            script: Vec<Result<Vec<u8>, ProviderError>>,
            fallback: Result<Vec<u8>, ProviderError>,
        ) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Every URL requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().push(url.to_string());
            self.script
                .lock()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }

    /// Encodes a solid-colour PNG of the given size.
    pub fn png_bytes(width: u32, height: u32, colour: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba(colour));
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .expect("PNG encoding of a test image");
        out.into_inner()
    }

    #[test]
    fn test_scripted_client_replays_then_falls_back() {
        let client = ScriptedHttpClient::new(
            vec![Err(ProviderError::HttpError("boom".to_string())), Ok(vec![7])],
            Ok(vec![9]),
        );

        assert!(client.get("a").is_err());
        assert_eq!(client.get("b").unwrap(), vec![7]);
        assert_eq!(client.get("c").unwrap(), vec![9]);
        assert_eq!(client.requests(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_default_user_agent_is_descriptive() {
        assert!(DEFAULT_USER_AGENT.starts_with("mapsnap/"));
        assert!(ReqwestClient::with_options(DEFAULT_USER_AGENT, None).is_ok());
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let result = ReqwestClient::with_options("bad\nagent", None);
        assert!(matches!(result, Err(ProviderError::HttpError(_))));
    }
}
