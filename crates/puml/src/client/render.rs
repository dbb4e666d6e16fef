//! PlantUML render client
//!
//! Compresses and encodes diagram text, composes
//! `{base}/{kind}/{token}` and fetches the result with a single blocking GET.
//! The client only holds immutable configuration and boxed strategies, so one
//! instance can be shared across threads.

use std::fs;
use std::path::Path;

use tracing::{debug, info, span, warn, Level};
use url::Url;

use super::codec::{Compressor, DeflateCompressor, Encoder, PlantUmlEncoder};
use super::transport::{HttpTransport, Transport};
use crate::core::{ClientConfig, PumlError, RenderKind, Result, StatusPolicy};

/// Outcome of a render request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The URL that was requested
    pub url: String,
    /// HTTP status returned by the service
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl Rendered {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Client for a PlantUML rendering service
pub struct PlantUmlClient {
    base_url: String,
    config: ClientConfig,
    compressor: Box<dyn Compressor>,
    encoder: Box<dyn Encoder>,
    transport: Box<dyn Transport>,
}

impl std::fmt::Debug for PlantUmlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantUmlClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PlantUmlClient {
    /// Create a client for `base_url` with the default strategies
    ///
    /// Fails with [`PumlError::InvalidUrl`] when the URL does not parse as an
    /// absolute `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Create a client with a specific configuration
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        Self::builder(base_url).config(config).build()
    }

    /// Start a builder for substituting individual strategies
    pub fn builder(base_url: &str) -> PlantUmlClientBuilder {
        PlantUmlClientBuilder::new(base_url)
    }

    /// The normalized base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Compress and encode `input` into a transport token
    pub fn compress_diagram(&self, input: &[u8]) -> Result<String> {
        let compressed = self.compressor.compress(input)?;
        let token = self.encoder.encode(&compressed);
        debug!(
            input_len = input.len(),
            compressed_len = compressed.len(),
            token_len = token.len(),
            "Encoded diagram"
        );
        Ok(token)
    }

    /// The URL [`render`](Self::render) would request for `input`
    pub fn request_url(&self, kind: RenderKind, input: &[u8]) -> Result<String> {
        let token = self.compress_diagram(input)?;
        Ok(format!("{}/{}/{}", self.base_url, kind, token))
    }

    /// Render `input` as `kind`
    ///
    /// Under [`StatusPolicy::Lenient`] the body is returned whatever the HTTP
    /// status; under [`StatusPolicy::Strict`] a non-2xx status becomes
    /// [`PumlError::HttpStatus`].
    pub fn render(&self, kind: RenderKind, input: &[u8]) -> Result<Rendered> {
        let render_span = span!(Level::INFO, "render", kind = %kind, input_len = input.len());
        let _enter = render_span.enter();

        let url = self.request_url(kind, input)?;
        debug!(url = %url, "Requesting diagram");

        let response = self.transport.get(&url)?;
        info!(status = response.status, bytes = response.body.len(), "Diagram rendered");

        if !response.is_success() {
            match self.config.status_policy {
                StatusPolicy::Lenient => {
                    warn!(status = response.status, url = %url, "Server returned a non-success status");
                }
                StatusPolicy::Strict => {
                    return Err(PumlError::HttpStatus {
                        url,
                        status: response.status,
                        body: response.body,
                    });
                }
            }
        }

        Ok(Rendered {
            url,
            status: response.status,
            body: response.body,
        })
    }

    /// Read the file at `path` and render its contents as `kind`
    pub fn render_file(&self, kind: RenderKind, path: impl AsRef<Path>) -> Result<Rendered> {
        let path = path.as_ref();
        let input = fs::read(path).map_err(|e| PumlError::file_error(path, e))?;
        debug!(path = %path.display(), bytes = input.len(), "Read diagram source");
        self.render(kind, &input)
    }

    pub fn bytes_to_svg(&self, input: &[u8]) -> Result<Rendered> {
        self.render(RenderKind::Svg, input)
    }

    pub fn string_to_svg(&self, input: &str) -> Result<Rendered> {
        self.render(RenderKind::Svg, input.as_bytes())
    }

    pub fn file_to_svg(&self, path: impl AsRef<Path>) -> Result<Rendered> {
        self.render_file(RenderKind::Svg, path)
    }

    pub fn bytes_to_png(&self, input: &[u8]) -> Result<Rendered> {
        self.render(RenderKind::Png, input)
    }

    pub fn string_to_png(&self, input: &str) -> Result<Rendered> {
        self.render(RenderKind::Png, input.as_bytes())
    }

    pub fn file_to_png(&self, path: impl AsRef<Path>) -> Result<Rendered> {
        self.render_file(RenderKind::Png, path)
    }

    pub fn bytes_to_ascii(&self, input: &[u8]) -> Result<Rendered> {
        self.render(RenderKind::Ascii, input)
    }

    pub fn string_to_ascii(&self, input: &str) -> Result<Rendered> {
        self.render(RenderKind::Ascii, input.as_bytes())
    }

    pub fn file_to_ascii(&self, path: impl AsRef<Path>) -> Result<Rendered> {
        self.render_file(RenderKind::Ascii, path)
    }
}

/// Builder for [`PlantUmlClient`]
///
/// Any strategy left unset falls back to the default: DEFLATE at the
/// configured level, the PlantUML base64 alphabet, and a `ureq` transport
/// honoring the configured timeout.
pub struct PlantUmlClientBuilder {
    base_url: String,
    config: ClientConfig,
    compressor: Option<Box<dyn Compressor>>,
    encoder: Option<Box<dyn Encoder>>,
    transport: Option<Box<dyn Transport>>,
}

impl PlantUmlClientBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            config: ClientConfig::default(),
            compressor: None,
            encoder: None,
            transport: None,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn compressor(mut self, compressor: impl Compressor + 'static) -> Self {
        self.compressor = Some(Box::new(compressor));
        self
    }

    pub fn encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Some(Box::new(encoder));
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Validate the base URL and assemble the client
    pub fn build(self) -> Result<PlantUmlClient> {
        let base_url = normalize_base_url(&self.base_url)?;
        debug!(base_url = %base_url, "Created PlantUML client");

        let config = self.config;
        let compressor = self
            .compressor
            .unwrap_or_else(|| Box::new(DeflateCompressor::with_level(config.compression_level)));
        let encoder = self.encoder.unwrap_or_else(|| Box::new(PlantUmlEncoder));
        let transport = self
            .transport
            .unwrap_or_else(|| Box::new(HttpTransport::with_timeout(config.timeout)));

        Ok(PlantUmlClient {
            base_url,
            config,
            compressor,
            encoder,
            transport,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim()).map_err(|e| PumlError::invalid_url(raw, e.to_string()))?;

    if parsed.cannot_be_a_base() {
        return Err(PumlError::invalid_url(raw, "URL cannot be used as a base"));
    }

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(PumlError::invalid_url(
                raw,
                format!("unsupported scheme '{}', expected http or https", scheme),
            ));
        }
    }

    // The token is appended as path segments, so nothing may follow the path
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(PumlError::invalid_url(
            raw,
            "URL must not carry a query string or fragment",
        ));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::TransportResponse;

    fn echo_client(base: &str) -> PlantUmlClient {
        PlantUmlClient::builder(base)
            .transport(|url: &str| -> Result<TransportResponse> {
                Ok(TransportResponse::ok(url.as_bytes().to_vec()))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://www.plantuml.com/plantuml").unwrap(),
            "https://www.plantuml.com/plantuml"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080").unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/plantuml/").unwrap(),
            "http://localhost:8080/plantuml"
        );
    }

    #[test]
    fn test_invalid_base_urls() {
        for raw in [
            "",
            "not a url",
            "plantuml.com/plantuml",
            "mailto:someone@example.com",
            "ftp://example.com",
            "http://h/plantuml?x=1",
            "http://h/plantuml?",
            "https://h/plantuml#top",
        ] {
            let err = PlantUmlClient::new(raw).unwrap_err();
            assert!(
                matches!(err, PumlError::InvalidUrl { .. }),
                "expected InvalidUrl for {:?}, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_request_url_layout() {
        let client = echo_client("http://localhost:8080/plantuml/");
        let url = client.request_url(RenderKind::Svg, b"@startuml\n@enduml").unwrap();
        let token = client.compress_diagram(b"@startuml\n@enduml").unwrap();
        assert_eq!(url, format!("http://localhost:8080/plantuml/svg/{}", token));
    }

    #[test]
    fn test_render_returns_url_and_body() {
        let client = echo_client("http://localhost:8080");
        let rendered = client.render(RenderKind::Png, b"@startuml\n@enduml").unwrap();
        assert!(rendered.url.starts_with("http://localhost:8080/png/"));
        assert_eq!(rendered.body, rendered.url.as_bytes());
        assert_eq!(rendered.status, 200);
        assert!(rendered.is_success());
    }

    #[test]
    fn test_convenience_variants_pick_kind() {
        let client = echo_client("http://localhost");
        assert!(client.string_to_svg("a").unwrap().url.starts_with("http://localhost/svg/"));
        assert!(client.bytes_to_svg(b"a").unwrap().url.starts_with("http://localhost/svg/"));
        assert!(client.string_to_png("a").unwrap().url.starts_with("http://localhost/png/"));
        assert!(client.bytes_to_png(b"a").unwrap().url.starts_with("http://localhost/png/"));
        assert!(client.string_to_ascii("a").unwrap().url.starts_with("http://localhost/ascii/"));
        assert!(client.bytes_to_ascii(b"a").unwrap().url.starts_with("http://localhost/ascii/"));
    }

    #[test]
    fn test_render_file_missing() {
        let client = echo_client("http://localhost");
        let err = client.file_to_png("/definitely/not/here.puml").unwrap_err();
        assert!(matches!(err, PumlError::FileError { .. }));
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlantUmlClient>();
    }
}
