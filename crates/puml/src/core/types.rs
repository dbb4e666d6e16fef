//! Core type definitions
//!
//! Render kinds, arrow directions and the client configuration shared by
//! the diagram model and the render client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::PumlError;

/// Public PlantUML server used when no other URL is configured
pub const DEFAULT_SERVER_URL: &str = "https://www.plantuml.com/plantuml";

/// DEFLATE level applied to diagram text before encoding
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 7;

/// Output format requested from the rendering service
///
/// The lowercase token is used both as the request path segment and as the
/// output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderKind {
    /// Vector image
    Svg,
    /// Raster image
    #[default]
    Png,
    /// Text-art rendering
    Ascii,
}

impl RenderKind {
    /// Every supported render kind
    pub const ALL: [RenderKind; 3] = [RenderKind::Svg, RenderKind::Png, RenderKind::Ascii];

    /// The path token for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderKind::Svg => "svg",
            RenderKind::Png => "png",
            RenderKind::Ascii => "ascii",
        }
    }

    /// File extension used when the rendered bytes are saved
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Short human readable description
    pub fn description(&self) -> &'static str {
        match self {
            RenderKind::Svg => "Scalable vector graphics image",
            RenderKind::Png => "Raster PNG image",
            RenderKind::Ascii => "Plain-text ASCII art",
        }
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderKind {
    type Err = PumlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(RenderKind::Svg),
            "png" => Ok(RenderKind::Png),
            "ascii" => Ok(RenderKind::Ascii),
            _ => Err(PumlError::UnknownRenderKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// Direction of a message arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrowDirection {
    /// `from->to`
    #[default]
    Forward,
    /// `from<-to`
    Reverse,
}

impl ArrowDirection {
    /// The arrow glyph written between the two references
    pub fn glyph(&self) -> &'static str {
        match self {
            ArrowDirection::Forward => "->",
            ArrowDirection::Reverse => "<-",
        }
    }
}

/// How the client treats a non-2xx response from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Return the body whatever the status; a warning is logged
    #[default]
    Lenient,
    /// Turn any non-2xx status into [`PumlError::HttpStatus`]
    Strict,
}

/// Configuration for a render client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// DEFLATE level, 0 (store) to 9 (best)
    pub compression_level: u32,
    pub status_policy: StatusPolicy,
    /// Caller-imposed deadline for the whole request; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            status_policy: StatusPolicy::default(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression level; values above 9 are clamped
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
