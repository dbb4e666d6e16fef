//! puml - Build PlantUML sequence diagrams and render them remotely
//!
//! A small library with two halves: a fluent builder that produces PlantUML
//! text, and a client that compresses and encodes that text and fetches the
//! rendered image from a PlantUML server.
//!
//! # Quick Start
//!
//! ```rust
//! use puml::diagram::start_uml;
//!
//! let text = start_uml()
//!     .title("test")
//!     .participant("test", "tst")
//!     .arrow_right("tst", "test1", "testA")
//!     .arrow_left("test1", "tst", "testB")
//!     .finish();
//!
//! let token = puml::encode_diagram(&text).unwrap();
//! assert_eq!(puml::decode_diagram(&token).unwrap(), text);
//! ```
//!
//! # Rendering
//!
//! ```rust,no_run
//! use puml::prelude::{PlantUmlClient, DEFAULT_SERVER_URL};
//!
//! let client = PlantUmlClient::new(DEFAULT_SERVER_URL)?;
//! let rendered = client.string_to_svg("@startuml\nAlice->Bob: hi\n@enduml")?;
//! println!("{} -> {} bytes", rendered.url, rendered.body.len());
//! # Ok::<(), puml::PumlError>(())
//! ```

pub mod client;
pub mod core;
pub mod diagram;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{
        Compressor, DeflateCompressor, Encoder, HttpTransport, PlantUmlClient,
        PlantUmlClientBuilder, PlantUmlEncoder, Rendered, Transport, TransportResponse,
    };
    pub use crate::core::{
        ArrowDirection, ClientConfig, PumlError, RenderKind, Result, StatusPolicy,
        DEFAULT_COMPRESSION_LEVEL, DEFAULT_SERVER_URL,
    };
    pub use crate::diagram::{start_uml, Arrow, Diagram, Participant, Skinparams, UmlBuilder};
}

/// Compress and encode diagram text into a transport token
///
/// Uses DEFLATE at [`DEFAULT_COMPRESSION_LEVEL`] and the PlantUML base64
/// alphabet, exactly as [`client::PlantUmlClient`] does before a request.
///
/// # Example
/// ```rust
/// let token = puml::encode_diagram("@startuml\nA->B\n@enduml").unwrap();
/// assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn encode_diagram(text: &str) -> Result<String> {
    use crate::client::{Compressor as _, Encoder as _};

    let compressed = client::DeflateCompressor::new().compress(text.as_bytes())?;
    Ok(client::PlantUmlEncoder.encode(&compressed))
}

/// Decode a transport token back into diagram text
///
/// Fails with [`PumlError::DecodeError`] for tokens outside the alphabet or
/// whose payload is not UTF-8.
pub fn decode_diagram(token: &str) -> Result<String> {
    let compressed = client::decode(token)?;
    let bytes = client::decompress(&compressed)?;
    String::from_utf8(bytes).map_err(|e| PumlError::decode_error(e.to_string()))
}
