//! Transport codec and render client for a PlantUML server
//!
//! The pipeline is: diagram text → [`Compressor`] → [`Encoder`] →
//! `{base}/{kind}/{token}` → [`Transport`]. Each stage is a trait object
//! injected through [`PlantUmlClientBuilder`].

pub mod codec;
mod render;
pub mod transport;

pub use codec::{
    decode, decompress, decompress_with_limit, Compressor, DeflateCompressor, Encoder,
    PlantUmlEncoder, MAX_DECODED_SIZE,
};
pub use render::*;
pub use transport::{HttpTransport, Transport, TransportResponse};
