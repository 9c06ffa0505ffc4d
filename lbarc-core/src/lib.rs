//! # lbarc Core
//!
//! Core components shared by the lbarc crates.
//!
//! - [`codec`]: Codec identifiers used in HQR record headers
//! - [`traits`]: Block encoder/decoder traits
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ CLI: lbarc compress / decompress / list / extract       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Container: HQR loader, writer, mutator (lbarc-hqr)      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec: Store, LZSS, LZMIT, shared decoder (lbarc-lz)    │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core: CodecId, traits, errors (this crate)              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lbarc_core::{CodecId, LbarcError};
//!
//! let codec = CodecId::from_id(2).unwrap();
//! assert_eq!(codec, CodecId::Lzmit);
//! assert_eq!(codec.length_bias(), 3);
//!
//! assert!(matches!(CodecId::from_id(9), Err(LbarcError::InvalidCodec { id: 9 })));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use codec::CodecId;
pub use error::{LbarcError, Result};
pub use traits::{BlockDecoder, BlockEncoder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::codec::CodecId;
    pub use crate::error::{LbarcError, Result};
    pub use crate::traits::{BlockDecoder, BlockEncoder};
}
