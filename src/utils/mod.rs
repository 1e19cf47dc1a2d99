//! Utility functions for short code handling and URL validation.
//!
//! - [`code_codec`] - Base62 encoding and decoding of link identities
//! - [`url_validator`] - Destination URL checks applied before shortening

pub mod code_codec;
pub mod url_validator;
