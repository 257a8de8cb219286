//! EEPROM field decoding.
//!
//! Follows the same split as the rest of the crate's byte decoders:
//! - `layout`: field offsets and sizes (source of truth)
//! - `reader`: seek/read of fixed windows and string rendering
//! - `error`: explicit read errors, which never leave the reader
//!
//! Every read substitutes a sentinel when the stream cannot deliver, so a
//! caller always gets a complete value back.

pub mod error;
pub mod layout;
pub mod reader;

pub use reader::{FieldReader, format_mac};
