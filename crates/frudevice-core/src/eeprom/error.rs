use thiserror::Error;

/// Errors returned while reading a window from an EEPROM stream.
///
/// # Examples
/// ```
/// use frudevice_core::eeprom::error::EepromError;
///
/// let err = EepromError::EmptyWindow { offset: 4 };
/// assert!(err.to_string().contains("empty read window"));
/// ```
#[derive(Debug, Error)]
pub enum EepromError {
    #[error("EEPROM stream unavailable")]
    Unavailable,
    #[error("empty read window at offset {offset}")]
    EmptyWindow { offset: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
