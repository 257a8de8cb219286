use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, warn};

use super::error::EepromError;
use super::layout;

/// Fixed-window reader over an EEPROM byte stream.
///
/// The reader owns an optional stream: `None` models a device that could not
/// be opened, in which case every text field reads as the `Unknown` sentinel
/// and every MAC address reads as all-zero bytes.
pub struct FieldReader<R> {
    stream: Option<R>,
}

impl<R: Read + Seek> FieldReader<R> {
    pub fn new(stream: R) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn unavailable() -> Self {
        Self { stream: None }
    }

    pub fn is_available(&self) -> bool {
        self.stream.is_some()
    }

    /// Read `length` bytes starting at `offset`.
    ///
    /// Reading past the end of the stream is not an error: the returned
    /// buffer always has `length` bytes and the part that could not be read
    /// is left as zero bytes.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    ///
    /// use frudevice_core::eeprom::FieldReader;
    ///
    /// let mut reader = FieldReader::new(Cursor::new(b"abc".to_vec()));
    /// assert_eq!(reader.read_window(1, 4)?, b"bc\0\0");
    /// # Ok::<(), frudevice_core::eeprom::error::EepromError>(())
    /// ```
    ///
    /// # Errors
    /// Returns `EepromError` when the stream is unavailable, the window is
    /// empty, or the stream fails to seek or read.
    pub fn read_window(&mut self, offset: usize, length: usize) -> Result<Vec<u8>, EepromError> {
        if length == 0 {
            return Err(EepromError::EmptyWindow { offset });
        }
        let stream = self.stream.as_mut().ok_or(EepromError::Unavailable)?;
        stream.seek(SeekFrom::Start(offset as u64))?;

        let mut buf = Vec::with_capacity(length);
        stream.by_ref().take(length as u64).read_to_end(&mut buf)?;
        if buf.len() < length {
            debug!(offset, length, read = buf.len(), "short EEPROM read");
        }
        buf.resize(length, 0);
        Ok(buf)
    }

    /// Read a text field, falling back to `Unknown` when the stream cannot
    /// deliver.
    pub fn read_field(&mut self, offset: usize, length: usize) -> String {
        match self.read_window(offset, length) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(EepromError::Unavailable) => layout::UNKNOWN.to_string(),
            Err(err) => {
                warn!(offset, length, error = %err, "EEPROM field read failed");
                layout::UNKNOWN.to_string()
            }
        }
    }

    pub fn read_range(&mut self, range: std::ops::Range<usize>) -> String {
        self.read_field(range.start, range.len())
    }

    /// Read a 6-byte MAC address at `offset`; unreadable bytes render as zero.
    pub fn read_mac(&mut self, offset: usize) -> String {
        let mut octets = [0u8; layout::MAC_ADDRESS_SIZE];
        match self.read_window(offset, layout::MAC_ADDRESS_SIZE) {
            Ok(bytes) => octets.copy_from_slice(&bytes),
            Err(EepromError::Unavailable) => {}
            Err(err) => warn!(offset, error = %err, "EEPROM MAC read failed"),
        }
        format_mac(&octets)
    }
}

/// Render MAC octets as lowercase, colon-separated hex pairs.
///
/// # Examples
/// ```
/// use frudevice_core::eeprom::format_mac;
///
/// let mac = format_mac(&[0x0a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f]);
/// assert_eq!(mac, "0a:1b:2c:3d:4e:5f");
/// ```
pub fn format_mac(octets: &[u8; layout::MAC_ADDRESS_SIZE]) -> String {
    octets
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::{FieldReader, format_mac};
    use crate::eeprom::error::EepromError;
    use crate::eeprom::layout;
    use std::io::{self, Cursor, Read, Seek, SeekFrom};

    fn is_mac_shaped(value: &str) -> bool {
        let groups: Vec<_> = value.split(':').collect();
        groups.len() == 6
            && groups
                .iter()
                .all(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_hexdigit()))
    }

    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("bus timeout"))
        }
    }

    impl Seek for BrokenStream {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn read_field_returns_exact_window() {
        let mut blob = vec![0u8; 200];
        blob[layout::PART_NUMBER_RANGE].copy_from_slice(b"ABC1234567890123");
        let mut reader = FieldReader::new(Cursor::new(blob));

        let part = reader.read_range(layout::PART_NUMBER_RANGE);
        assert_eq!(part, "ABC1234567890123");
        assert_eq!(reader.read_field(110, 3), "BC1");
    }

    #[test]
    fn read_field_short_read_pads_with_zero() {
        let mut reader = FieldReader::new(Cursor::new(b"xSN01".to_vec()));
        let serial = reader.read_range(layout::SERIAL_NUMBER_RANGE);
        assert_eq!(serial.len(), 16);
        assert!(serial.starts_with("SN01"));
        assert!(serial[4..].chars().all(|c| c == '\0'));
    }

    #[test]
    fn read_field_past_end_is_all_zero() {
        let mut reader = FieldReader::new(Cursor::new(vec![b'A'; 8]));
        assert_eq!(reader.read_field(100, 4), "\0\0\0\0");
    }

    #[test]
    fn short_read_does_not_poison_later_fields() {
        let mut blob = vec![b'Z'; 20];
        blob[1..5].copy_from_slice(b"SN01");
        let mut reader = FieldReader::new(Cursor::new(blob));

        let _ = reader.read_range(layout::PART_NUMBER_RANGE);
        assert_eq!(reader.read_field(1, 4), "SN01");
    }

    #[test]
    fn read_field_unavailable_is_unknown() {
        let mut reader = FieldReader::<Cursor<Vec<u8>>>::unavailable();
        assert!(!reader.is_available());
        assert_eq!(
            reader.read_range(layout::PART_NUMBER_RANGE),
            layout::UNKNOWN
        );
    }

    #[test]
    fn read_field_io_error_is_unknown() {
        let mut reader = FieldReader::new(BrokenStream);
        assert_eq!(reader.read_field(0, 4), layout::UNKNOWN);
        let err = reader.read_window(0, 4).unwrap_err();
        assert!(matches!(err, EepromError::Io(_)));
    }

    #[test]
    fn read_window_rejects_empty_window() {
        let mut reader = FieldReader::new(Cursor::new(vec![1, 2, 3]));
        let err = reader.read_window(1, 0).unwrap_err();
        assert!(matches!(err, EepromError::EmptyWindow { offset: 1 }));
    }

    #[test]
    fn read_mac_formats_octets() {
        let mut blob = vec![0u8; 200];
        blob[layout::MAC0_OFFSET..layout::MAC0_OFFSET + 6]
            .copy_from_slice(&[0x0A, 0x1B, 0x2C, 0x3D, 0x4E, 0x5F]);
        let mut reader = FieldReader::new(Cursor::new(blob));
        assert_eq!(reader.read_mac(layout::MAC0_OFFSET), "0a:1b:2c:3d:4e:5f");
    }

    #[test]
    fn read_mac_high_bytes_are_two_digits() {
        let mut reader = FieldReader::new(Cursor::new(vec![0xff, 0x80, 0xfe, 0x00, 0x7f, 0x90]));
        assert_eq!(reader.read_mac(0), "ff:80:fe:00:7f:90");
    }

    #[test]
    fn read_mac_unreadable_sources_are_zero() {
        let mut unavailable = FieldReader::<Cursor<Vec<u8>>>::unavailable();
        assert_eq!(
            unavailable.read_mac(layout::MAC0_OFFSET),
            layout::UNKNOWN_MAC
        );

        let mut broken = FieldReader::new(BrokenStream);
        assert_eq!(broken.read_mac(layout::MAC1_OFFSET), layout::UNKNOWN_MAC);

        let mut short = FieldReader::new(Cursor::new(vec![0xaa; 134]));
        let mac = short.read_mac(layout::MAC0_OFFSET);
        assert_eq!(mac, "aa:aa:00:00:00:00");
        assert!(is_mac_shaped(&mac));
    }

    #[test]
    fn format_mac_zero() {
        assert_eq!(format_mac(&[0; 6]), layout::UNKNOWN_MAC);
    }
}
