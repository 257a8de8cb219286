//! Device location and identity scanning.
//!
//! A scan tries each configured EEPROM path in order, decodes every field
//! from the first one that opens, and stops. Paths after the first success
//! are never opened. The server id and manufacturer are resolved on their
//! own and do not depend on any EEPROM opening.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::eeprom::FieldReader;
use crate::eeprom::layout::{self, UNKNOWN};
use crate::record::IdentityRecord;

/// Opens EEPROM candidates by path.
pub trait DeviceOpener {
    type Stream: Read + Seek;

    fn open(&self, path: &Path) -> io::Result<Self::Stream>;
}

/// Opens candidates from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

impl DeviceOpener for FsOpener {
    type Stream = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }
}

/// Outcome of one scan: the record and the EEPROM it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub record: IdentityRecord,
    pub device: Option<PathBuf>,
}

pub struct Scanner<O = FsOpener> {
    config: ScanConfig,
    opener: O,
}

impl Scanner<FsOpener> {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_opener(config, FsOpener)
    }
}

impl<O: DeviceOpener> Scanner<O> {
    pub fn with_opener(config: ScanConfig, opener: O) -> Self {
        Self { config, opener }
    }

    pub fn scan(&self) -> IdentityRecord {
        self.scan_detailed().record
    }

    pub fn scan_detailed(&self) -> Scan {
        let server_id = read_server_id(&self.config.server_id_path);
        let manufacturer = self.config.manufacturer.clone();

        match self.open_first() {
            Some((device, stream)) => {
                info!(device = %device.display(), "reading FRU EEPROM");
                let mut reader = FieldReader::new(stream);
                let record = IdentityRecord {
                    server_id,
                    manufacturer,
                    part_number: reader.read_range(layout::PART_NUMBER_RANGE),
                    serial_number: reader.read_range(layout::SERIAL_NUMBER_RANGE),
                    pca_part_number: reader.read_range(layout::PCA_PART_NUMBER_RANGE),
                    pca_serial_number: reader.read_range(layout::PCA_SERIAL_NUMBER_RANGE),
                    mac0: reader.read_mac(layout::MAC0_OFFSET),
                    mac1: reader.read_mac(layout::MAC1_OFFSET),
                };
                Scan {
                    record,
                    device: Some(device),
                }
            }
            None => {
                info!("no FRU EEPROM could be opened");
                Scan {
                    record: IdentityRecord::unknown(server_id, manufacturer),
                    device: None,
                }
            }
        }
    }

    fn open_first(&self) -> Option<(PathBuf, O::Stream)> {
        for path in &self.config.device_paths {
            match self.opener.open(path) {
                Ok(stream) => return Some((path.clone(), stream)),
                Err(err) => {
                    debug!(device = %path.display(), error = %err, "EEPROM candidate unavailable");
                }
            }
        }
        None
    }
}

/// Read the first line of `path`, or `Unknown` when it cannot be read.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use frudevice_core::read_server_id;
///
/// assert_eq!(read_server_id(Path::new("/nonexistent/server_id")), "Unknown");
/// ```
pub fn read_server_id(path: &Path) -> String {
    let result = File::open(path).and_then(|file| {
        let mut line = String::new();
        BufReader::new(file).read_line(&mut line)?;
        Ok(line)
    });
    match result {
        Ok(mut line) => {
            if line.ends_with('\n') {
                line.pop();
            }
            line
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "server id unavailable");
            UNKNOWN.to_string()
        }
    }
}
