//! FRU identity core library.
//!
//! Reads manufacturing identity data (serial and part numbers, MAC
//! addresses) from a FRU EEPROM exposed as a flat byte file and turns it
//! into a complete `IdentityRecord`. The record is published as string
//! properties through a `PropertyBus` session and replaced on rescan.
//!
//! Layering:
//! - `eeprom`: field layout and the fixed-window `FieldReader`
//! - `scan`: ordered device candidates and record assembly
//! - `bus`: bus session seam, in-process bus, and the publisher
//!
//! Invariants:
//! - A scan never fails and never yields a partial record.
//! - Candidate devices after the first one that opens are never touched.
//! - A rescan removes the old interface before registering the new one.
//!
//! # Examples
//! ```no_run
//! use frudevice_core::{ScanConfig, Scanner};
//!
//! let record = Scanner::new(ScanConfig::default()).scan();
//! println!("serial: {}", record.serial_number);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod bus;
mod config;
pub mod eeprom;
mod record;
mod scan;

pub use config::{
    ConfigError, DEFAULT_DEVICE_PATHS, DEFAULT_MANUFACTURER, DEFAULT_SERVER_ID_PATH, ScanConfig,
};
pub use record::{IdentityRecord, PROPERTY_NAMES};
pub use scan::{DeviceOpener, FsOpener, Scan, Scanner, read_server_id};

/// Current scan report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Timestamp used when the clock cannot be formatted.
pub const DEFAULT_SCANNED_AT: &str = "1970-01-01T00:00:00Z";

/// JSON report describing one scan.
///
/// # Examples
/// ```
/// use frudevice_core::{IdentityRecord, Scan, make_scan_report};
///
/// let scan = Scan {
///     record: IdentityRecord::unknown("1".to_string(), "ACME".to_string()),
///     device: None,
/// };
/// let report = make_scan_report(&scan, "2024-01-01T00:00:00Z");
/// assert_eq!(report.report_version, frudevice_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp of the scan.
    pub scanned_at: String,
    /// EEPROM the record was decoded from, absent when none opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
    /// Published properties.
    pub properties: IdentityRecord,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "frudevice").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

pub fn make_scan_report(scan: &Scan, scanned_at: &str) -> ScanReport {
    ScanReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "frudevice".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        scanned_at: scanned_at.to_string(),
        device: scan.device.clone(),
        properties: scan.record.clone(),
    }
}

/// Format the current UTC time as RFC3339.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_SCANNED_AT.to_string())
}
