use serde::{Deserialize, Serialize};

use crate::eeprom::layout::{UNKNOWN, UNKNOWN_MAC};

pub const SERVER_ID: &str = "SERVER_ID";
pub const PRODUCT_MANUFACTURER: &str = "PRODUCT_MANUFACTURER";
pub const PRODUCT_PART_NUMBER: &str = "PRODUCT_PART_NUMBER";
pub const PRODUCT_SERIAL_NUMBER: &str = "PRODUCT_SERIAL_NUMBER";
pub const PCA_PART_NUMBER: &str = "PCA_PART_NUMBER";
pub const PCA_SERIAL_NUMBER: &str = "PCA_SERIAL_NUMBER";
pub const MAC0: &str = "MAC0";
pub const MAC1: &str = "MAC1";

/// Published property names, in publication order.
pub const PROPERTY_NAMES: [&str; 8] = [
    SERVER_ID,
    PRODUCT_MANUFACTURER,
    PRODUCT_PART_NUMBER,
    PRODUCT_SERIAL_NUMBER,
    PCA_PART_NUMBER,
    PCA_SERIAL_NUMBER,
    MAC0,
    MAC1,
];

/// Identity fields produced by one scan.
///
/// Every field is always populated; values that could not be read hold the
/// `Unknown` sentinel (or the all-zero MAC address).
///
/// # Examples
/// ```
/// use frudevice_core::IdentityRecord;
///
/// let record = IdentityRecord::unknown("7".to_string(), "ACME".to_string());
/// assert_eq!(record.part_number, "Unknown");
/// assert_eq!(record.mac0, "00:00:00:00:00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(rename = "SERVER_ID")]
    pub server_id: String,
    #[serde(rename = "PRODUCT_MANUFACTURER")]
    pub manufacturer: String,
    #[serde(rename = "PRODUCT_PART_NUMBER")]
    pub part_number: String,
    #[serde(rename = "PRODUCT_SERIAL_NUMBER")]
    pub serial_number: String,
    #[serde(rename = "PCA_PART_NUMBER")]
    pub pca_part_number: String,
    #[serde(rename = "PCA_SERIAL_NUMBER")]
    pub pca_serial_number: String,
    #[serde(rename = "MAC0")]
    pub mac0: String,
    #[serde(rename = "MAC1")]
    pub mac1: String,
}

impl IdentityRecord {
    /// Record for a scan where no EEPROM could be opened.
    pub fn unknown(server_id: String, manufacturer: String) -> Self {
        Self {
            server_id,
            manufacturer,
            part_number: UNKNOWN.to_string(),
            serial_number: UNKNOWN.to_string(),
            pca_part_number: UNKNOWN.to_string(),
            pca_serial_number: UNKNOWN.to_string(),
            mac0: UNKNOWN_MAC.to_string(),
            mac1: UNKNOWN_MAC.to_string(),
        }
    }

    /// Name/value pairs in publication order.
    pub fn properties(&self) -> Vec<(&'static str, &str)> {
        vec![
            (SERVER_ID, self.server_id.as_str()),
            (PRODUCT_MANUFACTURER, self.manufacturer.as_str()),
            (PRODUCT_PART_NUMBER, self.part_number.as_str()),
            (PRODUCT_SERIAL_NUMBER, self.serial_number.as_str()),
            (PCA_PART_NUMBER, self.pca_part_number.as_str()),
            (PCA_SERIAL_NUMBER, self.pca_serial_number.as_str()),
            (MAC0, self.mac0.as_str()),
            (MAC1, self.mac1.as_str()),
        ]
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}
