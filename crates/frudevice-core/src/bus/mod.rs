//! Property bus seam.
//!
//! The identity record is published as string properties on one interface
//! of one object. The bus session is an explicit value handed to the
//! publisher; `MemoryBus` is the in-process implementation.

pub mod error;
pub mod memory;
pub mod publisher;

pub use error::BusError;
pub use memory::MemoryBus;
pub use publisher::FruPublisher;

pub const SERVICE_NAME: &str = "xyz.openbmc_project.GxpFruDevice";
pub const FRU_OBJECT_PATH: &str = "/xyz/openbmc_project/FruDevice/HPE";
pub const FRU_INTERFACE: &str = "xyz.openbmc_project.FruDevice";
pub const MANAGER_OBJECT_PATH: &str = "/xyz/openbmc_project/FruDevice";
pub const MANAGER_INTERFACE: &str = "xyz.openbmc_project.FruDeviceManager";
pub const RESCAN_METHOD: &str = "ReScan";

/// Token for an interface registered on a bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceHandle {
    pub(crate) id: u64,
    pub(crate) path: String,
    pub(crate) interface: String,
}

impl InterfaceHandle {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }
}

/// A session on a property bus.
pub trait PropertyBus {
    fn request_name(&mut self, name: &str) -> Result<(), BusError>;

    /// Register `interface` on `path` with a fixed set of string properties.
    fn add_interface(
        &mut self,
        path: &str,
        interface: &str,
        properties: &[(&str, &str)],
    ) -> Result<InterfaceHandle, BusError>;

    fn remove_interface(&mut self, handle: &InterfaceHandle) -> Result<(), BusError>;
}
