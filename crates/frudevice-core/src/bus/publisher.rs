use tracing::{info, warn};

use super::error::BusError;
use super::{
    FRU_INTERFACE, FRU_OBJECT_PATH, InterfaceHandle, MANAGER_INTERFACE, MANAGER_OBJECT_PATH,
    PropertyBus, RESCAN_METHOD, SERVICE_NAME,
};
use crate::record::IdentityRecord;
use crate::scan::{DeviceOpener, FsOpener, Scanner};

struct Published {
    handle: InterfaceHandle,
    record: IdentityRecord,
}

/// Publishes the identity record on a bus session and replaces it on rescan.
///
/// Rescans take `&mut self`, so they run one at a time, and the old
/// interface is gone before the new one is registered. If the new interface
/// cannot be registered, the previous record is put back on the bus.
pub struct FruPublisher<B, O = FsOpener> {
    bus: B,
    scanner: Scanner<O>,
    manager: Option<InterfaceHandle>,
    published: Option<Published>,
}

impl<B: PropertyBus, O: DeviceOpener> FruPublisher<B, O> {
    pub fn new(bus: B, scanner: Scanner<O>) -> Self {
        Self {
            bus,
            scanner,
            manager: None,
            published: None,
        }
    }

    /// Claim the service name, register the manager interface and publish
    /// the initial scan.
    ///
    /// # Errors
    /// Returns `BusError` when the name is taken or an interface cannot be
    /// registered.
    pub fn start(&mut self) -> Result<&IdentityRecord, BusError> {
        self.bus.request_name(SERVICE_NAME)?;
        let manager = self
            .bus
            .add_interface(MANAGER_OBJECT_PATH, MANAGER_INTERFACE, &[])?;
        self.manager = Some(manager);
        self.rescan()
    }

    /// Replace the published record with a fresh scan.
    ///
    /// # Errors
    /// Returns `BusError` when the previous interface cannot be removed or the
    /// new one cannot be registered. In both cases the previous record stays
    /// published when the bus allows it.
    pub fn rescan(&mut self) -> Result<&IdentityRecord, BusError> {
        let record = self.scanner.scan();
        let previous = self.unpublish()?;
        let handle = match add_fru_interface(&mut self.bus, &record) {
            Ok(handle) => handle,
            Err(err) => {
                if let Some(previous) = previous {
                    self.restore(previous);
                }
                return Err(err);
            }
        };
        info!(
            part_number = %record.part_number,
            serial_number = %record.serial_number,
            "FRU record published"
        );
        let published = self.published.insert(Published { handle, record });
        Ok(&published.record)
    }

    fn unpublish(&mut self) -> Result<Option<IdentityRecord>, BusError> {
        let Some(previous) = self.published.take() else {
            return Ok(None);
        };
        if let Err(err) = self.bus.remove_interface(&previous.handle) {
            self.published = Some(previous);
            return Err(err);
        }
        Ok(Some(previous.record))
    }

    fn restore(&mut self, record: IdentityRecord) {
        match add_fru_interface(&mut self.bus, &record) {
            Ok(handle) => self.published = Some(Published { handle, record }),
            Err(err) => warn!(error = %err, "previous FRU record could not be restored"),
        }
    }

    /// Dispatch a method call addressed to the manager interface.
    ///
    /// # Errors
    /// Returns `BusError::UnknownMethod` for anything other than `ReScan` on
    /// the manager interface, or the error from the rescan itself.
    pub fn call_method(&mut self, interface: &str, method: &str) -> Result<(), BusError> {
        if interface == MANAGER_INTERFACE && method == RESCAN_METHOD {
            self.rescan()?;
            return Ok(());
        }
        Err(BusError::UnknownMethod {
            interface: interface.to_string(),
            method: method.to_string(),
        })
    }

    pub fn current(&self) -> Option<&IdentityRecord> {
        self.published.as_ref().map(|published| &published.record)
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

}

fn add_fru_interface<B: PropertyBus>(
    bus: &mut B,
    record: &IdentityRecord,
) -> Result<InterfaceHandle, BusError> {
    bus.add_interface(FRU_OBJECT_PATH, FRU_INTERFACE, &record.properties())
}
