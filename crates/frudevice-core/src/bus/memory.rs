use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::error::BusError;
use super::{InterfaceHandle, PropertyBus};

#[derive(Debug)]
struct Registered {
    id: u64,
    properties: Vec<(String, String)>,
}

/// In-process property bus.
///
/// Objects are keyed by `(path, interface)`; properties keep registration
/// order.
///
/// # Examples
/// ```
/// use frudevice_core::bus::{MemoryBus, PropertyBus};
///
/// let mut bus = MemoryBus::new();
/// bus.add_interface("/obj", "org.example.Iface", &[("NAME", "value")])?;
/// assert_eq!(bus.property("/obj", "org.example.Iface", "NAME"), Some("value"));
/// # Ok::<(), frudevice_core::bus::BusError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryBus {
    names: BTreeSet<String>,
    objects: BTreeMap<(String, String), Registered>,
    next_id: u64,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owns_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn properties(&self, path: &str, interface: &str) -> Option<&[(String, String)]> {
        self.objects
            .get(&(path.to_string(), interface.to_string()))
            .map(|entry| entry.properties.as_slice())
    }

    pub fn property(&self, path: &str, interface: &str, name: &str) -> Option<&str> {
        self.properties(path, interface)?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Registered `(path, interface)` pairs in sorted order.
    pub fn interfaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.objects
            .keys()
            .map(|(path, interface)| (path.as_str(), interface.as_str()))
    }
}

impl PropertyBus for MemoryBus {
    fn request_name(&mut self, name: &str) -> Result<(), BusError> {
        if !self.names.insert(name.to_string()) {
            return Err(BusError::NameTaken {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn add_interface(
        &mut self,
        path: &str,
        interface: &str,
        properties: &[(&str, &str)],
    ) -> Result<InterfaceHandle, BusError> {
        let key = (path.to_string(), interface.to_string());
        if self.objects.contains_key(&key) {
            return Err(BusError::DuplicateInterface {
                path: key.0,
                interface: key.1,
            });
        }

        let mut registered: Vec<(String, String)> = Vec::with_capacity(properties.len());
        for (name, value) in properties {
            if registered.iter().any(|(existing, _)| existing == name) {
                return Err(BusError::DuplicateProperty {
                    interface: interface.to_string(),
                    property: name.to_string(),
                });
            }
            registered.push((name.to_string(), value.to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;
        debug!(path, interface, id, "interface added");
        self.objects.insert(
            key,
            Registered {
                id,
                properties: registered,
            },
        );
        Ok(InterfaceHandle {
            id,
            path: path.to_string(),
            interface: interface.to_string(),
        })
    }

    fn remove_interface(&mut self, handle: &InterfaceHandle) -> Result<(), BusError> {
        let key = (handle.path.clone(), handle.interface.clone());
        match self.objects.get(&key) {
            Some(entry) if entry.id == handle.id => {
                self.objects.remove(&key);
                debug!(path = %handle.path, interface = %handle.interface, "interface removed");
                Ok(())
            }
            _ => Err(BusError::UnknownInterface {
                path: handle.path.clone(),
                interface: handle.interface.clone(),
            }),
        }
    }
}
