use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("bus name already owned: {name}")]
    NameTaken { name: String },
    #[error("interface {interface} already registered on {path}")]
    DuplicateInterface { path: String, interface: String },
    #[error("duplicate property {property} on {interface}")]
    DuplicateProperty { interface: String, property: String },
    #[error("interface {interface} on {path} is not registered")]
    UnknownInterface { path: String, interface: String },
    #[error("unknown method {interface}.{method}")]
    UnknownMethod { interface: String, method: String },
}
