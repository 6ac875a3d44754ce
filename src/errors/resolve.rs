use alloc::{string::String, vec::Vec};

use super::instantiate::InstantiateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Class {class} is not instantiable")]
    NotInstantiable { class: String },
    #[error("Failed to resolve class {class} because param {param} is missing a type hint")]
    MissingTypeHint { class: String, param: String },
    #[error("Failed to resolve class {class} because param {param} has builtin type {ty}")]
    UnresolvableParameter { class: String, param: String, ty: String },
    #[error("Circular binding detected: {}", .chain.join(" -> "))]
    CircularBinding { chain: Vec<String> },
    #[error("Incorrect instance type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: &'static str, actual: &'static str },
    #[error("Factory of class {class} failed: {source}")]
    Factory { class: String, source: InstantiateErrorKind },
    #[error("Constructor of class {class} failed: {source}")]
    Instantiate { class: String, source: InstantiateErrorKind },
}
