//! Auto-wiring dependency injection container.
//!
//! Classes are identified by their fully qualified names. A class is resolved either with a registered
//! [`Definition`] (a binding to another class or a factory) or, if there is no definition, by constructing
//! it from its [`ClassDescriptor`] and resolving every class-typed constructor parameter recursively.
//!
//! ```rust
//! use autowire::{Catalog, ClassDescriptor, Container, Parameter};
//!
//! #[derive(Default)]
//! struct Engine;
//!
//! struct Car {
//!     engine: Engine,
//! }
//!
//! let container = Container::new(
//!     Catalog::new().class(ClassDescriptor::default_of::<Engine>()).class(
//!         ClassDescriptor::of::<Car>()
//!             .param(Parameter::typed::<Engine>("engine"))
//!             .construct(|mut args| Ok(Car { engine: args.take()? })),
//!     ),
//! );
//!
//! let Car { engine: Engine } = container.get::<Car>().unwrap();
//! ```

#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod reflect;
pub(crate) mod registry;
pub(crate) mod request;
pub(crate) mod service;

pub use any::{Instance, TypeInfo};
pub use config::Config;
pub use container::Container;
pub use errors::{InstantiateErrorKind, ResolveErrorKind};
pub use factory::{instance, BoxedFactory, Factory};
pub use reflect::{Arguments, Catalog, ClassDescriptor, ClassKind, Injectable, ParamType, Parameter, Reflect};
pub use registry::{Definition, DefinitionRegistry};

/// Fully qualified class identifier
pub type ClassName = alloc::string::String;
