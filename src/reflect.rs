//! Reflection capability used by auto-wiring.
//!
//! Rust has no runtime constructor introspection, so classes are described up front
//! with a [`ClassDescriptor`]: its kind, the declared constructor parameters and the
//! construction primitive.
//! The container only sees them through the [`Reflect`] trait, [`Catalog`] is the default in-memory implementation.

use alloc::{
    boxed::Box,
    collections::{BTreeMap, VecDeque},
    string::String,
    sync::Arc,
    vec::Vec,
};
use core::{
    any::type_name,
    fmt::{self, Debug, Formatter},
};

use crate::{
    any::{Instance, TypeInfo},
    errors::InstantiateErrorKind,
    service::{service_fn, BoxCloneService},
};

pub(crate) type BoxedConstructor = BoxCloneService<Arguments, Instance, InstantiateErrorKind>;
pub(crate) type BoxedCoercion = BoxCloneService<Instance, Instance, InstantiateErrorKind>;

/// Type introspection facility consumed by the container
pub trait Reflect: Send + Sync {
    /// Returns the descriptor of the class, if the class is known
    fn reflect(&self, name: &str) -> Option<&ClassDescriptor>;
}

impl<R: Reflect + ?Sized> Reflect for Arc<R> {
    #[inline]
    fn reflect(&self, name: &str) -> Option<&ClassDescriptor> {
        (**self).reflect(name)
    }
}

impl<R: Reflect + ?Sized> Reflect for Box<R> {
    #[inline]
    fn reflect(&self, name: &str) -> Option<&ClassDescriptor> {
        (**self).reflect(name)
    }
}

/// Type that describes itself for auto-wiring
pub trait Injectable: Send + Sync + Sized + 'static {
    fn descriptor() -> ClassDescriptor;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Scalar, string or collection type, never supplied by auto-wiring
    Builtin(String),
    /// Class or interface, resolved recursively
    Class(String),
}

impl ParamType {
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        let type_info = TypeInfo::of::<T>();
        if type_info.is_builtin() {
            Self::Builtin(type_info.name.into())
        } else {
            Self::Class(type_info.name.into())
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(name) | Self::Class(name) => name,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

/// Declared constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// `None` if the parameter declares no type
    pub ty: Option<ParamType>,
}

impl Parameter {
    /// Parameter of type `T`, classified as builtin or class by its type name
    #[inline]
    #[must_use]
    pub fn typed<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: Some(ParamType::of::<T>()),
        }
    }

    #[inline]
    #[must_use]
    pub fn class(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: Some(ParamType::Class(class.into())),
        }
    }

    #[inline]
    #[must_use]
    pub fn builtin(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: Some(ParamType::Builtin(ty.into())),
        }
    }

    #[inline]
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }
}

/// Resolved constructor arguments in declaration order
#[derive(Debug)]
pub struct Arguments {
    values: VecDeque<Instance>,
    position: usize,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }

    /// Takes the next argument.
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if all arguments are taken
    /// - Returns [`InstantiateErrorKind::IncorrectArgument`] if the next argument isn't a `T`
    pub fn take<T: 'static>(&mut self) -> Result<T, InstantiateErrorKind> {
        let position = self.position;
        let Some(value) = self.values.pop_front() else {
            return Err(InstantiateErrorKind::MissingArgument { position });
        };
        self.position += 1;

        value.downcast().map_err(|value| InstantiateErrorKind::IncorrectArgument {
            position,
            expected: type_name::<T>(),
            actual: value.type_info().name,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone)]
pub struct ClassDescriptor {
    name: String,
    kind: ClassKind,
    params: Option<Vec<Parameter>>,
    constructor: Option<BoxedConstructor>,
    implementations: BTreeMap<TypeInfo, BoxedCoercion>,
}

impl ClassDescriptor {
    /// Concrete class named after `T`.
    /// It's not instantiable until a construction is set with [`Self::construct`].
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::named(type_name::<T>())
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Concrete,
            params: None,
            constructor: None,
            implementations: BTreeMap::new(),
        }
    }

    /// Class without declared constructor, constructed with [`Default`]
    #[must_use]
    pub fn default_of<T: Default + Send + Sync + 'static>() -> Self {
        let mut descriptor = Self::of::<T>();
        descriptor.constructor = Some(boxed_constructor(|_| Ok(T::default())));
        descriptor
    }

    #[inline]
    #[must_use]
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self::of::<T>().kind(ClassKind::Interface)
    }

    #[inline]
    #[must_use]
    pub fn abstract_class<T: ?Sized + 'static>() -> Self {
        Self::of::<T>().kind(ClassKind::Abstract)
    }

    #[inline]
    #[must_use]
    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Appends a constructor parameter
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.get_or_insert_with(Vec::new).push(param);
        self
    }

    /// Sets the declared constructor.
    /// The constructor receives resolved parameters in declaration order.
    #[must_use]
    pub fn construct<F, T>(mut self, constructor: F) -> Self
    where
        F: FnMut(Arguments) -> Result<T, InstantiateErrorKind> + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.params.get_or_insert_with(Vec::new);
        self.constructor = Some(boxed_constructor(constructor));
        self
    }

    /// Registers a conversion of a bound implementation into the representation of this class,
    /// for example `V8` into `Box<dyn Engine>`
    #[must_use]
    pub fn implemented_by<Impl, Repr, C>(mut self, mut coerce: C) -> Self
    where
        Impl: 'static,
        Repr: Send + Sync + 'static,
        C: FnMut(Impl) -> Repr + Clone + Send + Sync + 'static,
    {
        let coercion = service_fn(move |instance: Instance| -> Result<Instance, InstantiateErrorKind> {
            match instance.downcast::<Impl>() {
                Ok(value) => Ok(Instance::new(coerce(value))),
                Err(instance) => Err(InstantiateErrorKind::IncorrectArgument {
                    position: 0,
                    expected: type_name::<Impl>(),
                    actual: instance.type_info().name,
                }),
            }
        });
        self.implementations.insert(TypeInfo::of::<Impl>(), BoxCloneService(Box::new(coercion)));
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn class_kind(&self) -> ClassKind {
        self.kind
    }

    /// Abstract classes, interfaces and classes without construction can't be instantiated
    #[inline]
    #[must_use]
    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Concrete && self.constructor.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn has_constructor(&self) -> bool {
        self.params.is_some()
    }

    #[inline]
    #[must_use]
    pub fn constructor_params(&self) -> &[Parameter] {
        self.params.as_deref().unwrap_or_default()
    }

    #[inline]
    pub(crate) fn constructor(&self) -> Option<BoxedConstructor> {
        self.constructor.clone()
    }

    #[inline]
    pub(crate) fn implementation(&self, type_info: &TypeInfo) -> Option<BoxedCoercion> {
        self.implementations.get(type_info).cloned()
    }
}

impl Debug for ClassDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("implementations", &self.implementations.keys().map(|type_info| type_info.name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn boxed_constructor<F, T>(mut constructor: F) -> BoxedConstructor
where
    F: FnMut(Arguments) -> Result<T, InstantiateErrorKind> + Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    BoxCloneService(Box::new(service_fn(
        move |arguments: Arguments| -> Result<Instance, InstantiateErrorKind> { constructor(arguments).map(Instance::new) },
    )))
}

/// In-memory set of class descriptors
#[derive(Default, Clone, Debug)]
pub struct Catalog {
    classes: BTreeMap<String, ClassDescriptor>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { classes: BTreeMap::new() }
    }

    /// Adds a class, replacing a previous one with the same name
    #[inline]
    #[must_use]
    pub fn class(mut self, descriptor: ClassDescriptor) -> Self {
        self.declare(descriptor);
        self
    }

    #[inline]
    #[must_use]
    pub fn injectable<T: Injectable>(self) -> Self {
        self.class(T::descriptor())
    }

    #[inline]
    pub fn declare(&mut self, descriptor: ClassDescriptor) -> Option<ClassDescriptor> {
        self.classes.insert(descriptor.name.clone(), descriptor)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Reflect for Catalog {
    #[inline]
    fn reflect(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }
}
