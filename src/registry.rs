use alloc::{collections::BTreeMap, string::String};
use core::{
    any::type_name,
    fmt::{self, Debug, Formatter},
};

use crate::factory::{instance, BoxedFactory, Factory};

/// Registry entry describing how to produce or substitute a class
#[derive(Clone)]
pub enum Definition {
    /// Another class identifier to resolve instead of the requested one
    Concrete(String),
    /// Produces an instance directly, no reflection is performed
    Factory(BoxedFactory),
}

impl Definition {
    #[inline]
    #[must_use]
    pub fn concrete(name: impl Into<String>) -> Self {
        Self::Concrete(name.into())
    }

    /// Binding to the class identified by the type name of `T`
    #[inline]
    #[must_use]
    pub fn bind<T: ?Sized + 'static>() -> Self {
        Self::Concrete(type_name::<T>().into())
    }

    #[inline]
    #[must_use]
    pub fn factory<F, Args>(factory: F) -> Self
    where
        F: Factory<Args>,
    {
        Self::Factory(BoxedFactory::new(factory))
    }

    /// Factory that returns a clone of the passed value on every resolution
    #[inline]
    #[must_use]
    pub fn instance<T: Clone + Send + Sync + 'static>(value: T) -> Self {
        Self::factory(instance(value))
    }
}

impl Debug for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(name) => f.debug_tuple("Concrete").field(name).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

#[derive(Default, Clone)]
pub struct DefinitionRegistry {
    definitions: BTreeMap<String, Definition>,
}

impl DefinitionRegistry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// Merges new definitions into the registry.
    /// For keys present in both, the new definition replaces the old one.
    pub fn register<K, I>(&mut self, definitions: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Definition)>,
    {
        self.definitions
            .extend(definitions.into_iter().map(|(name, definition)| (name.into(), definition)));
    }

    #[inline]
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
