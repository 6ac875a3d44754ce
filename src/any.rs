use alloc::boxed::Box;
use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
};

/// Type names that auto-wiring never supplies a value for.
const BUILTIN_TYPE_NAMES: &[&str] = &[
    "()",
    "bool",
    "char",
    "str",
    "&str",
    "alloc::string::String",
    "i8",
    "i16",
    "i32",
    "i64",
    "i128",
    "isize",
    "u8",
    "u16",
    "u32",
    "u64",
    "u128",
    "usize",
    "f32",
    "f64",
];

/// Collections are never auto-wired, whatever they hold
const COLLECTION_TYPE_PREFIXES: &[&str] = &[
    "alloc::vec::Vec<",
    "alloc::collections::vec_deque::VecDeque<",
    "alloc::collections::btree::map::BTreeMap<",
    "alloc::collections::btree::set::BTreeSet<",
    "std::collections::hash::map::HashMap<",
    "std::collections::hash::set::HashSet<",
];

/// Scalars and strings, optionals and references of them, collections, slices, arrays and tuples
fn is_builtin_name(name: &str) -> bool {
    if BUILTIN_TYPE_NAMES.contains(&name) {
        return true;
    }
    if let Some(inner) = name
        .strip_prefix("core::option::Option<")
        .and_then(|name| name.strip_suffix('>'))
    {
        return is_builtin_name(inner);
    }
    if let Some(inner) = name.strip_prefix("&mut ").or_else(|| name.strip_prefix('&')) {
        return is_builtin_name(inner);
    }

    name.starts_with('[') || name.starts_with('(') || COLLECTION_TYPE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let path = self.name.split_once('<').map_or(self.name, |(path, _)| path);
        path.rsplit_once("::").map_or(path, |(_, name)| name)
    }

    /// Returns `true` for types auto-wiring never supplies a value for.
    /// `Option<T>` and references are builtin if `T` is.
    #[inline]
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        is_builtin_name(self.name)
    }
}

/// Type-erased value produced by a factory or a constructor
pub struct Instance {
    value: Box<dyn Any + Send + Sync>,
    type_info: TypeInfo,
}

impl Instance {
    #[inline]
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_info: TypeInfo::of::<T>(),
        }
    }

    /// Info of the type of the held value
    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        (*self.value).is::<T>()
    }

    #[inline]
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.value).downcast_ref()
    }

    /// Takes the held value out.
    ///
    /// # Errors
    /// Returns the instance back if it doesn't hold a `T`
    #[inline]
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        let Self { value, type_info } = self;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { value, type_info }),
        }
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type", &self.type_info.name).finish()
    }
}
