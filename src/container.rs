use alloc::{
    boxed::Box,
    string::String,
    sync::{Arc, Weak},
    vec::Vec,
};
use core::any::type_name;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info_span};

use crate::{
    any::Instance,
    config::Config,
    errors::ResolveErrorKind,
    factory::BoxedFactory,
    reflect::{Arguments, ClassDescriptor, ParamType, Reflect},
    registry::{Definition, DefinitionRegistry},
    request::ResolutionPath,
    service::Service as _,
};

#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
    /// Path of the resolution that handed this handle to a factory, dangling outside of it
    pub(crate) path: Weak<Mutex<ResolutionPath>>,
}

impl Container {
    /// Creates container with default config and an empty registry
    #[inline]
    #[must_use]
    pub fn new(reflector: impl Reflect + 'static) -> Self {
        Self::with_config(reflector, Config::default())
    }

    #[inline]
    #[must_use]
    pub fn with_config(reflector: impl Reflect + 'static, config: Config) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(DefinitionRegistry::new()),
                reflector: Box::new(reflector),
                config,
            }),
            path: Weak::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.config
    }

    /// Merges definitions into the registry, later registrations win for overlapping classes.
    ///
    /// # Notes
    /// It can be called from a factory during a resolution.
    pub fn register<K, I>(&self, definitions: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Definition)>,
    {
        let mut registry = self.inner.registry.write();
        let len = registry.len();
        registry.register(definitions);
        debug!(total = registry.len(), added = registry.len() - len, "Registered");
    }

    #[inline]
    #[must_use]
    pub fn lookup(&self, class: &str) -> Option<Definition> {
        self.inner.registry.read().lookup(class).cloned()
    }

    /// Resolves a class into a new instance.
    ///
    /// # Notes
    /// Nothing is cached, every call runs factories and constructors again.
    /// Called from a factory with its container, it continues the resolution the factory runs in.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotInstantiable`] if the class has no definition and can't be constructed
    /// - Returns [`ResolveErrorKind::MissingTypeHint`] if a constructor parameter declares no type
    /// - Returns [`ResolveErrorKind::UnresolvableParameter`] if a constructor parameter has a builtin type
    /// - Returns [`ResolveErrorKind::CircularBinding`] if the class is required while it's already in progress
    /// - Returns [`ResolveErrorKind::Factory`] and [`ResolveErrorKind::Instantiate`] if a factory or a constructor fails
    pub fn resolve(&self, class: &str) -> Result<Instance, ResolveErrorKind> {
        let path = self
            .path
            .upgrade()
            .unwrap_or_else(|| Arc::new(Mutex::new(ResolutionPath::new())));
        self.resolve_in(class, &path)
    }

    /// Resolves a class and takes the value of type `T` out of the instance.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::IncorrectType`] if the instance isn't a `T`, see [`Self::resolve`] for others
    pub fn resolve_as<T: 'static>(&self, class: &str) -> Result<T, ResolveErrorKind> {
        self.resolve(class)?.downcast().map_err(|instance| {
            let err = ResolveErrorKind::IncorrectType {
                expected: type_name::<T>(),
                actual: instance.type_info().name,
            };
            error!("{}", err);
            err
        })
    }

    /// Resolves a class identified by the type name of `T`
    #[allow(clippy::missing_errors_doc)]
    #[inline]
    pub fn get<T: 'static>(&self) -> Result<T, ResolveErrorKind> {
        self.resolve_as(type_name::<T>())
    }
}

impl Container {
    fn resolve_in(&self, class: &str, path: &Arc<Mutex<ResolutionPath>>) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("resolve", class, depth = path.lock().depth());
        let _guard = span.enter();

        // The path is locked only to enter and to leave, never across nested resolutions
        let entered = path.lock().enter(class, self.inner.config.max_depth);
        if let Err(err) = entered {
            error!("{}", err);
            return Err(err);
        }
        let result = self.resolve_entered(class, path);
        path.lock().leave();

        result
    }

    fn resolve_entered(&self, class: &str, path: &Arc<Mutex<ResolutionPath>>) -> Result<Instance, ResolveErrorKind> {
        // The lock is released before any factory or constructor runs
        let definition = self.inner.registry.read().lookup(class).cloned();

        match definition {
            Some(Definition::Factory(factory)) => {
                debug!("Found factory definition");
                self.invoke_factory(class, factory, path)
            }
            Some(Definition::Concrete(bound)) => {
                debug!(%bound, "Following binding");
                let instance = self.resolve_in(&bound, path)?;
                self.coerce(class, instance)
            }
            None => {
                debug!("Definition not found");
                self.autowire(class, path)
            }
        }
    }

    fn invoke_factory(
        &self,
        class: &str,
        BoxedFactory(mut factory): BoxedFactory,
        path: &Arc<Mutex<ResolutionPath>>,
    ) -> Result<Instance, ResolveErrorKind> {
        let container = Self {
            inner: self.inner.clone(),
            path: Arc::downgrade(path),
        };

        match factory.call(container) {
            Ok(instance) => Ok(instance),
            Err(source) => {
                let err = ResolveErrorKind::Factory {
                    class: class.into(),
                    source,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    fn coerce(&self, class: &str, instance: Instance) -> Result<Instance, ResolveErrorKind> {
        let Some(mut coercion) = self
            .inner
            .reflector
            .reflect(class)
            .and_then(|descriptor| descriptor.implementation(&instance.type_info()))
        else {
            return Ok(instance);
        };

        debug!(implementation = instance.type_info().short_name(), "Coercing");
        coercion.call(instance).map_err(|source| {
            let err = ResolveErrorKind::Instantiate {
                class: class.into(),
                source,
            };
            error!("{}", err);
            err
        })
    }

    fn autowire(&self, class: &str, path: &Arc<Mutex<ResolutionPath>>) -> Result<Instance, ResolveErrorKind> {
        let Some((descriptor, mut constructor)) = self
            .inner
            .reflector
            .reflect(class)
            .and_then(|descriptor| Some((descriptor, descriptor.constructor()?)))
            .filter(|(descriptor, _)| descriptor.is_instantiable())
        else {
            let err = ResolveErrorKind::NotInstantiable { class: class.into() };
            error!("{}", err);
            return Err(err);
        };

        // All parameters are validated before any of them is resolved
        let dependencies = match validate_params(class, descriptor) {
            Ok(dependencies) => dependencies,
            Err(err) => {
                error!("{}", err);
                return Err(err);
            }
        };

        if dependencies.is_empty() {
            debug!("Constructing without arguments");
        } else {
            debug!(count = dependencies.len(), "Auto-wiring");
        }

        let mut arguments = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            arguments.push(self.resolve_in(dependency, path)?);
        }

        match constructor.call(Arguments::new(arguments)) {
            Ok(instance) => {
                debug!("Constructed");
                Ok(instance)
            }
            Err(source) => {
                let err = ResolveErrorKind::Instantiate {
                    class: class.into(),
                    source,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

/// Returns class names of the constructor parameters in declaration order
fn validate_params<'a>(class: &str, descriptor: &'a ClassDescriptor) -> Result<Vec<&'a str>, ResolveErrorKind> {
    descriptor
        .constructor_params()
        .iter()
        .map(|param| match &param.ty {
            None => Err(ResolveErrorKind::MissingTypeHint {
                class: class.into(),
                param: param.name.clone(),
            }),
            Some(ParamType::Builtin(ty)) => Err(ResolveErrorKind::UnresolvableParameter {
                class: class.into(),
                param: param.name.clone(),
                ty: ty.clone(),
            }),
            Some(ParamType::Class(dependency)) => Ok(dependency.as_str()),
        })
        .collect()
}

pub(crate) struct ContainerInner {
    pub(crate) registry: RwLock<DefinitionRegistry>,
    pub(crate) reflector: Box<dyn Reflect>,
    pub(crate) config: Config,
}
