use alloc::boxed::Box;
use tracing::debug;

use crate::{
    any::Instance,
    errors::InstantiateErrorKind,
    service::{service_fn, BoxCloneService},
    Container,
};

/// Callable that produces an instance directly, bypassing reflection.
///
/// Implemented for closures taking no arguments and for closures taking the [`Container`],
/// which can be used for nested resolution.
pub trait Factory<Args>: Clone + Send + Sync + 'static {
    type Provides: Send + Sync + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn create(&mut self, container: Container) -> Result<Self::Provides, Self::Error>;
}

impl<F, Response, Err> Factory<()> for F
where
    F: FnMut() -> Result<Response, Err> + Clone + Send + Sync + 'static,
    Response: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Response;
    type Error = Err;

    #[inline]
    fn create(&mut self, _container: Container) -> Result<Self::Provides, Self::Error> {
        self()
    }
}

impl<F, Response, Err> Factory<(Container,)> for F
where
    F: FnMut(Container) -> Result<Response, Err> + Clone + Send + Sync + 'static,
    Response: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Response;
    type Error = Err;

    #[inline]
    fn create(&mut self, container: Container) -> Result<Self::Provides, Self::Error> {
        self(container)
    }
}

/// Boxed [`Factory`] stored in a [`crate::Definition::Factory`]
#[derive(Clone)]
pub struct BoxedFactory(pub(crate) BoxCloneService<Container, Instance, InstantiateErrorKind>);

impl BoxedFactory {
    #[must_use]
    pub fn new<F, Args>(mut factory: F) -> Self
    where
        F: Factory<Args>,
    {
        Self(BoxCloneService(Box::new(service_fn(
            move |container: Container| -> Result<Instance, InstantiateErrorKind> {
                let provides = match factory.create(container) {
                    Ok(provides) => provides,
                    Err(err) => return Err(err.into()),
                };

                debug!("Created");

                Ok(Instance::new(provides))
            },
        ))))
    }
}

/// Wrapper to create a factory that just returns passed value.
/// It can be used when the value was created outside the container.
#[inline]
#[must_use]
pub const fn instance<T: Clone + Send + Sync + 'static>(val: T) -> impl Factory<(), Provides = T, Error = InstantiateErrorKind> {
    move || Ok(val.clone())
}
