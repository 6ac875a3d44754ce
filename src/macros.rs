/// Builds a list of definitions to pass to [`crate::Container::register`].
///
/// # Examples
/// ```rust
/// use autowire::{definitions, Catalog, Container, Definition};
///
/// struct V8;
///
/// let container = Container::new(Catalog::new());
/// container.register(definitions! {
///     "app::Engine" => Definition::bind::<V8>(),
///     "app::Cylinders" => Definition::instance(8u8),
/// });
///
/// assert!(container.lookup("app::Engine").is_some());
/// ```
#[macro_export]
macro_rules! definitions {
    ( $( $class:expr => $definition:expr ),* $(,)? ) => {
        [ $( ($crate::ClassName::from($class), $definition) ),* ]
    };
}
