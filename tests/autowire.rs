use autowire::{
    definitions, Catalog, ClassDescriptor, Config, Container, Definition, Injectable, InstantiateErrorKind, Parameter,
    ResolveErrorKind,
};
use std::{
    any::type_name,
    sync::{
        atomic::{AtomicU32, AtomicU8, Ordering},
        Arc,
    },
    thread,
};

static ENGINES_BUILT: AtomicU32 = AtomicU32::new(0);

struct Engine {
    serial: u32,
}

impl Injectable for Engine {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::of::<Self>().construct(|_| {
            Ok(Engine {
                serial: ENGINES_BUILT.fetch_add(1, Ordering::SeqCst),
            })
        })
    }
}

struct Car {
    engine: Engine,
}

impl Injectable for Car {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::of::<Self>()
            .param(Parameter::typed::<Engine>("engine"))
            .construct(|mut args| Ok(Car { engine: args.take()? }))
    }
}

#[derive(Default)]
struct Radio;

struct Chassis;

trait Gearbox: Send + Sync {
    fn gears(&self) -> u8;
}

#[derive(Default)]
struct Manual;

impl Gearbox for Manual {
    fn gears(&self) -> u8 {
        6
    }
}

struct Truck {
    gearbox: Box<dyn Gearbox>,
}

fn catalog() -> Catalog {
    Catalog::new()
        .injectable::<Engine>()
        .injectable::<Car>()
        .class(ClassDescriptor::default_of::<Radio>())
        .class(ClassDescriptor::default_of::<Manual>())
        .class(ClassDescriptor::interface::<dyn Gearbox>().implemented_by(|manual: Manual| Box::new(manual) as Box<dyn Gearbox>))
        .class(
            ClassDescriptor::of::<Truck>()
                .param(Parameter::typed::<dyn Gearbox>("gearbox"))
                .construct(|mut args| Ok(Truck { gearbox: args.take()? })),
        )
        .class(
            ClassDescriptor::named("app::Untyped")
                .param(Parameter::typed::<Radio>("radio"))
                .param(Parameter::untyped("volume"))
                .construct(|_| Ok(())),
        )
        .class(
            ClassDescriptor::named("app::Tuned")
                .param(Parameter::typed::<Radio>("radio"))
                .param(Parameter::typed::<f32>("frequency"))
                .construct(|_| Ok(())),
        )
        .class(ClassDescriptor::abstract_class::<Chassis>().construct(|_| Ok(Chassis)))
        .class(ClassDescriptor::named("app::Plain").construct(|_| Ok(Radio)))
        .class(
            ClassDescriptor::named("app::Server")
                .param(Parameter::typed::<Option<u16>>("port"))
                .construct(|_| Ok(())),
        )
        .class(
            ClassDescriptor::named("app::Tagged")
                .param(Parameter::typed::<Radio>("radio"))
                .param(Parameter::typed::<Vec<String>>("tags"))
                .construct(|_| Ok(())),
        )
        .class(
            ClassDescriptor::named("app::UntypedFirst")
                .param(Parameter::untyped("volume"))
                .param(Parameter::typed::<f32>("frequency"))
                .construct(|_| Ok(())),
        )
        .class(
            ClassDescriptor::named("app::BuiltinFirst")
                .param(Parameter::typed::<f32>("frequency"))
                .param(Parameter::untyped("volume"))
                .construct(|_| Ok(())),
        )
}

#[test]
fn test_merge_precedence() {
    let container = Container::new(Catalog::new());
    container.register(definitions! {
        "x" => Definition::instance(1u8),
    });
    container.register(definitions! {
        "x" => Definition::instance(2u8),
        "y" => Definition::instance(3u8),
    });

    assert_eq!(container.resolve_as::<u8>("x").unwrap(), 2);
    assert_eq!(container.resolve_as::<u8>("y").unwrap(), 3);
}

#[test]
fn test_zero_args_construction() {
    let container = Container::new(catalog());

    assert!(container.get::<Radio>().is_ok());
    assert!(container.resolve("app::Plain").unwrap().is::<Radio>());
    assert!(container.get::<Manual>().is_ok());
}

#[test]
fn test_factory_short_circuit() {
    let call_count = Arc::new(AtomicU8::new(0));
    let container = Container::new(Catalog::new());
    // No descriptor is known for the class, so any reflection would fail
    container.register([(
        "app::Ghost",
        Definition::factory({
            let call_count = call_count.clone();
            move || {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, InstantiateErrorKind>("boo")
            }
        }),
    )]);

    assert_eq!(container.resolve_as::<&str>("app::Ghost").unwrap(), "boo");
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_binding_indirection() {
    let container = Container::new(catalog());
    container.register([("app::Vehicle", Definition::bind::<Car>())]);

    let bound = container.resolve("app::Vehicle").unwrap();
    let direct = container.get::<Car>().unwrap();

    assert_eq!(bound.type_info(), container.resolve(type_name::<Car>()).unwrap().type_info());
    assert!(bound.downcast::<Car>().unwrap().engine.serial != direct.engine.serial);
}

#[test]
fn test_missing_type_hint() {
    let container = Container::new(catalog());

    let err = container.resolve("app::Untyped").unwrap_err();
    assert!(matches!(
        err,
        ResolveErrorKind::MissingTypeHint { ref class, ref param } if class == "app::Untyped" && param == "volume"
    ));
}

#[test]
fn test_primitive_parameter() {
    let container = Container::new(catalog());

    let err = container.resolve("app::Tuned").unwrap_err();
    assert!(matches!(
        err,
        ResolveErrorKind::UnresolvableParameter { ref param, ref ty, .. } if param == "frequency" && ty == "f32"
    ));
}

#[test]
fn test_optional_and_collection_parameters() {
    let container = Container::new(catalog());

    assert!(matches!(
        container.resolve("app::Server"),
        Err(ResolveErrorKind::UnresolvableParameter { ref class, ref param, ref ty })
            if class == "app::Server" && param == "port" && ty == type_name::<Option<u16>>()
    ));
    assert!(matches!(
        container.resolve("app::Tagged"),
        Err(ResolveErrorKind::UnresolvableParameter { ref class, ref param, .. }) if class == "app::Tagged" && param == "tags"
    ));
}

#[test]
fn test_first_invalid_parameter_wins() {
    let container = Container::new(catalog());

    assert!(matches!(
        container.resolve("app::UntypedFirst"),
        Err(ResolveErrorKind::MissingTypeHint { ref param, .. }) if param == "volume"
    ));
    assert!(matches!(
        container.resolve("app::BuiltinFirst"),
        Err(ResolveErrorKind::UnresolvableParameter { ref param, .. }) if param == "frequency"
    ));
}

#[test]
fn test_validation_runs_before_resolution() {
    let call_count = Arc::new(AtomicU8::new(0));
    let container = Container::new(catalog());
    container.register([(
        type_name::<Radio>(),
        Definition::factory({
            let call_count = call_count.clone();
            move || {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, InstantiateErrorKind>(Radio)
            }
        }),
    )]);

    assert!(container.resolve("app::Tuned").is_err());
    assert!(container.resolve("app::Untyped").is_err());
    assert_eq!(call_count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_recursive_wiring_without_memoization() {
    let container = Container::new(catalog());

    let car_1 = container.get::<Car>().unwrap();
    let car_2 = container.get::<Car>().unwrap();

    assert_ne!(car_1.engine.serial, car_2.engine.serial);
}

#[test]
fn test_not_instantiable() {
    let container = Container::new(catalog());

    for class in [type_name::<dyn Gearbox>(), type_name::<Chassis>(), "app::Unknown"] {
        assert!(matches!(
            container.resolve(class),
            Err(ResolveErrorKind::NotInstantiable { class: ref name }) if name == class
        ));
    }
}

#[test]
fn test_interface_binding_with_coercion() {
    let container = Container::new(catalog());
    container.register([(type_name::<dyn Gearbox>(), Definition::bind::<Manual>())]);

    let truck = container.get::<Truck>().unwrap();
    assert_eq!(truck.gearbox.gears(), 6);

    let gearbox = container.resolve_as::<Box<dyn Gearbox>>(type_name::<dyn Gearbox>()).unwrap();
    assert_eq!(gearbox.gears(), 6);
}

#[test]
fn test_circular_bindings() {
    let container = Container::new(catalog());
    container.register(definitions! {
        "app::Loop" => Definition::concrete("app::Loop"),
        "app::Ping" => Definition::concrete("app::Pong"),
        "app::Pong" => Definition::concrete("app::Ping"),
    });

    assert!(matches!(
        container.resolve("app::Loop"),
        Err(ResolveErrorKind::CircularBinding { chain }) if chain == ["app::Loop", "app::Loop"]
    ));
    assert!(matches!(
        container.resolve("app::Ping"),
        Err(ResolveErrorKind::CircularBinding { chain }) if chain == ["app::Ping", "app::Pong", "app::Ping"]
    ));
}

#[test]
fn test_circular_autowiring() {
    struct Chicken;

    let container = Container::new(
        Catalog::new().class(
            ClassDescriptor::of::<Chicken>()
                .param(Parameter::class("egg", "app::Egg"))
                .construct(|_| Ok(Chicken)),
        ),
    );
    container.register([("app::Egg", Definition::bind::<Chicken>())]);

    assert!(matches!(
        container.get::<Chicken>(),
        Err(ResolveErrorKind::CircularBinding { chain }) if chain.len() == 3
    ));
}

#[test]
fn test_circular_factories() {
    let container = Container::new(catalog());
    container.register(definitions! {
        "app::A" => Definition::factory(|container: Container| {
            container.resolve("app::A")?;
            Ok::<_, InstantiateErrorKind>(())
        }),
        "app::Left" => Definition::factory(|container: Container| {
            container.resolve("app::Right")?;
            Ok::<_, InstantiateErrorKind>(())
        }),
        "app::Right" => Definition::concrete("app::Left"),
    });

    let Err(ResolveErrorKind::Factory { class, source }) = container.resolve("app::A") else {
        panic!("factory error expected");
    };
    assert_eq!(class, "app::A");
    assert!(matches!(
        source,
        InstantiateErrorKind::Resolve(inner)
            if matches!(*inner, ResolveErrorKind::CircularBinding { ref chain } if chain == &["app::A", "app::A"])
    ));

    let Err(ResolveErrorKind::Factory { source, .. }) = container.resolve("app::Left") else {
        panic!("factory error expected");
    };
    assert!(matches!(
        source,
        InstantiateErrorKind::Resolve(inner)
            if matches!(*inner, ResolveErrorKind::CircularBinding { ref chain } if chain == &["app::Left", "app::Right", "app::Left"])
    ));

    // Failed cycles leave nothing behind on the path
    assert!(container.get::<Car>().is_ok());
}

#[test]
fn test_nested_errors_propagate_unchanged() {
    let container = Container::new(catalog());
    container.register([(type_name::<Engine>(), Definition::concrete("app::Untyped"))]);

    assert!(matches!(container.get::<Car>(), Err(ResolveErrorKind::MissingTypeHint { .. })));
}

#[test]
fn test_factory_errors() {
    let container = Container::new(Catalog::new());
    container.register(definitions! {
        "app::Broken" => Definition::factory(|| Err::<(), _>(anyhow::anyhow!("disk is full"))),
        "app::Dependent" => Definition::factory(|container: Container| {
            container.resolve("app::Missing")?;
            Ok::<_, InstantiateErrorKind>(())
        }),
    });

    let err = container.resolve("app::Broken").unwrap_err();
    assert_eq!(err.to_string(), "Factory of class app::Broken failed: disk is full");

    let Err(ResolveErrorKind::Factory { source, .. }) = container.resolve("app::Dependent") else {
        panic!("factory error expected");
    };
    assert!(matches!(
        source,
        InstantiateErrorKind::Resolve(inner) if matches!(*inner, ResolveErrorKind::NotInstantiable { .. })
    ));
}

#[test]
fn test_usable_after_error() {
    let container = Container::new(catalog());

    assert!(container.resolve("app::Tuned").is_err());
    assert!(container.get::<Car>().is_ok());

    container.register([("app::Tuned", Definition::instance(101.5f32))]);
    assert_eq!(container.resolve_as::<f32>("app::Tuned").unwrap(), 101.5);
}

#[test]
fn test_concurrent_resolve_and_register() {
    let container = Container::with_config(catalog(), Config::default());

    let handles = (0..4u8)
        .map(|id| {
            let container = container.clone();
            thread::spawn(move || {
                container.register([(format!("app::Worker{id}"), Definition::instance(id))]);
                for _ in 0..16 {
                    container.get::<Car>().unwrap();
                }
                container.resolve_as::<u8>(&format!("app::Worker{id}")).unwrap()
            })
        })
        .collect::<Vec<_>>();

    let mut ids = handles.into_iter().map(|handle| handle.join().unwrap()).collect::<Vec<_>>();
    ids.sort_unstable();
    assert_eq!(ids, [0, 1, 2, 3]);
}
