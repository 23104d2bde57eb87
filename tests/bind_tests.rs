//! # Object Binding Tests
//!
//! End-to-end binding of annotated targets against a manifest:
//! - direct values (strings, integers, class identifiers)
//! - resource-backed values with inferred and explicit kinds
//! - setter bindings
//! - best-effort vs all-or-nothing failure behaviour
//!
//! ## Test Categories
//!
//! 1. Manifest fixture tests - full target bound from a YAML manifest
//! 2. Single-member tests - direct, indirect and absent keys
//! 3. Failure tests - class resolution, type mismatch, partial application

use std::sync::Arc;

use metabind::{
    AnimationHandle, BindingDeclaration, Bindings, Decoder, Kind, Manifest, MetabindError,
    MetadataBound, MetadataStore, OpaqueHandle, TypeHandle, TypeRegistry, Value,
};
use metabind::resources::InMemoryResources;
use once_cell::sync::Lazy;

// ============================================================================
// TEST HELPERS
// ============================================================================

const HELLO_WORLD: i32 = 0x7f05_0000;
const SAMPLE_DIMEN: i32 = 0x7f03_0000;
const BOOL_TRUE: i32 = 0x7f02_0000;
const BOOL_FALSE: i32 = 0x7f02_0001;
const COLOR_BLACK: i32 = 0x7f01_0000;
const FADE_IN: i32 = 0x7f04_0000;
const ANSWER: i32 = 0x7f06_0000;

const MANIFEST: &str = r#"
package: com.onehilltech.metadata.test
meta-data:
  metadata.string: "Hello, World!"
  metadata.integer: 42
  metadata.classname: com.onehilltech.metadata.test.TestClass
  metadata.resource.string: 2131034112
  metadata.resource.integer: 2131099648
  metadata.resource.animation: 2130968576
  metadata.resource.boolean.true: 2130837504
  metadata.resource.boolean.false: 2130837505
  metadata.resource.dimension: 2130903040
  metadata.resource.color: 2130771968
"#;

struct TestClass;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fade_in() -> OpaqueHandle {
    OpaqueHandle::new(Kind::Animation, "fade_in.xml")
}

fn resources(animation: OpaqueHandle) -> InMemoryResources {
    InMemoryResources::new()
        .with_string(HELLO_WORLD, "Hello, World!")
        .with_integer(ANSWER, 42)
        .with_boolean(BOOL_TRUE, true)
        .with_boolean(BOOL_FALSE, false)
        .with_dimension(SAMPLE_DIMEN, 24.0)
        .with_color(COLOR_BLACK, 0xFF00_0000)
        .with_animation(FADE_IN, animation)
}

fn classes() -> Arc<TypeRegistry> {
    let registry = TypeRegistry::new();
    registry
        .register::<TestClass>("com.onehilltech.metadata.test.TestClass")
        .unwrap();
    Arc::new(registry)
}

fn decoder_for(store: MetadataStore, resources: InMemoryResources) -> (Decoder, Arc<InMemoryResources>) {
    init_tracing();
    let resources = Arc::new(resources);
    let decoder = Decoder::new(store, resources.clone(), classes());
    (decoder, resources)
}

fn manifest_decoder() -> (Decoder, Arc<InMemoryResources>) {
    let store = Manifest::from_yaml_str(MANIFEST).unwrap().to_store().unwrap();
    decoder_for(store, resources(fade_in()))
}

// ============================================================================
// MANIFEST FIXTURE TARGET
// ============================================================================

#[derive(Debug, Default, Clone)]
struct MetadataValues {
    the_string: String,
    the_integer: i32,
    the_class: Option<TypeHandle>,

    the_string_resource: String,
    the_integer_resource: i32,
    the_animation: Option<AnimationHandle>,
    the_true_value: bool,
    the_false_value: Option<bool>,
    the_dimension: f32,
    color_black: u32,

    metadata_string: Option<String>,
}

impl MetadataValues {
    fn set_metadata_string(&mut self, value: String) {
        self.metadata_string = Some(value);
    }
}

static METADATA_VALUES: Lazy<Bindings<MetadataValues>> = Lazy::new(|| {
    Bindings::builder()
        .field("the_string", BindingDeclaration::new("metadata.string"), |t: &mut MetadataValues, v| {
            t.the_string = v
        })
        .field("the_integer", BindingDeclaration::new("metadata.integer"), |t: &mut MetadataValues, v| {
            t.the_integer = v
        })
        .field(
            "the_class",
            BindingDeclaration::new("metadata.classname"),
            |t: &mut MetadataValues, v: TypeHandle| t.the_class = Some(v),
        )
        .field(
            "the_string_resource",
            BindingDeclaration::new("metadata.resource.string").indirect(),
            |t: &mut MetadataValues, v| t.the_string_resource = v,
        )
        .field(
            "the_integer_resource",
            BindingDeclaration::new("metadata.resource.integer").indirect(),
            |t: &mut MetadataValues, v| t.the_integer_resource = v,
        )
        .field(
            "the_animation",
            BindingDeclaration::new("metadata.resource.animation").indirect(),
            |t: &mut MetadataValues, v: AnimationHandle| t.the_animation = Some(v),
        )
        .field(
            "the_true_value",
            BindingDeclaration::new("metadata.resource.boolean.true").indirect(),
            |t: &mut MetadataValues, v| t.the_true_value = v,
        )
        .field(
            "the_false_value",
            BindingDeclaration::new("metadata.resource.boolean.false").indirect(),
            |t: &mut MetadataValues, v: Option<bool>| t.the_false_value = v,
        )
        .field(
            "the_dimension",
            BindingDeclaration::new("metadata.resource.dimension").indirect(),
            |t: &mut MetadataValues, v| t.the_dimension = v,
        )
        .field(
            "color_black",
            BindingDeclaration::new("metadata.resource.color").indirect().kind(Kind::Color),
            |t: &mut MetadataValues, v| t.color_black = v,
        )
        .method(
            "set_metadata_string",
            BindingDeclaration::new("metadata.string"),
            MetadataValues::set_metadata_string,
        )
        .build()
        .unwrap()
});

impl MetadataBound for MetadataValues {
    fn bindings() -> &'static Bindings<Self> {
        &METADATA_VALUES
    }
}

// ============================================================================
// 1. MANIFEST FIXTURE TESTS
// ============================================================================

#[test]
fn manifest_contains_every_key() {
    let (decoder, _) = manifest_decoder();
    for key in [
        "metadata.string",
        "metadata.integer",
        "metadata.classname",
        "metadata.resource.string",
        "metadata.resource.integer",
        "metadata.resource.boolean.true",
        "metadata.resource.boolean.false",
        "metadata.resource.dimension",
        "metadata.resource.color",
    ] {
        assert!(decoder.metadata().contains(key), "missing {key}");
    }
}

#[test]
fn typed_value_lookups() {
    let (decoder, _) = manifest_decoder();
    assert_eq!(decoder.get_string("metadata.string"), Some("Hello, World!"));
    assert_eq!(decoder.value::<i32>("metadata.integer").unwrap(), 42);
    assert_eq!(
        decoder.value_from_resource::<String>("metadata.resource.string").unwrap(),
        "Hello, World!"
    );
}

#[test]
fn load_from_manifest() {
    let (decoder, _) = manifest_decoder();
    let mut values = MetadataValues::default();

    let report = decoder.bind(&mut values).unwrap();

    assert_eq!(values.the_string, "Hello, World!");
    assert_eq!(values.the_integer, 42);
    assert!(values.the_class.as_ref().unwrap().is::<TestClass>());

    assert_eq!(values.the_string_resource, "Hello, World!");
    assert!(values.the_true_value);
    assert_eq!(values.the_false_value, Some(false));
    assert_eq!(values.the_dimension, 24.0);
    assert_eq!(values.the_animation.as_ref().map(|a| a.0.kind()), Some(Kind::Animation));

    assert_eq!(values.metadata_string.as_deref(), Some("Hello, World!"));

    assert!(report.skipped.is_empty());
    assert_eq!(report.applied.len(), METADATA_VALUES.len());
}

#[test]
fn load_from_manifest_with_kind_hint() {
    let (decoder, resources) = manifest_decoder();
    let mut values = MetadataValues::default();
    decoder.bind(&mut values).unwrap();

    assert_eq!(values.color_black, 0xFF00_0000);
    assert_eq!(resources.kinds_requested(COLOR_BLACK), vec![Kind::Color]);
}

#[test]
fn integer_member_infers_integer_kind() {
    let (decoder, resources) = manifest_decoder();
    let mut values = MetadataValues::default();
    decoder.bind(&mut values).unwrap();

    assert_eq!(values.the_integer_resource, 42);
    assert_eq!(resources.kinds_requested(ANSWER), vec![Kind::Integer]);
}

#[test]
fn each_indirect_member_asks_for_its_inferred_kind_only() {
    let (decoder, resources) = manifest_decoder();
    let mut values = MetadataValues::default();
    decoder.bind(&mut values).unwrap();

    assert_eq!(resources.kinds_requested(HELLO_WORLD), vec![Kind::String]);
    assert_eq!(resources.kinds_requested(BOOL_TRUE), vec![Kind::Boolean]);
    assert_eq!(resources.kinds_requested(BOOL_FALSE), vec![Kind::Boolean]);
    assert_eq!(resources.kinds_requested(SAMPLE_DIMEN), vec![Kind::Dimension]);
    assert_eq!(resources.kinds_requested(FADE_IN), vec![Kind::Animation]);
}

#[test]
fn bind_is_idempotent() {
    let (decoder, _) = manifest_decoder();
    let mut once = MetadataValues::default();
    decoder.bind(&mut once).unwrap();

    let mut twice = MetadataValues::default();
    decoder.bind(&mut twice).unwrap();
    decoder.bind(&mut twice).unwrap();

    assert_eq!(once.the_string, twice.the_string);
    assert_eq!(once.the_integer, twice.the_integer);
    assert_eq!(once.the_class, twice.the_class);
    assert_eq!(once.the_string_resource, twice.the_string_resource);
    assert_eq!(once.metadata_string, twice.metadata_string);
}

// ============================================================================
// 2. SINGLE-MEMBER TESTS
// ============================================================================

#[derive(Debug, Default, Clone)]
struct Greeting {
    greeting: String,
    answer: i64,
    icon: i64,
    missing: String,
}

static GREETING: Lazy<Bindings<Greeting>> = Lazy::new(|| {
    Bindings::builder()
        .field("greeting", BindingDeclaration::field_name(), |t: &mut Greeting, v| t.greeting = v)
        .field("answer", BindingDeclaration::new("answer"), |t: &mut Greeting, v| t.answer = v)
        .field(
            "icon",
            BindingDeclaration::new("icon").indirect().kind(Kind::Color),
            |t: &mut Greeting, v| t.icon = v,
        )
        .field("missing", BindingDeclaration::new("missing.key"), |t: &mut Greeting, v| {
            t.missing = v
        })
        .build()
        .unwrap()
});

impl MetadataBound for Greeting {
    fn bindings() -> &'static Bindings<Self> {
        &GREETING
    }
}

fn greeting_defaults() -> Greeting {
    Greeting {
        greeting: "unset".into(),
        answer: -1,
        icon: -1,
        missing: "default".into(),
    }
}

#[test]
fn direct_string_field() {
    let store = MetadataStore::from_entries([("greeting", "Hello, World!")]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = greeting_defaults();
    decoder.bind(&mut target).unwrap();
    assert_eq!(target.greeting, "Hello, World!");
}

#[test]
fn direct_integer_field() {
    let store = MetadataStore::from_entries([("answer", 42)]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = greeting_defaults();
    decoder.bind(&mut target).unwrap();
    assert_eq!(target.answer, 42);
}

#[test]
fn indirect_field_uses_declared_kind() {
    let store = MetadataStore::from_entries([("icon", 101)]);
    let resources = InMemoryResources::new().with_color(101, 0x000000);
    let (decoder, resources) = decoder_for(store, resources);

    let mut target = greeting_defaults();
    decoder.bind(&mut target).unwrap();
    assert_eq!(target.icon, 0x000000);
    assert_eq!(resources.calls(), vec![(101, Kind::Color)]);
}

#[test]
fn absent_key_keeps_default() {
    let store = MetadataStore::from_entries([("greeting", "Hello, World!")]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = greeting_defaults();
    let report = decoder.bind(&mut target).unwrap();

    assert_eq!(target.missing, "default");
    assert_eq!(target.answer, -1);
    assert_eq!(target.icon, -1);
    assert_eq!(report.applied, vec!["greeting"]);
    assert_eq!(report.skipped, vec!["answer", "icon", "missing"]);
}

#[test]
fn absent_key_skips_setter() {
    #[derive(Default)]
    struct Labelled {
        label: String,
        calls: usize,
    }

    let bindings = Bindings::builder()
        .method("set_label", BindingDeclaration::new("app.label"), |t: &mut Labelled, v: String| {
            t.calls += 1;
            t.label = v
        })
        .build()
        .unwrap();

    let store = MetadataStore::from_entries([("app.title", "unrelated")]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = Labelled {
        label: "keep".into(),
        calls: 0,
    };
    let report = decoder.bind_with(&mut target, &bindings).unwrap();

    assert_eq!(target.label, "keep");
    assert_eq!(target.calls, 0);
    assert_eq!(report.skipped, vec!["set_label"]);
    assert!(report.applied.is_empty());
}

#[test]
fn empty_store_binds_nothing() {
    let (decoder, resources) = decoder_for(MetadataStore::new(), InMemoryResources::new());

    let mut target = greeting_defaults();
    decoder.bind(&mut target).unwrap();
    assert_eq!(target.greeting, "unset");
    assert!(resources.calls().is_empty());
}

#[test]
fn hint_wins_over_inference_for_integer_member() {
    // An i64 member would infer `integer`; the declared `color` hint is used instead
    let store = MetadataStore::from_entries([("icon", 101)]);
    let resources = InMemoryResources::new().with_color(101, 0xFF12_3456);
    let (decoder, resources) = decoder_for(store, resources);

    let mut target = greeting_defaults();
    decoder.bind(&mut target).unwrap();
    assert_eq!(target.icon, 0xFF12_3456);
    assert_eq!(resources.kinds_requested(101), vec![Kind::Color]);
}

#[test]
fn target_without_bindings_is_noop() {
    #[derive(Default, PartialEq, Debug)]
    struct Plain {
        value: i32,
    }

    let store = MetadataStore::from_entries([("value", 9)]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut plain = Plain::default();
    let report = decoder.bind_with(&mut plain, &Bindings::empty()).unwrap();
    assert_eq!(plain, Plain::default());
    assert_eq!(report, Default::default());
}

// ============================================================================
// 3. FAILURE TESTS
// ============================================================================

#[derive(Debug, Default, Clone)]
struct Worker {
    name: String,
    worker: Option<TypeHandle>,
    retries: i64,
}

static WORKER: Lazy<Bindings<Worker>> = Lazy::new(|| {
    Bindings::builder()
        .field("name", BindingDeclaration::field_name(), |t: &mut Worker, v| t.name = v)
        .field("worker", BindingDeclaration::field_name(), |t: &mut Worker, v: TypeHandle| {
            t.worker = Some(v)
        })
        .field("retries", BindingDeclaration::field_name(), |t: &mut Worker, v| t.retries = v)
        .build()
        .unwrap()
});

impl MetadataBound for Worker {
    fn bindings() -> &'static Bindings<Self> {
        &WORKER
    }
}

fn worker_store(class_name: &str) -> MetadataStore {
    MetadataStore::from_entries([
        ("name", Value::from("indexer")),
        ("worker", Value::from(class_name)),
        ("retries", Value::from(3)),
    ])
}

#[test]
fn class_identifier_loaded() {
    let store = worker_store("com.onehilltech.metadata.test.TestClass");
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = Worker::default();
    decoder.bind(&mut target).unwrap();

    let handle = target.worker.unwrap();
    assert!(handle.is::<TestClass>());
    assert_eq!(handle.name(), "com.onehilltech.metadata.test.TestClass");
    assert_eq!(target.retries, 3);
}

#[test]
fn unknown_class_aborts_with_partial_application() {
    let store = worker_store("com.example.DoesNotExist");
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = Worker::default();
    let err = decoder.bind(&mut target).unwrap_err();

    assert!(matches!(err, MetabindError::ClassResolution { .. }));
    assert!(err.is_fatal());
    // bound before the failure
    assert_eq!(target.name, "indexer");
    // never reached
    assert_eq!(target.retries, 0);
    assert!(target.worker.is_none());
}

#[test]
fn all_or_nothing_leaves_target_untouched() {
    let store = worker_store("com.example.DoesNotExist");
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = Worker::default();
    assert!(decoder.bind_atomic(&mut target).is_err());
    assert_eq!(target.name, "");

    let store = worker_store("com.onehilltech.metadata.test.TestClass");
    let (decoder, _) = decoder_for(store, InMemoryResources::new());
    decoder.bind_atomic(&mut target).unwrap();
    assert_eq!(target.name, "indexer");
    assert_eq!(target.retries, 3);
}

#[test]
fn configured_mode_selects_all_or_nothing() {
    use metabind::{BindMode, DecoderOptions};

    let store = worker_store("com.example.DoesNotExist");
    let (decoder, _) = decoder_for(store, InMemoryResources::new());
    let decoder = decoder.with_options(DecoderOptions::default().with_mode(BindMode::AllOrNothing));

    let mut target = Worker::default();
    assert!(decoder.bind_configured(&mut target).is_err());
    assert_eq!(target.name, "");
}

#[test]
fn indirect_non_integer_is_type_mismatch() {
    let store = MetadataStore::from_entries([("icon", "@drawable/icon")]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = greeting_defaults();
    let err = decoder.bind(&mut target).unwrap_err();
    assert!(matches!(err, MetabindError::TypeMismatch { .. }));
    assert_eq!(target.icon, -1);
}

#[test]
fn direct_value_of_wrong_type_is_incompatible() {
    let store = MetadataStore::from_entries([("answer", "forty-two")]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut target = greeting_defaults();
    let err = decoder.bind(&mut target).unwrap_err();
    assert!(err.to_string().contains("META-003"));
    assert!(!err.is_fatal());
}

#[test]
fn uninferable_member_is_left_unset() {
    #[derive(Default)]
    struct Icon {
        icon: Option<metabind::DrawableHandle>,
        label: String,
    }

    let bindings = Bindings::builder()
        .field("icon", BindingDeclaration::new("icon").indirect(), |t: &mut Icon, v| {
            t.icon = Some(v)
        })
        .field("label", BindingDeclaration::field_name(), |t: &mut Icon, v| t.label = v)
        .build()
        .unwrap();

    let store = MetadataStore::from_entries([("icon", Value::from(5)), ("label", Value::from("ok"))]);
    let (decoder, resources) = decoder_for(store, InMemoryResources::new());

    let mut target = Icon::default();
    let report = decoder.bind_with(&mut target, &bindings).unwrap();

    assert!(target.icon.is_none());
    assert_eq!(target.label, "ok");
    assert_eq!(report.unresolved, vec!["icon"]);
    assert!(resources.calls().is_empty());
}

#[test]
fn opaque_member_without_hint_is_left_unset() {
    #[derive(Default)]
    struct Holder {
        handle: Option<OpaqueHandle>,
        label: String,
    }

    let bindings = Bindings::builder()
        .field("handle", BindingDeclaration::new("h").indirect(), |t: &mut Holder, v: OpaqueHandle| {
            t.handle = Some(v)
        })
        .field("label", BindingDeclaration::field_name(), |t: &mut Holder, v| t.label = v)
        .build()
        .unwrap();

    let store = MetadataStore::from_entries([("h", Value::from(5)), ("label", Value::from("ok"))]);
    let resources =
        InMemoryResources::new().with_drawable(5, OpaqueHandle::new(Kind::Drawable, "ic.png"));
    let (decoder, resources) = decoder_for(store, resources);

    let mut target = Holder::default();
    let report = decoder.bind_with(&mut target, &bindings).unwrap();

    assert!(target.handle.is_none());
    assert_eq!(target.label, "ok");
    assert_eq!(report.unresolved, vec!["handle"]);
    assert!(resources.calls().is_empty());
}

#[test]
fn opaque_member_with_hint_is_resolved() {
    #[derive(Default)]
    struct Holder {
        handle: Option<OpaqueHandle>,
    }

    let bindings = Bindings::builder()
        .field(
            "handle",
            BindingDeclaration::new("h").indirect().kind(Kind::Drawable),
            |t: &mut Holder, v: OpaqueHandle| t.handle = Some(v),
        )
        .build()
        .unwrap();

    let drawable = OpaqueHandle::new(Kind::Drawable, "ic.png");
    let store = MetadataStore::from_entries([("h", 5)]);
    let resources = InMemoryResources::new().with_drawable(5, drawable.clone());
    let (decoder, _) = decoder_for(store, resources);

    let mut target = Holder::default();
    decoder.bind_with(&mut target, &bindings).unwrap();
    assert_eq!(target.handle, Some(drawable));
}

#[test]
fn drawable_with_explicit_hint() {
    #[derive(Default)]
    struct Icon {
        icon: Option<metabind::DrawableHandle>,
    }

    let bindings = Bindings::builder()
        .field(
            "icon",
            BindingDeclaration::new("icon").indirect().kind(Kind::Drawable),
            |t: &mut Icon, v| t.icon = Some(v),
        )
        .build()
        .unwrap();

    let drawable = OpaqueHandle::new(Kind::Drawable, "ic_launcher.png");
    let store = MetadataStore::from_entries([("icon", 5)]);
    let resources = InMemoryResources::new().with_drawable(5, drawable.clone());
    let (decoder, _) = decoder_for(store, resources);

    let mut target = Icon::default();
    decoder.bind_with(&mut target, &bindings).unwrap();
    assert_eq!(target.icon.map(|d| d.0), Some(drawable));
}

#[test]
fn fallible_setter_error_propagates() {
    #[derive(Default)]
    struct Limits {
        max: i64,
    }

    let bindings = Bindings::builder()
        .try_method("set_max", BindingDeclaration::new("limits.max"), |t: &mut Limits, v: i64| {
            if v < 0 {
                return Err(MetabindError::IncompatibleValue {
                    key: "limits.max".into(),
                    target: "non-negative i64",
                    found: "negative integer",
                });
            }
            t.max = v;
            Ok(())
        })
        .build()
        .unwrap();

    let store = MetadataStore::from_entries([("limits.max", -5)]);
    let (decoder, _) = decoder_for(store, InMemoryResources::new());

    let mut limits = Limits::default();
    assert!(decoder.bind_with(&mut limits, &bindings).is_err());
    assert_eq!(limits.max, 0);
}
