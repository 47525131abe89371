use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use resforge::{DbDriver, FieldDescriptor, Generator, StorageKind, TypeDescriptor};

// The pipeline writes storage and middleware to fixed relative paths, so
// tests that run it serialize on the process working directory.
static CWD_LOCK: Mutex<()> = Mutex::new(());

fn lock_cwd() -> MutexGuard<'static, ()> {
    CWD_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn enter_scratch_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::env::set_current_dir(dir.path()).expect("chdir into scratch dir");
    dir
}

fn device_descriptor() -> TypeDescriptor {
    TypeDescriptor::new("Device", "crate::resources::device")
        .section(
            "Spec",
            vec![
                FieldDescriptor::new("ComponentType", "String")
                    .json("componentType")
                    .validate("required"),
                FieldDescriptor::new("Manufacturer", "String").json("manufacturer,omitempty"),
                FieldDescriptor::new("Tags", "Vec<String>").json("tags,omitempty"),
            ],
        )
        .section(
            "Status",
            vec![
                FieldDescriptor::new("NumericID", "i64").json("numericId,omitempty"),
                FieldDescriptor::new("Healthy", "bool").json("healthy,omitempty"),
            ],
        )
}

fn location_descriptor() -> TypeDescriptor {
    TypeDescriptor::new("Location", "crate::resources::location")
        .section(
            "Spec",
            vec![FieldDescriptor::new("LocationName", "String")
                .json("locationName")
                .validate("required")],
        )
        .section(
            "Status",
            vec![FieldDescriptor::new("DeviceCount", "i32").json("deviceCount,omitempty")],
        )
}

fn without_timestamp(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.contains("Generated at"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_main_pipeline_emits_expected_file_set() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "main", "github.com/example/fru-service");
    generator.register_resource(&device_descriptor());
    generator.register_resource(&location_descriptor());
    generator.generate_all().expect("main pipeline");

    for path in [
        "out/models_generated.rs",
        "out/flat_models_generated.rs",
        "out/device_handlers_generated.rs",
        "out/device_flat_handlers_generated.rs",
        "out/location_handlers_generated.rs",
        "out/location_flat_handlers_generated.rs",
        "out/routes_generated.rs",
        "out/openapi_generated.rs",
        "internal/storage/storage_generated.rs",
        "internal/middleware/validation_middleware_generated.rs",
        "internal/middleware/conditional_middleware_generated.rs",
        "internal/middleware/versioning_middleware_generated.rs",
    ] {
        assert!(Path::new(path).exists(), "missing generated file {path}");
    }

    // Events are disabled by default, so no bus module is emitted.
    assert!(!Path::new("internal/middleware/event_bus_generated.rs").exists());

    let models = fs::read_to_string("out/models_generated.rs").expect("read models");
    assert!(models.contains("pub struct Device"));
    assert!(models.contains("pub struct DeviceSpec"));
    assert!(models.contains("pub struct LocationStatus"));
    assert!(models.contains("DO NOT EDIT"));

    let flat = fs::read_to_string("out/flat_models_generated.rs").expect("read flat models");
    assert!(flat.contains("pub struct DeviceFlat"));
    assert!(flat.contains("DEVICE_WRITABLE_FIELDS"));
    assert!(flat.contains("\"componentType\""));

    let storage = fs::read_to_string("internal/storage/storage_generated.rs").expect("read storage");
    assert!(storage.contains("pub fn save_device"));
    assert!(storage.contains("pub fn list_locations"));
    assert!(storage.contains("FRU_SERVICE_DATA_DIR"));

    let routes = fs::read_to_string("out/routes_generated.rs").expect("read routes");
    assert!(routes.contains("\"/devices\""));
    assert!(routes.contains("\"/flat/locations\""));

    let openapi = fs::read_to_string("out/openapi_generated.rs").expect("read openapi");
    assert!(openapi.contains("\"componentType\": \"example-value\""));
    assert!(openapi.contains("Fru Service API"));

    let validation = fs::read_to_string("internal/middleware/validation_middleware_generated.rs")
        .expect("read validation middleware");
    assert!(validation.contains("pub const VALIDATION_MODE: &str = \"strict\""));

    let conditional = fs::read_to_string("internal/middleware/conditional_middleware_generated.rs")
        .expect("read conditional middleware");
    assert!(conditional.contains("sha256"));
}

#[test]
fn test_regeneration_is_deterministic_modulo_timestamp() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "main", "github.com/example/fru-service");
    generator.register_resource(&device_descriptor());
    generator.generate_all().expect("first run");

    let models_first = fs::read_to_string("out/models_generated.rs").expect("read models");
    let handlers_first =
        fs::read_to_string("out/device_handlers_generated.rs").expect("read handlers");

    generator.generate_all().expect("second run");

    let models_second = fs::read_to_string("out/models_generated.rs").expect("read models");
    let handlers_second =
        fs::read_to_string("out/device_handlers_generated.rs").expect("read handlers");

    assert_eq!(
        without_timestamp(&models_first),
        without_timestamp(&models_second)
    );
    assert_eq!(
        without_timestamp(&handlers_first),
        without_timestamp(&handlers_second)
    );
}

#[test]
fn test_unsupported_package_kind_fails_before_generation() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "worker", "github.com/example/fru-service");
    generator.register_resource(&device_descriptor());

    let err = generator.generate_all().unwrap_err();
    assert!(err.to_string().contains("unsupported package kind: worker"));
    assert!(!Path::new("out").exists());
    assert!(!Path::new("internal").exists());
}

#[test]
fn test_client_pipeline() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "client", "github.com/example/fru-service");
    generator.register_resource(&device_descriptor());
    generator.generate_all().expect("client pipeline");

    assert!(Path::new("out/client_generated.rs").exists());
    assert!(Path::new("out/models_generated.rs").exists());

    let client = fs::read_to_string("out/client_generated.rs").expect("read client");
    assert!(client.contains("pub struct Client"));
    assert!(client.contains("pub fn list_devices"));
    assert!(client.contains("pub fn delete_device"));
}

#[test]
fn test_client_cmd_lands_in_cmd_client() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "client", "github.com/example/fru-service");
    generator.register_resource(&device_descriptor());
    generator.load_templates().expect("load templates");
    generator.generate_client_cmd().expect("client cmd");

    let main_rs = fs::read_to_string("cmd/client/main.rs").expect("read cli");
    assert!(main_rs.contains("fn main()"));
    assert!(main_rs.contains("package main"));
    assert!(main_rs.contains("\"device\""));
}

#[test]
fn test_reconcile_pipeline_stub_once() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "reconcile", "github.com/example/fru-service");
    generator.register_resource(&device_descriptor());
    generator.generate_all().expect("first run");

    for path in [
        "out/device_reconciler_generated.rs",
        "out/device_reconciler.rs",
        "out/registration_generated.rs",
        "out/event_handlers_generated.rs",
    ] {
        assert!(Path::new(path).exists(), "missing generated file {path}");
    }

    let stub = fs::read_to_string("out/device_reconciler.rs").expect("read stub");
    assert!(stub.contains("DeviceReconciler"));
    assert!(!stub.contains("DO NOT EDIT"));

    // Simulate user edits: the stub must survive, the companion must not.
    let sentinel = "// user-owned reconcile logic\n";
    fs::write("out/device_reconciler.rs", sentinel).expect("edit stub");
    fs::write("out/device_reconciler_generated.rs", "// stale\n").expect("clobber companion");

    generator.generate_all().expect("second run");

    let stub = fs::read_to_string("out/device_reconciler.rs").expect("read stub");
    assert_eq!(stub, sentinel);

    let companion =
        fs::read_to_string("out/device_reconciler_generated.rs").expect("read companion");
    assert!(companion.contains("DO NOT EDIT"));
    assert!(!companion.contains("// stale"));
}

#[test]
fn test_ent_pipeline_emits_schemas_and_adapter() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "main", "github.com/example/fru-service");
    generator.set_storage_kind(StorageKind::Ent);
    generator.set_db_driver(DbDriver::Postgres);
    generator.register_resource(&device_descriptor());
    generator.generate_all().expect("ent pipeline");

    for path in [
        "internal/storage/ent/schema/resource.rs",
        "internal/storage/ent/schema/label.rs",
        "internal/storage/ent/schema/annotation.rs",
        "internal/storage/ent_adapter.rs",
        "internal/storage/generate.rs",
        "internal/storage/storage_generated.rs",
    ] {
        assert!(Path::new(path).exists(), "missing generated file {path}");
    }

    let storage = fs::read_to_string("internal/storage/storage_generated.rs").expect("read storage");
    assert!(storage.contains("EntAdapter"));

    let adapter = fs::read_to_string("internal/storage/ent_adapter.rs").expect("read adapter");
    assert!(adapter.contains("pub const DB_DRIVER: &str = \"postgres\""));
    assert!(adapter.contains("postgres://localhost:5432/fru_service"));
}

#[test]
fn test_event_bus_emitted_when_enabled() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "main", "github.com/example/fru-service");
    generator.config.events_enabled = true;
    generator.register_resource(&device_descriptor());
    generator.generate_all().expect("main pipeline");

    let bus = fs::read_to_string("internal/middleware/event_bus_generated.rs").expect("read bus");
    assert!(bus.contains("pub const EVENT_BUS_TYPE: &str = \"memory\""));
    assert!(bus.contains("EVENTS_ENABLED: bool = true"));
}

#[test]
fn test_set_version_is_stamped_into_output() {
    let _guard = lock_cwd();
    let _scratch = enter_scratch_dir();

    let mut generator = Generator::new("out", "client", "github.com/example/fru-service");
    generator.set_version("9.9.9-test");
    generator.register_resource(&device_descriptor());
    generator.generate_all().expect("client pipeline");

    let client = fs::read_to_string("out/client_generated.rs").expect("read client");
    assert!(client.contains("9.9.9-test"));
}
