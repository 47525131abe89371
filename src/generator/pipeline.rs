//! The generation pipeline: which templates run, in which order, producing
//! which files under which directories.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use super::format::format_source;
use super::Generator;
use crate::config::StorageKind;

impl Generator {
    /// Generate all code artifacts for the configured package kind.
    ///
    /// This is the single pipeline entry point; it loads templates first and
    /// then runs the sub-pipeline selected by `package_name`. Partial
    /// artifacts are not rolled back on failure; generation is deterministic
    /// and cheap to re-run.
    pub fn generate_all(&mut self) -> anyhow::Result<()> {
        self.load_templates()?;

        match self.package_name.as_str() {
            "main" => {
                // Server code: models, handlers, middleware, routes,
                // storage and the OpenAPI document.
                if self.config.storage_type == StorageKind::Ent {
                    self.generate_ent_schemas()?;
                    self.generate_ent_adapter()?;
                }
                self.generate_models()?;
                self.generate_handlers()?;
                self.generate_flat_handlers()?;
                self.generate_middleware()?;
                self.generate_routes()?;
                self.generate_storage()?;
                self.generate_openapi()?;
            }
            "client" => {
                self.generate_client()?;
                self.generate_client_models()?;
            }
            "reconcile" => {
                self.generate_reconcilers()?;
                self.generate_reconciler_registration()?;
                self.generate_event_handlers()?;
            }
            other => anyhow::bail!("unsupported package kind: {other}"),
        }

        Ok(())
    }

    /// Generate request/response models (envelope and flat forms).
    pub fn generate_models(&self) -> anyhow::Result<()> {
        println!("📊 Generating models...");

        let context = self.global_context("server/models.rs.j2");
        self.emit(
            "models",
            &context,
            &self.output_dir.join("models_generated.rs"),
        )?;

        let flat_context = self.global_context("server/flat_models.rs.j2");
        self.emit(
            "flatModels",
            &flat_context,
            &self.output_dir.join("flat_models_generated.rs"),
        )
    }

    /// Generate REST handlers (envelope API) for every resource.
    pub fn generate_handlers(&self) -> anyhow::Result<()> {
        println!("🛠️  Generating handlers...");
        for resource in &self.resources {
            let context = self.resource_context(resource, "server/handlers.rs.j2");
            let path = self
                .output_dir
                .join(format!("{}_handlers_generated.rs", resource.name.to_lowercase()));
            self.emit("handlers", &context, &path)
                .with_context(|| format!("handlers stage failed for resource {}", resource.name))?;
        }
        Ok(())
    }

    /// Generate REST handlers for the flat API.
    pub fn generate_flat_handlers(&self) -> anyhow::Result<()> {
        println!("🛠️  Generating flat handlers...");
        for resource in &self.resources {
            let context = self.resource_context(resource, "server/flat_handlers.rs.j2");
            let path = self.output_dir.join(format!(
                "{}_flat_handlers_generated.rs",
                resource.name.to_lowercase()
            ));
            self.emit("flatHandlers", &context, &path).with_context(|| {
                format!("flat handlers stage failed for resource {}", resource.name)
            })?;
        }
        Ok(())
    }

    /// Generate middleware components enabled by the configuration.
    pub fn generate_middleware(&self) -> anyhow::Result<()> {
        println!("⚙️  Generating middleware...");
        let middleware_dir = Path::new("internal").join("middleware");

        if self.config.validation_enabled {
            let context = self.middleware_context("middleware/validation.rs.j2");
            self.emit(
                "middlewareValidation",
                &context,
                &middleware_dir.join("validation_middleware_generated.rs"),
            )?;
        }
        if self.config.conditional_enabled {
            let context = self.middleware_context("middleware/conditional.rs.j2");
            self.emit(
                "middlewareConditional",
                &context,
                &middleware_dir.join("conditional_middleware_generated.rs"),
            )?;
        }
        if self.config.versioning_enabled {
            let context = self.middleware_context("middleware/versioning.rs.j2");
            self.emit(
                "middlewareVersioning",
                &context,
                &middleware_dir.join("versioning_middleware_generated.rs"),
            )?;
        }
        if self.config.events_enabled {
            let context = self.middleware_context("middleware/event-bus.rs.j2");
            self.emit(
                "eventBus",
                &context,
                &middleware_dir.join("event_bus_generated.rs"),
            )?;
        }
        Ok(())
    }

    /// Generate route registration code.
    pub fn generate_routes(&self) -> anyhow::Result<()> {
        println!("🛣️  Generating routes...");
        let context = self.global_context("server/routes.rs.j2");
        self.emit(
            "routes",
            &context,
            &self.output_dir.join("routes_generated.rs"),
        )
    }

    /// Generate the storage layer for the configured backend.
    ///
    /// Storage always lands under `internal/storage`, regardless of the
    /// generator's output directory.
    pub fn generate_storage(&self) -> anyhow::Result<()> {
        println!("📁 Generating storage layer ({})...", self.config.storage_type);
        let (template_name, template_path) = match self.config.storage_type {
            StorageKind::File => ("storage", "storage/file.rs.j2"),
            StorageKind::Ent => ("storageEnt", "storage/ent.rs.j2"),
        };
        let context = self.global_context(template_path);
        let path = Path::new("internal")
            .join("storage")
            .join("storage_generated.rs");
        self.emit(template_name, &context, &path)
    }

    /// Generate the OpenAPI specification module.
    pub fn generate_openapi(&self) -> anyhow::Result<()> {
        println!("📋 Generating OpenAPI specification...");
        let context = self.global_context("server/openapi.rs.j2");
        self.emit(
            "openapi",
            &context,
            &self.output_dir.join("openapi_generated.rs"),
        )
    }

    /// Generate the API client library.
    pub fn generate_client(&self) -> anyhow::Result<()> {
        println!("🔌 Generating client library...");
        let context = self.global_context("client/client.rs.j2");
        self.emit(
            "client",
            &context,
            &self.output_dir.join("client_generated.rs"),
        )
    }

    /// Generate models for the client package.
    pub fn generate_client_models(&self) -> anyhow::Result<()> {
        println!("📊 Generating client models...");
        let context = self.global_context("client/models.rs.j2");
        self.emit(
            "clientModels",
            &context,
            &self.output_dir.join("models_generated.rs"),
        )
    }

    /// Generate the CLI client.
    ///
    /// The CLI always lands in `cmd/client` with package `main`, not in the
    /// generator's output directory.
    pub fn generate_client_cmd(&self) -> anyhow::Result<()> {
        println!("⚡ Generating CLI client...");
        let mut context = self.global_context("client/cmd.rs.j2");
        context.package_name = "main".to_string();
        let path = Path::new("cmd").join("client").join("main.rs");
        self.emit("clientCmd", &context, &path)
    }

    /// Generate reconciler code for every resource.
    ///
    /// Each resource gets a `_generated` companion that is always
    /// overwritten and a user-owned stub written only when absent.
    pub fn generate_reconcilers(&self) -> anyhow::Result<()> {
        println!("🔄 Generating reconcilers...");
        for resource in &self.resources {
            let lower = resource.name.to_lowercase();

            let context = self.resource_context(resource, "reconciliation/reconciler.rs.j2");
            let companion = self
                .output_dir
                .join(format!("{lower}_reconciler_generated.rs"));
            self.emit("reconciler", &context, &companion).with_context(|| {
                format!("reconciler stage failed for resource {}", resource.name)
            })?;

            let stub = self.output_dir.join(format!("{lower}_reconciler.rs"));
            if !stub.exists() {
                let stub_context = self.resource_context(resource, "reconciliation/stub.rs.j2");
                self.emit("reconcilerStub", &stub_context, &stub).with_context(|| {
                    format!("reconciler stub stage failed for resource {}", resource.name)
                })?;
            }
        }
        Ok(())
    }

    /// Generate the reconciler registration module.
    pub fn generate_reconciler_registration(&self) -> anyhow::Result<()> {
        let context = self.global_context("reconciliation/registration.rs.j2");
        self.emit(
            "reconcilerRegistration",
            &context,
            &self.output_dir.join("registration_generated.rs"),
        )
    }

    /// Generate cross-resource event handler code.
    pub fn generate_event_handlers(&self) -> anyhow::Result<()> {
        let context = self.global_context("reconciliation/event-handlers.rs.j2");
        self.emit(
            "eventHandlers",
            &context,
            &self.output_dir.join("event_handlers_generated.rs"),
        )
    }

    /// Generate entity schema modules for the entity storage backend.
    pub fn generate_ent_schemas(&self) -> anyhow::Result<()> {
        if self.config.storage_type != StorageKind::Ent {
            return Ok(());
        }
        println!("🗄️  Generating entity schemas...");

        let schema_dir = Path::new("internal")
            .join("storage")
            .join("ent")
            .join("schema");
        for (template_name, file) in [
            ("entSchemaResource", "resource.rs"),
            ("entSchemaLabel", "label.rs"),
            ("entSchemaAnnotation", "annotation.rs"),
        ] {
            let context = self.stamp_context(template_name);
            self.emit(template_name, &context, &schema_dir.join(file))?;
        }
        Ok(())
    }

    /// Generate the adapter between generated resources and entity rows,
    /// plus the schema code-generation driver.
    pub fn generate_ent_adapter(&self) -> anyhow::Result<()> {
        if self.config.storage_type != StorageKind::Ent {
            return Ok(());
        }
        println!("🔗 Generating entity adapter...");

        let storage_dir = Path::new("internal").join("storage");
        let context = self.global_context("storage/adapter.rs.j2");
        self.emit("entAdapter", &context, &storage_dir.join("ent_adapter.rs"))?;

        let stamp = self.stamp_context("generate");
        self.emit("generate", &stamp, &storage_dir.join("generate.rs"))
    }

    /// Render a template, format `.rs` output and write it atomically.
    fn emit<C: Serialize>(
        &self,
        template_name: &str,
        context: &C,
        path: &Path,
    ) -> anyhow::Result<()> {
        let rendered = self.store()?.render(template_name, context)?;

        let output = if path.extension().and_then(|e| e.to_str()) == Some("rs") {
            format_source(&rendered)
                .with_context(|| format!("failed to format generated code for {}", path.display()))?
        } else {
            rendered
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }
        fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?;

        if self.verbose {
            println!("  ✓ Generated {} ({template_name})", path.display());
        } else {
            println!("  ✓ Generated {}", path.display());
        }
        Ok(())
    }
}
