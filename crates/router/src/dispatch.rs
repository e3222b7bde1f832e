//! The dispatch core
//!
//! `LogRouter` owns the sink registry, the tenant collaborator, and the
//! console sink. Targets are staged with their settings and provisioned
//! lazily: the first record for a staged base path renders the rotated
//! file name for each selected level and registers a sink per name.
//!
//! `emit` never returns an error. Logging sits on every hot path of the
//! host application, so per-record failures are throttled onto stderr
//! and the record is dropped rather than bubbling an error into the code
//! that issued the log call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use fanlog_config::{ConfigError, SinkSettings, DEFAULT_FORMAT};
use fanlog_sinks::{
    markup, ConsoleSink, ErrorThrottle, FileSink, FileSinkConfig, LineTemplate, LineValues,
};

use crate::context::bind;
use crate::error::{Result, RouterError};
use crate::filter::LevelFilter;
use crate::frames::resolve;
use crate::record::LogRecord;
use crate::registry::{RegisteredSink, SinkRegistry};
use crate::tenant::{SingleTenant, TenantProvider};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

enum TargetState {
    /// Settings accepted, sinks not yet provisioned
    Staged {
        settings: SinkSettings,
        template: Arc<LineTemplate>,
    },
    /// Sinks provisioned for the current bucket at least once
    Active {
        settings: SinkSettings,
        template: Arc<LineTemplate>,
    },
}

/// The log fan-out router
pub struct LogRouter {
    registry: Arc<SinkRegistry>,
    targets: Mutex<HashMap<PathBuf, TargetState>>,
    tenants: Arc<dyn TenantProvider>,
    console: ConsoleSink,
    framework_file: PathBuf,
    failures: ErrorThrottle,
    default_template: Arc<LineTemplate>,
}

impl LogRouter {
    /// Router with no targets and no tenant context
    ///
    /// `framework_file` is the host logging wrapper's source file, used
    /// to unwind caller attribution past the wrapper's own frames.
    pub fn new(framework_file: impl Into<PathBuf>) -> Self {
        let default_template = Arc::new(
            LineTemplate::parse(DEFAULT_FORMAT).unwrap_or_else(|_| LineTemplate::plain_message()),
        );
        Self {
            registry: Arc::new(SinkRegistry::new()),
            targets: Mutex::new(HashMap::new()),
            tenants: Arc::new(SingleTenant),
            console: ConsoleSink::new(),
            framework_file: framework_file.into(),
            failures: ErrorThrottle::default(),
            default_template,
        }
    }

    /// Replace the tenant collaborator
    #[must_use]
    pub fn with_tenant_provider(mut self, tenants: Arc<dyn TenantProvider>) -> Self {
        self.tenants = tenants;
        self
    }

    /// Use a plain (markup-stripped) console sink
    #[must_use]
    pub fn with_plain_console(mut self) -> Self {
        self.console = ConsoleSink::plain();
        self
    }

    /// The sink registry, for inspection
    pub fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    /// Stage a target without provisioning its sinks
    ///
    /// The format template is parsed here so a bad template fails the
    /// setup call instead of being discovered on the first record.
    ///
    /// # Errors
    ///
    /// Returns a config error when the format template does not parse.
    pub fn stage_target(&self, settings: SinkSettings) -> Result<()> {
        let template = LineTemplate::parse(settings.format_template())
            .map_err(|e| ConfigError::invalid_value("format", e.to_string()))?;
        self.targets.lock().insert(
            settings.path.clone(),
            TargetState::Staged {
                settings,
                template: Arc::new(template),
            },
        );
        Ok(())
    }

    /// Stage a target and provision its sinks immediately
    ///
    /// # Errors
    ///
    /// Returns a config error on a bad format template and a sink error
    /// when a file cannot be opened.
    pub fn add_target(&self, settings: SinkSettings) -> Result<()> {
        let path = settings.path.clone();
        self.stage_target(settings)?;
        self.configure_target(&path)
    }

    /// Provision sinks for a staged target in the current time bucket
    ///
    /// Idempotent within a bucket: file names already registered are left
    /// alone. Called again in a later bucket it provisions the new
    /// bucket's files and retires the previous bucket's sinks, so each
    /// (level, origin) pair keeps exactly one active sink.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTarget` for a path never staged and a sink error
    /// when provisioning fails.
    pub fn configure_target(&self, path: &Path) -> Result<()> {
        let (settings, template) = {
            let targets = self.targets.lock();
            match targets.get(path) {
                Some(TargetState::Staged { settings, template })
                | Some(TargetState::Active { settings, template }) => {
                    (settings.clone(), Arc::clone(template))
                }
                None => return Err(RouterError::unknown_target(path.display().to_string())),
            }
        };

        let now = Local::now();
        for level in settings.levels.levels() {
            let config = FileSinkConfig::from_settings(&settings, level);
            let file_name = config.file_name_at(now);
            let filter = LevelFilter::new(level, path);
            let template = Arc::clone(&template);
            self.registry.register(file_name, move || {
                Ok(RegisteredSink {
                    filter,
                    template,
                    sink: FileSink::open(config)?,
                })
            })?;
        }

        let mut targets = self.targets.lock();
        if let Some(state) = targets.remove(path) {
            let (settings, template) = match state {
                TargetState::Staged { settings, template }
                | TargetState::Active { settings, template } => (settings, template),
            };
            targets.insert(path.to_path_buf(), TargetState::Active { settings, template });
        }
        Ok(())
    }

    /// Fan one record out to every matching sink and the console
    ///
    /// Never fails: provisioning and write errors are throttled onto
    /// stderr and the record continues to the remaining sinks.
    pub fn emit(&self, record: &LogRecord) {
        self.ensure_configured(&record.origin);

        if let Some(frame) = &record.frame {
            let attribution = resolve(frame, &self.framework_file);
            tracing::trace!(
                file = %attribution.file.display(),
                line = attribution.line,
                depth = attribution.depth,
                "caller attribution"
            );
        }

        let bound = bind(record, self.tenants.as_ref());

        let mut message = bound.message;
        if let Some(exception) = &record.exception {
            message.push('\n');
            message.push_str(exception);
        }
        if let Some(schema) = &bound.context.schema_name {
            match &bound.context.domain_url {
                Some(domain) => {
                    tracing::trace!(schema_name = %schema, domain_url = %domain, "tenant bound")
                }
                None => tracing::trace!(schema_name = %schema, "tenant bound"),
            }
        }

        let time = record.timestamp.with_timezone(&Local).format(TIME_FORMAT).to_string();
        let route_level = record.route_level();
        let level_display = route_level.display();
        let color_level = route_level.color_level();
        let values = LineValues {
            time: &time,
            client_addr: bound.context.client.as_deref().unwrap_or("-"),
            level: &level_display,
            message: &message,
        };

        let console_template = {
            let targets = self.targets.lock();
            match targets.get(&record.origin) {
                Some(TargetState::Active { template, .. })
                | Some(TargetState::Staged { template, .. }) => Arc::clone(template),
                None => Arc::clone(&self.default_template),
            }
        };
        self.console
            .write_line(&console_template.render(&values), color_level);

        for entry in self.registry.matching(record) {
            let line = markup::strip(&entry.template.render(&values));
            if let Err(e) = entry.sink.write_line(&line) {
                if self.failures.report("sink write", &e) {
                    self.console.write_line(
                        &format!("<red>log write failed: {}</red>", e),
                        fanlog_config::Level::Error,
                    );
                }
            }
        }
    }

    /// Flush every registered sink
    pub fn flush(&self) {
        for entry in self.registry.all() {
            if let Err(e) = entry.sink.flush() {
                self.failures.report("sink flush", &e);
            }
        }
    }

    /// Provision a staged target on first use; errors are throttled, not
    /// returned, because this runs on the emit path.
    fn ensure_configured(&self, origin: &Path) {
        let staged = {
            let targets = self.targets.lock();
            matches!(targets.get(origin), Some(TargetState::Staged { .. }))
        };
        if staged {
            if let Err(e) = self.configure_target(origin) {
                self.failures.report("lazy sink provisioning", &e);
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;
