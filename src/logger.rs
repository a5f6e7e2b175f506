//! The logging pipeline.
//!
//! Every entry point funnels into [`Logger::log_at`]:
//!
//! ```text
//! level policy → category resolver → record builder → pre-log hooks
//!     → exception block → sink dispatch
//! ```
//!
//! Shorthand methods capture their caller with `#[track_caller]`; see
//! [`crate::category`] for the call-chain invariant they must uphold.
//!
//! A log call made on a thread that is already inside the pipeline, for
//! example from a pre-log hook, is dropped.

use std::fmt;
use std::sync::Arc;

use crate::category::{CallSite, resolve_category};
use crate::config::LoggerConfig;
use crate::error::LogError;
use crate::exception::Exception;
use crate::hooks::HookRegistry;
use crate::level::Level;
use crate::policy::{LevelPolicy, VerbositySetting};
use crate::record::RecordBuilder;
use crate::reentry::ReentrancyGuard;
use crate::settings::{SettingsStore, YamlSettingsStore};
use crate::sink::{self, ConsoleSink, LogSink};
use crate::stack_trace::StackTraceFormatter;
use crate::surface::SurfaceCapabilities;

/// Leveled, category-tagged logger.
pub struct Logger {
    policy: LevelPolicy,
    builder: RecordBuilder,
    formatter: StackTraceFormatter,
    hooks: HookRegistry,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    /// Logger writing to `sink`, persisting its verbosity in `settings`.
    pub fn new(
        config: &LoggerConfig,
        sink: Arc<dyn LogSink>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        let capabilities = config.effective_capabilities();
        let project_root = config.effective_project_root();

        let verbosity = config
            .runtime_verbosity
            .then(|| VerbositySetting::new(settings, config.settings_key.clone()));

        log::debug!(
            "Logger created (prefix={}, errors_only={}, runtime_verbosity={}, {:?})",
            config.prefix,
            config.effective_suppression(),
            config.runtime_verbosity,
            capabilities
        );

        Self {
            policy: LevelPolicy::new(config.effective_suppression(), verbosity),
            builder: RecordBuilder::new(config.prefix.clone(), capabilities, project_root.clone()),
            formatter: StackTraceFormatter::new(capabilities, project_root),
            hooks: HookRegistry::new(),
            sink,
        }
    }

    /// Logger writing to the console and persisting to the configured
    /// settings file.
    pub fn from_config(config: &LoggerConfig) -> Self {
        let settings = YamlSettingsStore::new(config.effective_settings_path());
        Self::new(config, Arc::new(ConsoleSink), Arc::new(settings))
    }

    /// The level gate.
    pub fn policy(&self) -> &LevelPolicy {
        &self.policy
    }

    /// Pre-log hook subscription point.
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Capabilities records are decorated for.
    pub fn capabilities(&self) -> SurfaceCapabilities {
        self.builder.capabilities()
    }

    /// Whether a record at `level` would be emitted right now.
    pub fn should_emit(&self, level: Level) -> bool {
        self.policy.should_emit(level)
    }

    /// Current verbosity threshold, or `None` when runtime verbosity is
    /// disabled.
    pub fn verbosity(&self) -> Option<Level> {
        self.policy.verbosity().map(VerbositySetting::get)
    }

    /// Change and persist the verbosity threshold.
    ///
    /// Does nothing when runtime verbosity is disabled.
    pub fn set_verbosity(&self, level: Level) -> Result<(), LogError> {
        match self.policy.verbosity() {
            Some(setting) => setting.set(level),
            None => {
                log::debug!("Runtime verbosity disabled; ignoring set_verbosity({level})");
                Ok(())
            }
        }
    }

    /// Log at [`Level::Info`], inferring the category.
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log_at(Level::Info, "", Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Info`] under `category`.
    #[track_caller]
    pub fn info_in(&self, category: &str, message: impl fmt::Display) {
        self.log_at(Level::Info, category, Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Log`], the host's plain log channel, inferring the
    /// category.
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log_at(Level::Log, "", Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Log`] under `category`.
    #[track_caller]
    pub fn debug_in(&self, category: &str, message: impl fmt::Display) {
        self.log_at(Level::Log, category, Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Warning`], inferring the category.
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log_at(Level::Warning, "", Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Warning`] under `category`.
    #[track_caller]
    pub fn warn_in(&self, category: &str, message: impl fmt::Display) {
        self.log_at(Level::Warning, category, Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Warning`] with an attached error. An empty
    /// `category` is inferred.
    #[track_caller]
    pub fn warn_with(
        &self,
        category: &str,
        message: impl fmt::Display,
        exception: impl Into<Exception>,
    ) {
        let exception = exception.into();
        self.log_at(
            Level::Warning,
            category,
            Some(&message),
            Some(&exception),
            &CallSite::caller(),
        );
    }

    /// Log at [`Level::Error`], inferring the category.
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log_at(Level::Error, "", Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Error`] under `category`.
    #[track_caller]
    pub fn error_in(&self, category: &str, message: impl fmt::Display) {
        self.log_at(Level::Error, category, Some(&message), None, &CallSite::caller());
    }

    /// Log at [`Level::Error`] with an attached error. An empty `category`
    /// is inferred.
    #[track_caller]
    pub fn error_with(
        &self,
        category: &str,
        message: impl fmt::Display,
        exception: impl Into<Exception>,
    ) {
        let exception = exception.into();
        self.log_at(
            Level::Error,
            category,
            Some(&message),
            Some(&exception),
            &CallSite::caller(),
        );
    }

    /// Unifying entry point. An empty `category` is inferred from the caller
    /// and an absent `message` is logged as empty text.
    #[track_caller]
    pub fn log(
        &self,
        level: Level,
        category: &str,
        message: Option<&dyn fmt::Display>,
        exception: Option<&Exception>,
    ) {
        self.log_at(level, category, message, exception, &CallSite::caller());
    }

    /// Run the pipeline for an explicit call site.
    ///
    /// Used by the logging macros and the `log` bridge, which know their call
    /// site without `#[track_caller]`.
    pub fn log_at(
        &self,
        level: Level,
        category: &str,
        message: Option<&dyn fmt::Display>,
        exception: Option<&Exception>,
        call_site: &CallSite<'_>,
    ) {
        // Records emitted from inside the pipeline (hooks, sinks, settings
        // diagnostics) are dropped.
        let Some(_guard) = ReentrancyGuard::enter() else {
            return;
        };
        if !self.policy.should_emit(level) {
            return;
        }

        let resolved = resolve_category(category, call_site);
        let mut record = self.builder.build(level, &resolved, message, call_site);

        self.hooks.invoke(&mut record, category, level);

        if let Some(exception) = exception {
            record.push_str("\n");
            record.push_str(&exception.render(|trace| self.formatter.format(trace)));
        }

        sink::dispatch(self.sink.as_ref(), level, record.as_str());
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("policy", &self.policy)
            .field("builder", &self.builder)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
