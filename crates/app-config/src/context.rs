//! TAO Context
//!
//! Owns the application config for the rest of the process. Consumers get a
//! reference to the context instead of reaching for global state, and every
//! accessor reports `NotInitialized` until [`TaoContext::init`] completes.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use tao_core::{Result, TaoError};
use tao_display::Screen;

use crate::manager::{AppConfig, AppConfigBuilder};
use crate::platform::AppHandle;
use crate::snapshot::ApplicationSnapshot;

/// Init progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Explicit holder of the ready application config
pub struct TaoContext {
    builder: AppConfigBuilder,
    state: RwLock<InitState>,
    current: RwLock<Option<Arc<AppConfig>>>,
}

impl TaoContext {
    pub fn new(builder: AppConfigBuilder) -> Self {
        Self {
            builder,
            state: RwLock::new(InitState::Uninitialized),
            current: RwLock::new(None),
        }
    }

    pub fn state(&self) -> InitState {
        *self.state.read()
    }

    fn set_state(&self, state: InitState) {
        let mut current = self.state.write();
        debug!("State transition: {:?} -> {:?}", *current, state);
        *current = state;
    }

    /// Run init. A second call derives everything again and replaces the config.
    pub fn init(&self, app: &dyn AppHandle) -> Arc<AppConfig> {
        self.set_state(InitState::Initializing);

        let config = Arc::new(self.builder.init(app));
        *self.current.write() = Some(Arc::clone(&config));

        self.set_state(InitState::Ready);
        info!("TAO context ready for {}", config.package_name());
        config
    }

    pub fn app_config(&self) -> Result<Arc<AppConfig>> {
        if self.state() != InitState::Ready {
            return Err(TaoError::NotInitialized("AppConfig".to_string()));
        }
        self.current
            .read()
            .clone()
            .ok_or_else(|| TaoError::NotInitialized("AppConfig".to_string()))
    }

    pub fn snapshot(&self) -> Result<ApplicationSnapshot> {
        Ok(self.app_config()?.snapshot().clone())
    }

    /// Screen metrics, also `NotInitialized` when the display could not be read
    pub fn screen(&self) -> Result<Screen> {
        self.app_config()?
            .screen()
            .cloned()
            .ok_or_else(|| TaoError::NotInitialized("Screen".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::FakeApp;
    use tao_core::{MemoryStoreProvider, RecordingSink};

    fn context() -> TaoContext {
        TaoContext::new(
            AppConfigBuilder::new(Arc::new(MemoryStoreProvider::new()))
                .with_log_sink(Arc::new(RecordingSink::new())),
        )
    }

    #[test]
    fn test_accessors_fail_before_init() {
        let ctx = context();
        assert_eq!(ctx.state(), InitState::Uninitialized);
        assert!(matches!(ctx.app_config(), Err(TaoError::NotInitialized(_))));
        assert!(matches!(ctx.snapshot(), Err(TaoError::NotInitialized(_))));
        assert!(matches!(ctx.screen(), Err(TaoError::NotInitialized(_))));
    }

    #[test]
    fn test_init_reaches_ready() {
        let ctx = context();
        ctx.init(&FakeApp::new(5, true));

        assert_eq!(ctx.state(), InitState::Ready);
        let snapshot = ctx.snapshot().unwrap();
        assert!(snapshot.is_fresh_installation);
        assert!(snapshot.is_new_version);
        assert!(ctx.screen().unwrap().is_phone());
    }

    #[test]
    fn test_reinit_replaces_config() {
        let ctx = context();
        ctx.init(&FakeApp::new(5, true));
        ctx.init(&FakeApp::new(5, true));

        let snapshot = ctx.snapshot().unwrap();
        assert!(!snapshot.is_fresh_installation);
        assert!(!snapshot.is_new_version);
    }

    #[test]
    fn test_isolated_contexts() {
        let first = context();
        let second = context();
        first.init(&FakeApp::new(1, true));

        assert!(first.app_config().is_ok());
        assert!(second.app_config().is_err());
    }
}
