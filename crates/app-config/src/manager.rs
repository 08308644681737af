//! Application Configuration Manager
//!
//! [`AppConfigBuilder`] gathers the store provider, log sink and signing
//! options. [`AppConfigBuilder::init`] runs the startup sequence once and
//! hands back a ready [`AppConfig`], so nothing on `AppConfig` can be reached
//! before init has finished.
//!
//! Startup never fails. Lookup errors are logged and the affected fields fall
//! back to empty values.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use tao_core::store::provider_from_config;
use tao_core::{
    ConfigStore, LogSink, MemoryStore, PrefValue, Result, SigningConfig, StoreProvider, TaoConfig,
    TracingSink,
};
use tao_display::{DeviceType, Screen};
use tao_signing::{DigestAlgorithm, SignatureInspector};

use crate::platform::{AppHandle, PackageInfo};
use crate::report;
use crate::snapshot::{ApplicationSnapshot, VersionCheck};
use crate::trial;

/// Store key holding the last launched version name
pub const APP_VERSION_NAME: &str = "APP_VERSION_NAME";
/// Store key holding the last launched version code
pub const APP_VERSION_CODE: &str = "APP_VERSION_CODE";

/// Marker read back when no version code was ever stored
const NO_VERSION_CODE: i64 = -1;

const TRIAL_IS_EXPIRED: &str = "Sorry, the trial version has expired";

/// Configures and runs application init
pub struct AppConfigBuilder {
    store_provider: Arc<dyn StoreProvider>,
    log: Arc<dyn LogSink>,
    key_hash_algorithm: DigestAlgorithm,
    fingerprint_algorithm: DigestAlgorithm,
    print_info_on_init: bool,
}

impl AppConfigBuilder {
    pub fn new(store_provider: Arc<dyn StoreProvider>) -> Self {
        Self {
            store_provider,
            log: Arc::new(TracingSink::new()),
            key_hash_algorithm: DigestAlgorithm::Sha1,
            fingerprint_algorithm: DigestAlgorithm::Sha1,
            print_info_on_init: false,
        }
    }

    /// Builder wired from a loaded configuration file
    pub fn from_config(config: &TaoConfig) -> Result<Self> {
        let provider = provider_from_config(&config.store)?;
        Ok(Self::new(provider)
            .with_signing(&config.signing)
            .with_print_info_on_init(config.report.print_info_on_init))
    }

    pub fn with_log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    /// Digest algorithms for the key hash and fingerprints. Unknown names keep SHA-1.
    pub fn with_signing(mut self, signing: &SigningConfig) -> Self {
        self.key_hash_algorithm = parse_algorithm(&signing.key_hash_algorithm);
        self.fingerprint_algorithm = parse_algorithm(&signing.fingerprint_algorithm);
        self
    }

    pub fn with_key_hash_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.key_hash_algorithm = algorithm;
        self
    }

    pub fn with_fingerprint_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.fingerprint_algorithm = algorithm;
        self
    }

    pub fn with_print_info_on_init(mut self, enabled: bool) -> Self {
        self.print_info_on_init = enabled;
        self
    }

    /// Run the startup sequence against the platform
    pub fn init(&self, app: &dyn AppHandle) -> AppConfig {
        let package_name = app.package_name().to_string();
        info!("Initializing application config for {}", package_name);

        let package = match app.packages().package_info(&package_name) {
            Ok(package) => package,
            Err(e) => {
                self.log.error(&format!("Cannot read package info: {}", e));
                PackageInfo {
                    package_name: package_name.clone(),
                    ..Default::default()
                }
            }
        };
        self.log.set_tag(&package.label);

        let store = self.open_store(&package_name);

        let version = VersionCheck::evaluate(self.stored_version_code(store.as_ref()), package.version_code);
        debug!(
            "Version check: fresh={} new={}",
            version.is_fresh_installation, version.is_new_version
        );

        let screen = match Screen::init(app.display()) {
            Ok(screen) => Some(screen),
            Err(e) => {
                self.log.error(&format!("Cannot read screen metrics: {}", e));
                None
            }
        };

        let inspector = SignatureInspector::new(app.signatures());
        let signature_key_hash = inspector.key_hash_with(&package_name, self.key_hash_algorithm);
        let signature_fingerprint =
            inspector.fingerprint_with(&package_name, ' ', self.fingerprint_algorithm);
        let signature_fingerprint_colon =
            inspector.fingerprint_with(&package_name, ':', self.fingerprint_algorithm);

        let android_id = app.device_ids().read_device_id().unwrap_or_default();

        store.put(APP_VERSION_NAME, PrefValue::String(package.version_name.clone()));
        store.put(APP_VERSION_CODE, PrefValue::Long(package.version_code));
        let version_markers_persisted = match store.commit() {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to persist version markers: {}", e);
                self.log.error(&format!("Failed to persist version markers: {}", e));
                false
            }
        };

        let is_debuggable = package.debuggable;
        if !is_debuggable {
            self.log.warn("Log is prohibited because debug mode is disabled.");
            self.log.set_disabled();
        }

        let snapshot = ApplicationSnapshot {
            package_name,
            app_name: package.label,
            app_version_name: package.version_name,
            app_version_code: package.version_code,
            android_id,
            is_fresh_installation: version.is_fresh_installation,
            is_new_version: version.is_new_version,
            device_type: screen.as_ref().map_or(DeviceType::Unknown, Screen::device_type),
            diagonal_in_inches: screen.as_ref().map_or(0.0, Screen::diagonal_inch),
            diagonal: screen.as_ref().and_then(Screen::diagonal_bucket),
            is_phone: screen.as_ref().map_or(false, Screen::is_phone),
            is_tablet: screen.as_ref().map_or(false, Screen::is_tablet),
            signature_key_hash,
            signature_fingerprint_algorithm: self.fingerprint_algorithm,
            signature_fingerprint,
            signature_fingerprint_colon,
            is_debuggable,
            is_being_debugged: app.is_debugger_connected(),
            version_markers_persisted,
        };

        let config = AppConfig {
            snapshot,
            screen,
            store,
            log: Arc::clone(&self.log),
        };

        if self.print_info_on_init {
            config.print_info();
        }

        info!("Application config ready");
        config
    }

    fn open_store(&self, package_name: &str) -> Arc<dyn ConfigStore> {
        match self.store_provider.open(package_name) {
            Ok(store) => store,
            Err(e) => {
                warn!("Falling back to an in-memory store: {}", e);
                self.log.warn(&format!("Cannot open preferences: {}", e));
                Arc::new(MemoryStore::new())
            }
        }
    }

    fn stored_version_code(&self, store: &dyn ConfigStore) -> Option<i64> {
        match store.get_long(APP_VERSION_CODE, NO_VERSION_CODE) {
            Ok(NO_VERSION_CODE) if !store.contains(APP_VERSION_CODE) => None,
            Ok(code) => Some(code),
            Err(e) => {
                self.log.warn(&format!("Ignoring stored version code: {}", e));
                None
            }
        }
    }
}

fn parse_algorithm(name: &str) -> DigestAlgorithm {
    name.parse().unwrap_or_else(|e| {
        warn!("{}, using SHA-1", e);
        DigestAlgorithm::Sha1
    })
}

/// Ready application configuration
pub struct AppConfig {
    snapshot: ApplicationSnapshot,
    screen: Option<Screen>,
    store: Arc<dyn ConfigStore>,
    log: Arc<dyn LogSink>,
}

impl AppConfig {
    pub fn snapshot(&self) -> &ApplicationSnapshot {
        &self.snapshot
    }

    /// Screen metrics, `None` when the display could not be read
    pub fn screen(&self) -> Option<&Screen> {
        self.screen.as_ref()
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    pub fn package_name(&self) -> &str {
        &self.snapshot.package_name
    }

    pub fn app_name(&self) -> &str {
        &self.snapshot.app_name
    }

    pub fn app_version_name(&self) -> &str {
        &self.snapshot.app_version_name
    }

    pub fn app_version_code(&self) -> i64 {
        self.snapshot.app_version_code
    }

    pub fn android_id(&self) -> &str {
        &self.snapshot.android_id
    }

    pub fn is_fresh_installation(&self) -> bool {
        self.snapshot.is_fresh_installation
    }

    pub fn is_new_version(&self) -> bool {
        self.snapshot.is_new_version
    }

    pub fn device_type(&self) -> DeviceType {
        self.snapshot.device_type
    }

    pub fn is_phone(&self) -> bool {
        self.snapshot.is_phone
    }

    pub fn is_tablet(&self) -> bool {
        self.snapshot.is_tablet
    }

    pub fn diagonal_in_inches(&self) -> f64 {
        self.snapshot.diagonal_in_inches
    }

    pub fn signature_key_hash(&self) -> &str {
        &self.snapshot.signature_key_hash
    }

    /// Fingerprint with space separated byte pairs
    pub fn signature_fingerprint(&self) -> &str {
        &self.snapshot.signature_fingerprint
    }

    /// Fingerprint with colon separated byte pairs
    pub fn signature_fingerprint_colon(&self) -> &str {
        &self.snapshot.signature_fingerprint_colon
    }

    pub fn is_debuggable(&self) -> bool {
        self.snapshot.is_debuggable
    }

    pub fn is_being_debugged(&self) -> bool {
        self.snapshot.is_being_debugged
    }

    // Preferences

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        self.store.get_bool(key, default)
    }

    pub fn get_int(&self, key: &str, default: i32) -> Result<i32> {
        self.store.get_int(key, default)
    }

    pub fn get_int_or_zero(&self, key: &str) -> Result<i32> {
        self.store.get_int(key, 0)
    }

    pub fn get_long(&self, key: &str, default: i64) -> Result<i64> {
        self.store.get_long(key, default)
    }

    pub fn get_long_or_zero(&self, key: &str) -> Result<i64> {
        self.store.get_long(key, 0)
    }

    pub fn get_float(&self, key: &str, default: f32) -> Result<f32> {
        self.store.get_float(key, default)
    }

    pub fn get_float_or_zero(&self, key: &str) -> Result<f32> {
        self.store.get_float(key, 0.0)
    }

    pub fn get_string(&self, key: &str, default: &str) -> Result<String> {
        self.store.get_string(key, default)
    }

    pub fn get_string_or_empty(&self, key: &str) -> Result<String> {
        self.store.get_string(key, "")
    }

    pub fn get_string_set(&self, key: &str, default: BTreeSet<String>) -> Result<BTreeSet<String>> {
        self.store.get_string_set(key, default)
    }

    fn put(&self, key: &str, value: PrefValue, save: bool) -> &Self {
        self.store.put(key, value);
        if save {
            self.commit_logged();
        }
        self
    }

    pub fn put_bool(&self, key: &str, value: bool, save: bool) -> &Self {
        self.put(key, PrefValue::Bool(value), save)
    }

    pub fn put_int(&self, key: &str, value: i32, save: bool) -> &Self {
        self.put(key, PrefValue::Int(value), save)
    }

    pub fn put_long(&self, key: &str, value: i64, save: bool) -> &Self {
        self.put(key, PrefValue::Long(value), save)
    }

    pub fn put_float(&self, key: &str, value: f32, save: bool) -> &Self {
        self.put(key, PrefValue::Float(value), save)
    }

    pub fn put_string(&self, key: &str, value: &str, save: bool) -> &Self {
        self.put(key, PrefValue::String(value.to_string()), save)
    }

    pub fn put_string_set(&self, key: &str, value: BTreeSet<String>, save: bool) -> &Self {
        self.put(key, PrefValue::StringSet(value), save)
    }

    pub fn remove(&self, key: &str, save: bool) -> &Self {
        self.store.remove(key);
        if save {
            self.commit_logged();
        }
        self
    }

    /// Commit staged edits
    pub fn save(&self) -> Result<()> {
        self.store.commit()
    }

    fn commit_logged(&self) {
        if let Err(e) = self.store.commit() {
            error!("Failed to save preferences: {}", e);
            self.log.error(&format!("Failed to save preferences: {}", e));
        }
    }

    /// Wipe every preference and commit
    pub fn clear(&self) -> Result<()> {
        self.store.clear();
        self.store.commit()?;
        self.log.info(">>> Preferences were CLEARED! <<<");
        Ok(())
    }

    /// Every committed preference, sorted by key
    pub fn all_entries(&self) -> BTreeMap<String, PrefValue> {
        self.store.all_entries()
    }

    /// Log the diagnostic report. Does nothing for a release build.
    pub fn print_info(&self) -> Option<String> {
        if !self.snapshot.is_debuggable {
            return None;
        }

        let text = report::render(&self.snapshot, &self.store.all_entries());
        self.log.info(&text);
        Some(text)
    }

    /// `true` and a warning when `today` is past the trial expiry date
    pub fn check_trial(&self, expiry: NaiveDate, today: NaiveDate) -> bool {
        let expired = trial::is_expired(expiry, today);
        if expired {
            self.log.warn(&format!("{} {}", TRIAL_IS_EXPIRED, expiry));
        }
        expired
    }

    /// Trial check against the local calendar
    pub fn check_trial_today(&self, expiry: NaiveDate) -> bool {
        self.check_trial(expiry, chrono::Local::now().date_naive())
    }
}
