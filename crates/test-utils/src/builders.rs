use profile_refresher::config::{ConfigFile, RawConfigFile};
use profile_refresher::types::OverlapPolicy;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults; [`fast`](Self::fast) shrinks every
/// wait so tests do not sit through the production settle times.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Zero settle waits and a 20ms readiness interval.
    pub fn fast(mut self) -> Self {
        self.config.site.settle_after_login = "0s".to_string();
        self.config.site.settle_after_edit = "0s".to_string();
        self.config.driver.readiness_interval = "20ms".to_string();
        self
    }

    pub fn driver(mut self, binary: &str, args: &[&str]) -> Self {
        self.config.driver.binary = binary.to_string();
        self.config.driver.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn endpoint(mut self, host: &str, port: u16) -> Self {
        self.config.driver.host = host.to_string();
        self.config.driver.port = port;
        self
    }

    pub fn readiness(mut self, attempts: u32, interval: &str) -> Self {
        self.config.driver.readiness_attempts = attempts;
        self.config.driver.readiness_interval = interval.to_string();
        self
    }

    pub fn triggers(mut self, exprs: &[&str]) -> Self {
        self.config.schedule.triggers = exprs.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn run_at_startup(mut self, val: bool) -> Self {
        self.config.schedule.run_at_startup = val;
        self
    }

    pub fn overlap(mut self, policy: OverlapPolicy) -> Self {
        self.config.schedule.overlap = policy;
        self
    }

    pub fn settle(mut self, after_login: &str, after_edit: &str) -> Self {
        self.config.site.settle_after_login = after_login.to_string();
        self.config.site.settle_after_edit = after_edit.to_string();
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
