//! Runtime configuration: built-in defaults, overridable from the environment.
//! There is no config file.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LED_PATH: &str = "/sys/class/leds/casper::kbd_backlight/led_control";
pub const DEFAULT_PROFILES_CMD: &str = "powerprofilesctl";

pub const ENV_LED_PATH: &str = "CASPER_LED_PATH";
pub const ENV_PROFILES_CMD: &str = "CASPER_PROFILES_CMD";
pub const ENV_LOG_DIR: &str = "CASPER_LOG_DIR";

/// Upper bound on one blocking input read.
pub const INPUT_TIMEOUT: Duration = Duration::from_millis(1000);
/// Minimum wall-clock gap between power profile refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
pub struct Config {
    pub led_path: PathBuf,
    pub profiles_cmd: String,
    pub log_dir: PathBuf,
    pub input_timeout: Duration,
    pub refresh_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Self {
            led_path: non_empty(ENV_LED_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| DEFAULT_LED_PATH.into()),
            profiles_cmd: non_empty(ENV_PROFILES_CMD).unwrap_or_else(|| DEFAULT_PROFILES_CMD.into()),
            log_dir: non_empty(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| default_log_dir(&var)),
            input_timeout: INPUT_TIMEOUT,
            refresh_interval: REFRESH_INTERVAL,
        }
    }
}

fn default_log_dir(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    // Under sudo, keep logs in the invoking user's home
    let home = var("SUDO_USER")
        .map(|u| format!("/home/{u}"))
        .or_else(|| var("HOME"))
        .unwrap_or_else(|| "/tmp".into());
    PathBuf::from(home).join(".cache").join("casper-panel")
}
