//! Backlight device access through the casper-wmi `led_control` file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::AdapterError;

/// Something that accepts backlight control strings.
pub trait BacklightDevice {
    fn is_present(&self) -> bool;

    /// Write `control` as the complete contents of the control file.
    /// A missing control file is an error, never created.
    fn write(&mut self, control: &str) -> Result<(), AdapterError>;
}

/// The sysfs control file exposed by the casper-wmi kernel module.
///
/// Writing normally needs root. Permission errors are reported to the
/// caller as-is; no privilege escalation is attempted here.
pub struct SysfsLed {
    path: PathBuf,
}

impl SysfsLed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BacklightDevice for SysfsLed {
    fn is_present(&self) -> bool {
        self.path.exists()
    }

    fn write(&mut self, control: &str) -> Result<(), AdapterError> {
        let written = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(control.as_bytes()));

        match written {
            Ok(()) => {
                debug!(control, path = %self.path.display(), "led_control written");
                Ok(())
            }
            Err(source) => {
                warn!(control, path = %self.path.display(), error = %source, "led_control write failed");
                Err(AdapterError::DeviceWrite {
                    path: self.path.clone(),
                    control: control.to_string(),
                    source,
                })
            }
        }
    }
}
