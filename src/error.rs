//! Errors raised by the power-profile client and the backlight device.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The external command could not be started at all.
    #[error("{program} not available: {source}")]
    CommandMissing {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The command ran but reported failure.
    #[error("{program} {action} failed: {detail}")]
    CommandFailed {
        program: String,
        action: &'static str,
        detail: String,
    },

    /// The command succeeded but printed nothing we recognise as a profile.
    #[error("{program} returned no power profiles")]
    ProfileParse { program: String },

    #[error("{source} (writing '{control}' to {})", path.display())]
    DeviceWrite {
        path: PathBuf,
        control: String,
        #[source]
        source: io::Error,
    },
}
