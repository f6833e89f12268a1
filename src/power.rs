//! Power profile access through power-profiles-daemon's `powerprofilesctl`.

use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::AdapterError;

/// Profiles assumed when the daemon cannot be queried.
pub const FALLBACK_PROFILES: [&str; 3] = ["balanced", "power-saver", "performance"];
const FALLBACK_CURRENT: &str = "balanced";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileListing {
    pub profiles: Vec<String>,
    /// Empty when the daemon did not mark any profile active.
    pub current: String,
}

/// Source of power profiles. The navigation code only talks to this trait.
pub trait PowerProfiles {
    fn is_available(&self) -> bool;
    fn list(&self) -> Result<ProfileListing, AdapterError>;
    fn set_active(&mut self, name: &str) -> Result<(), AdapterError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Cached Profile Set
// ═══════════════════════════════════════════════════════════════════════════════

/// Last known daemon state. May be stale between refreshes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerProfileSet {
    pub profiles: Vec<String>,
    pub current: String,
}

impl PowerProfileSet {
    pub fn fallback() -> Self {
        Self {
            profiles: FALLBACK_PROFILES.iter().map(|p| p.to_string()).collect(),
            current: FALLBACK_CURRENT.into(),
        }
    }

    /// Re-read the profile list. Falls back to the default set when the
    /// client is unavailable. Returns whether live data was obtained.
    pub fn refresh(&mut self, client: &impl PowerProfiles) -> bool {
        match client.list() {
            Ok(listing) => {
                self.profiles = listing.profiles;
                self.current = listing.current;
                true
            }
            Err(e) => {
                debug!(error = %e, "profile list unavailable, using defaults");
                *self = Self::fallback();
                false
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  powerprofilesctl
// ═══════════════════════════════════════════════════════════════════════════════

pub struct PowerProfilesCtl {
    program: String,
}

impl PowerProfilesCtl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, action: &'static str, args: &[&str]) -> Result<String, AdapterError> {
        let out = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| AdapterError::CommandMissing {
                program: self.program.clone(),
                source,
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(AdapterError::CommandFailed {
                program: self.program.clone(),
                action,
                detail: if stderr.is_empty() {
                    out.status.to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl PowerProfiles for PowerProfilesCtl {
    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn list(&self) -> Result<ProfileListing, AdapterError> {
        let listing = parse_profile_list(&self.run("list", &["list"])?);
        if listing.profiles.is_empty() {
            return Err(AdapterError::ProfileParse {
                program: self.program.clone(),
            });
        }
        Ok(listing)
    }

    fn set_active(&mut self, name: &str) -> Result<(), AdapterError> {
        match self.run("set", &["set", name]) {
            Ok(_) => {
                info!(profile = name, "power profile set");
                Ok(())
            }
            Err(e) => {
                warn!(profile = name, error = %e, "power profile set failed");
                Err(e)
            }
        }
    }
}

/// Parse `powerprofilesctl list` output.
///
/// Profile headers sit at column 0-2 and end in `:`; the active one is
/// prefixed with `*`. Indented driver detail lines are skipped.
///
/// ```text
/// * performance:
///     CpuDriver:  intel_pstate
///
///   balanced:
///     CpuDriver:  intel_pstate
/// ```
pub fn parse_profile_list(output: &str) -> ProfileListing {
    let mut listing = ProfileListing::default();

    for line in output.lines() {
        let body = line.trim_start();
        let indent = line.len() - body.len();
        let (active, body) = match body.strip_prefix('*') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, body),
        };
        if !active && indent > 2 {
            continue;
        }
        let Some(name) = body.trim_end().strip_suffix(':') else {
            continue;
        };
        if name.is_empty() || name.contains(char::is_whitespace) {
            continue;
        }

        if !listing.profiles.iter().any(|p| p == name) {
            listing.profiles.push(name.to_string());
        }
        if active {
            listing.current = name.to_string();
        }
    }

    listing
}
