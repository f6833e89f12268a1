//! # casper-panel: Casper Excalibur Control Panel TUI
//!
//! Terminal control panel for Casper Excalibur laptops on Linux. Switches
//! power profiles through power-profiles-daemon and drives the keyboard
//! backlight through the casper-wmi kernel module's `led_control` file.
//!
//! ## Usage
//!   sudo casper-panel        # Launch TUI (writing led_control needs root)
//!
//! ## Dependencies
//!   power-profiles-daemon    # provides powerprofilesctl
//!   sudo modprobe casper-wmi # provides /sys/class/leds/casper::kbd_backlight

mod app;
mod backlight;
mod config;
mod device;
mod error;
mod logging;
mod power;
mod sysinfo;
mod ui;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{error, info, warn};

use app::App;
use config::Config;
use device::{BacklightDevice, SysfsLed};
use power::{PowerProfiles, PowerProfilesCtl};

#[derive(Parser)]
#[command(
    version,
    about = "Casper Excalibur control panel: power profiles and keyboard backlight",
    after_help = "Environment:
  CASPER_LED_PATH       led_control file (default /sys/class/leds/casper::kbd_backlight/led_control)
  CASPER_PROFILES_CMD   power profile client (default powerprofilesctl)
  CASPER_LOG_DIR        log directory (default ~/.cache/casper-panel)
  RUST_LOG              log filter (default info)

The backlight needs the casper-wmi module: sudo modprobe casper-wmi"
)]
struct Cli {}

// ═══════════════════════════════════════════════════════════════════════════════
//  Startup Checks
// ═══════════════════════════════════════════════════════════════════════════════

fn missing_dependencies(
    power: &impl PowerProfiles,
    led: &impl BacklightDevice,
    cfg: &Config,
) -> Vec<String> {
    let mut missing = Vec::new();
    if !power.is_available() {
        missing.push(format!("power-profiles-daemon ({})", cfg.profiles_cmd));
    }
    if !led.is_present() {
        missing.push(format!("casper-wmi driver ({})", cfg.led_path.display()));
    }
    missing
}

/// Print the missing-dependency warning and wait for one line of input.
fn warn_missing(missing: &[String], out: &mut impl Write, input: &mut impl BufRead) -> Result<()> {
    writeln!(out, "Warning: Missing dependencies:")?;
    for dep in missing {
        writeln!(out, "  - {dep}")?;
    }
    writeln!(out, "\nSome features may not work properly.")?;
    writeln!(out, "Make sure casper-wmi module is loaded: sudo modprobe casper-wmi")?;
    write!(out, "Press Enter to continue anyway...")?;
    out.flush()?;

    let mut ack = String::new();
    input.read_line(&mut ack).context("reading acknowledgment")?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Main Loop
// ═══════════════════════════════════════════════════════════════════════════════

/// Restores the terminal however the loop ends.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

fn run<P: PowerProfiles, D: BacklightDevice>(
    app: &mut App<P, D>,
    cfg: &Config,
    mut term: ratatui::DefaultTerminal,
) -> Result<()> {
    loop {
        app.tick(Instant::now());
        app.clamp_selection();

        term.draw(|f| ui::draw(f, &*app))?;

        // Timeout means no key: fall through and redraw
        if event::poll(cfg.input_timeout)?
            && let Event::Key(k) = event::read()?
            && k.kind == KeyEventKind::Press
        {
            app.on_key(k);
        }

        if app.quit {
            break;
        }
    }
    Ok(())
}

fn launch(cfg: &Config) -> Result<bool> {
    let power = PowerProfilesCtl::new(cfg.profiles_cmd.clone());
    let led = SysfsLed::new(&cfg.led_path);

    let missing = missing_dependencies(&power, &led, cfg);
    if missing.is_empty() {
        info!("all dependencies present");
    } else {
        warn!(?missing, "starting with missing dependencies");
        warn_missing(&missing, &mut io::stdout().lock(), &mut io::stdin().lock())?;
    }

    let mut app = App::new(power, led, cfg.refresh_interval);

    let terminal = ratatui::try_init().context("initializing terminal")?;
    let _guard = TerminalGuard;
    run(&mut app, cfg, terminal)?;

    Ok(app.interrupted)
}

fn main() -> ExitCode {
    Cli::parse();

    let cfg = Config::from_env();
    let _log_guard = logging::init(&cfg.log_dir);
    info!(led = %cfg.led_path.display(), profiles = %cfg.profiles_cmd, "casper-panel starting");

    match launch(&cfg) {
        Ok(interrupted) => {
            if interrupted {
                println!("\nExiting...");
            }
            info!("casper-panel exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("casper-panel failed: {e:#}");
            println!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
