//! Screen navigation and key dispatch.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::backlight::{
    self, BacklightSetting, BacklightUpdate, COLOR_PALETTE, Change, MODE_OFF, PALETTE_COLUMNS,
    PRESETS, apply_update, encode,
};
use crate::device::BacklightDevice;
use crate::power::{PowerProfileSet, PowerProfiles};
use crate::sysinfo::SystemInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Main,
    PowerProfile,
    KeyboardBacklight,
    RgbColorControl,
    PresetEffects,
    SystemInfo,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Main => "Main Menu",
            Screen::PowerProfile => "Power Profiles",
            Screen::KeyboardBacklight => "Keyboard Backlight Control",
            Screen::RgbColorControl => "RGB Color Control",
            Screen::PresetEffects => "Preset Effects",
            Screen::SystemInfo => "System Information",
        }
    }
}

/// Main menu entries. `None` ends the session.
pub const MAIN_MENU: &[(&str, Option<Screen>)] = &[
    ("Power Profile", Some(Screen::PowerProfile)),
    ("Keyboard Backlight", Some(Screen::KeyboardBacklight)),
    ("RGB Color Control", Some(Screen::RgbColorControl)),
    ("Preset Effects", Some(Screen::PresetEffects)),
    ("System Info", Some(Screen::SystemInfo)),
    ("Exit", None),
];

fn menu_index(screen: Screen) -> usize {
    MAIN_MENU
        .iter()
        .position(|(_, s)| *s == Some(screen))
        .unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub err: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    pub screen: Screen,
    pub selection: usize,
    /// Shown until the next key press.
    pub status: Option<Status>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            screen: Screen::Main,
            selection: 0,
            status: None,
        }
    }
}

enum Nav {
    Stay,
    Go(Screen),
    Exit,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Application State
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App<P, D> {
    pub nav: NavigationState,
    pub backlight: BacklightSetting,
    pub profiles: PowerProfileSet,
    /// Whether the last profile refresh reached the daemon.
    pub profiles_live: bool,
    /// Probed once at startup.
    pub device_present: bool,
    pub sysinfo: SystemInfo,
    pub quit: bool,
    /// Set when the session ended through Ctrl-C.
    pub interrupted: bool,
    power: P,
    device: D,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
}

impl<P: PowerProfiles, D: BacklightDevice> App<P, D> {
    pub fn new(power: P, device: D, refresh_interval: Duration) -> Self {
        let device_present = device.is_present();
        Self {
            nav: NavigationState::default(),
            backlight: BacklightSetting::default(),
            profiles: PowerProfileSet::fallback(),
            profiles_live: false,
            device_present,
            sysinfo: SystemInfo::default(),
            quit: false,
            interrupted: false,
            power,
            device,
            refresh_interval,
            last_refresh: None,
        }
    }

    /// Number of selectable items on the active screen.
    pub fn item_count(&self) -> usize {
        match self.nav.screen {
            Screen::Main => MAIN_MENU.len(),
            Screen::PowerProfile => self.profiles.profiles.len(),
            Screen::RgbColorControl => COLOR_PALETTE.len(),
            Screen::PresetEffects => PRESETS.len(),
            Screen::KeyboardBacklight | Screen::SystemInfo => 0,
        }
    }

    /// Pull the selection back inside the active list. Run before every draw.
    pub fn clamp_selection(&mut self) {
        let last = self.item_count().saturating_sub(1);
        self.nav.selection = self.nav.selection.min(last);
    }

    fn move_selection(&mut self, delta: isize) {
        let last = self.item_count().saturating_sub(1);
        self.nav.selection = self.nav.selection.saturating_add_signed(delta).min(last);
    }

    // ─── Periodic Refresh ───────────────────────────────────────────────────

    pub fn refresh_due(&self, now: Instant) -> bool {
        self.last_refresh
            .is_none_or(|t| now.saturating_duration_since(t) >= self.refresh_interval)
    }

    pub fn tick(&mut self, now: Instant) {
        if self.refresh_due(now) {
            self.refresh_profiles(now);
        }
    }

    fn refresh_profiles(&mut self, now: Instant) {
        let live = self.profiles.refresh(&self.power);
        if self.profiles_live && !live {
            warn!("power profile daemon stopped answering, showing defaults");
        }
        self.profiles_live = live;
        self.last_refresh = Some(now);
    }

    // ─── Key Handling ───────────────────────────────────────────────────────

    pub fn on_key(&mut self, k: KeyEvent) {
        self.nav.status = None;

        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
            info!("interrupted");
            self.interrupted = true;
            self.quit = true;
            return;
        }

        let nav = match self.nav.screen {
            Screen::Main => self.on_key_main(k),
            Screen::PowerProfile => self.on_key_power(k),
            Screen::KeyboardBacklight => self.on_key_backlight(k),
            Screen::RgbColorControl => self.on_key_color(k),
            Screen::PresetEffects => self.on_key_presets(k),
            Screen::SystemInfo => self.on_key_sysinfo(k),
        };

        match nav {
            Nav::Stay => {}
            Nav::Exit => self.quit = true,
            Nav::Go(to) => self.go(to),
        }
    }

    fn go(&mut self, to: Screen) {
        let from = self.nav.screen;
        debug!(?from, ?to, "screen change");
        // Back on the main menu, land on the entry that opened `from`
        self.nav.selection = if to == Screen::Main {
            menu_index(from)
        } else {
            0
        };
        if to == Screen::SystemInfo {
            self.sysinfo = SystemInfo::collect();
        }
        self.nav.screen = to;
    }

    fn on_key_main(&mut self, k: KeyEvent) -> Nav {
        match k.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return match MAIN_MENU.get(self.nav.selection) {
                    Some((_, Some(screen))) => Nav::Go(*screen),
                    Some((_, None)) => Nav::Exit,
                    None => Nav::Stay,
                };
            }
            KeyCode::Char('q') | KeyCode::Esc => return Nav::Exit,
            _ => {}
        }
        Nav::Stay
    }

    fn on_key_power(&mut self, k: KeyEvent) -> Nav {
        match k.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(name) = self.profiles.profiles.get(self.nav.selection).cloned()
                    && self.set_profile(&name)
                {
                    return Nav::Go(Screen::Main);
                }
            }
            KeyCode::Esc => return Nav::Go(Screen::Main),
            _ => {}
        }
        Nav::Stay
    }

    fn on_key_backlight(&mut self, k: KeyEvent) -> Nav {
        let (field, change) = match k.code {
            KeyCode::Char('m') => (Field::Mode, Change::Step(1)),
            KeyCode::Char('M') => (Field::Mode, Change::Step(-1)),
            KeyCode::Char('b') => (Field::Brightness, Change::Step(1)),
            KeyCode::Char('B') => (Field::Brightness, Change::Step(-1)),
            KeyCode::Char('r') => (Field::Regions, Change::Step(1)),
            KeyCode::Char('R') => (Field::Regions, Change::Step(-1)),
            KeyCode::Char('0') => (Field::Mode, Change::Set(MODE_OFF)),
            KeyCode::Char('c') => return Nav::Go(Screen::RgbColorControl),
            KeyCode::Esc => return Nav::Go(Screen::Main),
            _ => return Nav::Stay,
        };

        let mut update = BacklightUpdate::default();
        match field {
            Field::Regions => update.regions = Some(change),
            Field::Mode => update.mode = Some(change),
            Field::Brightness => update.brightness = Some(change),
        }
        self.commit(apply_update(self.backlight, &update));
        Nav::Stay
    }

    fn on_key_color(&mut self, k: KeyEvent) -> Nav {
        let row = PALETTE_COLUMNS as isize;
        match k.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-row),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(row),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some((_, rgb)) = COLOR_PALETTE.get(self.nav.selection) {
                    let hex = rgb.to_string();
                    let update = BacklightUpdate {
                        color: Some(&hex),
                        ..Default::default()
                    };
                    if self.commit(apply_update(self.backlight, &update)) {
                        return Nav::Go(Screen::KeyboardBacklight);
                    }
                }
            }
            KeyCode::Esc => return Nav::Go(Screen::KeyboardBacklight),
            _ => {}
        }
        Nav::Stay
    }

    fn on_key_presets(&mut self, k: KeyEvent) -> Nav {
        match k.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(preset) = PRESETS.get(self.nav.selection)
                    && self.apply_preset(preset.key)
                {
                    return Nav::Go(Screen::Main);
                }
            }
            KeyCode::Esc => return Nav::Go(Screen::Main),
            _ => {}
        }
        Nav::Stay
    }

    fn on_key_sysinfo(&mut self, k: KeyEvent) -> Nav {
        match k.code {
            KeyCode::Esc => Nav::Go(Screen::Main),
            _ => Nav::Stay,
        }
    }

    // ─── Hardware Actions ───────────────────────────────────────────────────

    /// Write a preset to the device and adopt it as the current setting.
    /// Returns `false` for an unknown key or a failed write.
    pub fn apply_preset(&mut self, key: &str) -> bool {
        let Some(preset) = backlight::lookup(key) else {
            warn!(preset = key, "unknown preset");
            return false;
        };
        info!(preset = key, "applying preset");
        self.commit(preset.setting)
    }

    /// Write `setting` through to the device. The model follows the
    /// request even when the write fails, so the next step starts from it.
    fn commit(&mut self, setting: BacklightSetting) -> bool {
        let control = encode(&setting);
        let result = self.device.write(&control);
        self.backlight = setting;
        match result {
            Ok(()) => {
                self.set_status(
                    format!(
                        "LED set: Mode={}, Brightness={}, Color=#{}",
                        setting.mode_name(),
                        setting.brightness(),
                        setting.color()
                    ),
                    false,
                );
                true
            }
            Err(e) => {
                self.set_status(format!("Failed to set LED control: {e}"), true);
                false
            }
        }
    }

    fn set_profile(&mut self, name: &str) -> bool {
        match self.power.set_active(name) {
            Ok(()) => {
                self.profiles.current = name.to_string();
                // Re-read on the next loop iteration
                self.last_refresh = None;
                self.set_status(format!("Power profile set to: {name}"), false);
                true
            }
            Err(e) => {
                self.set_status(format!("Failed to set power profile: {name} ({e})"), true);
                false
            }
        }
    }

    fn set_status(&mut self, text: String, err: bool) {
        self.nav.status = Some(Status { text, err });
    }
}

#[derive(Clone, Copy)]
enum Field {
    Regions,
    Mode,
    Brightness,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backlight::Rgb;
    use crate::error::AdapterError;
    use crate::power::ProfileListing;
    use std::cell::Cell;
    use std::io;

    #[derive(Default)]
    pub(crate) struct MockDevice {
        pub writes: Vec<String>,
        pub fail: bool,
        pub present: bool,
    }

    impl BacklightDevice for MockDevice {
        fn is_present(&self) -> bool {
            self.present
        }

        fn write(&mut self, control: &str) -> Result<(), AdapterError> {
            self.writes.push(control.to_string());
            if self.fail {
                return Err(AdapterError::DeviceWrite {
                    path: "/sys/class/leds/casper::kbd_backlight/led_control".into(),
                    control: control.to_string(),
                    source: io::Error::from(io::ErrorKind::PermissionDenied),
                });
            }
            Ok(())
        }
    }

    pub(crate) struct MockPower {
        /// `None` behaves like a missing daemon.
        pub listing: Option<ProfileListing>,
        pub fail_set: bool,
        pub set_calls: Vec<String>,
        pub list_calls: Cell<usize>,
    }

    impl MockPower {
        pub fn with(profiles: &[&str], current: &str) -> Self {
            Self {
                listing: Some(ProfileListing {
                    profiles: profiles.iter().map(|p| p.to_string()).collect(),
                    current: current.to_string(),
                }),
                fail_set: false,
                set_calls: Vec::new(),
                list_calls: Cell::new(0),
            }
        }

        pub fn unavailable() -> Self {
            Self {
                listing: None,
                ..Self::with(&[], "")
            }
        }
    }

    impl PowerProfiles for MockPower {
        fn is_available(&self) -> bool {
            self.listing.is_some()
        }

        fn list(&self) -> Result<ProfileListing, AdapterError> {
            self.list_calls.set(self.list_calls.get() + 1);
            self.listing.clone().ok_or_else(|| AdapterError::ProfileParse {
                program: "powerprofilesctl".into(),
            })
        }

        fn set_active(&mut self, name: &str) -> Result<(), AdapterError> {
            self.set_calls.push(name.to_string());
            if self.fail_set {
                return Err(AdapterError::CommandFailed {
                    program: "powerprofilesctl".into(),
                    action: "set",
                    detail: "daemon refused".into(),
                });
            }
            Ok(())
        }
    }

    pub(crate) fn app() -> App<MockPower, MockDevice> {
        let mut app = App::new(
            MockPower::with(&["performance", "balanced", "power-saver"], "balanced"),
            MockDevice {
                present: true,
                ..Default::default()
            },
            Duration::from_secs(2),
        );
        app.tick(Instant::now());
        app
    }

    pub(crate) fn press(app: &mut App<MockPower, MockDevice>, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
        app.clamp_selection();
    }

    fn open(app: &mut App<MockPower, MockDevice>, screen: Screen) {
        app.nav.selection = menu_index(screen);
        press(app, KeyCode::Enter);
        assert_eq!(app.nav.screen, screen);
    }

    #[test]
    fn main_menu_opens_screens_at_top() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.nav.selection, 3);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.screen, Screen::PresetEffects);
        assert_eq!(app.nav.selection, 0);
    }

    #[test]
    fn list_navigation_clamps_without_wrapping() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.nav.selection, 0);
        for _ in 0..20 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.nav.selection, MAIN_MENU.len() - 1);
    }

    #[test]
    fn exit_entry_and_q_end_the_loop() {
        let mut app = app();
        app.nav.selection = MAIN_MENU.len() - 1;
        press(&mut app, KeyCode::Enter);
        assert!(app.quit);
        assert!(!app.interrupted);

        let mut app = self::app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.quit);
        assert!(app.interrupted);
        assert!(app.device.writes.is_empty());
    }

    #[test]
    fn mode_full_cycle_writes_every_step() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        let start = app.backlight.mode();
        for _ in 0..8 {
            press(&mut app, KeyCode::Char('m'));
        }
        assert_eq!(app.backlight.mode(), start);
        assert_eq!(app.device.writes.len(), 8);
        assert_eq!(app.device.writes[0], "322ffffff");
        assert_eq!(app.device.writes[7], "312ffffff");
    }

    #[test]
    fn backlight_keys_step_fields() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        press(&mut app, KeyCode::Char('M'));
        press(&mut app, KeyCode::Char('M'));
        assert_eq!(app.backlight.mode(), 7);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.backlight.brightness(), 0);
        press(&mut app, KeyCode::Char('B'));
        assert_eq!(app.backlight.brightness(), 2);
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('r'));
        }
        assert_eq!(app.backlight.regions(), 9);
        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.backlight.regions(), 8);
        assert_eq!(app.device.writes.len(), 15);
        assert_eq!(app.device.writes.last().map(String::as_str), Some("872ffffff"));
    }

    #[test]
    fn zero_turns_backlight_off() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.backlight.mode(), 0);
        assert_eq!(app.device.writes, ["302ffffff"]);
        let status = app.nav.status.clone().unwrap();
        assert!(!status.err);
        assert_eq!(status.text, "LED set: Mode=Off, Brightness=2, Color=#ffffff");
    }

    #[test]
    fn unhandled_backlight_key_does_not_write() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.device.writes.is_empty());
        assert_eq!(app.nav.screen, Screen::KeyboardBacklight);
    }

    #[test]
    fn returning_to_main_focuses_origin() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.screen, Screen::Main);
        assert_eq!(app.nav.selection, 1);

        open(&mut app, Screen::SystemInfo);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.nav.screen, Screen::SystemInfo);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.selection, 4);
    }

    #[test]
    fn color_grid_moves_by_row() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.nav.screen, Screen::RgbColorControl);
        assert_eq!(app.nav.selection, 0);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.nav.selection, 0);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.nav.selection, 2);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.nav.selection, 6);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.nav.selection, 7);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.nav.selection, 3);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.nav.selection, 0);
    }

    #[test]
    fn picking_a_color_writes_and_returns() {
        let mut app = app();
        open(&mut app, Screen::RgbColorControl);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.screen, Screen::KeyboardBacklight);
        assert_eq!(app.backlight.color(), Rgb::new(0xff, 0, 0));
        assert_eq!(app.device.writes, ["312ff0000"]);
    }

    #[test]
    fn color_cancel_returns_to_backlight() {
        let mut app = app();
        open(&mut app, Screen::RgbColorControl);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.screen, Screen::KeyboardBacklight);
        assert!(app.device.writes.is_empty());
    }

    #[test]
    fn preset_becomes_current_setting() {
        let mut app = app();
        open(&mut app, Screen::PresetEffects);
        app.nav.selection = 8;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.screen, Screen::Main);
        assert_eq!(app.nav.selection, 3);
        assert_eq!(app.device.writes, ["312ff0000"]);

        open(&mut app, Screen::KeyboardBacklight);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.device.writes[1], "322ff0000");
    }

    #[test]
    fn apply_preset_by_key() {
        let mut app = app();
        assert!(app.apply_preset("off"));
        assert_eq!(app.device.writes, ["300000000"]);
        assert!(!app.apply_preset("Off"));
        assert_eq!(app.device.writes.len(), 1);
    }

    #[test]
    fn failed_write_stays_put_and_reports() {
        let mut app = app();
        app.device.fail = true;
        open(&mut app, Screen::PresetEffects);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.screen, Screen::PresetEffects);
        let status = app.nav.status.clone().unwrap();
        assert!(status.err);
        assert!(status.text.starts_with("Failed to set LED control:"), "{}", status.text);
        assert!(status.text.contains("300000000"), "{}", status.text);
        assert_eq!(app.device.writes.len(), 1);

        // Cleared on the next key, no automatic retry
        press(&mut app, KeyCode::Down);
        assert!(app.nav.status.is_none());
        assert_eq!(app.device.writes.len(), 1);
    }

    #[test]
    fn selecting_profile_sets_and_returns() {
        let mut app = app();
        open(&mut app, Screen::PowerProfile);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.power.set_calls, ["performance"]);
        assert_eq!(app.profiles.current, "performance");
        assert_eq!(app.nav.screen, Screen::Main);
        assert_eq!(app.nav.selection, 0);
        assert_eq!(
            app.nav.status.as_ref().map(|s| s.text.as_str()),
            Some("Power profile set to: performance")
        );
        assert!(app.refresh_due(Instant::now()));
    }

    #[test]
    fn failed_profile_set_keeps_current() {
        let mut app = app();
        app.power.fail_set = true;
        open(&mut app, Screen::PowerProfile);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.power.set_calls, ["power-saver"]);
        assert_eq!(app.profiles.current, "balanced");
        assert_eq!(app.nav.screen, Screen::PowerProfile);
        let status = app.nav.status.clone().unwrap();
        assert!(status.err);
        assert!(status.text.contains("daemon refused"));
    }

    #[test]
    fn profile_cancel_returns_without_setting() {
        let mut app = app();
        open(&mut app, Screen::PowerProfile);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.screen, Screen::Main);
        assert!(app.power.set_calls.is_empty());
    }

    #[test]
    fn unavailable_daemon_uses_defaults() {
        let mut app = App::new(
            MockPower::unavailable(),
            MockDevice::default(),
            Duration::from_secs(2),
        );
        app.tick(Instant::now());
        assert_eq!(app.profiles.profiles, ["balanced", "power-saver", "performance"]);
        assert_eq!(app.profiles.current, "balanced");
        assert!(!app.profiles_live);
        assert!(!app.device_present);
    }

    #[test]
    fn refresh_follows_wall_clock() {
        let mut app = App::new(
            MockPower::with(&["balanced"], "balanced"),
            MockDevice::default(),
            Duration::from_secs(2),
        );
        let t0 = Instant::now();
        app.tick(t0);
        assert_eq!(app.power.list_calls.get(), 1);
        app.tick(t0 + Duration::from_millis(1500));
        assert_eq!(app.power.list_calls.get(), 1);
        // A long gap still yields a single refresh
        app.tick(t0 + Duration::from_secs(30));
        assert_eq!(app.power.list_calls.get(), 2);
        app.tick(t0 + Duration::from_secs(31));
        assert_eq!(app.power.list_calls.get(), 2);
    }

    #[test]
    fn selection_clamped_after_list_shrinks() {
        let mut app = app();
        open(&mut app, Screen::PowerProfile);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.nav.selection, 2);

        app.power.listing = Some(ProfileListing {
            profiles: vec!["balanced".into()],
            current: "balanced".into(),
        });
        app.tick(Instant::now() + Duration::from_secs(5));
        app.clamp_selection();
        assert_eq!(app.nav.selection, 0);

        app.profiles.profiles.clear();
        app.clamp_selection();
        assert_eq!(app.nav.selection, 0);
        // Nothing to select
        press(&mut app, KeyCode::Enter);
        assert!(app.power.set_calls.is_empty());
        assert_eq!(app.nav.screen, Screen::PowerProfile);
    }

    #[test]
    fn status_cleared_by_any_key() {
        let mut app = app();
        open(&mut app, Screen::KeyboardBacklight);
        press(&mut app, KeyCode::Char('m'));
        assert!(app.nav.status.is_some());
        press(&mut app, KeyCode::Char('z'));
        assert!(app.nav.status.is_none());
    }
}
