//! Keyboard backlight model for the casper-wmi `led_control` file.
//!
//! The driver takes a 9-character control string `RMBCCCCCC`: one digit
//! for the region count, one for the LED mode, one for brightness and six
//! lowercase hex digits of color. Settings are normalized when they are
//! changed, so encoding never fails.

use std::fmt;

pub const REGIONS_MIN: u8 = 1;
pub const REGIONS_MAX: u8 = 9;
pub const MODE_COUNT: u8 = 8;
pub const BRIGHTNESS_MAX: u8 = 2;
const BRIGHTNESS_LEVELS: u8 = BRIGHTNESS_MAX + 1;

/// Mode 0 switches the backlight off.
pub const MODE_OFF: u8 = 0;

const MODE_NAMES: [&str; MODE_COUNT as usize] = [
    "Off",
    "Static",
    "Blinking",
    "Breathing",
    "Pulsing",
    "Rainbow Pulsing",
    "Rainbow Pulsing Alt",
    "Rainbow Wave",
];

pub fn mode_name(mode: u8) -> &'static str {
    MODE_NAMES.get(mode as usize).copied().unwrap_or("Unknown")
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Color
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Six lowercase hex digits, no `#`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse `rrggbb` or `#rrggbb` in any letter case.
///
/// Returns `None` for anything that is not exactly six hex digits after the
/// optional `#` is removed.
pub fn parse_hex_color(input: &str) -> Option<Rgb> {
    let hex = input.strip_prefix('#').unwrap_or(input).to_ascii_lowercase();
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Color picker entries, laid out row-major in a grid of
/// [`PALETTE_COLUMNS`] columns.
pub const COLOR_PALETTE: &[(&str, Rgb)] = &[
    ("White", Rgb::new(0xff, 0xff, 0xff)),
    ("Red", Rgb::new(0xff, 0x00, 0x00)),
    ("Green", Rgb::new(0x00, 0xff, 0x00)),
    ("Blue", Rgb::new(0x00, 0x00, 0xff)),
    ("Purple", Rgb::new(0xff, 0x00, 0xff)),
    ("Cyan", Rgb::new(0x00, 0xff, 0xff)),
    ("Yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("Orange", Rgb::new(0xff, 0x80, 0x00)),
];

pub const PALETTE_COLUMNS: usize = 4;

// ═══════════════════════════════════════════════════════════════════════════════
//  Setting & Updates
// ═══════════════════════════════════════════════════════════════════════════════

/// A backlight state whose fields are always inside the driver's ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BacklightSetting {
    regions: u8,
    mode: u8,
    brightness: u8,
    color: Rgb,
}

impl BacklightSetting {
    /// Regions and brightness are clamped, mode wraps modulo 8.
    pub const fn new(regions: u8, mode: u8, brightness: u8, color: Rgb) -> Self {
        let regions = if regions < REGIONS_MIN {
            REGIONS_MIN
        } else if regions > REGIONS_MAX {
            REGIONS_MAX
        } else {
            regions
        };
        let brightness = if brightness > BRIGHTNESS_MAX {
            BRIGHTNESS_MAX
        } else {
            brightness
        };
        Self {
            regions,
            mode: mode % MODE_COUNT,
            brightness,
            color,
        }
    }

    pub fn regions(&self) -> u8 {
        self.regions
    }

    pub fn mode(&self) -> u8 {
        self.mode
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn mode_name(&self) -> &'static str {
        mode_name(self.mode)
    }
}

impl Default for BacklightSetting {
    fn default() -> Self {
        Self::new(3, 1, 2, Rgb::new(0xff, 0xff, 0xff))
    }
}

/// How a single numeric field should move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// Relative step from the current value.
    Step(i8),
    /// Absolute value.
    Set(u8),
}

/// A partial update. `None` leaves the field alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BacklightUpdate<'a> {
    pub regions: Option<Change>,
    pub mode: Option<Change>,
    pub brightness: Option<Change>,
    pub color: Option<&'a str>,
}

/// Apply `update` on top of `current`.
///
/// Regions saturate at 1 and 9. Mode steps wrap modulo 8 and brightness
/// steps wrap modulo 3, in both directions. An absolute brightness is
/// clamped to 2. A color override that does not parse is dropped and the
/// previous color kept.
pub fn apply_update(current: BacklightSetting, update: &BacklightUpdate<'_>) -> BacklightSetting {
    let regions = match update.regions {
        Some(Change::Step(delta)) => clamp_regions(i16::from(current.regions) + i16::from(delta)),
        Some(Change::Set(value)) => clamp_regions(i16::from(value)),
        None => current.regions,
    };
    let mode = match update.mode {
        Some(Change::Step(delta)) => wrap(current.mode, delta, MODE_COUNT),
        Some(Change::Set(value)) => value % MODE_COUNT,
        None => current.mode,
    };
    let brightness = match update.brightness {
        Some(Change::Step(delta)) => wrap(current.brightness, delta, BRIGHTNESS_LEVELS),
        Some(Change::Set(value)) => value.min(BRIGHTNESS_MAX),
        None => current.brightness,
    };
    let color = update
        .color
        .and_then(parse_hex_color)
        .unwrap_or(current.color);

    BacklightSetting {
        regions,
        mode,
        brightness,
        color,
    }
}

fn clamp_regions(value: i16) -> u8 {
    value.clamp(i16::from(REGIONS_MIN), i16::from(REGIONS_MAX)) as u8
}

fn wrap(value: u8, delta: i8, modulus: u8) -> u8 {
    (i16::from(value) + i16::from(delta)).rem_euclid(i16::from(modulus)) as u8
}

/// Build the control string written to `led_control`: `{regions}{mode}{brightness}{color}`.
pub fn encode(setting: &BacklightSetting) -> String {
    format!(
        "{}{}{}{}",
        setting.regions, setting.mode, setting.brightness, setting.color
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Preset Effects
// ═══════════════════════════════════════════════════════════════════════════════

pub struct PresetEffect {
    pub key: &'static str,
    pub name: &'static str,
    pub setting: BacklightSetting,
}

const fn preset(
    key: &'static str,
    name: &'static str,
    mode: u8,
    brightness: u8,
    color: Rgb,
) -> PresetEffect {
    PresetEffect {
        key,
        name,
        setting: BacklightSetting::new(3, mode, brightness, color),
    }
}

const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

pub const PRESETS: &[PresetEffect] = &[
    preset("off", "Off", 0, 0, Rgb::new(0x00, 0x00, 0x00)),
    preset("default_static", "Default Static", 1, 2, WHITE),
    preset("default_blinking", "Default Blinking", 2, 2, WHITE),
    preset("default_breathing", "Default Breathing", 3, 2, WHITE),
    preset("default_pulsing", "Default Pulsing", 4, 2, WHITE),
    preset("rainbow_pulsing", "Rainbow Pulsing", 5, 2, WHITE),
    preset("rainbow_pulsing_alt", "Rainbow Pulsing Alt", 6, 2, WHITE),
    preset("rainbow_wave", "Rainbow Wave", 7, 2, WHITE),
    preset("gaming_red", "Gaming Red", 1, 2, Rgb::new(0xff, 0x00, 0x00)),
    preset("gaming_blue", "Gaming Blue", 1, 2, Rgb::new(0x00, 0x00, 0xff)),
    preset("cyber_purple", "Cyber Purple", 3, 2, Rgb::new(0x80, 0x00, 0xff)),
    preset("hacker_green", "Hacker Green", 2, 1, Rgb::new(0x00, 0xff, 0x00)),
];

/// Case-sensitive lookup by preset key.
pub fn lookup(key: &str) -> Option<&'static PresetEffect> {
    PRESETS.iter().find(|p| p.key == key)
}
