//! Rendering. Everything here reads the model and never changes it.

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, MAIN_MENU, Screen};
use crate::backlight::{self, BRIGHTNESS_MAX, COLOR_PALETTE, PALETTE_COLUMNS, PRESETS, Rgb};

// ═══════════════════════════════════════════════════════════════════════════════
//  Theme: Excalibur Amber
// ═══════════════════════════════════════════════════════════════════════════════

struct Theme;

impl Theme {
    const ACCENT: Color = Color::Rgb(255, 150, 20);
    const ACCENT2: Color = Color::Rgb(255, 190, 90);
    const DIM: Color = Color::Rgb(150, 90, 20);
    const DARK: Color = Color::Rgb(70, 40, 10);
    const BG_HL: Color = Color::Rgb(45, 25, 5);
    const BG_HEADER: Color = Color::Rgb(20, 10, 2);
    const FG: Color = Color::Rgb(225, 218, 205);
    const FG_DIM: Color = Color::Rgb(135, 125, 110);
    const OK: Color = Color::Rgb(80, 220, 100);
    const WARM: Color = Color::Rgb(255, 200, 0);
    const ERR: Color = Color::Rgb(255, 70, 50);
}

fn swatch(c: Rgb) -> Span<'static> {
    Span::styled(" ███ ", Style::new().fg(Color::Rgb(c.r, c.g, c.b)))
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {text}"),
        Style::new().fg(Theme::DIM),
    ))
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {text}"),
        Style::new().fg(Theme::ACCENT).bold(),
    ))
}

fn kv(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {label:<16}"), Style::new().fg(Theme::FG)),
        Span::styled(value, Style::new().fg(color).bold()),
    ])
}

fn list_row(label: &str, selected: bool) -> Vec<Span<'static>> {
    if selected {
        let style = Style::new().fg(Theme::ACCENT).bg(Theme::BG_HL).bold();
        vec![
            Span::styled(" ▸ ", style),
            Span::styled(format!("{label:<22}"), style),
        ]
    } else {
        vec![
            Span::raw("   "),
            Span::styled(format!("{label:<22}"), Style::new().fg(Theme::FG)),
        ]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Screen Bodies
// ═══════════════════════════════════════════════════════════════════════════════

/// Body of the active screen. `focus` is the line holding the selection
/// and must stay visible when the body is taller than its area.
pub struct Body {
    pub lines: Vec<Line<'static>>,
    pub focus: usize,
}

impl From<Vec<Line<'static>>> for Body {
    fn from(lines: Vec<Line<'static>>) -> Self {
        Self { lines, focus: 0 }
    }
}

pub fn screen_lines<P, D>(app: &App<P, D>) -> Body {
    match app.nav.screen {
        Screen::Main => main_lines(app),
        Screen::PowerProfile => power_lines(app),
        Screen::KeyboardBacklight => backlight_lines(app),
        Screen::RgbColorControl => color_lines(app),
        Screen::PresetEffects => preset_lines(app),
        Screen::SystemInfo => sysinfo_lines(app),
    }
}

fn main_lines<P, D>(app: &App<P, D>) -> Body {
    let mut lines = vec![Line::default()];
    let mut focus = 0;
    for (i, (label, _)) in MAIN_MENU.iter().enumerate() {
        if i == app.nav.selection {
            focus = lines.len();
        }
        lines.push(Line::from(list_row(label, i == app.nav.selection)));
        lines.push(Line::default());
    }
    Body { lines, focus }
}

fn power_lines<P, D>(app: &App<P, D>) -> Body {
    let current = if app.profiles.current.is_empty() {
        "unknown".to_string()
    } else {
        app.profiles.current.clone()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  Current: ", Style::new().fg(Theme::FG_DIM)),
            Span::styled(current, Style::new().fg(Theme::ACCENT).bold()),
        ]),
        Line::default(),
    ];

    let mut focus = 0;
    for (i, profile) in app.profiles.profiles.iter().enumerate() {
        if i == app.nav.selection {
            focus = lines.len();
        }
        let mut spans = list_row(profile, i == app.nav.selection);
        if *profile == app.profiles.current {
            spans.push(Span::styled("● active", Style::new().fg(Theme::OK)));
        }
        lines.push(Line::from(spans));
    }

    if !app.profiles_live {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  ⚠ power-profiles-daemon not reachable, showing defaults",
            Style::new().fg(Theme::WARM),
        )));
    }

    lines.push(Line::default());
    lines.push(hint("Enter: Select  │  Esc: Back"));
    Body { lines, focus }
}

fn backlight_lines<P, D>(app: &App<P, D>) -> Body {
    let s = &app.backlight;
    let mut lines = Vec::new();
    if !app.device_present {
        lines.push(Line::from(Span::styled(
            "  ⚠ led_control not found. Is the casper-wmi module loaded?",
            Style::new().fg(Theme::WARM),
        )));
        lines.push(Line::default());
    }

    lines.extend([
        heading("Current Settings"),
        kv("Regions", s.regions().to_string(), Theme::ACCENT2),
        kv(
            "Mode",
            format!("{} ({})", s.mode(), s.mode_name()),
            Theme::ACCENT2,
        ),
        kv(
            "Brightness",
            format!("{}/{BRIGHTNESS_MAX}", s.brightness()),
            Theme::ACCENT2,
        ),
        Line::from(vec![
            Span::styled(format!("    {:<16}", "Color"), Style::new().fg(Theme::FG)),
            Span::styled(
                format!("#{}", s.color().to_string().to_uppercase()),
                Style::new().fg(Theme::ACCENT2).bold(),
            ),
            swatch(s.color()),
        ]),
        kv("Control String", backlight::encode(s), Theme::FG),
        Line::default(),
        heading("Controls"),
        hint("  m/M  Change mode (0-7)"),
        hint("  b/B  Change brightness (0-2)"),
        hint("  r/R  Change regions (1-9)"),
        hint("  c    Color selection"),
        hint("  0    Turn off"),
        hint("  Esc  Go back"),
    ]);
    lines.into()
}

fn color_lines<P, D>(app: &App<P, D>) -> Body {
    let c = app.backlight.color();
    let channel = |name: &str, v: u8| kv(name, format!("{v:3} (0x{v:02X})"), Theme::FG);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  Current Color: ", Style::new().fg(Theme::FG_DIM)),
            Span::styled(
                format!("#{}", c.to_string().to_uppercase()),
                Style::new().fg(Theme::ACCENT).bold(),
            ),
            swatch(c),
        ]),
        Line::default(),
        channel("Red", c.r),
        channel("Green", c.g),
        channel("Blue", c.b),
        Line::default(),
        heading("Preset Colors"),
    ];

    let focus = lines.len() + app.nav.selection / PALETTE_COLUMNS;
    for (row, chunk) in COLOR_PALETTE.chunks(PALETTE_COLUMNS).enumerate() {
        let mut spans = vec![Span::raw("  ")];
        for (col, (name, rgb)) in chunk.iter().enumerate() {
            let selected = row * PALETTE_COLUMNS + col == app.nav.selection;
            let style = if selected {
                Style::new().fg(Theme::ACCENT).bg(Theme::BG_HL).bold()
            } else {
                Style::new().fg(Theme::FG)
            };
            spans.push(Span::styled(
                "██",
                Style::new().fg(Color::Rgb(rgb.r, rgb.g, rgb.b)),
            ));
            spans.push(Span::styled(format!(" {name:<9}"), style));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(hint("←→↑↓: Navigate  │  Enter: Apply color  │  Esc: Back"));
    Body { lines, focus }
}

fn preset_lines<P, D>(app: &App<P, D>) -> Body {
    let mut lines: Vec<Line> = PRESETS
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut spans = list_row(p.name, i == app.nav.selection);
            spans.push(Span::styled(
                backlight::encode(&p.setting),
                Style::new().fg(Theme::FG_DIM),
            ));
            Line::from(spans)
        })
        .collect();

    lines.push(Line::default());
    lines.push(hint("Enter: Apply preset  │  Esc: Back"));
    Body {
        lines,
        focus: app.nav.selection,
    }
}

fn sysinfo_lines<P, D>(app: &App<P, D>) -> Body {
    let info = &app.sysinfo;
    let memory = match (info.mem_available_mb, info.mem_total_mb) {
        (Some(avail), Some(total)) => format!("{avail}MB / {total}MB available"),
        _ => "N/A".into(),
    };
    let driver = if app.device_present {
        kv("Casper WMI", "✓ Loaded".into(), Theme::OK)
    } else {
        kv("Casper WMI", "✗ Not found".into(), Theme::ERR)
    };

    vec![
        kv(
            "CPU",
            info.cpu_model.clone().unwrap_or_else(|| "N/A".into()),
            Theme::ACCENT2,
        ),
        kv("Memory", memory, Theme::ACCENT2),
        kv("Power Profile", app.profiles.current.clone(), Theme::ACCENT2),
        kv("LED Control", backlight::encode(&app.backlight), Theme::ACCENT2),
        kv("LED Mode", app.backlight.mode_name().into(), Theme::ACCENT2),
        driver,
        Line::default(),
        hint("Esc: Back"),
    ]
    .into()
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Frame
// ═══════════════════════════════════════════════════════════════════════════════

/// First visible line that keeps `focus` inside a viewport `height` rows tall.
fn scroll_offset(focus: usize, height: u16) -> u16 {
    let height = usize::from(height.max(1));
    u16::try_from((focus + 1).saturating_sub(height)).unwrap_or(u16::MAX)
}

pub fn draw<P, D>(f: &mut Frame, app: &App<P, D>) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(4),
    ])
    .areas(f.area());

    draw_header(f, header);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(Theme::DIM))
        .title(Span::styled(
            format!(" {} ", app.nav.screen.title()),
            Style::new().fg(Theme::ACCENT).bold(),
        ));
    let Body { lines, focus } = screen_lines(app);
    let scroll = scroll_offset(focus, block.inner(body).height);
    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), body);

    draw_status(f, status, app);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let block = Block::bordered()
        .border_type(BorderType::Double)
        .border_style(Style::new().fg(Theme::ACCENT))
        .style(Style::new().bg(Theme::BG_HEADER));

    let text = Line::from(vec![
        Span::styled("  ◆ ", Style::new().fg(Theme::ACCENT).bold()),
        Span::styled("E X C A L I B U R", Style::new().fg(Theme::ACCENT).bold()),
        Span::styled("  ◆  ", Style::new().fg(Theme::ACCENT)),
        Span::styled(
            "Casper Excalibur Control Panel",
            Style::new().fg(Theme::FG_DIM),
        ),
    ])
    .centered();

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_status<P, D>(f: &mut Frame, area: Rect, app: &App<P, D>) {
    let driver_span = if app.device_present {
        Span::styled(" LED ✓ ", Style::new().fg(Theme::OK).bold())
    } else {
        Span::styled(" NO LED ", Style::new().fg(Theme::ERR).bold())
    };
    let ppd_span = if app.profiles_live {
        Span::styled(" PPD ✓ ", Style::new().fg(Theme::OK).bold())
    } else {
        Span::styled(" NO PPD ", Style::new().fg(Theme::WARM).bold())
    };

    let message = match &app.nav.status {
        Some(s) if s.err => Span::styled(format!("  ✗ {}", s.text), Style::new().fg(Theme::ERR)),
        Some(s) => Span::styled(format!("  ✓ {}", s.text), Style::new().fg(Theme::OK)),
        None => Span::styled("  Ready", Style::new().fg(Theme::FG_DIM)),
    };

    let help = match app.nav.screen {
        Screen::Main => " ↑↓ Navigate │ Enter Select │ q Quit ",
        Screen::PowerProfile | Screen::PresetEffects => " ↑↓ Navigate │ Enter Apply │ Esc Back ",
        Screen::KeyboardBacklight => " m/b/r Adjust │ c Color │ 0 Off │ Esc Back ",
        Screen::RgbColorControl => " ←→↑↓ Navigate │ Enter Apply │ Esc Back ",
        Screen::SystemInfo => " Esc Back ",
    };

    let lines = vec![
        Line::from(vec![driver_span, ppd_span, message]),
        Line::from(Span::styled(help, Style::new().fg(Theme::FG_DIM))),
    ];

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(Theme::DARK));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
