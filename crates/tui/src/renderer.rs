use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::content::filter::TagFilter;
use folio_core::splash::SplashGate;
use folio_core::views::{hit_test, label_color, splash::render_splash};
use folio_core::{Effect, Page};
use folio_protocol::{
    Action, FormField, Point, RenderCommand, SectionKind, TextAlign, ThemeMode, ThemeToken, Viewport,
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Paragraph},
};
use tracing::info;

/// Page pixels per terminal column.
pub const CELL_WIDTH: f64 = 8.0;
/// Page pixels per terminal row.
pub const CELL_HEIGHT: f64 = 16.0;

fn theme_to_color(token: ThemeToken, mode: ThemeMode) -> Color {
    let dark = mode.is_dark();
    match token {
        ThemeToken::Background | ThemeToken::SectionBackground => {
            if dark { Color::Rgb(17, 24, 39) } else { Color::Rgb(255, 255, 255) }
        }
        ThemeToken::SectionBackgroundAlt | ThemeToken::Surface | ThemeToken::ModalSurface => {
            if dark { Color::Rgb(31, 41, 55) } else { Color::Rgb(249, 250, 251) }
        }
        ThemeToken::SurfaceRaised | ThemeToken::InputBackground | ThemeToken::TabInactive => {
            if dark { Color::Rgb(55, 65, 81) } else { Color::Rgb(229, 231, 235) }
        }
        ThemeToken::Border | ThemeToken::InputBorder | ThemeToken::TimelineLine => {
            if dark { Color::Rgb(75, 85, 99) } else { Color::Rgb(191, 219, 254) }
        }
        ThemeToken::TextPrimary => if dark { Color::White } else { Color::Black },
        ThemeToken::TextSecondary => if dark { Color::Gray } else { Color::DarkGray },
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::TextOnAccent => Color::White,
        ThemeToken::AccentBlue
        | ThemeToken::TabActive
        | ThemeToken::ButtonPrimary
        | ThemeToken::TimelineDot
        | ThemeToken::SplashBackground => Color::Rgb(37, 99, 235),
        ThemeToken::Link => Color::LightBlue,
        ThemeToken::AccentGreen => Color::Rgb(22, 163, 74),
        ThemeToken::AccentPurple => Color::Rgb(147, 51, 234),
        ThemeToken::AccentOrange => Color::Rgb(234, 88, 12),
        ThemeToken::AccentTeal => Color::Rgb(13, 148, 136),
        ThemeToken::AccentPink => Color::Rgb(219, 39, 119),
        ThemeToken::AccentGray | ThemeToken::ButtonDisabled => Color::Rgb(107, 114, 128),
        ThemeToken::Chip => if dark { Color::Rgb(30, 58, 138) } else { Color::Rgb(219, 234, 254) },
        ThemeToken::ChipText => if dark { Color::Rgb(191, 219, 254) } else { Color::Rgb(30, 64, 175) },
        ThemeToken::SuccessBackground => Color::Rgb(20, 83, 45),
        ThemeToken::SuccessText => Color::LightGreen,
        ThemeToken::ErrorBackground => Color::Rgb(127, 29, 29),
        ThemeToken::ErrorText => Color::LightRed,
        ThemeToken::Overlay => Color::Black,
        ThemeToken::SplashSpinner => Color::White,
    }
}

/// Cell-space transform: translations only, terminals cannot scale.
#[derive(Debug, Clone, Copy, Default)]
struct Offset {
    x: f64,
    y: f64,
}

fn to_cell(v: f64, cell: f64) -> i32 {
    (v / cell).round() as i32
}

/// Paint page commands into `buf` within `area`. Command coordinates are
/// page pixels relative to the top-left of `area`.
pub fn paint(buf: &mut Buffer, area: Rect, commands: &[RenderCommand], mode: ThemeMode) {
    let mut offsets = vec![Offset::default()];
    let mut opacity = vec![1.0_f64];
    let mut clips: Vec<Rect> = vec![area];

    for cmd in commands {
        let off = offsets.last().copied().unwrap_or_default();
        let visible = opacity.last().copied().unwrap_or(1.0) > 0.0;
        let clip = clips.last().copied().unwrap_or(area);
        let put = |buf: &mut Buffer, col: i32, row: i32| -> Option<(u16, u16)> {
            let x = i32::from(area.x) + col;
            let y = i32::from(area.y) + row;
            let (x, y) = (u16::try_from(x).ok()?, u16::try_from(y).ok()?);
            let inside = x >= clip.x && x < clip.right() && y >= clip.y && y < clip.bottom();
            (inside && buf.area.contains((x, y).into())).then_some((x, y))
        };

        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } if visible => {
                let c0 = to_cell(rect.x + off.x, CELL_WIDTH);
                let r0 = to_cell(rect.y + off.y, CELL_HEIGHT);
                let c1 = to_cell(rect.right() + off.x, CELL_WIDTH).max(c0 + 1);
                let r1 = to_cell(rect.bottom() + off.y, CELL_HEIGHT).max(r0 + 1);
                let bg = theme_to_color(*color, mode);
                for row in r0..r1 {
                    for col in c0..c1 {
                        if let Some(pos) = put(buf, col, row) {
                            buf[pos].set_char(' ').set_bg(bg);
                        }
                    }
                }
                if let Some(border) = border_color
                    && c1 - c0 >= 2
                    && r1 - r0 >= 2
                {
                    let fg = theme_to_color(*border, mode);
                    for col in c0..c1 {
                        for row in [r0, r1 - 1] {
                            if let Some(pos) = put(buf, col, row) {
                                buf[pos].set_char('─').set_fg(fg);
                            }
                        }
                    }
                    for row in r0..r1 {
                        for (col, ch) in [(c0, '│'), (c1 - 1, '│')] {
                            if let Some(pos) = put(buf, col, row) {
                                buf[pos].set_char(ch).set_fg(fg);
                            }
                        }
                    }
                }
                if let Some(label) = label {
                    let fg = theme_to_color(label_color(*color), mode);
                    let len = label.chars().count() as i32;
                    let start = c0 + ((c1 - c0) - len).max(0) / 2;
                    let row = r0 + (r1 - r0 - 1) / 2;
                    for (i, ch) in label.chars().enumerate() {
                        let col = start + i as i32;
                        if col >= c1 {
                            break;
                        }
                        if let Some(pos) = put(buf, col, row) {
                            buf[pos].set_char(ch).set_fg(fg);
                        }
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } if visible => {
                let len = text.chars().count() as i32;
                let mut col = to_cell(position.x + off.x, CELL_WIDTH);
                col -= match align {
                    TextAlign::Left => 0,
                    TextAlign::Center => len / 2,
                    TextAlign::Right => len,
                };
                let row = to_cell(position.y + off.y, CELL_HEIGHT);
                let fg = theme_to_color(*color, mode);
                for (i, ch) in text.chars().enumerate() {
                    if let Some(pos) = put(buf, col + i as i32, row) {
                        buf[pos].set_char(ch).set_fg(fg);
                    }
                }
            }
            RenderCommand::DrawLine { from, to, color, .. } if visible => {
                let fg = theme_to_color(*color, mode);
                let (c0, r0) = (to_cell(from.x + off.x, CELL_WIDTH), to_cell(from.y + off.y, CELL_HEIGHT));
                let (c1, r1) = (to_cell(to.x + off.x, CELL_WIDTH), to_cell(to.y + off.y, CELL_HEIGHT));
                let cells: Vec<(i32, i32, char)> = if c0 == c1 {
                    (r0.min(r1)..=r0.max(r1)).map(|r| (c0, r, '│')).collect()
                } else if r0 == r1 {
                    (c0.min(c1)..=c0.max(c1)).map(|c| (c, r0, '─')).collect()
                } else {
                    vec![(c0, r0, '•')]
                };
                for (col, row, ch) in cells {
                    if let Some(pos) = put(buf, col, row) {
                        buf[pos].set_char(ch).set_fg(fg);
                    }
                }
            }
            RenderCommand::SetClip { rect } => {
                let c0 = to_cell(rect.x + off.x, CELL_WIDTH).max(0);
                let r0 = to_cell(rect.y + off.y, CELL_HEIGHT).max(0);
                let c1 = to_cell(rect.right() + off.x, CELL_WIDTH).max(c0);
                let r1 = to_cell(rect.bottom() + off.y, CELL_HEIGHT).max(r0);
                let cell_rect = Rect::new(
                    area.x.saturating_add(u16::try_from(c0).unwrap_or(u16::MAX)),
                    area.y.saturating_add(u16::try_from(r0).unwrap_or(u16::MAX)),
                    u16::try_from(c1 - c0).unwrap_or(u16::MAX),
                    u16::try_from(r1 - r0).unwrap_or(u16::MAX),
                );
                clips.push(clip.intersection(cell_rect));
            }
            RenderCommand::ClearClip => {
                if clips.len() > 1 {
                    clips.pop();
                }
            }
            RenderCommand::PushTransform { translate, .. } => offsets.push(Offset {
                x: off.x + translate.x,
                y: off.y + translate.y,
            }),
            RenderCommand::PopTransform => {
                if offsets.len() > 1 {
                    offsets.pop();
                }
            }
            RenderCommand::PushOpacity { opacity: alpha } => {
                let parent = opacity.last().copied().unwrap_or(1.0);
                opacity.push(parent * alpha);
            }
            RenderCommand::PopOpacity => {
                if opacity.len() > 1 {
                    opacity.pop();
                }
            }
            _ => {}
        }
    }
}

/// Page point under the center of a terminal cell.
pub fn cell_to_point(col: u16, row: u16) -> Point {
    Point::new(
        (f64::from(col) + 0.5) * CELL_WIDTH,
        (f64::from(row) + 0.5) * CELL_HEIGHT,
    )
}

/// Interactive state around the page.
struct Session {
    page: Page,
    scroll_y: f64,
    editing: Option<FormField>,
    notice: Option<String>,
}

impl Session {
    fn apply(&mut self, action: &Action, now: Duration) {
        if !matches!(action, Action::EditField { .. }) {
            self.editing = None;
        }
        match self.page.handle(action, now) {
            Some(Effect::OpenUrl(url)) => {
                info!(%url, "link selected");
                self.notice = Some(format!("Link: {url}"));
            }
            Some(Effect::ScrollTo(y)) => self.scroll_y = y,
            Some(Effect::FocusField(field)) => {
                self.editing = Some(field);
                self.notice = Some(format!("Editing {} (Tab next, Esc done)", field.label()));
            }
            None => {}
        }
    }

    fn scroll_by(&mut self, dy: f64, view_height: f64) {
        if self.page.modal_open() {
            self.page.scroll_modal(dy);
            return;
        }
        let max = (self.page.height() - view_height).max(0.0);
        self.scroll_y = (self.scroll_y + dy).clamp(0.0, max);
    }

    fn next_project_filter(&mut self, now: Duration) {
        let filters = &self.page.registry().project_filters;
        if filters.is_empty() {
            return;
        }
        let current = filters
            .iter()
            .position(|f| TagFilter::from_tag(&f.tag) == *self.page.project_filter())
            .unwrap_or(0);
        let tab = (current + 1) % filters.len();
        self.apply(
            &Action::SelectTab {
                section: SectionKind::Projects,
                tab,
            },
            now,
        );
    }

    fn edit(&mut self, field: FormField, code: KeyCode) {
        let value = self.page.contact_mut().form_mut().field_mut(field);
        match code {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Enter if field == FormField::Message => value.push('\n'),
            KeyCode::Enter | KeyCode::Tab => {
                self.editing = FormField::ALL.iter().skip_while(|&&f| f != field).nth(1).copied();
            }
            KeyCode::Esc => {
                self.editing = None;
                self.notice = None;
            }
            _ => {}
        }
    }
}

pub fn run_tui(page: Page, splash_delay: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let started = Instant::now();
    let splash = SplashGate::new(Duration::ZERO, splash_delay);
    let mut session = Session {
        page,
        scroll_y: 0.0,
        editing: None,
        notice: None,
    };

    loop {
        let now = started.elapsed();
        let term_size = terminal.size()?;
        let content = Rect::new(0, 1, term_size.width, term_size.height.saturating_sub(2));
        let viewport = Viewport::new(
            f64::from(content.width) * CELL_WIDTH,
            f64::from(content.height) * CELL_HEIGHT,
        )
        .scrolled_to(session.scroll_y);

        let showing_splash = !splash.is_done(now);
        let cmds = if showing_splash {
            render_splash(folio_protocol::Rect::new(0.0, 0.0, viewport.width, viewport.height), now)
        } else {
            session.page.frame(&viewport, now)
        };
        let mode = session.page.theme();

        terminal.draw(|frame| {
            let area = frame.area();
            let header = Block::default()
                .title(format!(
                    " {} | ↑↓ scroll | 1-9 skills | f filter | t theme | click to interact | q quit ",
                    session.page.registry().profile.name
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, Rect::new(0, 0, area.width, 1));

            paint(frame.buffer_mut(), content, &cmds, mode);

            let status = session
                .notice
                .clone()
                .or_else(|| session.page.contact().status().banner().map(str::to_string))
                .unwrap_or_default();
            frame.render_widget(
                Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                Rect::new(0, area.height.saturating_sub(1), area.width, 1),
            );
        })?;

        let view_height = viewport.height;
        let wait = if showing_splash {
            Duration::from_millis(50)
        } else {
            session.page.next_deadline(now).min(Duration::from_millis(250))
        };
        if !event::poll(wait)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(field) = session.editing {
                    session.edit(field, key.code);
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Esc if session.page.modal_open() => session.apply(
                        &Action::CloseDetail {
                            section: SectionKind::Projects,
                        },
                        now,
                    ),
                    KeyCode::Esc => break,
                    KeyCode::Up => session.scroll_by(-CELL_HEIGHT * 2.0, view_height),
                    KeyCode::Down => session.scroll_by(CELL_HEIGHT * 2.0, view_height),
                    KeyCode::PageUp => session.scroll_by(-view_height * 0.9, view_height),
                    KeyCode::PageDown | KeyCode::Char(' ') => session.scroll_by(view_height * 0.9, view_height),
                    KeyCode::Home => session.scroll_by(f64::NEG_INFINITY, view_height),
                    KeyCode::End => session.scroll_by(f64::INFINITY, view_height),
                    KeyCode::Char(c @ '1'..='9') => {
                        let tab = c as usize - '1' as usize;
                        session.apply(
                            &Action::SelectTab {
                                section: SectionKind::Skills,
                                tab,
                            },
                            now,
                        );
                    }
                    KeyCode::Char('f') => session.next_project_filter(now),
                    KeyCode::Char('t') => session.apply(&Action::ToggleTheme, now),
                    _ => {}
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => session.scroll_by(CELL_HEIGHT * 3.0, view_height),
                MouseEventKind::ScrollUp => session.scroll_by(-CELL_HEIGHT * 3.0, view_height),
                MouseEventKind::Down(MouseButton::Left) if mouse.row >= content.y => {
                    let point = cell_to_point(mouse.column - content.x, mouse.row - content.y);
                    match hit_test(&cmds, point) {
                        Some(action) => session.apply(&action, now),
                        None => session.editing = None,
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
