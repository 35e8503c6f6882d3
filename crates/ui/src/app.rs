use std::time::Duration;

use eframe::egui;
use folio_core::splash::SplashGate;
use folio_core::views::{hit_test, splash::render_splash};
use folio_core::{Effect, Page};
use folio_protocol::{Action, FormField, Point, RenderCommand, SectionKind, ThemeMode, ThemeToken, Viewport};
use tracing::{info, warn};

use crate::relay;
use crate::renderer;
use crate::theme;

/// Pixels per arrow-key press.
const KEY_SCROLL: f32 = 60.0;

/// Main application state.
pub struct PortfolioApp {
    page: Page,
    splash: SplashGate,
    /// Page scroll offset in pixels.
    scroll_y: f32,
    /// Input currently being edited, overlaid on its rect.
    editing: Option<FormField>,
    /// Grab keyboard focus on the next frame.
    focus_pending: bool,
    applied_theme: Option<ThemeMode>,
    /// Status line message (export results, open failures).
    notice: Option<String>,
}

impl PortfolioApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, folio_core::Error> {
        let (config, registry) = folio_core::load()?;
        let now = elapsed(&cc.egui_ctx);
        info!(
            projects = registry.projects.len(),
            journey = registry.journey.len(),
            "portfolio loaded"
        );
        let relay = relay::for_context(&cc.egui_ctx);
        Ok(Self {
            page: Page::new(&config, registry, relay),
            splash: SplashGate::new(now, config.splash()),
            scroll_y: 0.0,
            editing: None,
            focus_pending: false,
            applied_theme: None,
            notice: None,
        })
    }

    fn apply(&mut self, ctx: &egui::Context, action: &Action, now: Duration) {
        if !matches!(action, Action::EditField { .. }) {
            self.editing = None;
        }
        match self.page.handle(action, now) {
            Some(Effect::OpenUrl(url)) => {
                info!(%url, "opening link");
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
            Some(Effect::ScrollTo(y)) => self.scroll_y = y as f32,
            Some(Effect::FocusField(field)) => {
                self.editing = Some(field);
                self.focus_pending = true;
            }
            None => {}
        }
    }

    fn scroll_by(&mut self, dy: f32, view_height: f32) {
        if self.page.modal_open() {
            self.page.scroll_modal(f64::from(dy));
            return;
        }
        let max = (self.page.height() as f32 - view_height).max(0.0);
        self.scroll_y = (self.scroll_y + dy).clamp(0.0, max);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn export_svg(&mut self, width: f32, now: Duration) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name("portfolio.svg")
            .save_file()
        else {
            return;
        };
        let (commands, height) = self.page.export(f64::from(width), now);
        let svg = folio_core::svg::render_svg(&commands, f64::from(width), height, self.page.theme());
        self.notice = Some(match std::fs::write(&path, svg) {
            Ok(()) => format!("Exported {}", path.display()),
            Err(e) => {
                warn!(error = %e, "svg export failed");
                format!("Export failed: {e}")
            }
        });
    }

    fn edit_overlay(&mut self, ui: &mut egui::Ui, fields: &[renderer::FieldRegion]) {
        let Some(editing) = self.editing else {
            return;
        };
        let Some(region) = fields.iter().find(|r| r.field == editing) else {
            // Scrolled out of view.
            self.editing = None;
            return;
        };
        let mode = self.page.theme();
        ui.painter()
            .rect_filled(region.rect.shrink(1.0), 6.0, theme::resolve(ThemeToken::InputBackground, mode));

        let value = self.page.contact_mut().form_mut().field_mut(editing);
        let edit = if editing == FormField::Message {
            egui::TextEdit::multiline(value)
        } else {
            egui::TextEdit::singleline(value)
        }
        .hint_text(editing.placeholder())
        .frame(false)
        .text_color(theme::resolve(ThemeToken::TextPrimary, mode))
        .font(egui::FontId::proportional(14.0));

        let response = ui.put(region.rect.shrink2(egui::vec2(12.0, 10.0)), edit);
        if self.focus_pending {
            response.request_focus();
            self.focus_pending = false;
        } else if response.lost_focus() {
            // Tab moves to the next input, like a browser form.
            let tabbed = ui.input(|i| i.key_pressed(egui::Key::Tab));
            self.editing = tabbed
                .then(|| FormField::ALL.iter().skip_while(|&&f| f != editing).nth(1).copied())
                .flatten();
            self.focus_pending = self.editing.is_some();
        }
    }
}

/// Time since the app started, from egui's clock.
fn elapsed(ctx: &egui::Context) -> Duration {
    Duration::from_secs_f64(ctx.input(|i| i.time).max(0.0))
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = elapsed(ctx);
        let mode = self.page.theme();
        if self.applied_theme != Some(mode) {
            ctx.set_visuals(theme::visuals(mode));
            self.applied_theme = Some(mode);
        }

        if !self.splash.is_done(now) {
            egui::CentralPanel::default().frame(egui::Frame::NONE).show(ctx, |ui| {
                let available = ui.available_rect_before_wrap();
                let mut painter = ui.painter_at(available);
                let viewport = folio_protocol::Rect::new(
                    0.0,
                    0.0,
                    f64::from(available.width()),
                    f64::from(available.height()),
                );
                let commands = render_splash(viewport, now);
                renderer::render_commands(&mut painter, &commands, available.min, mode);
            });
            ctx.request_repaint();
            return;
        }

        if let Some(notice) = &self.notice {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.label(notice);
            });
        }

        egui::CentralPanel::default().frame(egui::Frame::NONE).show(ctx, |ui| {
            let available = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(available, egui::Sense::click());

            // Wheel and keys scroll while no input has focus.
            let typing = self.editing.is_some() && ctx.memory(|m| m.focused().is_some());
            let wheel = ui.input(|i| i.smooth_scroll_delta.y);
            if wheel.abs() > 0.1 && response.hovered() {
                self.scroll_by(-wheel, available.height());
            }
            if !typing {
                let keys = ui.input(|i| {
                    let mut dy = 0.0;
                    if i.key_pressed(egui::Key::ArrowDown) {
                        dy += KEY_SCROLL;
                    }
                    if i.key_pressed(egui::Key::ArrowUp) {
                        dy -= KEY_SCROLL;
                    }
                    if i.key_pressed(egui::Key::PageDown) || i.key_pressed(egui::Key::Space) {
                        dy += available.height() * 0.9;
                    }
                    if i.key_pressed(egui::Key::PageUp) {
                        dy -= available.height() * 0.9;
                    }
                    if i.key_pressed(egui::Key::Home) {
                        dy = f32::NEG_INFINITY;
                    }
                    if i.key_pressed(egui::Key::End) {
                        dy = f32::INFINITY;
                    }
                    dy
                });
                if keys != 0.0 {
                    self.scroll_by(keys, available.height());
                }
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) && self.page.modal_open() {
                    self.apply(
                        ctx,
                        &Action::CloseDetail {
                            section: SectionKind::Projects,
                        },
                        now,
                    );
                }
                #[cfg(not(target_arch = "wasm32"))]
                if ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
                    self.export_svg(available.width(), now);
                }
            }

            let viewport = Viewport::new(f64::from(available.width()), f64::from(available.height()))
                .scrolled_to(f64::from(self.scroll_y));
            let commands: Vec<RenderCommand> = self.page.frame(&viewport, now);
            // Content may have shrunk (filter change) under the scroll offset.
            self.scroll_by(0.0, available.height());

            let mut painter = ui.painter_at(available);
            let result = renderer::render_commands(&mut painter, &commands, available.min, mode);

            if response.clicked()
                && let Some(pos) = response.interact_pointer_pos()
            {
                let local = pos - available.min;
                let point = Point::new(f64::from(local.x), f64::from(local.y));
                match hit_test(&commands, point) {
                    Some(action) => self.apply(ctx, &action, now),
                    None => self.editing = None,
                }
            }
            if response.hovered()
                && let Some(pos) = response.hover_pos()
            {
                let local = pos - available.min;
                if hit_test(&commands, Point::new(f64::from(local.x), f64::from(local.y))).is_some() {
                    ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                }
            }

            self.edit_overlay(ui, &result.fields);
        });

        ctx.request_repaint_after(self.page.next_deadline(now));
    }
}
