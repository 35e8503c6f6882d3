use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};
use folio_core::views::label_color;
use folio_protocol::{Action, FormField, RenderCommand, TextAlign, ThemeMode};

use crate::theme;

const CORNER: u8 = 6;

/// Transform state for PushTransform/PopTransform.
#[derive(Debug, Clone, Copy)]
struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            sx: 1.0,
            sy: 1.0,
        }
    }

    fn apply_x(&self, x: f64) -> f32 {
        (x * self.sx + self.tx) as f32
    }

    fn apply_y(&self, y: f64) -> f32 {
        (y * self.sy + self.ty) as f32
    }

    fn scale_w(&self, w: f64) -> f32 {
        (w * self.sx) as f32
    }

    fn scale_h(&self, h: f64) -> f32 {
        (h * self.sy) as f32
    }
}

/// Screen rect of a visible form input.
pub struct FieldRegion {
    pub rect: Rect,
    pub field: FormField,
}

/// Result of rendering a command list: where the form inputs ended up.
pub struct RenderResult {
    pub fields: Vec<FieldRegion>,
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area.
pub fn render_commands(
    painter: &mut egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) -> RenderResult {
    let mut transform_stack: Vec<Transform> = vec![Transform::identity()];
    let mut opacity_stack: Vec<f32> = vec![1.0];
    let mut clip_stack: Vec<Rect> = Vec::new();
    let mut fields: Vec<FieldRegion> = Vec::new();

    for cmd in commands {
        let tf = transform_stack
            .last()
            .copied()
            .unwrap_or(Transform::identity());
        let opacity = opacity_stack.last().copied().unwrap_or(1.0);
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                action,
            } => {
                if opacity <= 0.0 {
                    continue;
                }
                let x = tf.apply_x(rect.x) + offset.x;
                let y = tf.apply_y(rect.y) + offset.y;
                let w = tf.scale_w(rect.w);
                let h = tf.scale_h(rect.h);

                if w < 0.5 || h < 0.5 {
                    continue;
                }

                let egui_rect = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));

                // Cull off-screen
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }

                let rounding = if w > 8.0 && h > 8.0 {
                    CornerRadius::same(CORNER)
                } else {
                    CornerRadius::ZERO
                };
                painter.rect_filled(egui_rect, rounding, theme::resolve_faded(*color, mode, opacity));

                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        rounding,
                        Stroke::new(1.0, theme::resolve_faded(*bc, mode, opacity)),
                        StrokeKind::Inside,
                    );
                }

                if let Some(label_text) = label
                    && !label_text.is_empty()
                {
                    painter.text(
                        egui_rect.center(),
                        Align2::CENTER_CENTER,
                        label_text,
                        FontId::proportional(14.0),
                        theme::resolve_faded(label_color(*color), mode, opacity),
                    );
                }

                if let Some(Action::EditField { field }) = action {
                    fields.push(FieldRegion {
                        rect: egui_rect.intersect(painter.clip_rect()),
                        field: *field,
                    });
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let size = *font_size as f32;
                if size < 1.0 || opacity <= 0.0 {
                    continue;
                }
                let x = tf.apply_x(position.x) + offset.x;
                let y = tf.apply_y(position.y) + offset.y;
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_TOP,
                    TextAlign::Center => Align2::CENTER_TOP,
                    TextAlign::Right => Align2::RIGHT_TOP,
                };
                painter.text(
                    Pos2::new(x, y),
                    anchor,
                    text,
                    FontId::proportional(size),
                    theme::resolve_faded(*color, mode, opacity),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                if opacity <= 0.0 {
                    continue;
                }
                let p1 = Pos2::new(tf.apply_x(from.x) + offset.x, tf.apply_y(from.y) + offset.y);
                let p2 = Pos2::new(tf.apply_x(to.x) + offset.x, tf.apply_y(to.y) + offset.y);
                painter.line_segment(
                    [p1, p2],
                    Stroke::new(*width as f32, theme::resolve_faded(*color, mode, opacity)),
                );
            }

            RenderCommand::SetClip { rect } => {
                let x = tf.apply_x(rect.x) + offset.x;
                let y = tf.apply_y(rect.y) + offset.y;
                let w = tf.scale_w(rect.w);
                let h = tf.scale_h(rect.h);
                let clip_rect = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));
                clip_stack.push(painter.clip_rect());
                let intersected = painter.clip_rect().intersect(clip_rect);
                painter.set_clip_rect(intersected);
            }

            RenderCommand::ClearClip => {
                if let Some(prev) = clip_stack.pop() {
                    painter.set_clip_rect(prev);
                }
            }

            RenderCommand::PushTransform { translate, scale } => {
                let parent = tf;
                transform_stack.push(Transform {
                    tx: parent.tx + translate.x * parent.sx,
                    ty: parent.ty + translate.y * parent.sy,
                    sx: parent.sx * scale.x,
                    sy: parent.sy * scale.y,
                });
            }

            RenderCommand::PopTransform => {
                if transform_stack.len() > 1 {
                    transform_stack.pop();
                }
            }

            RenderCommand::PushOpacity { opacity: alpha } => {
                opacity_stack.push(opacity * (*alpha as f32));
            }

            RenderCommand::PopOpacity => {
                if opacity_stack.len() > 1 {
                    opacity_stack.pop();
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups carry no visual effect.
            }
        }
    }

    // Unbalanced clips must not leak into the next frame.
    if let Some(first) = clip_stack.first() {
        painter.set_clip_rect(*first);
    }

    RenderResult { fields }
}
