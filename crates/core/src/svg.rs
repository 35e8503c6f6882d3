//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use folio_protocol::{RenderCommand, TextAlign, ThemeMode, ThemeToken};

use crate::views::label_color;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions. Transforms,
/// opacity, and clips become nested `<g>` elements; fully transparent
/// groups are still emitted so the document mirrors the page structure.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, mode: ThemeMode) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background, mode),
    );

    // Open <g> elements for clips, so ClearClip can close the right one.
    let mut clips = 0usize;
    let mut clip_ids = 0usize;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let fill = resolve_color(*color, mode);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="6""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*border, mode));
                }
                svg.push_str("/>");

                if let Some(label) = label
                    && !label.is_empty()
                {
                    let _ = write!(
                        svg,
                        r#"<text x="{}" y="{}" fill="{}" font-size="14" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                        rect.x + rect.w / 2.0,
                        rect.y + rect.h / 2.0,
                        resolve_color(label_color(*color), mode),
                        escape_xml(label),
                    );
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, mode);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}" dominant-baseline="hanging">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_color(*color, mode),
                    escape_xml(text),
                );
            }
            RenderCommand::PushTransform { translate, scale } => {
                let _ = write!(
                    svg,
                    r#"<g transform="translate({} {}) scale({} {})">"#,
                    translate.x, translate.y, scale.x, scale.y,
                );
            }
            RenderCommand::PushOpacity { opacity } => {
                let _ = write!(svg, r#"<g opacity="{opacity}">"#);
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
            }
            RenderCommand::PopTransform | RenderCommand::PopOpacity | RenderCommand::EndGroup => {
                svg.push_str("</g>");
            }
            RenderCommand::SetClip { rect } => {
                clip_ids += 1;
                let _ = write!(
                    svg,
                    r#"<clipPath id="clip{clip_ids}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip{clip_ids})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                clips += 1;
            }
            RenderCommand::ClearClip => {
                if clips > 0 {
                    svg.push_str("</g>");
                    clips -= 1;
                }
            }
        }
    }
    for _ in 0..clips {
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, mode: ThemeMode) -> &'static str {
    use ThemeToken::*;
    match mode {
        ThemeMode::Dark => match token {
            Background | SectionBackground => "#111827",
            SectionBackgroundAlt => "#1f2937",
            Surface | ModalSurface => "#1f2937",
            SurfaceRaised | InputBackground => "#374151",
            Border | InputBorder => "#4b5563",
            TextPrimary => "#f9fafb",
            TextSecondary => "#d1d5db",
            TextMuted => "#9ca3af",
            TextOnAccent => "#ffffff",
            AccentBlue | TabActive | ButtonPrimary | TimelineDot => "#3b82f6",
            AccentGreen => "#22c55e",
            AccentPurple => "#a855f7",
            AccentOrange => "#f97316",
            AccentTeal => "#14b8a6",
            AccentPink => "#ec4899",
            AccentGray | ButtonDisabled => "#6b7280",
            TabInactive => "#374151",
            Link => "#60a5fa",
            TimelineLine => "#4b5563",
            Chip => "#1e3a8a",
            ChipText => "#bfdbfe",
            SuccessBackground => "#14532d",
            SuccessText => "#bbf7d0",
            ErrorBackground => "#7f1d1d",
            ErrorText => "#fecaca",
            Overlay => "#000000b3",
            SplashBackground => "#1e3a8a",
            SplashSpinner => "#93c5fd",
        },
        ThemeMode::Light => match token {
            Background | SectionBackground => "#ffffff",
            SectionBackgroundAlt => "#f9fafb",
            Surface | ModalSurface => "#ffffff",
            SurfaceRaised | InputBackground => "#f3f4f6",
            Border | InputBorder => "#e5e7eb",
            TextPrimary => "#111827",
            TextSecondary => "#4b5563",
            TextMuted => "#6b7280",
            TextOnAccent => "#ffffff",
            AccentBlue | TabActive | ButtonPrimary | TimelineDot => "#2563eb",
            AccentGreen => "#16a34a",
            AccentPurple => "#9333ea",
            AccentOrange => "#ea580c",
            AccentTeal => "#0d9488",
            AccentPink => "#db2777",
            AccentGray | ButtonDisabled => "#9ca3af",
            TabInactive => "#e5e7eb",
            Link => "#2563eb",
            TimelineLine => "#bfdbfe",
            Chip => "#dbeafe",
            ChipText => "#1e40af",
            SuccessBackground => "#dcfce7",
            SuccessText => "#166534",
            ErrorBackground => "#fee2e2",
            ErrorText => "#991b1b",
            Overlay => "#00000080",
            SplashBackground => "#2563eb",
            SplashSpinner => "#ffffff",
        },
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_protocol::{Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(10.0, 20.0, 100.0, 18.0),
            color: ThemeToken::ButtonPrimary,
            border_color: None,
            label: Some("Send Message".into()),
            action: None,
        }];
        let svg = render_svg(&commands, 800.0, 400.0, ThemeMode::Dark);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Send Message"));
        assert!(svg.contains("#3b82f6"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::text(
            Point::new(0.0, 0.0),
            "Results & <Impact>",
            ThemeToken::TextPrimary,
            14.0,
        )];
        let svg = render_svg(&commands, 400.0, 100.0, ThemeMode::Light);
        assert!(svg.contains("Results &amp; &lt;Impact&gt;"));
    }

    #[test]
    fn groups_balance() {
        let commands = vec![
            RenderCommand::translate(0.0, -100.0),
            RenderCommand::PushOpacity { opacity: 0.0 },
            RenderCommand::fill(Rect::new(0.0, 0.0, 10.0, 10.0), ThemeToken::Surface),
            RenderCommand::PopOpacity,
            RenderCommand::SetClip {
                rect: Rect::new(0.0, 0.0, 50.0, 50.0),
            },
            RenderCommand::PopTransform,
        ];
        let svg = render_svg(&commands, 100.0, 100.0, ThemeMode::Light);
        assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
        assert!(svg.contains(r#"opacity="0""#));
    }
}
