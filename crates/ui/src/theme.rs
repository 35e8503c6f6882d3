use folio_protocol::{ThemeMode, ThemeToken};

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

fn lookup(token: ThemeToken, mode: ThemeMode) -> ResolvedColor {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    lookup(token, mode).to_color32()
}

/// `resolve` with the alpha scaled by an inherited opacity.
pub fn resolve_faded(token: ThemeToken, mode: ThemeMode, opacity: f32) -> egui::Color32 {
    let mut c = lookup(token, mode);
    c.a = (f32::from(c.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    c.to_color32()
}

pub fn visuals(mode: ThemeMode) -> egui::Visuals {
    match mode {
        ThemeMode::Dark => egui::Visuals::dark(),
        ThemeMode::Light => egui::Visuals::light(),
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Tailwind gray-900 base
    use ThemeToken::*;
    match token {
        Background | SectionBackground => ResolvedColor::rgb(0x11, 0x18, 0x27), // gray-900
        SectionBackgroundAlt | Surface | ModalSurface => ResolvedColor::rgb(0x1f, 0x29, 0x37), // gray-800
        SurfaceRaised | InputBackground | TabInactive => ResolvedColor::rgb(0x37, 0x41, 0x51), // gray-700
        Border | InputBorder | TimelineLine => ResolvedColor::rgb(0x4b, 0x55, 0x63),

        TextPrimary => ResolvedColor::rgb(0xf9, 0xfa, 0xfb),
        TextSecondary => ResolvedColor::rgb(0xd1, 0xd5, 0xdb),
        TextMuted => ResolvedColor::rgb(0x9c, 0xa3, 0xaf),
        TextOnAccent => ResolvedColor::rgb(0xff, 0xff, 0xff),

        AccentBlue | TabActive | ButtonPrimary | TimelineDot => ResolvedColor::rgb(0x3b, 0x82, 0xf6),
        AccentGreen => ResolvedColor::rgb(0x22, 0xc5, 0x5e),
        AccentPurple => ResolvedColor::rgb(0xa8, 0x55, 0xf7),
        AccentOrange => ResolvedColor::rgb(0xf9, 0x73, 0x16),
        AccentTeal => ResolvedColor::rgb(0x14, 0xb8, 0xa6),
        AccentPink => ResolvedColor::rgb(0xec, 0x48, 0x99),
        AccentGray | ButtonDisabled => ResolvedColor::rgb(0x6b, 0x72, 0x80),
        Link => ResolvedColor::rgb(0x60, 0xa5, 0xfa),

        Chip => ResolvedColor::rgb(0x1e, 0x3a, 0x8a),
        ChipText => ResolvedColor::rgb(0xbf, 0xdb, 0xfe),

        SuccessBackground => ResolvedColor::rgb(0x14, 0x53, 0x2d),
        SuccessText => ResolvedColor::rgb(0xbb, 0xf7, 0xd0),
        ErrorBackground => ResolvedColor::rgb(0x7f, 0x1d, 0x1d),
        ErrorText => ResolvedColor::rgb(0xfe, 0xca, 0xca),

        Overlay => ResolvedColor::rgba(0, 0, 0, 180),
        SplashBackground => ResolvedColor::rgb(0x1e, 0x3a, 0x8a),
        SplashSpinner => ResolvedColor::rgb(0x93, 0xc5, 0xfd),
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background | SectionBackground | Surface | ModalSurface => ResolvedColor::rgb(0xff, 0xff, 0xff),
        SectionBackgroundAlt => ResolvedColor::rgb(0xf9, 0xfa, 0xfb), // gray-50
        SurfaceRaised | InputBackground => ResolvedColor::rgb(0xf3, 0xf4, 0xf6),
        TabInactive | Border | InputBorder => ResolvedColor::rgb(0xe5, 0xe7, 0xeb),

        TextPrimary => ResolvedColor::rgb(0x11, 0x18, 0x27),
        TextSecondary => ResolvedColor::rgb(0x4b, 0x55, 0x63),
        TextMuted => ResolvedColor::rgb(0x6b, 0x72, 0x80),
        TextOnAccent => ResolvedColor::rgb(0xff, 0xff, 0xff),

        AccentBlue | TabActive | ButtonPrimary | TimelineDot | Link => {
            ResolvedColor::rgb(0x25, 0x63, 0xeb) // blue-600
        }
        AccentGreen => ResolvedColor::rgb(0x16, 0xa3, 0x4a),
        AccentPurple => ResolvedColor::rgb(0x93, 0x33, 0xea),
        AccentOrange => ResolvedColor::rgb(0xea, 0x58, 0x0c),
        AccentTeal => ResolvedColor::rgb(0x0d, 0x94, 0x88),
        AccentPink => ResolvedColor::rgb(0xdb, 0x27, 0x77),
        AccentGray | ButtonDisabled => ResolvedColor::rgb(0x9c, 0xa3, 0xaf),
        TimelineLine => ResolvedColor::rgb(0xbf, 0xdb, 0xfe),

        Chip => ResolvedColor::rgb(0xdb, 0xea, 0xfe),
        ChipText => ResolvedColor::rgb(0x1e, 0x40, 0xaf),

        SuccessBackground => ResolvedColor::rgb(0xdc, 0xfc, 0xe7),
        SuccessText => ResolvedColor::rgb(0x16, 0x65, 0x34),
        ErrorBackground => ResolvedColor::rgb(0xfe, 0xe2, 0xe2),
        ErrorText => ResolvedColor::rgb(0x99, 0x1b, 0x1b),

        Overlay => ResolvedColor::rgba(0, 0, 0, 128),
        SplashBackground => ResolvedColor::rgb(0x25, 0x63, 0xeb),
        SplashSpinner => ResolvedColor::rgb(0xff, 0xff, 0xff),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faded_scales_alpha() {
        let full = resolve(ThemeToken::ButtonPrimary, ThemeMode::Light);
        let hidden = resolve_faded(ThemeToken::ButtonPrimary, ThemeMode::Light, 0.0);
        assert_eq!(full.a(), 255);
        assert_eq!(hidden.a(), 0);
    }

    #[test]
    fn modes_differ() {
        assert_ne!(
            resolve(ThemeToken::Background, ThemeMode::Light),
            resolve(ThemeToken::Background, ThemeMode::Dark)
        );
    }
}
