use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    SectionBackground,
    SectionBackgroundAlt,
    Surface,
    SurfaceRaised,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,
    TextOnAccent,

    // Category accents
    AccentBlue,
    AccentGreen,
    AccentPurple,
    AccentOrange,
    AccentTeal,
    AccentPink,
    AccentGray,

    // Controls
    TabActive,
    TabInactive,
    ButtonPrimary,
    ButtonDisabled,
    InputBackground,
    InputBorder,
    Link,

    // Timeline
    TimelineLine,
    TimelineDot,

    Chip,
    ChipText,

    // Contact banners
    SuccessBackground,
    SuccessText,
    ErrorBackground,
    ErrorText,

    // Modal
    Overlay,
    ModalSurface,

    // Splash
    SplashBackground,
    SplashSpinner,
}

/// Light/dark mode supplied by the theme provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_mode() {
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggle().toggle(), ThemeMode::Dark);
        assert!(!ThemeMode::default().is_dark());
    }
}
