use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    /// Behind the slide stack and on full-screen status pages.
    pub background: Color32,
    /// Slide page color.
    pub surface: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub control_background: Color32,
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub code_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::BLACK,
            surface: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            muted: Color32::from_rgb(0x8A, 0x8A, 0x8A),
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            error: Color32::from_rgb(0xE5, 0x48, 0x4D),
            control_background: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            title_size: 72.0,
            heading_size: 52.0,
            body_size: 32.0,
            code_size: 24.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0x10, 0x10, 0x14),
            surface: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            muted: Color32::from_rgb(0x6B, 0x6B, 0x7B),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            error: Color32::from_rgb(0xC4, 0x2B, 0x1C),
            control_background: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            title_size: 72.0,
            heading_size: 52.0,
            body_size: 32.0,
            code_size: 24.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    pub fn size_for_heading(&self, level: u8) -> f32 {
        match level {
            1 => self.title_size,
            2 => self.heading_size,
            3 => (self.heading_size + self.body_size) / 2.0,
            _ => self.body_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_dark() {
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("dark").name, "dark");
        assert_eq!(Theme::from_name("neon").name, "dark");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::dark().toggled().name, "light");
        assert_eq!(Theme::light().toggled().name, "dark");
    }

    #[test]
    fn test_heading_sizes_decrease() {
        let t = Theme::dark();
        assert!(t.size_for_heading(1) > t.size_for_heading(2));
        assert!(t.size_for_heading(2) > t.size_for_heading(3));
        assert_eq!(t.size_for_heading(6), t.body_size);
    }
}
