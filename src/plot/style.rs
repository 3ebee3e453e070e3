/// Sizes and fonts for one figure preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureStyle {
    /// Canvas size in pixels.
    pub size: (u32, u32),
    pub title_size: u32,
    pub label_size: u32,
    pub tick_size: u32,
    pub legend_size: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub line_width: u32,
    pub marker_size: u32,
}

const FONT: &str = "sans-serif";

impl FigureStyle {
    /// Screen preset, 1200x800.
    pub fn standard() -> Self {
        FigureStyle {
            size: (1200, 800),
            title_size: 40,
            label_size: 32,
            tick_size: 24,
            legend_size: 22,
            margin: 20,
            x_label_area: 70,
            y_label_area: 95,
            line_width: 2,
            marker_size: 5,
        }
    }

    /// Compact preset for article figures.
    pub fn publication() -> Self {
        FigureStyle {
            size: (1011, 510),
            title_size: 26,
            label_size: 20,
            tick_size: 18,
            legend_size: 14,
            margin: 10,
            x_label_area: 50,
            y_label_area: 70,
            line_width: 2,
            marker_size: 4,
        }
    }

    pub fn from_flag(publish: bool) -> Self {
        if publish {
            Self::publication()
        } else {
            Self::standard()
        }
    }

    pub fn with_size(mut self, size: (u32, u32)) -> Self {
        self.size = size;
        self
    }

    pub fn title_font(&self) -> (&'static str, u32) {
        (FONT, self.title_size)
    }

    pub fn label_font(&self) -> (&'static str, u32) {
        (FONT, self.label_size)
    }

    pub fn tick_font(&self) -> (&'static str, u32) {
        (FONT, self.tick_size)
    }

    pub fn legend_font(&self) -> (&'static str, u32) {
        (FONT, self.legend_size)
    }
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_flag_switches_preset() {
        assert_eq!(FigureStyle::from_flag(true).size, (1011, 510));
        assert_eq!(FigureStyle::from_flag(false), FigureStyle::standard());
        assert_eq!(FigureStyle::default().with_size((10, 20)).size, (10, 20));
    }
}
