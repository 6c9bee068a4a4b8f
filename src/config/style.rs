use serde::{Deserialize, Serialize};

/// Visual style handed to the overlay renderer alongside hint payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HintStyle {
    pub font_size: f32,
    pub text_color: String,
    /// Colour for the characters already matched by the typed prefix.
    pub matched_text_color: String,
    pub background_color: String,
    pub border_color: String,
    pub corner_radius: f32,
}

impl Default for HintStyle {
    fn default() -> Self {
        Self {
            font_size: 13.0,
            text_color: "#1A1A1A".to_string(),
            matched_text_color: "#B8860B".to_string(),
            background_color: "#FFE277".to_string(),
            border_color: "#C9A227".to_string(),
            corner_radius: 3.0,
        }
    }
}

impl HintStyle {
    /// Pixel size of a rendered label, derived from label length and the
    /// style font metrics. The overlay uses this as the hint's render size.
    pub fn label_size(&self, label_len: usize) -> (i32, i32) {
        let char_width = (self.font_size * 0.62).ceil() as i32;
        let padding = 6;
        (
            char_width * label_len.max(1) as i32 + padding,
            (self.font_size * 1.4).ceil() as i32,
        )
    }
}

/// Visual style for grid cells and recursive frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridStyle {
    pub font_size: f32,
    pub text_color: String,
    pub line_color: String,
    pub line_width: f32,
    pub highlight_color: String,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            text_color: "#F2F2F2".to_string(),
            line_color: "#4A4A4A".to_string(),
            line_width: 1.0,
            highlight_color: "#3D7BD9".to_string(),
        }
    }
}

/// Style bundle for every overlay payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub hints: HintStyle,
    pub grid: GridStyle,
    pub scroll: ScrollStyle,
}

/// Highlight drawn around the scroll target area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollStyle {
    pub highlight_color: String,
    pub highlight_width: f64,
}

impl Default for ScrollStyle {
    fn default() -> Self {
        Self {
            highlight_color: "#3D7BD9".to_string(),
            highlight_width: 2.0,
        }
    }
}
