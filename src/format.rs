use plotters::style::RGBColor;

pub const SUCCESS_CLASS: &str = "text-success";
pub const DANGER_CLASS: &str = "text-danger";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Gain,
    Loss,
}

impl Trend {
    /// Classifies the displayed two-decimal text, so `-0.004` is a gain.
    pub fn of(formatted: &str) -> Self {
        if formatted.starts_with('-') {
            Trend::Loss
        } else {
            Trend::Gain
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Trend::Gain => SUCCESS_CLASS,
            Trend::Loss => DANGER_CLASS,
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Trend::Gain => '↑',
            Trend::Loss => '↓',
        }
    }

    pub fn border_color(self) -> RGBColor {
        match self {
            Trend::Gain => RGBColor(0, 128, 0),
            Trend::Loss => RGBColor(255, 0, 0),
        }
    }

    pub fn fill_color(self) -> RGBColor {
        match self {
            Trend::Gain => RGBColor(0, 255, 0),
            Trend::Loss => RGBColor(255, 0, 0),
        }
    }

    pub fn css_color(self) -> &'static str {
        match self {
            Trend::Gain => "green",
            Trend::Loss => "red",
        }
    }
}

/// Fixed two-place text, e.g. `-12.35`. From 1e21 up the figure switches to
/// exponent form (`1e+21`), the same text a browser's `toFixed(2)` gives.
pub fn two_decimals(value: f64) -> String {
    if value.abs() >= 1e21 {
        return format!("{value:e}").replacen('e', "e+", 1);
    }
    let text = format!("{value:.2}");
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

pub fn percent_text(percent: f64, trend: Trend) -> String {
    format!(" ({}%) {}", two_decimals(percent), trend.arrow())
}
