use serde::Serialize;

/// Categorical go / no-go outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Go,
    Maybe,
    StayHome,
}

impl Label {
    /// Maps an integer score onto a label.
    ///
    /// | Score  | Label      |
    /// |--------|------------|
    /// | >= 4   | GO         |
    /// | >= 2   | MAYBE      |
    /// | < 2    | STAY_HOME  |
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 4 => Label::Go,
            s if s >= 2 => Label::Maybe,
            _ => Label::StayHome,
        }
    }

    /// Big-letter headline shown on the verdict panel.
    pub fn headline(&self) -> &'static str {
        match self {
            Label::Go => "GET IN THE WATER NOW!",
            Label::Maybe => "PASSABLE",
            Label::StayHome => "BETTER STAY HOME",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Label::Go => "GO",
            Label::Maybe => "MAYBE",
            Label::StayHome => "STAY_HOME",
        };
        f.write_str(s)
    }
}

/// Display hint attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Swatch {
    Forest,
    Sand,
    Slate,
    Green,
    Yellow,
    Red,
    /// Sentinel for "no data", never produced by a real score.
    Gray,
}

impl Swatch {
    pub const NO_DATA: Swatch = Swatch::Gray;

    pub fn hex(&self) -> &'static str {
        match self {
            Swatch::Forest => "#2d6a4f",
            Swatch::Sand => "#b08d57",
            Swatch::Slate => "#343a40",
            Swatch::Green => "#2a9d4b",
            Swatch::Yellow => "#e9c46a",
            Swatch::Red => "#d62828",
            Swatch::Gray => "#6c757d",
        }
    }

    /// RGBA tuple for map layers.
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            Swatch::Forest => [45, 106, 79, 200],
            Swatch::Sand => [176, 141, 87, 200],
            Swatch::Slate => [52, 58, 64, 200],
            Swatch::Green => [42, 157, 75, 200],
            Swatch::Yellow => [233, 196, 106, 200],
            Swatch::Red => [214, 40, 40, 200],
            Swatch::Gray => [108, 117, 125, 160],
        }
    }
}

/// Result of scoring one set of conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub label: Label,
    pub score: i32,
    /// Human-readable reasoning; empty for schemes that do not explain.
    pub explanation: String,
    pub color: Swatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_boundaries() {
        assert_eq!(Label::from_score(5), Label::Go);
        assert_eq!(Label::from_score(4), Label::Go);
        assert_eq!(Label::from_score(3), Label::Maybe);
        assert_eq!(Label::from_score(2), Label::Maybe);
        assert_eq!(Label::from_score(1), Label::StayHome);
        assert_eq!(Label::from_score(-2), Label::StayHome);
    }

    #[test]
    fn test_label_serializes_screaming() {
        let json = serde_json::to_string(&Label::StayHome).unwrap();
        assert_eq!(json, "\"STAY_HOME\"");
        assert_eq!(Label::StayHome.to_string(), "STAY_HOME");
    }

    #[test]
    fn test_no_data_is_gray() {
        assert_eq!(Swatch::NO_DATA, Swatch::Gray);
        assert_eq!(Swatch::NO_DATA.hex(), "#6c757d");
    }
}
