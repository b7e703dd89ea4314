//! Closed set of shapes and colors that make up every symbol.
//!
//! A [`SymbolIdentity`] is a `(Shape, Color)` pair; the identity space is the full cross
//! product, [`UNIVERSE_SIZE`] members.

use std::fmt;

use crate::foundation::core::Rgb8;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Star,
    Diamond,
    Hexagon,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Circle,
        Shape::Square,
        Shape::Triangle,
        Shape::Star,
        Shape::Diamond,
        Shape::Hexagon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
            Shape::Star => "star",
            Shape::Diamond => "diamond",
            Shape::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Cyan,
    Pink,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
        Color::Cyan,
        Color::Pink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
            Color::Cyan => "cyan",
            Color::Pink => "pink",
        }
    }

    pub fn rgb(self) -> Rgb8 {
        match self {
            Color::Red => [220, 50, 50],
            Color::Blue => [50, 100, 220],
            Color::Green => [50, 180, 50],
            Color::Yellow => [230, 200, 50],
            Color::Purple => [180, 50, 180],
            Color::Orange => [255, 140, 50],
            Color::Cyan => [50, 200, 200],
            Color::Pink => [255, 100, 150],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const UNIVERSE_SIZE: usize = Shape::ALL.len() * Color::ALL.len();

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SymbolIdentity {
    pub shape: Shape,
    pub color: Color,
}

impl SymbolIdentity {
    pub const fn new(shape: Shape, color: Color) -> Self {
        Self { shape, color }
    }

    /// Maps `0..UNIVERSE_SIZE` onto the identity space, shape-major.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal >= UNIVERSE_SIZE {
            return None;
        }
        let colors = Color::ALL.len();
        Some(Self {
            shape: Shape::ALL[ordinal / colors],
            color: Color::ALL[ordinal % colors],
        })
    }

    pub fn universe() -> impl Iterator<Item = SymbolIdentity> {
        (0..UNIVERSE_SIZE).filter_map(Self::from_ordinal)
    }

    pub fn rgb(self) -> Rgb8 {
        self.color.rgb()
    }
}

/// Reads as the natural-language name, e.g. `yellow triangle`.
impl fmt::Display for SymbolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.shape)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn universe_has_48_distinct_members() {
        let all: HashSet<SymbolIdentity> = SymbolIdentity::universe().collect();
        assert_eq!(UNIVERSE_SIZE, 48);
        assert_eq!(all.len(), 48);
        assert!(SymbolIdentity::from_ordinal(48).is_none());
    }

    #[test]
    fn colors_have_distinct_rgb() {
        let rgbs: HashSet<Rgb8> = Color::ALL.iter().map(|c| c.rgb()).collect();
        assert_eq!(rgbs.len(), Color::ALL.len());
    }

    #[test]
    fn display_is_color_then_shape() {
        let id = SymbolIdentity::new(Shape::Triangle, Color::Yellow);
        assert_eq!(id.to_string(), "yellow triangle");
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let id = SymbolIdentity::new(Shape::Hexagon, Color::Pink);
        let v = serde_json::to_value(id).unwrap();
        assert_eq!(v, serde_json::json!({ "shape": "hexagon", "color": "pink" }));
    }
}
