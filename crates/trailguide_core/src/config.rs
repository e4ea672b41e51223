//! Process-level configuration values.
//!
//! # Responsibility
//! - Hold presentation-adjacent configuration the data layer hands to
//!   its collaborators, constructed once at startup and passed by
//!   reference instead of living in a lazily-initialized global.

/// Bundled fallback palette for drawing route lines.
const DEFAULT_ROUTE_COLORS: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];

/// Color cycle assigned to routes by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePalette {
    colors: Vec<String>,
}

impl RoutePalette {
    /// Creates a palette from explicit colors; an empty list falls back
    /// to the bundled defaults so `color_for` stays total.
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    /// Color for the route at `index`, cycling through the palette.
    pub fn color_for(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for RoutePalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_ROUTE_COLORS
                .iter()
                .map(|color| (*color).to_string())
                .collect(),
        }
    }
}
