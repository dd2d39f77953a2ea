//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Product category buckets.
///
/// The catalog groups every product into one of five fixed buckets. Rows
/// carry the category as a free-form string; anything unrecognized (or
/// missing) lands in [`Category::Other`] rather than failing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Perfume,
    Cocoplate,
    CocoPeat,
    Bricket,
    #[default]
    Other,
}

impl Category {
    /// All buckets, in homepage display order.
    pub const ALL: [Self; 5] = [
        Self::Perfume,
        Self::Cocoplate,
        Self::CocoPeat,
        Self::Bricket,
        Self::Other,
    ];

    /// Parse a category from the remote row's string value.
    ///
    /// Unknown or empty values map to [`Category::Other`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "perfume" => Self::Perfume,
            "cocoplate" => Self::Cocoplate,
            "coco-peat" => Self::CocoPeat,
            "bricket" => Self::Bricket,
            _ => Self::Other,
        }
    }

    /// URL/row slug for the category.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Perfume => "perfume",
            Self::Cocoplate => "cocoplate",
            Self::CocoPeat => "coco-peat",
            Self::Bricket => "bricket",
            Self::Other => "other",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Perfume => "Herbal Perfumes",
            Self::Cocoplate => "Coconut Husk Tableware",
            Self::CocoPeat => "Coco-Peat",
            Self::Bricket => "Brickets",
            Self::Other => "More Products",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_slugs() {
        assert_eq!(Category::parse("perfume"), Category::Perfume);
        assert_eq!(Category::parse("cocoplate"), Category::Cocoplate);
        assert_eq!(Category::parse("coco-peat"), Category::CocoPeat);
        assert_eq!(Category::parse("bricket"), Category::Bricket);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_other() {
        assert_eq!(Category::parse("steel-scrap"), Category::Other);
        assert_eq!(Category::parse(""), Category::Other);
    }

    #[test]
    fn test_slug_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.slug()), category);
        }
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&Category::CocoPeat).expect("serialize");
        assert_eq!(json, "\"coco-peat\"");
    }
}
