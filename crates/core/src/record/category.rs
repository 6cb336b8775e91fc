use std::fmt;

use serde::{Deserialize, Serialize};

use super::validate::ValidationError;

/// A closed set of category labels. Input is matched ignoring case and
/// surrounding whitespace; the canonical label is what gets stored.
pub trait Category: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Category::label).collect()
    }

    fn parse(value: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.matches(value))
            .ok_or_else(|| ValidationError::InvalidCategory {
                value: value.to_string(),
                allowed: Self::labels(),
            })
    }

    fn matches(&self, value: &str) -> bool {
        self.label().eq_ignore_ascii_case(value.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoCategory {
    #[serde(rename = "Wedding Videos")]
    Wedding,
    #[serde(rename = "Pre-Wedding Videos")]
    PreWedding,
    #[serde(rename = "Housewarming Videos")]
    Housewarming,
    #[serde(rename = "Birthday Videos")]
    Birthday,
    #[serde(rename = "Corporate Videos")]
    Corporate,
    #[serde(rename = "Other")]
    Other,
}

impl Category for VideoCategory {
    const ALL: &'static [Self] = &[
        VideoCategory::Wedding,
        VideoCategory::PreWedding,
        VideoCategory::Housewarming,
        VideoCategory::Birthday,
        VideoCategory::Corporate,
        VideoCategory::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            VideoCategory::Wedding => "Wedding Videos",
            VideoCategory::PreWedding => "Pre-Wedding Videos",
            VideoCategory::Housewarming => "Housewarming Videos",
            VideoCategory::Birthday => "Birthday Videos",
            VideoCategory::Corporate => "Corporate Videos",
            VideoCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioCategory {
    Wedding,
    Portrait,
    Event,
    Landscape,
}

impl Category for PortfolioCategory {
    const ALL: &'static [Self] = &[
        PortfolioCategory::Wedding,
        PortfolioCategory::Portrait,
        PortfolioCategory::Event,
        PortfolioCategory::Landscape,
    ];

    fn label(&self) -> &'static str {
        match self {
            PortfolioCategory::Wedding => "Wedding",
            PortfolioCategory::Portrait => "Portrait",
            PortfolioCategory::Event => "Event",
            PortfolioCategory::Landscape => "Landscape",
        }
    }
}

impl fmt::Display for VideoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for PortfolioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
