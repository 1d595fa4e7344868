use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One pricing plan. `price` is charged per page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub page_range: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl PricingTier {
    /// Total price for an assignment of `pages` pages.
    pub fn quote(&self, pages: u32) -> f64 {
        self.price * f64::from(pages)
    }

    /// Replace the features from a comma separated list, trimming each entry.
    pub fn set_features_from_csv(&mut self, csv: &str) {
        self.features = csv.split(',').map(|f| f.trim().to_string()).collect();
    }

    pub fn features_csv(&self) -> String {
        self.features.join(", ")
    }
}

/// The pricing document as served by `GET api/pricing`; either tier may be missing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PricingDocument {
    #[serde(default)]
    pub basic: Option<PricingTier>,
    #[serde(default)]
    pub standard: Option<PricingTier>,
}

impl PricingDocument {
    /// Both tiers, or `None` when the backend has not configured pricing yet.
    pub fn complete(self) -> Option<Pricing> {
        match (self.basic, self.standard) {
            (Some(basic), Some(standard)) => Some(Pricing { basic, standard }),
            _ => None,
        }
    }
}

/// A complete pricing document, as accepted by `PUT api/pricing`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Pricing {
    pub basic: PricingTier,
    pub standard: PricingTier,
}

impl Pricing {
    pub fn tier(&self, tier: Tier) -> &PricingTier {
        match tier {
            Tier::Basic => &self.basic,
            Tier::Standard => &self.standard,
        }
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut PricingTier {
        match tier {
            Tier::Basic => &mut self.basic,
            Tier::Standard => &mut self.standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Basic,
    Standard,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Basic, Tier::Standard];

    pub fn title(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic",
            Tier::Standard => "Standard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Tier::Basic),
            "standard" => Ok(Tier::Standard),
            other => Err(format!("Unknown tier '{}'. Valid values: basic, standard", other)),
        }
    }
}
