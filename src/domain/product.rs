use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sentinel emitted in place of a rating when the listing exposes none
pub const NO_RATING: &str = "No rating";

/// Storefronts the search API can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Snapdeal,
    ShopClues,
}

impl Platform {
    pub const ALL: [Self; 2] = [Self::Snapdeal, Self::ShopClues];

    /// Identifier used in the `/api/products/{platform}/...` route
    pub const fn route_key(self) -> &'static str {
        match self {
            Self::Snapdeal => "snapdeal",
            Self::ShopClues => "shopclues",
        }
    }

    /// Value stored in `ProductRecord::platform`
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Snapdeal => "Snapdeal",
            Self::ShopClues => "ShopClues",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Exact, case-sensitive match on the route key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.route_key() == s)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Star rating on a 0.0-5.0 scale, or the "No rating" sentinel.
///
/// Serializes as a JSON number or as the sentinel string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Stars(f64),
    NoRating,
}

impl Rating {
    pub const MAX: f64 = 5.0;

    /// Convert a "filled stars" width percentage (0-100) to the 5-star scale,
    /// rounded to one decimal place.
    ///
    /// Rounding works on the exact value of `percent / 20`, with exact ties
    /// going to even: 85% is 4.2, 87% is 4.3 (4.35 is stored just below),
    /// 93% is 4.7 (4.65 is stored just above).
    pub fn from_width_percent(percent: f64) -> Option<Self> {
        if !percent.is_finite() {
            return None;
        }
        let quotient = percent.clamp(0.0, 100.0) / 20.0;
        format!("{quotient:.1}").parse().ok().map(Self::Stars)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Stars(v) => serializer.serialize_f64(*v),
            Self::NoRating => serializer.serialize_str(NO_RATING),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Self::Stars(v)),
            Raw::Text(s) if s == NO_RATING => Ok(Self::NoRating),
            Raw::Text(s) => Err(serde::de::Error::custom(format!("invalid rating '{s}'"))),
        }
    }
}

/// Product extracted from a search listing card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub price: String,
    pub link: String,
    pub rating: Rating,
    pub image_url: String,
    pub platform: String,
}
