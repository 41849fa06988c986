//! Trending region catalog.
//!
//! Regions select a geographic trending context on the video platform.
//! [`Region::Global`] is synthetic: it aggregates the fixed
//! [`GLOBAL_REGIONS`] set rather than mapping to an upstream region code.

use serde::{Deserialize, Serialize};

/// A region from the fixed catalog.
///
/// Any code outside the catalog coerces to [`Region::Us`]; upstream is
/// never queried with an unvalidated region code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Region {
    Us,
    Gb,
    In,
    Jp,
    Br,
    Ca,
    De,
    Fr,
    Au,
    Kr,
    Mx,
    Es,
    It,
    Id,
    Ng,
    Global,
}

/// The fixed fan-out set used to build the synthetic global view.
pub const GLOBAL_REGIONS: [Region; 10] = [
    Region::Us,
    Region::Gb,
    Region::In,
    Region::Jp,
    Region::Br,
    Region::Ca,
    Region::De,
    Region::Fr,
    Region::Au,
    Region::Kr,
];

impl Region {
    /// Parses a region code, coercing anything outside the catalog to `US`.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "US" => Region::Us,
            "GB" => Region::Gb,
            "IN" => Region::In,
            "JP" => Region::Jp,
            "BR" => Region::Br,
            "CA" => Region::Ca,
            "DE" => Region::De,
            "FR" => Region::Fr,
            "AU" => Region::Au,
            "KR" => Region::Kr,
            "MX" => Region::Mx,
            "ES" => Region::Es,
            "IT" => Region::It,
            "ID" => Region::Id,
            "NG" => Region::Ng,
            "GLOBAL" => Region::Global,
            other => {
                tracing::debug!(code = other, "unknown region code, falling back to US");
                Region::Us
            }
        }
    }

    /// The wire code for this region (`"US"`, …, `"GLOBAL"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Gb => "GB",
            Region::In => "IN",
            Region::Jp => "JP",
            Region::Br => "BR",
            Region::Ca => "CA",
            Region::De => "DE",
            Region::Fr => "FR",
            Region::Au => "AU",
            Region::Kr => "KR",
            Region::Mx => "MX",
            Region::Es => "ES",
            Region::It => "IT",
            Region::Id => "ID",
            Region::Ng => "NG",
            Region::Global => "GLOBAL",
        }
    }

    /// Human-readable name shown in API metadata.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Region::Us => "United States",
            Region::Gb => "United Kingdom",
            Region::In => "India",
            Region::Jp => "Japan",
            Region::Br => "Brazil",
            Region::Ca => "Canada",
            Region::De => "Germany",
            Region::Fr => "France",
            Region::Au => "Australia",
            Region::Kr => "South Korea",
            Region::Mx => "Mexico",
            Region::Es => "Spain",
            Region::It => "Italy",
            Region::Id => "Indonesia",
            Region::Ng => "Nigeria",
            Region::Global => "Global",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Region {
    fn from(code: String) -> Self {
        Region::parse(&code)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.as_str().to_owned()
    }
}
