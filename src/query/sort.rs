//! Sort options for list views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort order requested for a list.
///
/// Values the client does not know about are carried as `Custom` so they
/// survive a round trip through the URL unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SortOption {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    Popular,
    Custom(String),
}

impl SortOption {
    pub fn as_str(&self) -> &str {
        match self {
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::Popular => "popular",
            SortOption::Custom(s) => s,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == SortOption::default()
    }
}

impl From<&str> for SortOption {
    fn from(s: &str) -> Self {
        match s.trim() {
            "" | "newest" => SortOption::Newest,
            "oldest" => SortOption::Oldest,
            "price_asc" => SortOption::PriceAsc,
            "price_desc" => SortOption::PriceDesc,
            "popular" => SortOption::Popular,
            other => SortOption::Custom(other.to_string()),
        }
    }
}

impl From<String> for SortOption {
    fn from(s: String) -> Self {
        SortOption::from(s.as_str())
    }
}

impl From<SortOption> for String {
    fn from(sort: SortOption) -> Self {
        sort.as_str().to_string()
    }
}

impl FromStr for SortOption {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortOption::from(s))
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
