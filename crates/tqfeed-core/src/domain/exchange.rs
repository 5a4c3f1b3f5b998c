use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use super::timestamp::CHINA_OFFSET;
use crate::ValidationError;

/// Exchanges served by the TianQin market-data SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// China Financial Futures Exchange
    Cffex,
    /// Shanghai Futures Exchange
    Shfe,
    /// Zhengzhou Commodity Exchange
    Czce,
    /// Dalian Commodity Exchange
    Dce,
    /// Shanghai International Energy Exchange
    Ine,
    /// Guangzhou Futures Exchange
    Gfex,
    /// Shanghai Stock Exchange
    Sse,
    /// Shenzhen Stock Exchange
    Szse,
}

impl Exchange {
    pub const ALL: [Self; 8] = [
        Self::Cffex,
        Self::Shfe,
        Self::Czce,
        Self::Dce,
        Self::Ine,
        Self::Gfex,
        Self::Sse,
        Self::Szse,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cffex => "CFFEX",
            Self::Shfe => "SHFE",
            Self::Czce => "CZCE",
            Self::Dce => "DCE",
            Self::Ine => "INE",
            Self::Gfex => "GFEX",
            Self::Sse => "SSE",
            Self::Szse => "SZSE",
        }
    }

    /// Offset of the exchange's local clock. All served exchanges trade on Beijing time.
    pub const fn utc_offset(self) -> UtcOffset {
        CHINA_OFFSET
    }
}

impl Display for Exchange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|exchange| exchange.as_str() == normalized)
            .ok_or(ValidationError::InvalidExchange { value: normalized })
    }
}
