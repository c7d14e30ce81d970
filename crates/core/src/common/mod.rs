use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod time;
pub mod tls;

/// # Summary
/// 股票代码非法错误，归一化后为空字符串时返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid ticker: {0:?}")]
pub struct InvalidTicker(pub String);

/// # Summary
/// 归一化后的证券代码，是缓存与上游请求共用的查找键。
///
/// # Invariants
/// - 内部字符串已去除首尾空白并转为大写。
/// - 永不为空，只能通过 `parse` 构造。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// # Summary
    /// 将用户输入归一化为证券代码。
    ///
    /// # Logic
    /// 1. 去除首尾空白。
    /// 2. 转为大写。
    /// 3. 结果为空则拒绝，不做任何默认值填充。
    ///
    /// # Arguments
    /// * `raw`: 用户原始输入，例如 `" aapl "`。
    ///
    /// # Returns
    /// 成功返回 `TickerSymbol`，为空返回 `InvalidTicker`。
    pub fn parse(raw: &str) -> Result<Self, InvalidTicker> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(InvalidTicker(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TickerSymbol {
    type Err = InvalidTicker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = InvalidTicker;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_uppercases() {
        let symbol = TickerSymbol::parse(" aapl ").unwrap();
        assert_eq!(symbol.as_str(), "AAPL");
        assert_eq!(symbol.to_string(), "AAPL");
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        assert!(TickerSymbol::parse("").is_err());
        assert!(TickerSymbol::parse("   \t").is_err());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let symbol: TickerSymbol = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(symbol.as_str(), "MSFT");

        let err = serde_json::from_str::<TickerSymbol>("\"  \"");
        assert!(err.is_err());
    }
}
