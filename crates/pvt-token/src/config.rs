use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;

use pvt_core::BPS_DENOMINATOR;

/// Serde adapter for u128 ↔ TOML: serialize as string, deserialize from string or integer.
/// TOML crate doesn't natively support u128, so we round-trip through strings.
mod u128_toml {
    use super::*;

    pub fn serialize<S: Serializer>(val: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        use serde::de::{self, Visitor};
        struct U128Visitor;

        impl<'de> Visitor<'de> for U128Visitor {
            type Value = u128;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a u128 as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(v as u128)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                if v >= 0 {
                    Ok(v as u128)
                } else {
                    Err(E::custom("negative value for u128"))
                }
            }
        }

        d.deserialize_any(U128Visitor)
    }
}

/// Deployment parameters of the governance token. Fixed at construction;
/// fees and thresholds are expressed in basis points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenConfig {
    /// Native units per token, fixed for the token's lifetime.
    #[serde(with = "u128_toml")]
    pub token_price: u128,
    /// Display decimals; pure client metadata, never used in arithmetic.
    pub decimals: u8,
    /// Seconds a voting round stays open.
    pub time_to_vote_secs: u64,
    pub buy_fee_bps: u32,
    pub sell_fee_bps: u32,
    /// Minimum share of total supply required to start a round or vote.
    pub min_participation_bps: u32,
    /// Share of each fee accrued to the current top stakeholder.
    pub top_reward_share_bps: u32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token_price: 1_000_000_000, // 1 gwei
            decimals: 2,
            time_to_vote_secs: 3 * 24 * 60 * 60,
            buy_fee_bps: 500,
            sell_fee_bps: 500,
            min_participation_bps: 5, // 0.05% of supply
            top_reward_share_bps: 1_000,
        }
    }
}

impl TokenConfig {
    /// Load token config from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: TokenConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load token config from environment variables
    /// Useful for containerized deployments
    pub fn load_from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::default();

        let token_price: u128 = std::env::var("PVT_TOKEN_PRICE")
            .unwrap_or_else(|_| defaults.token_price.to_string())
            .parse()?;

        let decimals: u8 = std::env::var("PVT_DECIMALS")
            .unwrap_or_else(|_| defaults.decimals.to_string())
            .parse()?;

        let time_to_vote_secs: u64 = std::env::var("PVT_TIME_TO_VOTE_SECS")
            .unwrap_or_else(|_| defaults.time_to_vote_secs.to_string())
            .parse()?;

        let buy_fee_bps: u32 = std::env::var("PVT_BUY_FEE_BPS")
            .unwrap_or_else(|_| defaults.buy_fee_bps.to_string())
            .parse()?;

        let sell_fee_bps: u32 = std::env::var("PVT_SELL_FEE_BPS")
            .unwrap_or_else(|_| defaults.sell_fee_bps.to_string())
            .parse()?;

        let min_participation_bps: u32 = std::env::var("PVT_MIN_PARTICIPATION_BPS")
            .unwrap_or_else(|_| defaults.min_participation_bps.to_string())
            .parse()?;

        let top_reward_share_bps: u32 = std::env::var("PVT_TOP_REWARD_SHARE_BPS")
            .unwrap_or_else(|_| defaults.top_reward_share_bps.to_string())
            .parse()?;

        let config = Self {
            token_price,
            decimals,
            time_to_vote_secs,
            buy_fee_bps,
            sell_fee_bps,
            min_participation_bps,
            top_reward_share_bps,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save token config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.token_price == 0 {
            return Err("token_price must be non-zero".to_string());
        }

        if self.time_to_vote_secs == 0 {
            return Err("time_to_vote_secs must be non-zero".to_string());
        }

        let bps = BPS_DENOMINATOR as u32;
        if self.buy_fee_bps >= bps {
            return Err("buy_fee_bps must be below 10000".to_string());
        }

        if self.sell_fee_bps >= bps {
            return Err("sell_fee_bps must be below 10000".to_string());
        }

        if self.min_participation_bps > bps {
            return Err("min_participation_bps must not exceed 10000".to_string());
        }

        if self.top_reward_share_bps > bps {
            return Err("top_reward_share_bps must not exceed 10000".to_string());
        }

        Ok(())
    }
}
