use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Local Hardhat deployment of the Assessment contract.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const DEFAULT_CURRENCY_SYMBOL: &str = "ETH";
pub const DEFAULT_DECIMALS: u8 = 18;
pub const DEFAULT_CONFIRMATION_POLL_MS: u32 = 1_000;
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub contract_address: Address,
    pub currency_symbol: String,
    pub decimals: u8,
    pub confirmation_poll_ms: u32,
    pub log_directive: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
            decimals: DEFAULT_DECIMALS,
            confirmation_poll_ms: DEFAULT_CONFIRMATION_POLL_MS,
            log_directive: DEFAULT_LOG_DIRECTIVE.to_owned(),
        }
    }
}

/// Partial configuration, e.g. as stored by a developer in `localStorage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOverrides {
    pub contract_address: Option<String>,
    pub currency_symbol: Option<String>,
    pub decimals: Option<u8>,
    pub confirmation_poll_ms: Option<u32>,
    pub log_directive: Option<String>,
}

impl PanelConfig {
    pub fn with_overrides(mut self, overrides: PanelOverrides) -> Result<Self, ConfigError> {
        if let Some(raw) = overrides.contract_address {
            self.contract_address = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::ContractAddress(raw.clone()))?;
        }
        if let Some(symbol) = overrides.currency_symbol.filter(|s| !s.trim().is_empty()) {
            self.currency_symbol = symbol.trim().to_owned();
        }
        if let Some(decimals) = overrides.decimals {
            if decimals > 77 {
                return Err(ConfigError::Decimals(decimals));
            }
            self.decimals = decimals;
        }
        if let Some(poll) = overrides.confirmation_poll_ms {
            if poll == 0 {
                return Err(ConfigError::PollInterval);
            }
            self.confirmation_poll_ms = poll;
        }
        if let Some(directive) = overrides.log_directive.filter(|s| !s.trim().is_empty()) {
            self.log_directive = directive;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_over_defaults() -> anyhow::Result<()> {
        let overrides: PanelOverrides = serde_json::from_str(
            r#"{ "contract_address": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512", "decimals": 6 }"#,
        )?;

        let config = PanelConfig::default().with_overrides(overrides)?;

        assert_eq!(
            config.contract_address,
            address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512")
        );
        assert_eq!(config.decimals, 6);
        assert_eq!(config.currency_symbol, "ETH");
        assert_eq!(config.confirmation_poll_ms, DEFAULT_CONFIRMATION_POLL_MS);
        Ok(())
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let bad_address = PanelOverrides {
            contract_address: Some("not-an-address".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            PanelConfig::default().with_overrides(bad_address),
            Err(ConfigError::ContractAddress(_))
        ));

        let bad_decimals = PanelOverrides {
            decimals: Some(78),
            ..Default::default()
        };
        assert_eq!(
            PanelConfig::default().with_overrides(bad_decimals),
            Err(ConfigError::Decimals(78))
        );

        let bad_poll = PanelOverrides {
            confirmation_poll_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(
            PanelConfig::default().with_overrides(bad_poll),
            Err(ConfigError::PollInterval)
        );
    }
}
