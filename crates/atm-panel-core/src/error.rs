use atm_api_types::Action;
use atm_chain_client::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("enter an amount")]
    Empty,
    #[error("'{0}' is not a decimal number")]
    Malformed(String),
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("at most {decimals} decimal places are supported")]
    TooPrecise { decimals: u8 },
    #[error("amount is too large")]
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid contract address '{0}'")]
    ContractAddress(String),
    #[error("unsupported decimals {0} (max 77)")]
    Decimals(u8),
    #[error("confirmation poll interval must be non-zero")]
    PollInterval,
}

/// Failures surfaced by panel operations. Every variant is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("a browser wallet is required to connect")]
    WalletUnavailable,
    #[error("wallet connection was declined")]
    AuthorizationDeclined,
    #[error("no ATM contract connected, connect your wallet first")]
    NotConnected,
    #[error("another wallet request is still pending")]
    Busy,
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("failed to retrieve balance: {0}")]
    QueryFailure(#[source] ProviderError),
    #[error("{action} failed: {source}")]
    TransferFailure {
        action: Action,
        #[source]
        source: ProviderError,
    },
    #[error("wallet request failed: {0}")]
    Provider(#[source] ProviderError),
}
