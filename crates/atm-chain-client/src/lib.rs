use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use atm_api_types::{AccountRequest, RpcErrorObject, TransactionReceipt, USER_REJECTED_CODE};
use std::rc::Rc;

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("no injected wallet provider")]
    Unavailable,
    #[error("request rejected by user ({code}): {message}")]
    Rejected { code: i64, message: String },
    #[error("provider error ({code}): {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed provider response: {0}")]
    Decode(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },
}

/// Browser-injected wallet capability.
///
/// The browser runtime is single-threaded, so implementations are `!Send`
/// and contract bindings are shared through `Rc`.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn is_available(&self) -> bool;

    /// Accounts the wallet exposes for this site. Empty when the user declines.
    async fn request_accounts(&self, kind: AccountRequest) -> Result<Vec<Address>>;

    /// Bind the contract at `address` with `signer` as the sending account.
    fn bind_contract(&self, address: Address, signer: Address) -> Result<Rc<dyn AtmContract>>;
}

/// Read/write binding to the deployed ATM contract.
#[async_trait(?Send)]
pub trait AtmContract {
    fn address(&self) -> Address;
    fn signer(&self) -> Address;
    async fn get_balance(&self) -> Result<U256>;
    async fn deposit(&self, amount: U256) -> Result<B256>;
    async fn withdraw(&self, amount: U256) -> Result<B256>;

    /// Wait until `tx_hash` is mined. Reverted transactions are errors.
    async fn confirm(&self, tx_hash: B256) -> Result<TransactionReceipt>;
}

impl From<RpcErrorObject> for ProviderError {
    fn from(err: RpcErrorObject) -> Self {
        if err.code == USER_REJECTED_CODE {
            Self::Rejected {
                code: err.code,
                message: err.message,
            }
        } else {
            Self::Rpc {
                code: err.code,
                message: err.message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_rejection_code_maps_to_rejected() {
        let err = ProviderError::from(RpcErrorObject {
            code: 4001,
            message: "User rejected the request.".to_owned(),
        });
        assert!(matches!(err, ProviderError::Rejected { code: 4001, .. }));

        let err = ProviderError::from(RpcErrorObject {
            code: -32603,
            message: "Internal JSON-RPC error.".to_owned(),
        });
        assert!(matches!(err, ProviderError::Rpc { code: -32603, .. }));
    }
}
