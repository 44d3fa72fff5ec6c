use alloy_primitives::{Address, B256, Bytes, I256, U64};
use serde::{Deserialize, Serialize};
use std::fmt;

/// EIP-1193 error code for a request the user rejected in the wallet.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Deposit,
    Withdraw,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("Deposit"),
            Self::Withdraw => f.write_str("Withdraw"),
        }
    }
}

/// How accounts are requested from the wallet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountRequest {
    /// Already-authorized accounts only; never prompts.
    Silent,
    /// Prompts the user to authorize the site.
    Interactive,
}

impl AccountRequest {
    pub fn method(self) -> &'static str {
        match self {
            Self::Silent => "eth_accounts",
            Self::Interactive => "eth_requestAccounts",
        }
    }
}

/// One user-initiated transfer. Withdrawals carry a negative amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    pub action: Action,
    pub amount: I256,
    pub timestamp_epoch_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `None` for pre-Byzantium receipts, which carry a state root instead.
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|status| status == U64::from(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_status_decodes_from_hex_quantity() {
        let raw = r#"{
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "blockNumber": "0x2",
            "status": "0x0"
        }"#;
        let receipt: TransactionReceipt = serde_json::from_str(raw).expect("receipt");
        assert!(!receipt.succeeded());
        assert_eq!(receipt.block_number, Some(U64::from(2)));
    }

    #[test]
    fn receipt_without_status_counts_as_success() {
        let raw = r#"{
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"
        }"#;
        let receipt: TransactionReceipt = serde_json::from_str(raw).expect("receipt");
        assert!(receipt.succeeded());
    }

    #[test]
    fn call_request_uses_json_rpc_field_names() {
        let request = CallRequest {
            from: Address::repeat_byte(0xab),
            to: Address::repeat_byte(0xcd),
            data: Bytes::from_static(&[0x12, 0x06, 0x5f, 0xe0]),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["data"], "0x12065fe0");
        assert!(value["from"].as_str().is_some_and(|s| s.starts_with("0x")));
    }

    #[test]
    fn account_request_maps_to_rpc_methods() {
        assert_eq!(AccountRequest::Silent.method(), "eth_accounts");
        assert_eq!(AccountRequest::Interactive.method(), "eth_requestAccounts");
        assert_eq!(Action::Withdraw.to_string(), "Withdraw");
    }
}
