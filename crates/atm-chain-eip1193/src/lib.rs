use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;
use atm_api_types::{AccountRequest, CallRequest, TransactionReceipt};
use atm_chain_client::{AtmContract, ProviderError, Result, WalletProvider};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::rc::Rc;
use tracing::{debug, info};

sol! {
    /// ABI of the deployed Assessment (ATM) contract.
    interface IAssessment {
        function getBalance() external view returns (uint256);
        function deposit(uint256 _amount) external payable;
        function withdraw(uint256 _withdrawAmount) external;
    }
}

/// Raw EIP-1193 `request({ method, params })` surface.
///
/// The browser crate implements this over `window.ethereum`; tests script it.
#[async_trait(?Send)]
pub trait Eip1193Transport {
    fn is_injected(&self) -> bool;
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
    async fn sleep(&self, millis: u32);
}

fn decode<D: DeserializeOwned>(method: &str, value: Value) -> Result<D> {
    serde_json::from_value(value).map_err(|err| ProviderError::Decode(format!("{method}: {err}")))
}

/// Wallet provider backed by an injected EIP-1193 object.
pub struct InjectedWallet<T> {
    transport: Rc<T>,
    poll_interval_ms: u32,
}

impl<T> InjectedWallet<T> {
    pub fn new(transport: Rc<T>, poll_interval_ms: u32) -> Self {
        Self {
            transport,
            poll_interval_ms,
        }
    }

    pub fn transport(&self) -> &Rc<T> {
        &self.transport
    }
}

#[async_trait(?Send)]
impl<T> WalletProvider for InjectedWallet<T>
where
    T: Eip1193Transport + 'static,
{
    fn is_available(&self) -> bool {
        self.transport.is_injected()
    }

    async fn request_accounts(&self, kind: AccountRequest) -> Result<Vec<Address>> {
        if !self.transport.is_injected() {
            return Err(ProviderError::Unavailable);
        }

        let method = kind.method();
        match self.transport.request(method, json!([])).await {
            Ok(value) => decode(method, value),
            Err(ProviderError::Rejected { message, .. }) => {
                info!("account request declined: {}", message);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    fn bind_contract(&self, address: Address, signer: Address) -> Result<Rc<dyn AtmContract>> {
        if !self.transport.is_injected() {
            return Err(ProviderError::Unavailable);
        }
        Ok(Rc::new(AssessmentContract::new(
            self.transport.clone(),
            address,
            signer,
            self.poll_interval_ms,
        )))
    }
}

/// `IAssessment` binding that sends through the wallet as `signer`.
pub struct AssessmentContract<T> {
    transport: Rc<T>,
    address: Address,
    signer: Address,
    poll_interval_ms: u32,
}

impl<T: Eip1193Transport> AssessmentContract<T> {
    pub fn new(transport: Rc<T>, address: Address, signer: Address, poll_interval_ms: u32) -> Self {
        Self {
            transport,
            address,
            signer,
            poll_interval_ms,
        }
    }

    fn call_request(&self, data: Vec<u8>) -> Result<Value> {
        let request = CallRequest {
            from: self.signer,
            to: self.address,
            data: Bytes::from(data),
        };
        serde_json::to_value(request).map_err(|err| ProviderError::Decode(err.to_string()))
    }

    async fn send(&self, data: Vec<u8>) -> Result<B256> {
        let tx = self.call_request(data)?;
        let hash = self
            .transport
            .request("eth_sendTransaction", json!([tx]))
            .await?;
        decode("eth_sendTransaction", hash)
    }
}

#[async_trait(?Send)]
impl<T: Eip1193Transport> AtmContract for AssessmentContract<T> {
    fn address(&self) -> Address {
        self.address
    }

    fn signer(&self) -> Address {
        self.signer
    }

    async fn get_balance(&self) -> Result<U256> {
        let call = self.call_request(IAssessment::getBalanceCall {}.abi_encode())?;
        let raw = self
            .transport
            .request("eth_call", json!([call, "latest"]))
            .await?;
        let output: Bytes = decode("eth_call", raw)?;

        // a single static uint256 return is exactly one word
        if output.len() != 32 {
            return Err(ProviderError::Decode(format!(
                "getBalance returned {} bytes",
                output.len()
            )));
        }
        U256::try_from_be_slice(&output)
            .ok_or_else(|| ProviderError::Decode("getBalance word out of range".to_owned()))
    }

    async fn deposit(&self, amount: U256) -> Result<B256> {
        debug!(%amount, "deposit");
        self.send(IAssessment::depositCall { _amount: amount }.abi_encode())
            .await
    }

    async fn withdraw(&self, amount: U256) -> Result<B256> {
        debug!(%amount, "withdraw");
        self.send(
            IAssessment::withdrawCall {
                _withdrawAmount: amount,
            }
            .abi_encode(),
        )
        .await
    }

    async fn confirm(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        loop {
            let raw = self
                .transport
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if raw.is_null() {
                self.transport.sleep(self.poll_interval_ms).await;
                continue;
            }

            let receipt: TransactionReceipt = decode("eth_getTransactionReceipt", raw)?;
            if !receipt.succeeded() {
                return Err(ProviderError::Reverted { tx_hash });
            }
            info!(%tx_hash, "transaction confirmed");
            return Ok(receipt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedTransport {
        missing: bool,
        replies: RefCell<VecDeque<Result<Value>>>,
        calls: RefCell<Vec<(String, Value)>>,
        sleeps: Cell<u32>,
    }

    impl ScriptedTransport {
        fn with_replies(replies: Vec<Result<Value>>) -> Rc<Self> {
            Rc::new(Self {
                replies: RefCell::new(replies.into()),
                ..Default::default()
            })
        }

        fn call(&self, index: usize) -> (String, Value) {
            self.calls.borrow()[index].clone()
        }
    }

    #[async_trait(?Send)]
    impl Eip1193Transport for ScriptedTransport {
        fn is_injected(&self) -> bool {
            !self.missing
        }

        async fn request(&self, method: &str, params: Value) -> Result<Value> {
            self.calls.borrow_mut().push((method.to_owned(), params));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Transport("no scripted reply".to_owned())))
        }

        async fn sleep(&self, _millis: u32) {
            self.sleeps.set(self.sleeps.get() + 1);
        }
    }

    const CONTRACT: Address = Address::new([0x5f; 20]);
    const SIGNER: Address = Address::new([0xab; 20]);

    fn contract(transport: &Rc<ScriptedTransport>) -> AssessmentContract<ScriptedTransport> {
        AssessmentContract::new(transport.clone(), CONTRACT, SIGNER, 10)
    }

    fn word(value: U256) -> Value {
        serde_json::to_value(Bytes::from(value.to_be_bytes::<32>().to_vec())).expect("bytes")
    }

    fn receipt(status: &str) -> Value {
        json!({
            "transactionHash": B256::repeat_byte(0x11),
            "blockNumber": "0x7",
            "status": status,
        })
    }

    #[tokio::test]
    async fn silent_accounts_use_eth_accounts() -> anyhow::Result<()> {
        let transport = ScriptedTransport::with_replies(vec![Ok(json!([SIGNER]))]);
        let wallet = InjectedWallet::new(transport.clone(), 10);

        let accounts = wallet.request_accounts(AccountRequest::Silent).await?;

        assert_eq!(accounts, vec![SIGNER]);
        assert_eq!(transport.call(0).0, "eth_accounts");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_prompt_yields_no_accounts() -> anyhow::Result<()> {
        let transport = ScriptedTransport::with_replies(vec![Err(ProviderError::Rejected {
            code: 4001,
            message: "User rejected the request.".to_owned(),
        })]);
        let wallet = InjectedWallet::new(transport.clone(), 10);

        let accounts = wallet.request_accounts(AccountRequest::Interactive).await?;

        assert!(accounts.is_empty());
        assert_eq!(transport.call(0).0, "eth_requestAccounts");
        Ok(())
    }

    #[tokio::test]
    async fn missing_provider_is_unavailable() {
        let transport = Rc::new(ScriptedTransport {
            missing: true,
            ..Default::default()
        });
        let wallet = InjectedWallet::new(transport.clone(), 10);

        assert!(!wallet.is_available());
        let err = wallet
            .request_accounts(AccountRequest::Interactive)
            .await
            .expect_err("no provider");
        assert_eq!(err, ProviderError::Unavailable);
        assert!(wallet.bind_contract(CONTRACT, SIGNER).is_err());
        assert!(transport.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn get_balance_encodes_call_and_decodes_word() -> anyhow::Result<()> {
        let balance = U256::from(1_500_000_000_000_000_000u128);
        let transport = ScriptedTransport::with_replies(vec![Ok(word(balance))]);

        assert_eq!(contract(&transport).get_balance().await?, balance);

        let (method, params) = transport.call(0);
        assert_eq!(method, "eth_call");
        let expected = serde_json::to_value(Bytes::from(IAssessment::getBalanceCall {}.abi_encode()))?;
        assert_eq!(params[0]["data"], expected);
        assert_eq!(params[0]["to"], serde_json::to_value(CONTRACT)?);
        assert_eq!(params[1], "latest");
        Ok(())
    }

    #[tokio::test]
    async fn short_balance_output_is_a_decode_error() {
        let transport = ScriptedTransport::with_replies(vec![Ok(json!("0x01"))]);

        let err = contract(&transport).get_balance().await.expect_err("short word");
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn deposit_and_withdraw_send_from_signer() -> anyhow::Result<()> {
        let hash = B256::repeat_byte(0x22);
        let transport = ScriptedTransport::with_replies(vec![
            Ok(serde_json::to_value(hash)?),
            Ok(serde_json::to_value(hash)?),
        ]);
        let atm = contract(&transport);
        let amount = U256::from(5u64);

        assert_eq!(atm.deposit(amount).await?, hash);
        assert_eq!(atm.withdraw(amount).await?, hash);

        let (method, params) = transport.call(0);
        assert_eq!(method, "eth_sendTransaction");
        assert_eq!(params[0]["from"], serde_json::to_value(SIGNER)?);
        let deposit = serde_json::to_value(Bytes::from(
            IAssessment::depositCall { _amount: amount }.abi_encode(),
        ))?;
        assert_eq!(params[0]["data"], deposit);

        let (_, params) = transport.call(1);
        let withdraw = serde_json::to_value(Bytes::from(
            IAssessment::withdrawCall {
                _withdrawAmount: amount,
            }
            .abi_encode(),
        ))?;
        assert_eq!(params[0]["data"], withdraw);
        Ok(())
    }

    #[tokio::test]
    async fn confirm_polls_until_receipt_appears() -> anyhow::Result<()> {
        let transport = ScriptedTransport::with_replies(vec![
            Ok(Value::Null),
            Ok(Value::Null),
            Ok(receipt("0x1")),
        ]);

        let mined = contract(&transport).confirm(B256::repeat_byte(0x11)).await?;

        assert!(mined.succeeded());
        assert_eq!(transport.sleeps.get(), 2);
        assert_eq!(transport.calls.borrow().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn reverted_receipt_is_an_error() {
        let tx_hash = B256::repeat_byte(0x11);
        let transport = ScriptedTransport::with_replies(vec![Ok(receipt("0x0"))]);

        let err = contract(&transport).confirm(tx_hash).await.expect_err("reverted");
        assert_eq!(err, ProviderError::Reverted { tx_hash });
    }

    #[tokio::test]
    async fn bound_contract_keeps_signer() -> anyhow::Result<()> {
        let transport = ScriptedTransport::with_replies(Vec::new());
        let wallet = InjectedWallet::new(transport, 10);

        let atm = wallet.bind_contract(CONTRACT, SIGNER)?;

        assert_eq!(atm.signer(), SIGNER);
        assert_eq!(atm.address(), CONTRACT);
        Ok(())
    }
}
