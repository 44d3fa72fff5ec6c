//! Account panel controller.
//!
//! Runs the asynchronous wallet and contract calls behind each control and
//! feeds their outcomes into the [`PanelState`] reducer. Failures are turned
//! into error notices here and returned to the caller; nothing propagates as
//! a panic.

use alloy_primitives::Address;
use atm_api_types::{AccountRequest, Action, TransactionRecord};
use atm_chain_client::{AtmContract, ProviderError, WalletProvider};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::amount::{Amount, format_amount};
use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::state::{BalanceSnapshot, Notice, PanelEvent, PanelState, Phase};

/// Epoch-millisecond clock used to stamp transaction records.
pub type Clock = fn() -> u64;

pub struct Panel {
    provider: Rc<dyn WalletProvider>,
    config: PanelConfig,
    clock: Clock,
    state: RefCell<PanelState>,
    busy: Cell<bool>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Clears the busy flag when an operation finishes, however it finishes.
struct BusyGuard<'a>(&'a Panel);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.busy.set(false);
        self.0.changed();
    }
}

impl Panel {
    pub fn new(provider: Rc<dyn WalletProvider>, config: PanelConfig, clock: Clock) -> Self {
        Self {
            provider,
            config,
            clock,
            state: RefCell::new(PanelState::default()),
            busy: Cell::new(false),
            listener: RefCell::new(None),
        }
    }

    /// Register the callback run after every state or busy change.
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listener.replace(Some(Rc::new(listener)));
    }

    fn changed(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Copy of the current view state for rendering.
    pub fn snapshot(&self) -> PanelState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// `<action> <amount> <currency> - <timestamp>` lines, oldest first.
    pub fn history_lines<F>(&self, localize: F) -> Vec<String>
    where
        F: Fn(u64) -> String,
    {
        let state = self.state.borrow();
        state
            .history()
            .render(&self.config.currency_symbol, self.config.decimals, localize)
            .collect()
    }

    fn dispatch(&self, event: PanelEvent) {
        let current = self.state.take();
        self.state.replace(current.reduce(event));
        self.changed();
    }

    fn notify(&self, notice: Notice) {
        self.dispatch(PanelEvent::Notify(notice));
    }

    fn fail(&self, err: PanelError) -> PanelError {
        warn!("{}", err);
        self.notify(Notice::error(err.to_string()));
        err
    }

    fn begin(&self) -> Result<BusyGuard<'_>, PanelError> {
        if self.busy.replace(true) {
            return Err(PanelError::Busy);
        }
        self.changed();
        Ok(BusyGuard(self))
    }

    fn current_contract(&self) -> Option<Rc<dyn AtmContract>> {
        self.state.borrow().contract().cloned()
    }

    fn is_current(&self, contract: &Rc<dyn AtmContract>) -> bool {
        self.current_contract()
            .is_some_and(|active| Rc::ptr_eq(&active, contract))
    }

    pub fn dismiss_notice(&self) {
        self.dispatch(PanelEvent::DismissNotice);
    }

    // ── Wallet session ──

    /// Record whether a wallet is injected. Never prompts.
    pub fn detect_wallet(&self) -> bool {
        if self.provider.is_available() {
            debug!("wallet provider detected");
            self.dispatch(PanelEvent::WalletDetected(self.provider.clone()));
            true
        } else {
            info!("no wallet provider injected");
            self.dispatch(PanelEvent::WalletMissing);
            false
        }
    }

    /// Startup sequence: detect the wallet and resume an already-authorized
    /// session without prompting.
    pub async fn mount(&self) -> Phase {
        let Ok(_busy) = self.begin() else {
            return self.phase();
        };
        if !self.detect_wallet() {
            return self.phase();
        }

        match self.provider.request_accounts(AccountRequest::Silent).await {
            Ok(accounts) => match accounts.first() {
                Some(&account) => {
                    // errors were already surfaced as notices
                    let _ = self.establish(account).await;
                }
                None => debug!("no previously authorized account"),
            },
            Err(err) => warn!("silent account probe failed: {}", err),
        }
        self.phase()
    }

    /// Interactive connect: prompt for an account, bind the contract and load
    /// the balance.
    pub async fn connect(&self) -> Result<Address, PanelError> {
        let _busy = self.begin()?;
        let account = self.request_accounts(AccountRequest::Interactive).await?;
        self.establish(account).await?;
        Ok(account)
    }

    /// Ask the wallet for its account; the first one becomes the signer.
    pub async fn request_accounts(&self, kind: AccountRequest) -> Result<Address, PanelError> {
        if self.state.borrow().wallet().is_none() {
            return Err(self.fail(PanelError::WalletUnavailable));
        }

        let accounts = match self.provider.request_accounts(kind).await {
            Ok(accounts) => accounts,
            Err(ProviderError::Unavailable) => {
                self.dispatch(PanelEvent::Disconnected {
                    wallet_injected: false,
                });
                return Err(self.fail(PanelError::WalletUnavailable));
            }
            Err(err) => return Err(self.fail(PanelError::Provider(err))),
        };

        let Some(&account) = accounts.first() else {
            return Err(self.fail(PanelError::AuthorizationDeclined));
        };
        info!(%account, "account connected");
        self.dispatch(PanelEvent::AccountAuthorized(account));
        Ok(account)
    }

    async fn establish(&self, account: Address) -> Result<(), PanelError> {
        self.dispatch(PanelEvent::AccountAuthorized(account));
        let contract = self.bind_contract()?;
        if let Err(err) = self.query_balance_with(&contract).await {
            debug!("initial balance unavailable: {}", err);
        }
        Ok(())
    }

    /// Bind the fixed contract to the authorized account.
    pub fn bind_contract(&self) -> Result<Rc<dyn AtmContract>, PanelError> {
        let signer = self.state.borrow().account();
        let Some(signer) = signer else {
            return Err(self.fail(PanelError::NotConnected));
        };
        let contract = self
            .provider
            .bind_contract(self.config.contract_address, signer)
            .map_err(|err| self.fail(PanelError::Provider(err)))?;
        debug!(address = %contract.address(), %signer, "contract bound");
        self.dispatch(PanelEvent::ContractBound(contract.clone()));
        Ok(contract)
    }

    /// Provider notification that the exposed accounts changed.
    pub async fn accounts_changed(&self, accounts: Vec<Address>) -> Phase {
        let current = self.state.borrow().account();
        match accounts.first().copied() {
            None => {
                info!("wallet revoked account access");
                self.dispatch(PanelEvent::Disconnected {
                    wallet_injected: self.provider.is_available(),
                });
                self.notify(Notice::info("Wallet account disconnected."));
            }
            Some(account) if Some(account) == current => {}
            Some(account) => {
                info!(%account, "signer changed");
                // errors were already surfaced as notices
                let _ = self.establish(account).await;
            }
        }
        self.phase()
    }

    // ── Balance view ──

    async fn query_balance_with(&self, contract: &Rc<dyn AtmContract>) -> Result<BalanceSnapshot, PanelError> {
        let raw = contract
            .get_balance()
            .await
            .map_err(|err| self.fail(PanelError::QueryFailure(err)))?;
        let snapshot = BalanceSnapshot::new(raw, self.config.decimals);
        if self.is_current(contract) {
            self.dispatch(PanelEvent::BalanceLoaded(snapshot.clone()));
        }
        Ok(snapshot)
    }

    /// Read the balance and cache it. A failed read keeps the old snapshot.
    pub async fn query_balance(&self) -> Result<BalanceSnapshot, PanelError> {
        let _busy = self.begin()?;
        let contract = self
            .current_contract()
            .ok_or_else(|| self.fail(PanelError::NotConnected))?;
        self.query_balance_with(&contract).await
    }

    /// "Refresh Balance": query and announce the result.
    pub async fn refresh_balance(&self) -> Result<BalanceSnapshot, PanelError> {
        let snapshot = self.query_balance().await?;
        self.notify(Notice::info(format!(
            "Your balance is: {} {}",
            snapshot.display, self.config.currency_symbol
        )));
        Ok(snapshot)
    }

    // ── Transfers ──

    pub async fn deposit(&self, amount: &str) -> Result<TransactionRecord, PanelError> {
        self.transfer(Action::Deposit, amount).await
    }

    pub async fn withdraw(&self, amount: &str) -> Result<TransactionRecord, PanelError> {
        self.transfer(Action::Withdraw, amount).await
    }

    async fn transfer(&self, action: Action, input: &str) -> Result<TransactionRecord, PanelError> {
        let _busy = self.begin()?;
        let contract = self
            .current_contract()
            .ok_or_else(|| self.fail(PanelError::NotConnected))?;
        let amount = Amount::parse(input, self.config.decimals)
            .map_err(|err| self.fail(PanelError::InvalidAmount(err)))?;
        let failed = |source| self.fail(PanelError::TransferFailure { action, source });

        let submitted = match action {
            Action::Deposit => contract.deposit(amount.base_units()).await,
            Action::Withdraw => contract.withdraw(amount.base_units()).await,
        };
        let tx_hash = submitted.map_err(failed)?;
        info!(%tx_hash, %action, "transfer submitted");
        contract.confirm(tx_hash).await.map_err(failed)?;

        let timestamp_epoch_ms = (self.clock)();
        let record = TransactionRecord {
            action,
            amount: amount.signed_for(action),
            timestamp_epoch_ms,
        };
        let shown = format_amount(amount.base_units(), self.config.decimals);

        // the session was reset or rebound while waiting for the receipt
        if !self.is_current(&contract) {
            warn!(%tx_hash, "binding changed before confirmation, not logging");
            self.notify(Notice::info(format!(
                "An earlier {} of {} {} was confirmed.",
                action, shown, self.config.currency_symbol
            )));
            return Ok(record);
        }

        let refreshed = self.query_balance_with(&contract).await;
        self.dispatch(PanelEvent::TransferConfirmed {
            action,
            amount,
            timestamp_epoch_ms,
        });
        if refreshed.is_ok() {
            self.notify(Notice::info(format!(
                "{} of {} {} confirmed.",
                action, shown, self.config.currency_symbol
            )));
        }
        Ok(record)
    }

    // ── Account info / disconnect ──

    /// "View Account Info": the signer address of the active binding.
    pub fn view_account_info(&self) -> Result<Address, PanelError> {
        let contract = self
            .current_contract()
            .ok_or_else(|| self.fail(PanelError::NotConnected))?;
        let signer = contract.signer();
        self.notify(Notice::info(format!("Your Ethereum Address: {signer}")));
        Ok(signer)
    }

    /// Forget the account, binding, balance and history.
    pub fn disconnect(&self) -> Phase {
        let had_account = self.state.borrow().account().is_some();
        self.dispatch(PanelEvent::Disconnected {
            wallet_injected: self.provider.is_available(),
        });
        if had_account {
            info!("wallet disconnected");
            self.notify(Notice::info("Disconnected from wallet successfully!"));
        } else {
            self.notify(Notice::info("No wallet connected to disconnect."));
        }
        self.phase()
    }
}
