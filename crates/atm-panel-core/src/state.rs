//! Account panel view state.
//!
//! `PanelState` is never mutated in place: every change goes through
//! [`PanelState::reduce`], which consumes the old state and returns the next.
//! The lifecycle phase is derived from which handles are present.

use alloy_primitives::{Address, U256};
use atm_api_types::Action;
use atm_chain_client::{AtmContract, WalletProvider};
use std::fmt;
use std::rc::Rc;

use crate::amount::{Amount, format_amount};
use crate::history::TransactionLog;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NoWallet,
    WalletPresent,
    Connected,
    Ready,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub base_units: U256,
    pub display: String,
}

impl BalanceSnapshot {
    pub fn new(base_units: U256, decimals: u8) -> Self {
        Self {
            base_units,
            display: format_amount(base_units, decimals),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient user-visible message, replaced by the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub enum PanelEvent {
    WalletDetected(Rc<dyn WalletProvider>),
    WalletMissing,
    AccountAuthorized(Address),
    ContractBound(Rc<dyn AtmContract>),
    BalanceLoaded(BalanceSnapshot),
    TransferConfirmed {
        action: Action,
        amount: Amount,
        timestamp_epoch_ms: u64,
    },
    Notify(Notice),
    DismissNotice,
    /// Full reset; the wallet handle survives only if still injected.
    Disconnected { wallet_injected: bool },
}

#[derive(Clone, Default)]
pub struct PanelState {
    wallet: Option<Rc<dyn WalletProvider>>,
    account: Option<Address>,
    contract: Option<Rc<dyn AtmContract>>,
    balance: Option<BalanceSnapshot>,
    history: TransactionLog,
    notice: Option<Notice>,
}

impl PanelState {
    pub fn phase(&self) -> Phase {
        match (&self.wallet, &self.account, &self.contract) {
            (None, _, _) => Phase::NoWallet,
            (Some(_), None, _) => Phase::WalletPresent,
            (Some(_), Some(_), None) => Phase::Connected,
            (Some(_), Some(_), Some(_)) => Phase::Ready,
        }
    }

    pub fn wallet(&self) -> Option<&Rc<dyn WalletProvider>> {
        self.wallet.as_ref()
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn contract(&self) -> Option<&Rc<dyn AtmContract>> {
        self.contract.as_ref()
    }

    pub fn balance(&self) -> Option<&BalanceSnapshot> {
        self.balance.as_ref()
    }

    pub fn history(&self) -> &TransactionLog {
        &self.history
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn reduce(self, event: PanelEvent) -> Self {
        match event {
            PanelEvent::WalletDetected(wallet) => Self {
                wallet: Some(wallet),
                ..self
            },
            PanelEvent::WalletMissing => Self {
                notice: self.notice,
                ..Self::default()
            },
            PanelEvent::AccountAuthorized(account) => {
                if self.wallet.is_none() {
                    return self;
                }
                if self.account == Some(account) {
                    return self;
                }
                // a different signer starts a fresh session
                Self {
                    wallet: self.wallet,
                    account: Some(account),
                    notice: self.notice,
                    ..Self::default()
                }
            }
            PanelEvent::ContractBound(contract) => {
                if self.wallet.is_none() || self.account != Some(contract.signer()) {
                    return self;
                }
                Self {
                    contract: Some(contract),
                    ..self
                }
            }
            PanelEvent::BalanceLoaded(snapshot) => {
                if self.contract.is_none() {
                    return self;
                }
                Self {
                    balance: Some(snapshot),
                    ..self
                }
            }
            PanelEvent::TransferConfirmed {
                action,
                amount,
                timestamp_epoch_ms,
            } => {
                if self.contract.is_none() {
                    return self;
                }
                let mut history = self.history;
                history.record(action, amount, timestamp_epoch_ms);
                Self { history, ..self }
            }
            PanelEvent::Notify(notice) => Self {
                notice: Some(notice),
                ..self
            },
            PanelEvent::DismissNotice => Self {
                notice: None,
                ..self
            },
            PanelEvent::Disconnected { wallet_injected } => Self {
                wallet: if wallet_injected { self.wallet } else { None },
                ..Self::default()
            },
        }
    }
}

impl fmt::Debug for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelState")
            .field("phase", &self.phase())
            .field("account", &self.account)
            .field("contract", &self.contract.as_ref().map(|c| c.address()))
            .field("balance", &self.balance)
            .field("history", &self.history.len())
            .field("notice", &self.notice)
            .finish()
    }
}
