pub mod amount;
pub mod config;
pub mod error;
pub mod history;
pub mod panel;
pub mod state;

pub use amount::{Amount, format_amount};
pub use config::{PanelConfig, PanelOverrides};
pub use error::{AmountError, ConfigError, PanelError};
pub use history::TransactionLog;
pub use panel::Panel;
pub use state::{BalanceSnapshot, Notice, NoticeLevel, PanelEvent, PanelState, Phase};
