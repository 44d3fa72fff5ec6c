//! Global UI state.
//!
//! `thread_local!` storage (WASM is single-threaded) for the mounted panel and
//! the text bound to the amount inputs, plus the `localStorage` config layer.

use atm_panel_core::{Panel, PanelConfig, PanelOverrides};
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use std::cell::RefCell;
use std::rc::Rc;

/// `localStorage` key holding JSON [`PanelOverrides`].
pub const CONFIG_KEY: &str = "atm_panel_config";

/// Text currently typed into the amount fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AmountInputs {
    pub deposit: String,
    pub withdraw: String,
}

// ── Thread-local singletons ──

thread_local! {
    static PANEL: RefCell<Option<Rc<Panel>>> = const { RefCell::new(None) };
    static INPUTS: RefCell<AmountInputs> = RefCell::new(AmountInputs::default());
}

pub fn install_panel(panel: Rc<Panel>) {
    PANEL.with(|p| p.replace(Some(panel)));
}

/// The mounted panel. Callers hold the `Rc`, never the cell borrow, across awaits.
pub fn panel() -> Option<Rc<Panel>> {
    PANEL.with(|p| p.borrow().clone())
}

pub fn inputs() -> AmountInputs {
    INPUTS.with(|i| i.borrow().clone())
}

pub fn with_inputs_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AmountInputs) -> R,
{
    INPUTS.with(|i| f(&mut i.borrow_mut()))
}

// ── Configuration ──

/// Defaults overlaid with developer overrides from `localStorage`.
///
/// A missing key is normal; unreadable or invalid overrides fall back to the
/// defaults and the reason is handed back for logging once tracing is up.
pub fn load_config() -> (PanelConfig, Option<String>) {
    let overrides = match LocalStorage::get::<PanelOverrides>(CONFIG_KEY) {
        Ok(overrides) => overrides,
        Err(StorageError::KeyNotFound(_)) => return (PanelConfig::default(), None),
        Err(err) => {
            return (
                PanelConfig::default(),
                Some(format!("ignoring unreadable {CONFIG_KEY}: {err}")),
            );
        }
    };

    match PanelConfig::default().with_overrides(overrides) {
        Ok(config) => (config, None),
        Err(err) => (
            PanelConfig::default(),
            Some(format!("ignoring {CONFIG_KEY}: {err}")),
        ),
    }
}
