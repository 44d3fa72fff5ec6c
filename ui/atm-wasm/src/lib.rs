//! ATM account panel, browser frontend.
//!
//! Detects an injected EIP-1193 wallet, binds the Assessment contract for the
//! authorized account and drives deposits, withdrawals and the session log.

pub mod dom;
pub mod ethereum;
pub mod events;
pub mod logging;
pub mod panel_ops;
pub mod render;
pub mod state;

use atm_chain_eip1193::InjectedWallet;
use atm_panel_core::Panel;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use ethereum::WindowEthereum;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init().await
}

fn now_epoch_ms() -> u64 {
    js_sys::Date::now() as u64
}

async fn init() -> Result<(), JsValue> {
    let (config, config_warning) = state::load_config();
    logging::init(&config.log_directive);
    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }
    info!(contract = %config.contract_address, "starting account panel");

    let els = dom::Elements::bind()?;

    let wallet = InjectedWallet::new(Rc::new(WindowEthereum), config.confirmation_poll_ms);
    let panel = Rc::new(Panel::new(Rc::new(wallet), config, now_epoch_ms));
    {
        let els = els.clone();
        panel.subscribe(move || render::render(&els));
    }
    state::install_panel(panel.clone());

    events::bind_events(&els)?;
    {
        let els = els.clone();
        ethereum::on_accounts_changed(move |accounts| {
            let els = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(panel) = state::panel() {
                    panel.accounts_changed(accounts).await;
                    render::render(&els);
                }
            });
        })?;
    }

    render::render(&els);
    let phase = panel.mount().await;
    info!(?phase, "panel mounted");
    render::render(&els);

    Ok(())
}
