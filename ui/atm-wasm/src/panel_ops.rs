//! Control handlers.
//!
//! Each handler runs one panel operation. Outcomes reach the user through the
//! panel's notice and the re-render that follows every state change, so the
//! returned errors are only traced here.

use tracing::debug;

use crate::dom::Elements;
use crate::render;
use crate::state;

pub async fn on_connect(_els: &Elements) {
    let Some(panel) = state::panel() else { return };
    if let Err(err) = panel.connect().await {
        debug!("connect: {}", err);
    }
}

pub async fn on_view_account(_els: &Elements) {
    let Some(panel) = state::panel() else { return };
    if let Err(err) = panel.view_account_info() {
        debug!("view account: {}", err);
    }
}

pub async fn on_refresh_balance(_els: &Elements) {
    let Some(panel) = state::panel() else { return };
    if let Err(err) = panel.refresh_balance().await {
        debug!("refresh balance: {}", err);
    }
}

pub async fn on_disconnect(els: &Elements) {
    let Some(panel) = state::panel() else { return };
    panel.disconnect();
    state::with_inputs_mut(|inputs| *inputs = Default::default());
    render::render(els);
}

pub async fn on_deposit(els: &Elements) {
    let Some(panel) = state::panel() else { return };
    let text = state::inputs().deposit;
    match panel.deposit(&text).await {
        Ok(_) => {
            state::with_inputs_mut(|inputs| inputs.deposit.clear());
            render::render(els);
        }
        Err(err) => debug!("deposit: {}", err),
    }
}

pub async fn on_withdraw(els: &Elements) {
    let Some(panel) = state::panel() else { return };
    let text = state::inputs().withdraw;
    match panel.withdraw(&text).await {
        Ok(_) => {
            state::with_inputs_mut(|inputs| inputs.withdraw.clear());
            render::render(els);
        }
        Err(err) => debug!("withdraw: {}", err),
    }
}

pub fn on_dismiss_notice() {
    if let Some(panel) = state::panel() {
        panel.dismiss_notice();
    }
}
