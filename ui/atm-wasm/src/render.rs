//! Projects the panel state onto the DOM. Safe to call at any time.

use atm_panel_core::{NoticeLevel, Phase};
use wasm_bindgen::JsValue;

use crate::dom::{self, Elements};
use crate::state;

/// Local date/time string for an epoch-millisecond timestamp.
pub fn local_time(epoch_ms: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(epoch_ms as f64));
    let locale = dom::window()
        .navigator()
        .language()
        .unwrap_or_else(|| "en-US".to_owned());
    date.to_locale_string(&locale, &JsValue::UNDEFINED).into()
}

pub fn render(els: &Elements) {
    let Some(panel) = state::panel() else {
        return;
    };
    let snapshot = panel.snapshot();
    let phase = snapshot.phase();
    let busy = panel.is_busy();
    let ready = phase == Phase::Ready && !busy;

    // ── Wallet detection ──
    dom::show(&els.install_prompt, phase == Phase::NoWallet);
    dom::show(&els.connect_btn, phase == Phase::WalletPresent);
    els.connect_btn.set_disabled(busy);

    // ── Account ──
    dom::show(&els.account_section, snapshot.account().is_some());
    let account = snapshot
        .account()
        .map(|account| account.to_string())
        .unwrap_or_default();
    dom::set_text(&els.account_label, &account);
    let balance = match snapshot.balance() {
        Some(balance) => format!("{} {}", balance.display, panel.config().currency_symbol),
        None => "…".to_owned(),
    };
    dom::set_text(&els.balance_label, &balance);

    for button in [
        &els.view_account_btn,
        &els.refresh_balance_btn,
        &els.deposit_btn,
        &els.withdraw_btn,
    ] {
        button.set_disabled(!ready);
    }
    els.disconnect_btn.set_disabled(busy);

    let inputs = state::inputs();
    dom::sync_input_value(&els.deposit_input, &inputs.deposit);
    dom::sync_input_value(&els.withdraw_input, &inputs.withdraw);

    // ── History ──
    els.history_list.set_inner_html("");
    for line in panel.history_lines(local_time) {
        match dom::create_element("li") {
            Ok(item) => {
                dom::set_text(&item, &line);
                if let Err(err) = els.history_list.append_child(&item) {
                    tracing::warn!("failed to render history entry: {:?}", err);
                }
            }
            Err(err) => tracing::warn!("failed to render history entry: {:?}", err),
        }
    }

    // ── Notice ──
    match snapshot.notice() {
        Some(notice) => {
            dom::show(&els.notice, true);
            dom::toggle_class(&els.notice, "error", notice.level == NoticeLevel::Error);
            dom::set_text(&els.notice_text, &notice.message);
        }
        None => dom::show(&els.notice, false),
    }
}
