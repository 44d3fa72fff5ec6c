//! Event binding.
//!
//! Wires the panel controls. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::{self, Elements};
use crate::panel_ops;
use crate::state::{self, AmountInputs};

/// Attach an async click handler.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Keep an amount field mirrored into the bound input state.
fn bind_amount_input(
    input: &web_sys::HtmlInputElement,
    field: fn(&mut AmountInputs) -> &mut String,
) -> Result<(), JsValue> {
    let source = input.clone();
    let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let value = dom::get_input_value(&source);
        state::with_inputs_mut(|inputs| *field(inputs) = value);
    }) as Box<dyn FnMut(_)>);
    input.add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) -> Result<(), JsValue> {
    // ── Wallet session ──
    on_click_async!(els.connect_btn, els, panel_ops::on_connect);
    on_click_async!(els.disconnect_btn, els, panel_ops::on_disconnect);

    // ── Account / balance ──
    on_click_async!(els.view_account_btn, els, panel_ops::on_view_account);
    on_click_async!(els.refresh_balance_btn, els, panel_ops::on_refresh_balance);

    // ── Transfers ──
    bind_amount_input(&els.deposit_input, |inputs| &mut inputs.deposit)?;
    bind_amount_input(&els.withdraw_input, |inputs| &mut inputs.withdraw)?;
    on_click_async!(els.deposit_btn, els, panel_ops::on_deposit);
    on_click_async!(els.withdraw_btn, els, panel_ops::on_withdraw);

    // ── Notice ──
    {
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            panel_ops::on_dismiss_notice();
        }) as Box<dyn FnMut(_)>);
        els.notice_close_btn
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}
