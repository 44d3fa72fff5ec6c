//! DOM element bindings.
//!
//! All fields are resolved once at startup. Markup ids live in `index.html`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value()
}

/// Write `value` only when it differs, so typing keeps its caret.
pub fn sync_input_value(el: &HtmlInputElement, value: &str) {
    if el.value() != value {
        el.set_value(value);
    }
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn show(el: &Element, visible: bool) {
    toggle_class(el, "hidden", !visible);
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

// ── Elements struct ──

/// DOM references used by the panel. Clone-friendly (JS GC handles).
#[derive(Clone)]
pub struct Elements {
    // Wallet detection
    pub install_prompt: Element,
    pub connect_btn: HtmlButtonElement,

    // Account
    pub account_section: Element,
    pub account_label: Element,
    pub balance_label: Element,
    pub view_account_btn: HtmlButtonElement,
    pub refresh_balance_btn: HtmlButtonElement,
    pub disconnect_btn: HtmlButtonElement,

    // Transfers
    pub deposit_input: HtmlInputElement,
    pub deposit_btn: HtmlButtonElement,
    pub withdraw_input: HtmlInputElement,
    pub withdraw_btn: HtmlButtonElement,

    // History
    pub history_list: Element,

    // Notice
    pub notice: Element,
    pub notice_text: Element,
    pub notice_close_btn: HtmlButtonElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_button {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            install_prompt: get_el!("installPrompt"),
            connect_btn: get_button!("connectBtn"),

            account_section: get_el!("accountSection"),
            account_label: get_el!("accountLabel"),
            balance_label: get_el!("balanceLabel"),
            view_account_btn: get_button!("viewAccountBtn"),
            refresh_balance_btn: get_button!("refreshBalanceBtn"),
            disconnect_btn: get_button!("disconnectBtn"),

            deposit_input: get_input!("depositAmount"),
            deposit_btn: get_button!("depositBtn"),
            withdraw_input: get_input!("withdrawAmount"),
            withdraw_btn: get_button!("withdrawBtn"),

            history_list: get_el!("historyList"),

            notice: get_el!("notice"),
            notice_text: get_el!("noticeText"),
            notice_close_btn: get_button!("noticeCloseBtn"),
        })
    }
}
