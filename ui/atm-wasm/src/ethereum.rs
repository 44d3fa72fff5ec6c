//! Bridge to the injected `window.ethereum` object.

use alloy_primitives::Address;
use async_trait::async_trait;
use atm_api_types::RpcErrorObject;
use atm_chain_client::{ProviderError, Result};
use atm_chain_eip1193::Eip1193Transport;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::dom;

/// EIP-1193 transport over whatever wallet the browser injected, if any.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowEthereum;

fn injected() -> Option<JsValue> {
    let provider = Reflect::get(&dom::window(), &JsValue::from_str("ethereum")).ok()?;
    if provider.is_undefined() || provider.is_null() {
        None
    } else {
        Some(provider)
    }
}

fn method_of(provider: &JsValue, name: &str) -> Result<Function> {
    Reflect::get(provider, &JsValue::from_str(name))
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| ProviderError::Transport(format!("ethereum.{name} is not a function")))
}

/// Map a rejected promise value to a provider error. Wallet errors carry a
/// numeric `code`; anything else is a transport failure.
fn js_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));

    match code {
        Some(code) => RpcErrorObject {
            code: code as i64,
            message,
        }
        .into(),
        None => ProviderError::Transport(message),
    }
}

#[async_trait(?Send)]
impl Eip1193Transport for WindowEthereum {
    fn is_injected(&self) -> bool {
        injected().is_some()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let provider = injected().ok_or(ProviderError::Unavailable)?;
        let request = method_of(&provider, "request")?;

        let params = params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method)).map_err(js_error)?;
        Reflect::set(&args, &JsValue::from_str("params"), &params).map_err(js_error)?;

        let promise: Promise = request
            .call1(&provider, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ProviderError::Transport(format!("{method} did not return a promise")))?;
        let result = JsFuture::from(promise).await.map_err(js_error)?;

        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|err| ProviderError::Decode(format!("{method}: {err}")))
    }

    async fn sleep(&self, millis: u32) {
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }
}

/// Subscribe to the wallet's `accountsChanged` event. No-op without a wallet.
pub fn on_accounts_changed<F>(handler: F) -> std::result::Result<(), JsValue>
where
    F: Fn(Vec<Address>) + 'static,
{
    let Some(provider) = injected() else {
        return Ok(());
    };
    let Ok(on) = method_of(&provider, "on") else {
        tracing::warn!("wallet does not support event subscriptions");
        return Ok(());
    };

    let cb = Closure::wrap(Box::new(move |accounts: JsValue| {
        let raw: Vec<String> = match serde_wasm_bindgen::from_value(accounts) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("ignoring undecodable accountsChanged payload: {}", err);
                return;
            }
        };
        let accounts = raw
            .iter()
            .filter_map(|account| match account.parse::<Address>() {
                Ok(address) => Some(address),
                Err(err) => {
                    tracing::warn!(%account, "skipping malformed account: {}", err);
                    None
                }
            })
            .collect();
        handler(accounts);
    }) as Box<dyn FnMut(JsValue)>);
    on.call2(&provider, &JsValue::from_str("accountsChanged"), cb.as_ref())?;
    cb.forget();
    Ok(())
}
