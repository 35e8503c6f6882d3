//! HTTP delivery of relay requests.
//!
//! [`classify`] is shared by every transport. The blocking [`ThreadRelay`]
//! needs the `http` feature, the browser [`FetchRelay`] the `web` feature.

use tracing::debug;

use super::RelayError;
#[cfg(any(feature = "http", feature = "web"))]
use super::{EmailRelay, RelayReply, RelayRequest};

/// Map an HTTP answer to a relay outcome. EmailJS explains 4xx
/// rejections in the body.
pub fn classify(status: u16, body: &str) -> Result<(), RelayError> {
    debug!(status, "relay answered");
    match status {
        200..=299 => Ok(()),
        400..=499 if !body.trim().is_empty() => Err(RelayError::Rejected(body.trim().to_string())),
        _ => Err(RelayError::Status(status)),
    }
}

#[cfg(feature = "http")]
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);

/// POST one request and wait for the answer.
#[cfg(feature = "http")]
pub fn post(request: &RelayRequest) -> Result<(), RelayError> {
    use reqwest::header::CONTENT_TYPE;

    let transport = |e: reqwest::Error| RelayError::Transport(e.to_string());
    let body = request.to_json()?;
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(transport)?;
    let response = client
        .post(&request.endpoint)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .map_err(transport)?;
    let status = response.status().as_u16();
    let text = response.text().unwrap_or_default();
    classify(status, &text)
}

/// Posts each request on its own worker thread.
#[cfg(feature = "http")]
#[derive(Default)]
pub struct ThreadRelay {
    on_reply: Option<std::sync::Arc<dyn Fn() + Send + Sync>>,
}

#[cfg(feature = "http")]
impl ThreadRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `wake` after every reply, e.g. to schedule a repaint.
    pub fn on_reply(mut self, wake: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_reply = Some(std::sync::Arc::new(wake));
        self
    }
}

#[cfg(feature = "http")]
impl EmailRelay for ThreadRelay {
    fn dispatch(&self, request: RelayRequest, reply: RelayReply) {
        let wake = self.on_reply.clone();
        let spawned = std::thread::Builder::new()
            .name("email-relay".into())
            .spawn(move || {
                reply.send(post(&request));
                if let Some(wake) = wake {
                    wake();
                }
            });
        // A failed spawn drops the reply; the controller reads that as a
        // transport failure.
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "could not start relay thread");
        }
    }
}

/// Posts through the browser's `fetch` on the local executor.
#[cfg(feature = "web")]
#[derive(Default)]
pub struct FetchRelay {
    on_reply: Option<std::rc::Rc<dyn Fn()>>,
}

#[cfg(feature = "web")]
impl FetchRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `wake` after every reply.
    pub fn on_reply(mut self, wake: impl Fn() + 'static) -> Self {
        self.on_reply = Some(std::rc::Rc::new(wake));
        self
    }
}

#[cfg(feature = "web")]
impl EmailRelay for FetchRelay {
    fn dispatch(&self, request: RelayRequest, reply: RelayReply) {
        let wake = self.on_reply.clone();
        wasm_bindgen_futures::spawn_local(async move {
            reply.send(fetch(&request).await);
            if let Some(wake) = wake {
                wake();
            }
        });
    }
}

/// POST one request with `window.fetch`.
#[cfg(feature = "web")]
pub async fn fetch(request: &RelayRequest) -> Result<(), RelayError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    let js = |e: JsValue| RelayError::Transport(format!("{e:?}"));
    let body = request.to_json()?;
    let window = web_sys::window().ok_or_else(|| RelayError::Transport("no window".into()))?;

    let headers = web_sys::Headers::new().map_err(js)?;
    headers.set("Content-Type", "application/json").map_err(js)?;
    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));
    let req = web_sys::Request::new_with_str_and_init(&request.endpoint, &init).map_err(js)?;

    let resp: web_sys::Response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(js)?
        .dyn_into()
        .map_err(js)?;
    let text = match resp.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };
    classify(resp.status(), &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_pass() {
        assert_eq!(classify(200, "OK"), Ok(()));
        assert_eq!(classify(204, ""), Ok(()));
    }

    #[test]
    fn client_errors_carry_the_reason() {
        assert_eq!(
            classify(400, "The Public Key is invalid"),
            Err(RelayError::Rejected("The Public Key is invalid".into()))
        );
        assert_eq!(classify(404, "  "), Err(RelayError::Status(404)));
        assert_eq!(classify(503, "busy"), Err(RelayError::Status(503)));
    }
}
