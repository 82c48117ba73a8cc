//! Chromium driver using chromiumoxide
//!
//! Each page lives in its own browser context, so cookies and local storage
//! (where the storefront keeps the cart) never leak between scenarios. The
//! context is disposed when the page closes. Locale and time zone overrides
//! are applied to every page.
//!
//! Reads go through small JavaScript snippets that return JSON; clicks use
//! real mouse events. Actions wait for their element to appear, up to the
//! action timeout.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetLocaleOverrideParams, SetTimezoneOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::{Page as CdpPage, ScreenshotParams};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BrowserSettings;
use crate::error::{E2eError, E2eResult};
use crate::page::{Driver, Page};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Headless (or headed) Chrome
pub struct ChromiumDriver {
    browser: Arc<Mutex<Browser>>,
    handler: JoinHandle<()>,
    action_timeout: Duration,
    locale: Option<String>,
    timezone: Option<String>,
}

impl ChromiumDriver {
    /// Launch Chrome with the given settings
    pub async fn launch(settings: &BrowserSettings, action_timeout: Duration) -> E2eResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(settings.viewport.width, settings.viewport.height)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(locale) = &settings.locale {
            builder = builder.arg(format!("--lang={}", locale));
        }
        if let Some(path) = &settings.executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder
            .build()
            .map_err(|e| E2eError::Browser(format!("failed to build browser config: {}", e)))?;

        info!(
            "Launching Chromium ({}, {}x{})",
            if settings.headless { "headless" } else { "headed" },
            settings.viewport.width,
            settings.viewport.height
        );

        let (browser, mut handler) = Browser::launch(config).await?;

        // The CDP connection only makes progress while its handler is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            handler,
            action_timeout,
            locale: settings.locale.clone(),
            timezone: settings.timezone.clone(),
        })
    }

    /// Open a tab in a fresh browser context with the emulation overrides applied
    async fn open_page(&self) -> E2eResult<ChromiumPage> {
        let browser = self.browser.lock().await;

        let context_id = browser
            .execute(CreateBrowserContextParams::default())
            .await?
            .result
            .browser_context_id;
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(E2eError::Browser)?;
        let page = browser.new_page(target).await?;
        drop(browser);

        if let Some(locale) = &self.locale {
            page.execute(SetLocaleOverrideParams {
                locale: Some(locale.clone()),
            })
            .await?;
        }
        if let Some(timezone) = &self.timezone {
            page.execute(SetTimezoneOverrideParams::new(timezone.clone()))
                .await?;
        }

        Ok(ChromiumPage {
            page,
            browser: self.browser.clone(),
            context_id,
            action_timeout: self.action_timeout,
        })
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn new_page(&self) -> E2eResult<Arc<dyn Page>> {
        Ok(Arc::new(self.open_page().await?))
    }

    async fn shutdown(&self) -> E2eResult<()> {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        let _ = browser.wait().await;
        self.handler.abort();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// A Chrome tab and the browser context it owns
pub struct ChromiumPage {
    page: CdpPage,
    browser: Arc<Mutex<Browser>>,
    context_id: BrowserContextId,
    action_timeout: Duration,
}

/// Embed a Rust string as a JavaScript string literal
fn js_str(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Fail with [`E2eError::Timeout`] if `fut` does not finish within `limit`
async fn within<T, F>(limit: Duration, what: &str, fut: F) -> E2eResult<T>
where
    F: Future<Output = E2eResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| E2eError::Timeout(format!("{} ({} ms)", what, limit.as_millis())))?
}

/// Repeat `attempt` while it reports a missing element
async fn until_present<T, F, Fut>(mut attempt: F) -> E2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<T>>,
{
    loop {
        match attempt().await {
            Err(E2eError::ElementNotFound(selector)) => {
                debug!("waiting for {}", selector);
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            outcome => return outcome,
        }
    }
}

impl ChromiumPage {
    async fn bounded<T, F>(&self, what: &str, fut: F) -> E2eResult<T>
    where
        F: Future<Output = E2eResult<T>>,
    {
        within(self.action_timeout, what, fut).await
    }

    /// Evaluate a function body in the page and decode its JSON result
    async fn eval_json<T: DeserializeOwned>(&self, body: &str) -> E2eResult<T> {
        let script = format!("JSON.stringify((() => {{ {} }})() ?? null)", body);
        let raw: String = self
            .page
            .evaluate(script.as_str())
            .await?
            .into_value()
            .map_err(|e| E2eError::Browser(format!("unexpected script result: {}", e)))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Run `body` with `el` bound to the first match, failing if there is none
    async fn with_element<T: DeserializeOwned>(&self, selector: &str, body: &str) -> E2eResult<T> {
        let script = format!(
            "const el = document.querySelector({sel}); if (!el) return {{ found: false }}; \
             return {{ found: true, value: (() => {{ {body} }})() ?? null }};",
            sel = js_str(selector),
            body = body,
        );
        let result: ElementResult<T> = self.eval_json(&script).await?;
        if !result.found {
            return Err(E2eError::ElementNotFound(selector.to_string()));
        }
        result
            .value
            .ok_or_else(|| E2eError::Browser(format!("no result from {}", selector)))
    }

    async fn ready_state(&self) -> E2eResult<String> {
        self.eval_json("return document.readyState;").await
    }
}

#[derive(serde::Deserialize)]
struct ElementResult<T> {
    found: bool,
    value: Option<T>,
}

#[async_trait]
impl Page for ChromiumPage {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        self.bounded(&format!("navigation to {}", url), async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok(())
        })
        .await
    }

    async fn reload(&self) -> E2eResult<()> {
        debug!("reload");
        self.bounded("reload", async {
            self.page.reload().await?;
            Ok(())
        })
        .await
    }

    async fn wait_for_load_state(&self) -> E2eResult<()> {
        self.bounded("load state", async {
            while self.ready_state().await? != "complete" {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            Ok(())
        })
        .await
    }

    async fn url(&self) -> E2eResult<String> {
        self.bounded("page URL", async {
            Ok(self.page.url().await?.unwrap_or_default())
        })
        .await
    }

    async fn title(&self) -> E2eResult<String> {
        self.bounded("page title", async {
            Ok(self.page.get_title().await?.unwrap_or_default())
        })
        .await
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        debug!("fill {}", selector);
        // Go through the native setter so React sees the change
        let body = format!(
            "const proto = Object.getPrototypeOf(el); \
             Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {value}); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true;",
            value = js_str(value),
        );
        let body = body.as_str();
        let _: bool = self
            .bounded(
                &format!("fill {}", selector),
                until_present(|| self.with_element(selector, body)),
            )
            .await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> E2eResult<()> {
        debug!("click {}", selector);
        self.bounded(
            &format!("click {}", selector),
            until_present(|| async move {
                let element = self
                    .page
                    .find_element(selector)
                    .await
                    .map_err(|_| E2eError::ElementNotFound(selector.to_string()))?;
                element.click().await?;
                Ok(())
            }),
        )
        .await
    }

    async fn click_nth(&self, selector: &str, index: usize) -> E2eResult<()> {
        debug!("click {} #{}", selector, index);
        self.bounded(
            &format!("click {} #{}", selector, index),
            until_present(|| async move {
                let elements = self
                    .page
                    .find_elements(selector)
                    .await
                    .map_err(|_| E2eError::ElementNotFound(selector.to_string()))?;
                let element = elements.get(index).ok_or_else(|| {
                    E2eError::ElementNotFound(format!("{} #{}", selector, index))
                })?;
                element.click().await?;
                Ok(())
            }),
        )
        .await
    }

    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<()> {
        debug!("select {} = {}", selector, value);
        let body = format!(
            "const wanted = {value}; \
             if (!Array.from(el.options).some(o => o.value === wanted)) return false; \
             Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value') \
               .set.call(el, wanted); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true;",
            value = js_str(value),
        );
        let body = body.as_str();
        self.bounded(
            &format!("select {}", selector),
            until_present(|| async move {
                let selected: bool = self.with_element(selector, body).await?;
                if !selected {
                    return Err(E2eError::ElementNotFound(format!(
                        "option '{}' in {}",
                        value, selector
                    )));
                }
                Ok(())
            }),
        )
        .await
    }

    async fn text_content(&self, selector: &str) -> E2eResult<Option<String>> {
        let body = format!(
            "const el = document.querySelector({}); return el ? el.textContent : null;",
            js_str(selector)
        );
        self.bounded(&format!("text of {}", selector), self.eval_json(&body))
            .await
    }

    async fn input_value(&self, selector: &str) -> E2eResult<Option<String>> {
        let body = format!(
            "const el = document.querySelector({}); return el ? el.value : null;",
            js_str(selector)
        );
        self.bounded(&format!("value of {}", selector), self.eval_json(&body))
            .await
    }

    async fn attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>> {
        let body = format!(
            "const el = document.querySelector({}); return el ? el.getAttribute({}) : null;",
            js_str(selector),
            js_str(name)
        );
        self.bounded(&format!("attribute of {}", selector), self.eval_json(&body))
            .await
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        let body = format!(
            "const el = document.querySelector({}); if (!el) return false; \
             const style = getComputedStyle(el); \
             if (style.visibility === 'hidden' || style.display === 'none') return false; \
             if (el.closest('[aria-hidden=\"true\"]')) return false; \
             const rect = el.getBoundingClientRect(); \
             return rect.width > 0 && rect.height > 0;",
            js_str(selector)
        );
        self.bounded(&format!("visibility of {}", selector), self.eval_json(&body))
            .await
    }

    async fn count(&self, selector: &str) -> E2eResult<usize> {
        let body = format!(
            "return document.querySelectorAll({}).length;",
            js_str(selector)
        );
        self.bounded(&format!("count of {}", selector), self.eval_json(&body))
            .await
    }

    async fn child_texts(
        &self,
        item_selector: &str,
        child_selector: &str,
    ) -> E2eResult<Vec<Option<String>>> {
        let body = format!(
            "return Array.from(document.querySelectorAll({item})).map(item => {{ \
               const child = item.querySelector({child}); \
               return child ? child.textContent : null; \
             }});",
            item = js_str(item_selector),
            child = js_str(child_selector),
        );
        self.bounded(&format!("{} in {}", child_selector, item_selector), self.eval_json(&body))
            .await
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        self.bounded("screenshot", async {
            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build();
            Ok(self.page.screenshot(params).await?)
        })
        .await
    }

    async fn close(&self) -> E2eResult<()> {
        self.page.clone().close().await?;
        self.browser
            .lock()
            .await
            .execute(DisposeBrowserContextParams::new(self.context_id.clone()))
            .await?;
        Ok(())
    }
}
