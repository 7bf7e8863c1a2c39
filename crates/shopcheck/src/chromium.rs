//! Chromium driver over the DevTools protocol.
//!
//! Locators are compiled to JavaScript (see [`Locator::to_js_resolve`]) and
//! evaluated in the page on every call. Scripts return their payload wrapped
//! in a JSON string so that `null` results survive the CDP round-trip.

use crate::config::BrowserSettings;
use crate::driver::{DriverFactory, Screenshot, SharedDriver, ShopDriver};
use crate::locator::{js_string, Locator, JS_PRELUDE};
use crate::result::{ShopError, ShopResult};
use crate::wait::{self, LoadState, WaitOptions};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, GetNavigationHistoryParams, NavigateToHistoryEntryParams,
    ReloadParams,
};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
struct ElementState {
    exists: bool,
    visible: bool,
    checked: bool,
    text: Option<String>,
    value: Option<String>,
}

/// Driver bound to one Chromium page
#[derive(Debug, Clone)]
pub struct ChromiumDriver {
    page: Page,
}

impl ChromiumDriver {
    /// Wrap an open page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> ShopResult<T> {
        let wrapped = format!("JSON.stringify({{ v: ({script}) }})");
        let raw: String = self
            .page
            .evaluate(wrapped)
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?
            .into_value()
            .map_err(|e| ShopError::driver(e.to_string()))?;

        #[derive(Deserialize)]
        struct Wrapper<T> {
            v: T,
        }
        let wrapper: Wrapper<T> = serde_json::from_str(&raw)?;
        Ok(wrapper.v)
    }

    async fn state(&self, locator: &Locator) -> ShopResult<ElementState> {
        self.eval(&locator.state_script()).await
    }

    async fn act(&self, locator: &Locator, action: &str) -> ShopResult<()> {
        let status: String = self.eval(&locator.action_script(action)).await?;
        match status.as_str() {
            "ok" => Ok(()),
            "missing" => Err(ShopError::not_interactable(locator, "no element matches")),
            "hidden" => Err(ShopError::not_interactable(locator, "element is hidden")),
            "disabled" => Err(ShopError::not_interactable(locator, "element is disabled")),
            other => Err(ShopError::not_interactable(locator, other)),
        }
    }

    async fn url_or_blank(&self) -> String {
        self.current_url().await.unwrap_or_default()
    }

    async fn dispatch_key(&self, kind: DispatchKeyEventType, key: &str) -> ShopResult<()> {
        let (code, vk, text) = key_info(key);
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind.clone())
            .key(key)
            .code(code)
            .windows_virtual_key_code(vk);
        if matches!(kind, DispatchKeyEventType::KeyDown) {
            if let Some(text) = text {
                builder = builder.text(text);
            }
        }
        let params = builder.build().map_err(ShopError::driver)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?;
        Ok(())
    }
}

/// DOM `code`, Windows virtual key code and typed text for a key name
fn key_info(key: &str) -> (String, i64, Option<String>) {
    match key {
        "Enter" => ("Enter".to_string(), 13, Some("\r".to_string())),
        "Tab" => ("Tab".to_string(), 9, None),
        "Escape" => ("Escape".to_string(), 27, None),
        "Backspace" => ("Backspace".to_string(), 8, None),
        "ArrowDown" => ("ArrowDown".to_string(), 40, None),
        "ArrowUp" => ("ArrowUp".to_string(), 38, None),
        other => {
            let upper = other.to_ascii_uppercase();
            let vk = upper.bytes().next().map_or(0, i64::from);
            (format!("Key{upper}"), vk, Some(other.to_string()))
        }
    }
}

#[async_trait]
impl ShopDriver for ChromiumDriver {
    async fn navigate(&self, url: &str, timeout: Duration) -> ShopResult<()> {
        let start = Instant::now();
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Err(_) => {
                return Err(ShopError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            Ok(Err(e)) => {
                return Err(ShopError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Ok(Ok(_)) => {}
        }
        let remaining = timeout.saturating_sub(start.elapsed());
        self.wait_for_load_state(LoadState::DomContentLoaded, remaining)
            .await
            .map_err(|_| ShopError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> ShopResult<()> {
        let options = WaitOptions::new()
            .with_timeout(timeout)
            .with_poll_interval(POLL);
        let script = state.ready_script();
        let result =
            wait::wait_for(&options, state.event_name(), move || self.eval::<bool>(script)).await;
        match result {
            Ok(_) => Ok(()),
            Err(_) => Err(ShopError::NavigationTimeout {
                url: self.url_or_blank().await,
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn count(&self, locator: &Locator) -> ShopResult<usize> {
        self.eval(&locator.count_script()).await
    }

    async fn is_visible(&self, locator: &Locator) -> ShopResult<bool> {
        let state = self.state(locator).await?;
        Ok(state.exists && state.visible)
    }

    async fn text_content(&self, locator: &Locator) -> ShopResult<Option<String>> {
        let state = self.state(locator).await?;
        Ok(if state.exists {
            Some(state.text.unwrap_or_default())
        } else {
            None
        })
    }

    async fn input_value(&self, locator: &Locator) -> ShopResult<Option<String>> {
        let state = self.state(locator).await?;
        Ok(if state.exists {
            Some(state.value.unwrap_or_default())
        } else {
            None
        })
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> ShopResult<Option<String>> {
        self.eval(&locator.attribute_script(name)).await
    }

    async fn is_checked(&self, locator: &Locator) -> ShopResult<bool> {
        Ok(self.state(locator).await?.checked)
    }

    async fn click(&self, locator: &Locator) -> ShopResult<()> {
        tracing::trace!(%locator, "click");
        self.act(locator, "el.focus(); el.click();").await
    }

    async fn fill(&self, locator: &Locator, value: &str) -> ShopResult<()> {
        let value = js_string(value);
        let action = format!(
            "el.focus(); \
             const proto = Object.getPrototypeOf(el); \
             const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
             if (desc && desc.set) {{ desc.set.call(el, {value}); }} else {{ el.value = {value}; }} \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
        );
        self.act(locator, &action).await
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> ShopResult<()> {
        self.act(locator, &format!("if (!!el.checked !== {checked}) el.click();"))
            .await
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> ShopResult<()> {
        let value = js_string(value);
        let action = format!(
            "const opt = Array.from(el.options || []).find(o => \
             o.value === {value} || o.label === {value} || o.textContent.trim() === {value}); \
             if (!opt) return 'missing'; \
             el.value = opt.value; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
        );
        self.act(locator, &action).await
    }

    async fn scroll_into_view(&self, locator: &Locator) -> ShopResult<()> {
        let script = format!(
            "(() => {{ {JS_PRELUDE} const el = ({})[0]; if (!el) return false; \
             el.scrollIntoView({{ block: 'center', inline: 'center' }}); return true; }})()",
            locator.to_js_resolve()
        );
        if self.eval::<bool>(&script).await? {
            Ok(())
        } else {
            Err(ShopError::not_interactable(locator, "no element matches"))
        }
    }

    async fn press_key(&self, key: &str) -> ShopResult<()> {
        self.dispatch_key(DispatchKeyEventType::KeyDown, key).await?;
        self.dispatch_key(DispatchKeyEventType::KeyUp, key).await
    }

    async fn screenshot(&self) -> ShopResult<Screenshot> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        let data = self
            .page
            .screenshot(params)
            .await
            .map_err(|e| ShopError::Screenshot {
                message: e.to_string(),
            })?;
        Ok(Screenshot::new(data))
    }

    async fn current_url(&self) -> ShopResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn reload(&self, timeout: Duration) -> ShopResult<()> {
        self.page
            .execute(ReloadParams::default())
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?;
        self.wait_for_load_state(LoadState::DomContentLoaded, timeout)
            .await
    }

    async fn go_back(&self, timeout: Duration) -> ShopResult<()> {
        let history = self
            .page
            .execute(GetNavigationHistoryParams::default())
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?;
        let current = history.result.current_index;
        if current <= 0 {
            return Ok(());
        }
        let Some(entry) = history.result.entries.get((current - 1) as usize) else {
            return Ok(());
        };
        self.page
            .execute(NavigateToHistoryEntryParams::new(entry.id))
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?;
        self.wait_for_load_state(LoadState::DomContentLoaded, timeout)
            .await
    }

    async fn clear_cookies(&self) -> ShopResult<()> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) -> ShopResult<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| ShopError::driver(e.to_string()))
    }
}

/// Launches one Chromium and hands out a page per scenario attempt
#[derive(Debug)]
pub struct ChromiumLauncher {
    browser: Mutex<Option<Browser>>,
    handler: JoinHandle<()>,
}

impl ChromiumLauncher {
    /// Launch the browser
    pub async fn launch(settings: &BrowserSettings) -> ShopResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height);
        if !settings.headless {
            builder = builder.with_head();
        }
        if !settings.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = settings.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|message| ShopError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| ShopError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!(
            headless = settings.headless,
            width = settings.viewport_width,
            height = settings.viewport_height,
            "chromium launched"
        );

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler,
        })
    }
}

#[async_trait]
impl DriverFactory for ChromiumLauncher {
    async fn open_page(&self) -> ShopResult<SharedDriver> {
        let guard = self.browser.lock().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| ShopError::driver("browser already closed"))?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ShopError::driver(e.to_string()))?;
        Ok(Arc::new(ChromiumDriver::new(page)))
    }

    async fn shutdown(&self) -> ShopResult<()> {
        let browser = self.browser.lock().await.take();
        if let Some(mut browser) = browser {
            browser
                .close()
                .await
                .map_err(|e| ShopError::driver(e.to_string()))?;
            let _ = browser.wait().await;
        }
        self.handler.abort();
        Ok(())
    }
}
