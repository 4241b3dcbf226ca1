//! Browser process lifecycle

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::error::{BrowserError, BrowserResult};

/// Chromium's URL for its own network error pages
const ERROR_PAGE_PREFIX: &str = "chrome-error://";

/// A launched Chromium together with its CDP event loop
///
/// Call [`BrowserSession::close`] when done; it shuts the process down and
/// joins the handler task.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chromium
    pub async fn launch(headless: bool) -> BrowserResult<Self> {
        let mut builder = BrowserConfig::builder().no_sandbox().window_size(1280, 720);
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {}", e);
                }
            }
        });

        info!("Browser launched (headless: {})", headless);
        Ok(Self { browser, handler })
    }

    /// Open a blank tab and navigate it to `url`
    pub async fn open(&self, url: &str) -> BrowserResult<Page> {
        let page = self.browser.new_page("about:blank").await?;

        let navigation_error = |reason: String| BrowserError::Navigation {
            url: url.to_string(),
            reason,
        };

        page.goto(url)
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        // Unreachable hosts still "load", as Chromium's own error page
        let landed = page.url().await?.unwrap_or_default();
        if landed.starts_with(ERROR_PAGE_PREFIX) {
            return Err(navigation_error(format!("browser showed error page {landed}")));
        }

        debug!("Navigated to {}", landed);
        Ok(page)
    }

    /// Write a full-page PNG screenshot of `page` to `path`
    pub async fn screenshot(&self, page: &Page, path: &Path) -> BrowserResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let params = ScreenshotParams::builder().full_page(true).build();
        let bytes = page
            .save_screenshot(params, path)
            .await
            .map_err(|e| BrowserError::Screenshot(e.to_string()))?;

        debug!("Wrote {} screenshot bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Shut the browser down and join the handler task
    pub async fn close(mut self) -> BrowserResult<()> {
        let closed = self.browser.close().await;
        if let Err(e) = &closed {
            warn!("Browser close failed, killing process: {}", e);
            if let Some(Err(e)) = self.browser.kill().await {
                warn!("Failed to kill browser process: {}", e);
            }
        }

        if let Err(e) = self.browser.wait().await {
            debug!("Waiting for browser exit failed: {}", e);
        }
        if let Err(e) = self.handler.await {
            debug!("CDP handler task ended abnormally: {}", e);
        }

        closed.map(|_| ()).map_err(BrowserError::from)
    }
}
