use std::path::Path;

use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::handler::Handler;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

use foodspend_core::ScraperConfig;

use crate::error::ScraperError;

const WINDOW_WIDTH: u32 = 1440;
const WINDOW_HEIGHT: u32 = 960;

/// A browser connection plus the page the run drives.
///
/// `owned` records whether this process launched the browser. Only owned
/// browsers are closed on [`release`](Self::release); an attached browser is
/// supervised elsewhere and is left running.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    owned: bool,
}

impl BrowserSession {
    /// Attaches to `config.cdp_url` when set, otherwise launches a headed
    /// browser on the persistent profile in `config.profile_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Attach`] or [`ScraperError::Launch`] when the
    /// browser cannot be reached or started, and [`ScraperError::Browser`]
    /// if no page can be obtained afterwards.
    pub async fn acquire(config: &ScraperConfig) -> Result<Self, ScraperError> {
        match &config.cdp_url {
            Some(endpoint) => Self::attach(endpoint).await,
            None => Self::launch(&config.profile_dir).await,
        }
    }

    async fn attach(endpoint: &str) -> Result<Self, ScraperError> {
        tracing::info!(endpoint, "attaching to running browser");

        let (mut browser, handler) =
            Browser::connect(endpoint)
                .await
                .map_err(|source| ScraperError::Attach {
                    endpoint: endpoint.to_owned(),
                    source,
                })?;
        let handler = spawn_handler(handler);

        // Targets that existed before the connection are not tracked until
        // they are fetched explicitly.
        browser.fetch_targets().await?;
        let page = first_or_new_page(&browser).await?;

        Ok(Self {
            browser,
            handler,
            page,
            owned: false,
        })
    }

    async fn launch(profile_dir: &Path) -> Result<Self, ScraperError> {
        tracing::info!(profile_dir = %profile_dir.display(), "launching browser");

        let config = BrowserConfig::builder()
            .with_head()
            .user_data_dir(profile_dir)
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .viewport(Viewport {
                width: WINDOW_WIDTH,
                height: WINDOW_HEIGHT,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .build()
            .map_err(|reason| ScraperError::Launch {
                profile_dir: profile_dir.to_path_buf(),
                reason,
            })?;

        let (mut browser, handler) =
            Browser::launch(config)
                .await
                .map_err(|e| ScraperError::Launch {
                    profile_dir: profile_dir.to_path_buf(),
                    reason: e.to_string(),
                })?;
        let handler = spawn_handler(handler);

        // A persistent profile opens its own startup tab; drive that one.
        browser.fetch_targets().await?;
        let page = first_or_new_page(&browser).await?;

        Ok(Self {
            browser,
            handler,
            page,
            owned: true,
        })
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Navigates the session page to `url` and waits for the load to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if navigation fails.
    pub async fn navigate(&self, url: &str) -> Result<(), ScraperError> {
        tracing::debug!(url, "navigating");
        self.page.goto(url).await?;
        Ok(())
    }

    /// Ends the session. Owned browsers are closed and awaited; attached
    /// browsers are only disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if an owned browser fails to close.
    /// The CDP handler task is stopped either way.
    pub async fn release(mut self) -> Result<(), ScraperError> {
        let result = if self.owned {
            self.close_owned().await
        } else {
            tracing::debug!("leaving attached browser running");
            Ok(())
        };
        self.handler.abort();
        result
    }

    async fn close_owned(&mut self) -> Result<(), ScraperError> {
        tracing::debug!("closing launched browser");
        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "browser process did not exit cleanly");
        }
        Ok(())
    }
}

/// Reuses the first open page, opening a blank one when none exists.
async fn first_or_new_page(browser: &Browser) -> Result<Page, ScraperError> {
    if let Some(page) = browser.pages().await?.into_iter().next() {
        return Ok(page);
    }
    tracing::debug!("no open page; opening one");
    Ok(browser.new_page("about:blank").await?)
}

/// Drives the CDP event stream in the background. Individual event errors are
/// not fatal to the connection, so the loop only ends when the stream does.
fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!(error = %e, "cdp handler error");
            }
        }
    })
}
