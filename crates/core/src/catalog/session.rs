//! Session establishment: launch, login, and the menu walk to the part
//! search view.

use tracing::{debug, info, warn};

use super::config::{CatalogConfig, Credentials};
use super::selectors;
use crate::driver::{BrowserDriver, PageDriver};
use crate::error::Error;
use peso_runtime::LaunchConfig;

/// The one authenticated browser session a run operates on.
///
/// Exclusively owned by the pipeline; closed unconditionally at run end.
/// Establishment either yields a session that is already on the search
/// view, or fails fatally with whatever was opened so far released again.
pub struct Session<P: PageDriver> {
    page: P,
    authenticated: bool,
}

impl<P: PageDriver> Session<P> {
    /// Launch, log in, and navigate to the part search view.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when the browser executable cannot be located
    ///   (checked before any network activity)
    /// - [`Error::Launch`] when the browser or its connection fails to come up
    /// - [`Error::Auth`] when the login does not settle within the login
    ///   timeout
    /// - [`Error::Navigation`] when the fixed menu sequence cannot be
    ///   completed
    ///
    /// On every failure after launch, the partially opened session is closed
    /// before the error is surfaced.
    pub async fn establish<B>(
        driver: &B,
        credentials: &Credentials,
        launch: &LaunchConfig,
        config: &CatalogConfig,
    ) -> Result<Self, Error>
    where
        B: BrowserDriver<Page = P>,
    {
        let page = driver.launch(launch).await.map_err(|e| {
            if e.is_browser_not_found() {
                Error::Config(e)
            } else {
                Error::Launch(e)
            }
        })?;

        let mut session = Session {
            page,
            authenticated: false,
        };

        let prepared = async {
            session.login(credentials, config).await?;
            session.navigate_to_search().await
        }
        .await;

        if let Err(error) = prepared {
            session.close().await;
            return Err(error);
        }
        Ok(session)
    }

    async fn login(&mut self, credentials: &Credentials, config: &CatalogConfig) -> Result<(), Error> {
        info!(target = "peso", url = %config.login_url, "logging into catalog");

        let step = |step: &'static str| {
            move |source: peso_runtime::Error| Error::Navigation { step, source }
        };

        self.page
            .goto(&config.login_url)
            .await
            .map_err(step("open login page"))?;
        self.page
            .fill(selectors::USERNAME_INPUT, &credentials.username)
            .await
            .map_err(step("fill username"))?;
        self.page
            .fill(selectors::PASSWORD_INPUT, &credentials.password)
            .await
            .map_err(step("fill password"))?;
        self.page
            .select_option(selectors::LOGIN_MODE_SELECT, &config.login_mode)
            .await
            .map_err(step("select login mode"))?;
        self.page
            .click(selectors::LOGIN_SUBMIT)
            .await
            .map_err(step("submit login form"))?;

        let timeout_ms = config.login_timeout.as_millis() as u64;
        let settled = tokio::time::timeout(
            config.login_timeout,
            self.page.wait_for_network_idle(config.login_timeout),
        )
        .await;
        match settled {
            Err(_) => Err(Error::Auth { timeout_ms }),
            Ok(Err(e)) if e.is_timeout() => Err(Error::Auth { timeout_ms }),
            Ok(Err(source)) => Err(Error::Navigation {
                step: "wait for login to settle",
                source,
            }),
            Ok(Ok(())) => {
                self.authenticated = true;
                info!(target = "peso", "login settled");
                Ok(())
            }
        }
    }

    /// Walk the fixed menu sequence to the part search view.
    ///
    /// The selection strategy (visible text plus ordinal position) lives in
    /// [`selectors`]; swapping it touches nothing outside this method.
    async fn navigate_to_search(&self) -> Result<(), Error> {
        let step = |step: &'static str| {
            move |source: peso_runtime::Error| Error::Navigation { step, source }
        };

        self.page
            .click_text(selectors::BRAND_MENU_TEXT)
            .await
            .map_err(step("open brand menu"))?;
        self.page
            .click_nth(selectors::BRAND_MENU_ENTRIES, selectors::BRAND_MENU_ENTRY_INDEX)
            .await
            .map_err(step("select brand entry"))?;
        self.page
            .hover_text(selectors::BRAND_MENU_TEXT)
            .await
            .map_err(step("reopen brand menu"))?;
        self.page
            .click(selectors::SEARCH_MENU_ITEM)
            .await
            .map_err(step("select part search entry"))?;

        debug!(target = "peso", "search view reached");
        Ok(())
    }

    /// The live page, for the query loop.
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Release the session. Best effort: a failing teardown is logged, not
    /// surfaced, so it can never mask the error that led here.
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            warn!(target = "peso", error = %e, "session teardown failed");
        }
    }
}
