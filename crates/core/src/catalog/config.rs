//! Run configuration for the catalog pipeline.
//!
//! Everything the core needs arrives through these values; no module reads
//! process-wide mutable state.

use std::fmt;
use std::time::Duration;

/// Login URL of the catalog, including the fixed query string the login
/// form expects.
pub const DEFAULT_LOGIN_URL: &str = "https://eper-ltm.parts.fiat.com/navi?EU=1&eperLogin=0&sso=false&COUNTRY=076&RMODE=DEFAULT&SEARCH_TYPE=codpart&KEY=HOME";

/// Login mode the form's type selector must be set to.
pub const DEFAULT_LOGIN_MODE: &str = "Fiat AUTO/MyUser/Link.e.entry";

/// Opaque credential pair for the catalog login form.
///
/// Passed by reference into session establishment only. `Debug` redacts
/// both fields so the pair can never leak through logging.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tunable behavior of one catalog run.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Where the login form lives.
    pub login_url: String,
    /// Value for the login form's mode selector.
    pub login_mode: String,
    /// Bound on the post-login settle wait. Exceeding it is fatal.
    pub login_timeout: Duration,
    /// Bound on the per-item settle wait. Exceeding it fails that item only.
    pub query_timeout: Duration,
    /// Fixed extra wait after the settle condition; the results view keeps
    /// rendering briefly after the network goes quiet.
    pub settle_delay: Duration,
    /// Pause between consecutive items.
    pub item_pace: Duration,
    /// How many trailing characters to drop from a part number before it is
    /// submitted. The catalog search expects identifiers shortened this way;
    /// kept explicit rather than baked into the engine.
    pub drop_trailing: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.to_string(),
            login_mode: DEFAULT_LOGIN_MODE.to_string(),
            login_timeout: Duration::from_secs(60),
            query_timeout: Duration::from_secs(50),
            settle_delay: Duration::from_secs(2),
            item_pace: Duration::from_secs(1),
            drop_trailing: 1,
        }
    }
}
