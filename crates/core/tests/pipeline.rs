//! Pipeline tests against a scripted automation stub.
//!
//! The stub implements the capability surface the catalog core consumes and
//! replays canned results views per submitted search key, so every property
//! of the query loop is observable without a browser.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use peso::catalog::selectors;
use peso::{
    BrowserDriver, CatalogConfig, Credentials, Error, LaunchConfig, PageDriver, scrape_weights,
};
use peso_runtime::Error as DriverError;
use peso_runtime::Result as DriverResult;

/// What the stub serves for one submitted search key.
#[derive(Clone)]
enum SearchBehavior {
    /// Parallel label/value cell sequences.
    View {
        labels: Vec<&'static str>,
        values: Vec<&'static str>,
    },
    /// The settle condition is never reached.
    TimeoutOnSettle,
}

#[derive(Default)]
struct StubState {
    launches: AtomicUsize,
    closes: AtomicUsize,
    settle_waits: AtomicUsize,
    behaviors: Mutex<HashMap<String, SearchBehavior>>,
    submitted_key: Mutex<String>,
    fail_menu: bool,
    login_never_settles: bool,
}

#[derive(Clone)]
struct StubDriver {
    state: Arc<StubState>,
}

struct StubPage {
    state: Arc<StubState>,
}

impl StubDriver {
    fn new() -> Self {
        Self {
            state: Arc::new(StubState::default()),
        }
    }

    fn with_state(state: StubState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    fn behavior(self, search_key: &str, behavior: SearchBehavior) -> Self {
        self.state
            .behaviors
            .lock()
            .unwrap()
            .insert(search_key.to_string(), behavior);
        self
    }

    fn launches(&self) -> usize {
        self.state.launches.load(Ordering::SeqCst)
    }

    fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }
}

fn view(cells: &[(&'static str, &'static str)]) -> SearchBehavior {
    SearchBehavior::View {
        labels: cells.iter().map(|(label, _)| *label).collect(),
        values: cells.iter().map(|(_, value)| *value).collect(),
    }
}

#[async_trait]
impl BrowserDriver for StubDriver {
    type Page = StubPage;

    async fn launch(&self, _config: &LaunchConfig) -> DriverResult<StubPage> {
        self.state.launches.fetch_add(1, Ordering::SeqCst);
        Ok(StubPage {
            state: Arc::clone(&self.state),
        })
    }
}

impl StubPage {
    fn current_behavior(&self) -> Option<SearchBehavior> {
        let key = self.state.submitted_key.lock().unwrap().clone();
        self.state.behaviors.lock().unwrap().get(&key).cloned()
    }

    fn cells(&self, selector: &str) -> Vec<&'static str> {
        match self.current_behavior() {
            Some(SearchBehavior::View { labels, values }) => {
                if selector == selectors::DETAIL_LABEL_CELLS {
                    labels
                } else {
                    values
                }
            }
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl PageDriver for StubPage {
    async fn goto(&self, _url: &str) -> DriverResult<()> {
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> DriverResult<()> {
        if selector == selectors::SEARCH_INPUT {
            *self.state.submitted_key.lock().unwrap() = value.to_string();
        }
        Ok(())
    }

    async fn click(&self, _selector: &str) -> DriverResult<()> {
        Ok(())
    }

    async fn click_nth(&self, _selector: &str, _index: usize) -> DriverResult<()> {
        Ok(())
    }

    async fn click_text(&self, text: &str) -> DriverResult<()> {
        if self.state.fail_menu {
            return Err(DriverError::ElementNotFound(format!("text={text}")));
        }
        Ok(())
    }

    async fn hover_text(&self, _text: &str) -> DriverResult<()> {
        Ok(())
    }

    async fn select_option(&self, _selector: &str, _value: &str) -> DriverResult<()> {
        Ok(())
    }

    async fn press(&self, _key: &str) -> DriverResult<()> {
        Ok(())
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> DriverResult<()> {
        // The first settle wait belongs to the login flow.
        if self.state.settle_waits.fetch_add(1, Ordering::SeqCst) == 0 {
            if self.state.login_never_settles {
                return Err(DriverError::Timeout(format!(
                    "network idle not reached within {}ms",
                    timeout.as_millis()
                )));
            }
            return Ok(());
        }

        match self.current_behavior() {
            Some(SearchBehavior::TimeoutOnSettle) => Err(DriverError::Timeout(format!(
                "network idle not reached within {}ms",
                timeout.as_millis()
            ))),
            _ => Ok(()),
        }
    }

    async fn count(&self, selector: &str) -> DriverResult<usize> {
        Ok(self.cells(selector).len())
    }

    async fn inner_text(&self, selector: &str, index: usize) -> DriverResult<String> {
        self.cells(selector)
            .get(index)
            .map(|text| text.to_string())
            .ok_or_else(|| DriverError::ElementNotFound(format!("{selector} (index {index})")))
    }

    async fn close(&self) -> DriverResult<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn fast_config() -> CatalogConfig {
    CatalogConfig {
        login_timeout: Duration::from_millis(200),
        query_timeout: Duration::from_millis(200),
        settle_delay: Duration::ZERO,
        item_pace: Duration::ZERO,
        ..CatalogConfig::default()
    }
}

fn credentials() -> Credentials {
    Credentials::new("user", "secret")
}

fn part_list(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

#[tokio::test]
async fn empty_input_returns_empty_set_without_launching() {
    let driver = StubDriver::new();

    let results = scrape_weights(
        &driver,
        &credentials(),
        &[],
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert!(results.is_empty());
    assert_eq!(driver.launches(), 0, "no session may be established");
}

#[tokio::test]
async fn end_to_end_resolves_weight_and_omits_unmatched_item() {
    let driver = StubDriver::new()
        .behavior(
            "7799484",
            view(&[("Descrição:", "ALAVANCA"), ("Peso em gramas:", "3400,00")]),
        )
        .behavior("3434342", view(&[("Outro campo:", "n/a")]));

    let results = scrape_weights(
        &driver,
        &credentials(),
        &part_list(&["77994840", "34343424"]),
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.get("77994840"), Some(3.4));
    assert!(!results.contains("34343424"));
    assert_eq!(driver.launches(), 1);
    assert_eq!(driver.closes(), 1, "session must be closed exactly once");
}

#[tokio::test]
async fn item_without_weight_label_is_not_found_not_error() {
    let driver = StubDriver::new().behavior("3434342", view(&[("Outro campo:", "123")]));

    let results = scrape_weights(
        &driver,
        &credentials(),
        &part_list(&["34343424"]),
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert!(results.is_empty());
    assert_eq!(driver.closes(), 1);
}

#[tokio::test]
async fn timeout_on_one_item_does_not_abort_the_batch() {
    let driver = StubDriver::new()
        .behavior("7799484", SearchBehavior::TimeoutOnSettle)
        .behavior("1111111", view(&[("Peso em gramas:", "250,0")]));

    let results = scrape_weights(
        &driver,
        &credentials(),
        &part_list(&["77994840", "11111111"]),
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert!(!results.contains("77994840"));
    assert_eq!(results.get("11111111"), Some(0.25));
}

#[tokio::test]
async fn mismatched_cell_sequences_fail_only_that_item() {
    let driver = StubDriver::new()
        .behavior(
            "7799484",
            SearchBehavior::View {
                labels: vec!["Peso em gramas:", "Descrição:"],
                values: vec!["3400,00"],
            },
        )
        .behavior("1111111", view(&[("Peso em gramas:", "1500,0")]));

    let results = scrape_weights(
        &driver,
        &credentials(),
        &part_list(&["77994840", "11111111"]),
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.get("11111111"), Some(1.5));
}

#[tokio::test]
async fn unparsable_weight_value_fails_only_that_item() {
    let driver = StubDriver::new()
        .behavior("7799484", view(&[("Peso em gramas:", "abc")]))
        .behavior("1111111", view(&[("Peso em gramas:", "1500,0")]));

    let results = scrape_weights(
        &driver,
        &credentials(),
        &part_list(&["77994840", "11111111"]),
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert!(!results.contains("77994840"));
}

#[tokio::test]
async fn keys_come_from_input_and_never_duplicate() {
    let driver = StubDriver::new().behavior("7799484", view(&[("Peso em gramas:", "3400,00")]));

    let input = part_list(&["77994840", "77994840"]);
    let results = scrape_weights(
        &driver,
        &credentials(),
        &input,
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert!(results.len() <= input.len());
    assert_eq!(results.len(), 1);
    for (key, _) in results.iter() {
        assert!(input.iter().any(|part| part == key));
    }
}

#[tokio::test]
async fn identical_runs_produce_identical_result_sets() {
    let scripted = |driver: StubDriver| {
        driver
            .behavior(
                "7799484",
                view(&[("Descrição:", "ALAVANCA"), ("Peso em gramas:", "3400,00")]),
            )
            .behavior("3434342", view(&[("Outro campo:", "n/a")]))
    };
    let input = part_list(&["77994840", "34343424"]);

    let first = scrape_weights(
        &scripted(StubDriver::new()),
        &credentials(),
        &input,
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();
    let second = scrape_weights(
        &scripted(StubDriver::new()),
        &credentials(),
        &input,
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn login_timeout_is_fatal_auth_error_with_cleanup() {
    let driver = StubDriver::with_state(StubState {
        login_never_settles: true,
        ..StubState::default()
    });

    let error = scrape_weights(
        &driver,
        &credentials(),
        &part_list(&["77994840"]),
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, Error::Auth { .. }), "got {error:?}");
    assert_eq!(driver.closes(), 1, "partially opened session must be closed");
}

#[tokio::test]
async fn menu_walk_failure_is_fatal_navigation_error_with_cleanup() {
    let driver = StubDriver::with_state(StubState {
        fail_menu: true,
        ..StubState::default()
    });

    let error = scrape_weights(
        &driver,
        &credentials(),
        &part_list(&["77994840"]),
        &LaunchConfig::default(),
        &fast_config(),
    )
    .await
    .unwrap_err();

    match error {
        Error::Navigation { step, .. } => assert_eq!(step, "open brand menu"),
        other => panic!("expected Navigation error, got {other:?}"),
    }
    assert_eq!(driver.closes(), 1, "partially opened session must be closed");
}
