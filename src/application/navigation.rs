//! Navigation controller: resolves the active ang and turns toolbar events
//! into navigations.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::application::ports::{LAST_ANG_KEY, Storage};
use crate::domain::ang::AngNumber;

pub const VIEWER_PATH: &str = "/ang.html";
pub const ANG_PARAM: &str = "ang";
const FRAGMENT_PREFIX: &str = "ang=";

/// Toolbar controls the controller needs before it will navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Prev,
    Next,
    Go,
    Input,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::Prev, Control::Next, Control::Go, Control::Input];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    AlreadyBound,
    /// At least one control was absent; nothing was bound.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarEvent {
    Prev,
    Next,
    Go,
    /// Enter pressed inside the ang input.
    Enter,
}

impl ToolbarEvent {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            "go" => Some(Self::Go),
            "enter" => Some(Self::Enter),
            _ => None,
        }
    }
}

/// A full navigation to the viewer for `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub target: AngNumber,
}

impl Navigation {
    /// Location encoding the ang in both query and fragment form.
    pub fn location(&self) -> String {
        viewer_location(self.target)
    }
}

pub fn viewer_location(ang: AngNumber) -> String {
    format!("{VIEWER_PATH}?{ANG_PARAM}={ang}#{FRAGMENT_PREFIX}{ang}")
}

/// Read the ang encoded in `url`. A non-empty query value takes priority over
/// the fragment, even when it does not parse.
pub fn url_ang(url: &Url) -> Option<AngNumber> {
    let query = url
        .query_pairs()
        .find(|(key, _)| key == ANG_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());

    let raw = query.or_else(|| {
        url.fragment()
            .and_then(|fragment| fragment.strip_prefix(FRAGMENT_PREFIX))
            .map(str::to_string)
    })?;

    AngNumber::parse_strict(&raw)
}

pub struct NavigationController {
    storage: Arc<dyn Storage>,
    bound: HashSet<Control>,
}

impl NavigationController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            bound: HashSet::new(),
        }
    }

    /// URL first, then the stored last-viewed ang, then the first ang.
    pub fn resolve_startup(&self, url: Option<&Url>) -> AngNumber {
        if let Some(ang) = url.and_then(url_ang) {
            return ang;
        }

        match self.storage.get(LAST_ANG_KEY) {
            Ok(Some(stored)) => AngNumber::parse_strict(&stored).unwrap_or_default(),
            Ok(None) => AngNumber::default(),
            Err(err) => {
                debug!(error = %err, "failed to read last viewed ang");
                AngNumber::default()
            }
        }
    }

    /// Attach the toolbar. Repeat calls never register controls twice.
    pub fn bind(&mut self, available: &[Control]) -> BindOutcome {
        if !Control::ALL.iter().all(|control| available.contains(control)) {
            return BindOutcome::Missing;
        }
        if self.is_bound() {
            return BindOutcome::AlreadyBound;
        }
        self.bound.extend(Control::ALL);
        BindOutcome::Bound
    }

    pub fn is_bound(&self) -> bool {
        self.bound.len() == Control::ALL.len()
    }

    /// Translate a toolbar event. Returns `None` when the toolbar was never bound.
    ///
    /// `current` is the ang encoded in the page URL; without it the input
    /// value stands in for the current ang.
    pub fn handle(
        &self,
        event: ToolbarEvent,
        current: Option<AngNumber>,
        input: Option<&str>,
    ) -> Option<Navigation> {
        if !self.is_bound() {
            return None;
        }

        let current = current
            .map(|ang| f64::from(ang.get()))
            .unwrap_or_else(|| AngNumber::coerce_input(input));
        let first = f64::from(AngNumber::FIRST.get());
        let last = f64::from(AngNumber::LAST.get());

        let target = match event {
            ToolbarEvent::Prev => (current - 1.0).max(first),
            ToolbarEvent::Next => (current + 1.0).min(last),
            ToolbarEvent::Go | ToolbarEvent::Enter => AngNumber::coerce_input(input),
        };

        Some(self.navigate(target))
    }

    /// Clamp, persist, and produce the navigation.
    pub fn navigate(&self, target: f64) -> Navigation {
        let target = AngNumber::clamp_rounded(target);
        if let Err(err) = self.storage.set(LAST_ANG_KEY, &target.to_string()) {
            debug!(error = %err, "failed to persist navigation target");
        }
        info!(target_ang = %target, "navigating");
        Navigation { target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::StorageError;
    use crate::infra::storage::MemoryStorage;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("denied".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("denied".into()))
        }
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    fn storage_with(stored: Option<&str>) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::default());
        if let Some(value) = stored {
            storage.set(LAST_ANG_KEY, value).expect("seed storage");
        }
        storage
    }

    fn bound_controller(storage: Arc<MemoryStorage>) -> NavigationController {
        let mut controller = NavigationController::new(storage);
        assert_eq!(controller.bind(&Control::ALL), BindOutcome::Bound);
        controller
    }

    #[test]
    fn url_wins_over_stored_ang() {
        let controller = NavigationController::new(storage_with(Some("900")));
        let ang = controller.resolve_startup(Some(&url("http://localhost/ang.html?ang=5")));
        assert_eq!(ang.get(), 5);
    }

    #[test]
    fn query_takes_priority_over_fragment() {
        let page = url("http://localhost/ang.html?ang=5#ang=6");
        assert_eq!(url_ang(&page).map(AngNumber::get), Some(5));

        let fragment_only = url("http://localhost/ang.html#ang=6");
        assert_eq!(url_ang(&fragment_only).map(AngNumber::get), Some(6));

        let invalid_query = url("http://localhost/ang.html?ang=abc#ang=6");
        assert_eq!(url_ang(&invalid_query), None);

        let empty_query = url("http://localhost/ang.html?ang=#ang=6");
        assert_eq!(url_ang(&empty_query).map(AngNumber::get), Some(6));
    }

    #[test]
    fn out_of_range_url_falls_back_to_storage() {
        let controller = NavigationController::new(storage_with(Some("900")));
        let ang = controller.resolve_startup(Some(&url("http://localhost/ang.html?ang=2000")));
        assert_eq!(ang.get(), 900);
    }

    #[test]
    fn invalid_storage_falls_back_to_first_ang() {
        let controller = NavigationController::new(storage_with(Some("9000")));
        assert_eq!(controller.resolve_startup(None), AngNumber::FIRST);

        let controller = NavigationController::new(storage_with(None));
        assert_eq!(controller.resolve_startup(None), AngNumber::FIRST);

        let controller = NavigationController::new(Arc::new(BrokenStorage));
        assert_eq!(controller.resolve_startup(None), AngNumber::FIRST);
    }

    #[test]
    fn binding_is_idempotent() {
        let mut controller = NavigationController::new(storage_with(None));
        assert_eq!(controller.bind(&Control::ALL), BindOutcome::Bound);
        assert_eq!(controller.bind(&Control::ALL), BindOutcome::AlreadyBound);
        assert!(controller.is_bound());
    }

    #[test]
    fn missing_controls_make_navigation_a_no_op() {
        let storage = storage_with(None);
        let mut controller = NavigationController::new(storage.clone());
        assert_eq!(
            controller.bind(&[Control::Prev, Control::Next, Control::Go]),
            BindOutcome::Missing
        );

        assert_eq!(controller.handle(ToolbarEvent::Next, None, Some("4")), None);
        assert_eq!(storage.get(LAST_ANG_KEY).expect("storage read"), None);
    }

    #[test]
    fn jump_input_is_clamped() {
        let controller = bound_controller(storage_with(None));

        let nav = controller
            .handle(ToolbarEvent::Go, None, Some("1431"))
            .expect("navigation");
        assert_eq!(nav.target, AngNumber::LAST);

        let nav = controller
            .handle(ToolbarEvent::Enter, None, Some("0"))
            .expect("navigation");
        assert_eq!(nav.target, AngNumber::FIRST);

        let nav = controller
            .handle(ToolbarEvent::Go, None, Some(""))
            .expect("navigation");
        assert_eq!(nav.target, AngNumber::FIRST);
    }

    #[test]
    fn prev_and_next_step_from_url_ang() {
        let controller = bound_controller(storage_with(None));
        let current = AngNumber::new(10).ok();

        let prev = controller
            .handle(ToolbarEvent::Prev, current, Some("99"))
            .expect("navigation");
        assert_eq!(prev.target.get(), 9);

        let next = controller
            .handle(ToolbarEvent::Next, current, None)
            .expect("navigation");
        assert_eq!(next.target.get(), 11);

        let at_end = controller
            .handle(ToolbarEvent::Next, Some(AngNumber::LAST), None)
            .expect("navigation");
        assert_eq!(at_end.target, AngNumber::LAST);

        let at_start = controller
            .handle(ToolbarEvent::Prev, Some(AngNumber::FIRST), None)
            .expect("navigation");
        assert_eq!(at_start.target, AngNumber::FIRST);
    }

    #[test]
    fn prev_without_url_steps_from_input() {
        let controller = bound_controller(storage_with(None));
        let nav = controller
            .handle(ToolbarEvent::Prev, None, Some("5000"))
            .expect("navigation");
        assert_eq!(nav.target, AngNumber::LAST);
    }

    #[test]
    fn navigation_persists_and_encodes_location() {
        let storage = storage_with(Some("3"));
        let controller = bound_controller(storage.clone());

        let nav = controller
            .handle(ToolbarEvent::Go, None, Some("250"))
            .expect("navigation");

        assert_eq!(nav.location(), "/ang.html?ang=250#ang=250");
        assert_eq!(
            storage.get(LAST_ANG_KEY).expect("storage read").as_deref(),
            Some("250")
        );
    }

    #[test]
    fn storage_failure_does_not_block_navigation() {
        let mut controller = NavigationController::new(Arc::new(BrokenStorage));
        controller.bind(&Control::ALL);
        let nav = controller
            .handle(ToolbarEvent::Next, AngNumber::new(1).ok(), None)
            .expect("navigation");
        assert_eq!(nav.target.get(), 2);
    }

    #[test]
    fn toolbar_actions_parse() {
        assert_eq!(ToolbarEvent::parse("prev"), Some(ToolbarEvent::Prev));
        assert_eq!(ToolbarEvent::parse("enter"), Some(ToolbarEvent::Enter));
        assert_eq!(ToolbarEvent::parse("jump"), None);
    }
}
