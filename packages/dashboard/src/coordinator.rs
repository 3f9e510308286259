//! Single owner of the current filter selection.
//!
//! Every mutation goes through [`FilterCoordinator`], bumps a revision
//! number, and is pushed to every consumer before the mutating call
//! returns: registered [`FilterObserver`]s are called synchronously, and
//! async consumers see the same [`FilterSnapshot`] on a `watch` channel.

use std::collections::BTreeSet;

use invest_map_analytics_models::FilterState;
use invest_map_investment_models::{CapitalStatus, Subsector};
use tokio::sync::watch;

/// How a [`FilterPatch`] treats one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the field as it is.
    #[default]
    Unchanged,
    /// Replace the field.
    Set(T),
    /// Unset the field.
    Clear,
}

impl<T> FieldUpdate<T> {
    fn apply(self, field: &mut Option<T>) {
        match self {
            Self::Unchanged => {}
            Self::Set(value) => *field = Some(value),
            Self::Clear => *field = None,
        }
    }

    const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// A partial filter update. Fields left as [`FieldUpdate::Unchanged`] keep
/// their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    /// Fiscal year.
    pub year: FieldUpdate<i32>,
    /// Subsector.
    pub subsector: FieldUpdate<Subsector>,
    /// City or regency.
    pub city: FieldUpdate<String>,
    /// Capital status.
    pub capital_status: FieldUpdate<CapitalStatus>,
    /// Free-text search.
    pub search: FieldUpdate<String>,
}

impl FilterPatch {
    /// A patch that sets only the year.
    #[must_use]
    pub fn year(year: i32) -> Self {
        Self {
            year: FieldUpdate::Set(year),
            ..Self::default()
        }
    }

    /// A patch that sets only the city.
    #[must_use]
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: FieldUpdate::Set(city.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.year.is_unchanged()
            && self.subsector.is_unchanged()
            && self.city.is_unchanged()
            && self.capital_status.is_unchanged()
            && self.search.is_unchanged()
    }
}

/// An immutable view of the filter after a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSnapshot {
    /// Increases by one on every mutation.
    pub revision: u64,
    /// The filter at that revision.
    pub state: FilterState,
}

/// Synchronous consumer of filter changes.
pub trait FilterObserver: Send + Sync {
    /// Called after every mutation with the new snapshot.
    fn on_filter_change(&self, snapshot: &FilterSnapshot);
}

/// Handle returned by [`FilterCoordinator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Owns the current [`FilterState`] and fans out every change.
pub struct FilterCoordinator {
    snapshot: FilterSnapshot,
    available_years: BTreeSet<i32>,
    observers: Vec<(ObserverId, Box<dyn FilterObserver>)>,
    next_observer: u64,
    sender: watch::Sender<FilterSnapshot>,
}

impl Default for FilterCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCoordinator {
    /// Creates a coordinator with an unfiltered state and no known years.
    #[must_use]
    pub fn new() -> Self {
        let snapshot = FilterSnapshot::default();
        let (sender, _) = watch::channel(snapshot.clone());
        Self {
            snapshot,
            available_years: BTreeSet::new(),
            observers: Vec::new(),
            next_observer: 0,
            sender,
        }
    }

    /// The current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &FilterSnapshot {
        &self.snapshot
    }

    /// The current filter.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.snapshot.state
    }

    /// Years the store reported as available.
    #[must_use]
    pub const fn available_years(&self) -> &BTreeSet<i32> {
        &self.available_years
    }

    /// The year a fresh or reset filter selects: the most recent available.
    #[must_use]
    pub fn default_year(&self) -> Option<i32> {
        self.available_years.last().copied()
    }

    /// Registers a synchronous observer.
    pub fn subscribe(&mut self, observer: Box<dyn FilterObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, observer));
        id
    }

    /// Removes an observer. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    /// A receiver that always holds the latest snapshot.
    #[must_use]
    pub fn subscribe_channel(&self) -> watch::Receiver<FilterSnapshot> {
        self.sender.subscribe()
    }

    /// Applies `patch`, replacing only the fields it specifies, and
    /// notifies every consumer.
    ///
    /// A year that is not in the available set is replaced by
    /// [`default_year`](Self::default_year) and logged; it is never an
    /// error.
    pub fn update(&mut self, patch: FilterPatch) -> &FilterSnapshot {
        let mut state = self.snapshot.state.clone();
        patch.year.apply(&mut state.year);
        patch.subsector.apply(&mut state.subsector);
        patch.city.apply(&mut state.city);
        patch.capital_status.apply(&mut state.capital_status);
        patch.search.apply(&mut state.search);

        if let Some(year) = state.year
            && !self.available_years.is_empty()
            && !self.available_years.contains(&year)
        {
            let fallback = self.default_year();
            log::warn!("Invalid filter year {year}; falling back to {fallback:?}");
            state.year = fallback;
        }

        self.publish(state)
    }

    /// Clears every optional field and selects the most recent available
    /// year.
    pub fn reset(&mut self) -> &FilterSnapshot {
        let state = FilterState {
            year: self.default_year(),
            ..FilterState::default()
        };
        self.publish(state)
    }

    /// Records the years the store reports.
    ///
    /// The first report selects the most recent year when none is selected
    /// yet. Later reports only replace a selected year that is missing from
    /// the new set; an explicit "all years" selection is kept.
    pub fn set_available_years(&mut self, years: BTreeSet<i32>) {
        let first_report = self.available_years.is_empty();
        self.available_years = years;
        let Some(fallback) = self.default_year() else {
            log::warn!("Record store reported no available years");
            return;
        };
        match self.snapshot.state.year {
            Some(year) if self.available_years.contains(&year) => {}
            Some(year) => {
                log::warn!("Selected year {year} is no longer available; using {fallback}");
                let state = self.snapshot.state.with_year(fallback);
                self.publish(state);
            }
            None if first_report => {
                let state = self.snapshot.state.with_year(fallback);
                self.publish(state);
            }
            None => {}
        }
    }

    /// Filters to a single region, as a map click does.
    pub fn select_region(&mut self, region: &str) -> &FilterSnapshot {
        self.update(FilterPatch::city(region.trim()))
    }

    fn publish(&mut self, state: FilterState) -> &FilterSnapshot {
        self.snapshot = FilterSnapshot {
            revision: self.snapshot.revision + 1,
            state,
        };
        log::debug!(
            "Filter revision {}: {:?}",
            self.snapshot.revision,
            self.snapshot.state
        );
        for (_, observer) in &self.observers {
            observer.on_filter_change(&self.snapshot);
        }
        self.sender.send_replace(self.snapshot.clone());
        &self.snapshot
    }
}

impl std::fmt::Debug for FilterCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCoordinator")
            .field("snapshot", &self.snapshot)
            .field("available_years", &self.available_years)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<FilterSnapshot>>);

    impl FilterObserver for Arc<Recorder> {
        fn on_filter_change(&self, snapshot: &FilterSnapshot) {
            self.0.lock().unwrap().push(snapshot.clone());
        }
    }

    fn coordinator_with_years() -> FilterCoordinator {
        let mut coordinator = FilterCoordinator::new();
        coordinator.set_available_years([2022, 2023, 2024].into_iter().collect());
        coordinator
    }

    #[test]
    fn first_years_select_most_recent() {
        let coordinator = coordinator_with_years();
        assert_eq!(coordinator.state().year, Some(2024));
        assert_eq!(coordinator.snapshot().revision, 1);
    }

    #[test]
    fn update_replaces_only_specified_fields() {
        let mut coordinator = coordinator_with_years();
        coordinator.update(FilterPatch {
            subsector: FieldUpdate::Set(Subsector::Music),
            search: FieldUpdate::Set("studio".to_string()),
            ..FilterPatch::default()
        });
        let snapshot = coordinator.update(FilterPatch {
            year: FieldUpdate::Set(2023),
            search: FieldUpdate::Clear,
            ..FilterPatch::default()
        });
        assert_eq!(snapshot.state.year, Some(2023));
        assert_eq!(snapshot.state.subsector, Some(Subsector::Music));
        assert_eq!(snapshot.state.search, None);
        assert_eq!(snapshot.revision, 3);
    }

    #[test]
    fn observers_see_every_mutation() {
        let recorder = Arc::new(Recorder::default());
        let mut coordinator = FilterCoordinator::new();
        let id = coordinator.subscribe(Box::new(Arc::clone(&recorder)));

        coordinator.set_available_years([2023, 2024].into_iter().collect());
        coordinator.select_region(" Kota Bandung ");
        coordinator.reset();

        {
            let seen = recorder.0.lock().unwrap();
            let revisions: Vec<_> = seen.iter().map(|s| s.revision).collect();
            assert_eq!(revisions, [1, 2, 3]);
            assert_eq!(seen[1].state.city.as_deref(), Some("Kota Bandung"));
            assert_eq!(seen[2].state.city, None);
            assert_eq!(seen[2].state.year, Some(2024));
        }

        assert!(coordinator.unsubscribe(id));
        assert!(!coordinator.unsubscribe(id));
        coordinator.update(FilterPatch::year(2023));
        assert_eq!(recorder.0.lock().unwrap().len(), 3);
    }

    #[test]
    fn unknown_year_falls_back_to_default() {
        let mut coordinator = coordinator_with_years();
        let snapshot = coordinator.update(FilterPatch::year(1999));
        assert_eq!(snapshot.state.year, Some(2024));
    }

    #[test]
    fn year_disappearing_triggers_fallback() {
        let mut coordinator = coordinator_with_years();
        coordinator.update(FilterPatch::year(2022));
        let before = coordinator.snapshot().revision;

        coordinator.set_available_years([2023, 2024].into_iter().collect());
        assert_eq!(coordinator.state().year, Some(2024));
        assert_eq!(coordinator.snapshot().revision, before + 1);

        // Still available: no change, no notification.
        coordinator.set_available_years([2023, 2024, 2025].into_iter().collect());
        assert_eq!(coordinator.state().year, Some(2024));
        assert_eq!(coordinator.snapshot().revision, before + 1);
    }

    #[test]
    fn clearing_year_spans_all_years() {
        let mut coordinator = coordinator_with_years();
        let snapshot = coordinator.update(FilterPatch {
            year: FieldUpdate::Clear,
            ..FilterPatch::default()
        });
        assert_eq!(snapshot.state.year, None);
    }

    #[test]
    fn all_years_survives_a_repeated_years_report() {
        let mut coordinator = coordinator_with_years();
        coordinator.update(FilterPatch {
            year: FieldUpdate::Clear,
            ..FilterPatch::default()
        });
        let before = coordinator.snapshot().revision;

        coordinator.set_available_years([2022, 2023, 2024].into_iter().collect());
        assert_eq!(coordinator.state().year, None);
        assert_eq!(coordinator.snapshot().revision, before);

        coordinator.set_available_years([2023, 2024, 2025].into_iter().collect());
        assert_eq!(coordinator.state().year, None);
        assert_eq!(coordinator.snapshot().revision, before);
    }

    #[test]
    fn channel_receives_latest_snapshot() {
        let mut coordinator = coordinator_with_years();
        let mut rx = coordinator.subscribe_channel();
        assert_eq!(rx.borrow().revision, 1);

        coordinator.update(FilterPatch::year(2023));
        coordinator.update(FilterPatch::city("Kota Depok"));
        assert!(rx.has_changed().unwrap());
        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest.revision, 3);
        assert_eq!(latest.state.year, Some(2023));
        assert_eq!(latest.state.city.as_deref(), Some("Kota Depok"));
    }

    #[test]
    fn empty_patch_detection() {
        assert!(FilterPatch::default().is_empty());
        assert!(!FilterPatch::year(2024).is_empty());
    }
}
