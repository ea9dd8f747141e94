// Pinned review selection: bounded, public-only, reconciled against the
// server-confirmed set when saved.

use futures_util::future::join_all;
use thiserror::Error;

use crate::error::{Result, WatchlistError};
use crate::modules::remote::PinnedReviewApi;
use crate::settings::Settings;
use crate::state::ReviewEntry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinRejection {
    #[error("private entries cannot be pinned")]
    PrivateEntry,
    #[error("maximum of {max} pinned entries")]
    LimitReached { max: usize },
}

/// Adds or removes `candidate`. Removal is never rejected.
/// On rejection the selection is left untouched.
pub fn toggle(selection: &mut Vec<ReviewEntry>, candidate: &ReviewEntry, max: usize) -> Option<PinRejection> {
    if !candidate.public {
        return Some(PinRejection::PrivateEntry);
    }
    if let Some(pos) = selection.iter().position(|r| r.id == candidate.id) {
        selection.remove(pos);
        return None;
    }
    if selection.len() >= max {
        return Some(PinRejection::LimitReached { max });
    }
    selection.push(candidate.clone());
    None
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinDiff {
    pub to_add: Vec<ReviewEntry>,
    pub to_remove: Vec<ReviewEntry>,
}

impl PinDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

pub fn compute_diff(original: &[ReviewEntry], current: &[ReviewEntry]) -> PinDiff {
    let to_add = current
        .iter()
        .filter(|c| !original.iter().any(|o| o.id == c.id))
        .cloned()
        .collect();
    let to_remove = original
        .iter()
        .filter(|o| !current.iter().any(|c| c.id == o.id))
        .cloned()
        .collect();
    PinDiff { to_add, to_remove }
}

/// Dispatches every remove and add together and waits for all of them.
/// Any failure fails the whole batch; calls that already went through are
/// not rolled back.
pub async fn execute_diff(api: &dyn PinnedReviewApi, diff: &PinDiff) -> Result<()> {
    let mut calls = Vec::with_capacity(diff.to_add.len() + diff.to_remove.len());
    for review in &diff.to_remove {
        calls.push(api.remove_pinned(&review.id));
    }
    for review in &diff.to_add {
        calls.push(api.add_pinned(&review.id));
    }

    let results = join_all(calls).await;
    let failures: Vec<String> = results
        .into_iter()
        .filter_map(|r| r.err())
        .map(|e| e.to_string())
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        for f in &failures {
            log::error!("[Pinned] Batch call failed: {}", f);
        }
        Err(WatchlistError::Network(format!(
            "{} of {} pinned review updates failed",
            failures.len(),
            diff.to_add.len() + diff.to_remove.len()
        )))
    }
}

#[derive(Debug, Clone)]
pub struct PinnedSelection {
    pub owner: String,
    selected: Vec<ReviewEntry>,
    original: Vec<ReviewEntry>,
    max: usize,
    saving: bool,
}

impl PinnedSelection {
    /// The cap comes from `settings.max_pinned`.
    pub fn new(owner: impl Into<String>, original: Vec<ReviewEntry>, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let owner = owner.into();

        // Private entries can't be toggled off, only dropped by the server.
        for review in original.iter().filter(|r| !r.public) {
            log::warn!("[Pinned] Review {} pinned by {} is no longer public", review.id, owner);
        }

        Ok(Self {
            owner,
            selected: original.clone(),
            original,
            max: settings.max_pinned,
            saving: false,
        })
    }

    pub async fn load(owner: &str, api: &dyn PinnedReviewApi, settings: &Settings) -> Result<Self> {
        let pinned = api.get_pinned(owner).await?;
        log::info!("[Pinned] Loaded {} pinned reviews for {}", pinned.len(), owner);
        Self::new(owner, pinned, settings)
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn selected(&self) -> &[ReviewEntry] {
        &self.selected
    }

    pub fn original(&self) -> &[ReviewEntry] {
        &self.original
    }

    pub fn is_selected(&self, review_id: &str) -> bool {
        self.selected.iter().any(|r| r.id == review_id)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn toggle(&mut self, candidate: &ReviewEntry) -> Option<PinRejection> {
        toggle(&mut self.selected, candidate, self.max)
    }

    pub fn diff(&self) -> PinDiff {
        compute_diff(&self.original, &self.selected)
    }

    pub fn has_changes(&self) -> bool {
        !self.diff().is_empty()
    }

    /// Marks a save as in flight and returns the calls to make.
    pub fn begin_save(&mut self) -> Result<PinDiff> {
        if self.saving {
            return Err(WatchlistError::SaveInProgress);
        }
        self.saving = true;
        Ok(self.diff())
    }

    /// The server accepted every call; the working set is now confirmed.
    pub fn finish_save(&mut self) {
        self.saving = false;
        self.original = self.selected.clone();
    }

    /// Something failed. `server_state` is a fresh read of the confirmed set;
    /// when present, both sets are reset to it so the UI stops showing an
    /// optimistic state the server never committed.
    pub fn fail_save(&mut self, server_state: Option<Vec<ReviewEntry>>) {
        self.saving = false;
        match server_state {
            Some(pinned) => {
                self.selected = pinned.clone();
                self.original = pinned;
            }
            None => log::warn!("[Pinned] Could not re-fetch pinned reviews for {}", self.owner),
        }
    }

    /// `begin_save` + batch + reconciliation in one call.
    pub async fn save(&mut self, api: &dyn PinnedReviewApi) -> Result<()> {
        let diff = self.begin_save()?;
        if diff.is_empty() {
            self.finish_save();
            return Ok(());
        }

        log::info!(
            "[Pinned] Saving for {}: {} to add, {} to remove",
            self.owner,
            diff.to_add.len(),
            diff.to_remove.len()
        );

        match execute_diff(api, &diff).await {
            Ok(()) => {
                self.finish_save();
                Ok(())
            }
            Err(e) => {
                let server_state = api.get_pinned(&self.owner).await.ok();
                self.fail_save(server_state);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::remote::testing::FakePinnedApi;

    fn review(id: &str) -> ReviewEntry {
        ReviewEntry::new(id, 1, true)
    }

    fn max_pinned() -> usize {
        Settings::default().max_pinned
    }

    fn ids(entries: &[ReviewEntry]) -> Vec<&str> {
        entries.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_private_entry_rejected() {
        let mut selection = vec![review("a")];
        let private = ReviewEntry::new("p", 2, false);
        assert_eq!(toggle(&mut selection, &private, max_pinned()), Some(PinRejection::PrivateEntry));
        assert_eq!(selection.len(), 1);
        assert_eq!(PinRejection::PrivateEntry.to_string(), "private entries cannot be pinned");
    }

    #[test]
    fn test_toggle_removes_selected_entry() {
        let mut selection = vec![review("a"), review("b")];
        assert_eq!(toggle(&mut selection, &review("a"), max_pinned()), None);
        assert_eq!(ids(&selection), vec!["b"]);
    }

    #[test]
    fn test_sixth_pin_rejected_until_one_removed() {
        let mut selection: Vec<ReviewEntry> = ["a", "b", "c", "d", "e"].iter().map(|id| review(id)).collect();

        let rejection = toggle(&mut selection, &review("f"), max_pinned());
        assert_eq!(rejection, Some(PinRejection::LimitReached { max: 5 }));
        assert_eq!(rejection.unwrap().to_string(), "maximum of 5 pinned entries");
        assert_eq!(selection.len(), 5);

        assert_eq!(toggle(&mut selection, &review("c"), max_pinned()), None);
        assert_eq!(toggle(&mut selection, &review("c"), max_pinned()), None);
        assert_eq!(ids(&selection), vec!["a", "b", "d", "e", "c"]);
    }

    #[test]
    fn test_cap_follows_settings() {
        let mut settings = Settings::default();
        settings.max_pinned = 2;
        let mut selection = PinnedSelection::new("u1", vec![review("a")], &settings).unwrap();
        assert_eq!(selection.max(), 2);

        assert_eq!(selection.toggle(&review("b")), None);
        assert_eq!(selection.toggle(&review("c")), Some(PinRejection::LimitReached { max: 2 }));
        assert_eq!(ids(selection.selected()), vec!["a", "b"]);
    }

    #[test]
    fn test_zero_cap_rejected() {
        let mut settings = Settings::default();
        settings.max_pinned = 0;
        assert!(matches!(
            PinnedSelection::new("u1", Vec::new(), &settings),
            Err(WatchlistError::Validation(_))
        ));
    }

    #[test]
    fn test_pinned_entry_turned_private_cannot_be_toggled_off() {
        let private = ReviewEntry::new("p", 2, false);
        let mut selection = PinnedSelection::new("u1", vec![review("a"), private.clone()], &Settings::default()).unwrap();

        assert_eq!(selection.toggle(&private), Some(PinRejection::PrivateEntry));
        assert!(selection.is_selected("p"));
        assert!(!selection.has_changes());
    }

    #[test]
    fn test_compute_diff() {
        let original = vec![review("A"), review("B"), review("C")];
        let current = vec![review("B"), review("C"), review("D")];
        let diff = compute_diff(&original, &current);
        assert_eq!(ids(&diff.to_add), vec!["D"]);
        assert_eq!(ids(&diff.to_remove), vec!["A"]);
    }

    #[test]
    fn test_compute_diff_ignores_order() {
        let original = vec![review("A"), review("B")];
        let current = vec![review("B"), review("A")];
        assert!(compute_diff(&original, &current).is_empty());
    }

    #[test]
    fn test_second_begin_save_is_rejected() {
        let mut selection = PinnedSelection::new("u1", vec![review("a")], &Settings::default()).unwrap();
        selection.begin_save().unwrap();
        assert!(matches!(selection.begin_save(), Err(WatchlistError::SaveInProgress)));
        selection.finish_save();
        assert!(selection.begin_save().is_ok());
    }

    #[tokio::test]
    async fn test_save_issues_adds_and_removes() {
        let api = FakePinnedApi::new(&[review("A"), review("B"), review("C"), review("D")], &["A", "B", "C"]);
        let mut selection = PinnedSelection::load("u1", &api, &Settings::default()).await.unwrap();

        assert_eq!(selection.toggle(&review("A")), None);
        assert_eq!(selection.toggle(&review("D")), None);
        assert!(selection.has_changes());

        selection.save(&api).await.unwrap();

        let mut server = api.pinned_ids();
        server.sort();
        assert_eq!(server, vec!["B", "C", "D"]);
        assert!(!selection.has_changes());
        assert!(!selection.is_saving());
        assert_eq!(api.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_reconciles_with_server() {
        let api = FakePinnedApi::new(&[review("A"), review("B"), review("C")], &["A"]);
        api.fail_on("C");
        let mut selection = PinnedSelection::load("u1", &api, &Settings::default()).await.unwrap();

        selection.toggle(&review("B"));
        selection.toggle(&review("C"));
        let result = selection.save(&api).await;

        assert!(matches!(result, Err(WatchlistError::Network(_))));
        // B went through, C did not; the selection now mirrors the server
        assert_eq!(ids(selection.selected()), vec!["A", "B"]);
        assert_eq!(ids(selection.original()), vec!["A", "B"]);
        assert!(!selection.is_saving());
    }

    #[tokio::test]
    async fn test_empty_save_makes_no_calls() {
        let api = FakePinnedApi::new(&[review("A")], &["A"]);
        let mut selection = PinnedSelection::load("u1", &api, &Settings::default()).await.unwrap();
        selection.save(&api).await.unwrap();
        assert!(api.calls.lock().unwrap().is_empty());
    }
}
