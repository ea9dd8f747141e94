// List editor session.
// Owns the local working copy of one ranked list while it is being edited:
// loads the remote snapshot, offers a stored draft for restore, applies
// reorders and field edits, decides when a draft should be written on leave,
// and pushes the result back with a single wholesale update.

use std::sync::Arc;

use crate::error::{Result, WatchlistError};
use crate::modules::draft_store::DraftStore;
use crate::modules::notices::{Notice, NoticeBoard};
use crate::modules::pending::{changed_fields, has_changes, ChangeSet};
use crate::modules::remote::ListApi;
use crate::modules::reorder;
use crate::settings::Settings;
use crate::state::{CurrentUser, Draft, ListUpdate, RankedEntry, RankedList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftChoice {
    /// Replace the working copy with the draft, then delete the draft.
    Restore,
    /// Delete the draft and keep the remote snapshot.
    Discard,
}

/// A save that has been started but not finished.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub list_id: String,
    pub update: ListUpdate,
    snapshot: RankedList,
}

pub struct ListEditor {
    lists: Arc<dyn ListApi>,
    drafts: DraftStore,
    user: CurrentUser,
    drafts_enabled: bool,
    remote: Option<RankedList>,
    local: Option<RankedList>,
    pending_draft: Option<Draft>,
    has_saved: bool,
    saving: bool,
    notices: NoticeBoard,
}

impl ListEditor {
    pub fn new(lists: Arc<dyn ListApi>, drafts: DraftStore, user: CurrentUser, settings: &Settings) -> Self {
        Self {
            lists,
            drafts,
            user,
            drafts_enabled: settings.drafts_enabled,
            remote: None,
            local: None,
            pending_draft: None,
            has_saved: false,
            saving: false,
            notices: NoticeBoard::new(),
        }
    }

    /// Fetches the list and checks for a stored draft.
    /// Returns the draft when one exists; the caller should then ask the user
    /// and call [`ListEditor::resolve_draft`].
    pub async fn open(&mut self, list_id: &str) -> Result<Option<Draft>> {
        let snapshot = match self.lists.fetch_list(list_id).await {
            Ok(list) => list,
            Err(e) => {
                log::error!("[Editor] Failed to fetch list {}: {}", list_id, e);
                self.notices.push(Notice::error("Failed to load list"));
                return Err(e);
            }
        };

        log::info!("[Editor] Opened list {} ({} entries)", list_id, snapshot.entries.len());

        self.local = Some(snapshot.clone());
        self.remote = Some(snapshot);
        self.has_saved = false;
        self.saving = false;
        self.pending_draft = None;

        if self.drafts_enabled {
            self.pending_draft = self.drafts.load_draft(list_id).await;
        }
        Ok(self.pending_draft.clone())
    }

    pub fn pending_draft(&self) -> Option<&Draft> {
        self.pending_draft.as_ref()
    }

    pub async fn resolve_draft(&mut self, choice: DraftChoice) -> Result<()> {
        let Some(draft) = self.pending_draft.take() else {
            return Ok(());
        };

        if choice == DraftChoice::Restore {
            let local = self.local.as_mut().ok_or(WatchlistError::NotLoaded)?;
            *local = draft.snapshot;
            log::info!("[Editor] Restored draft for list {} saved at {}", draft.list_id, draft.saved_at);
        } else {
            log::info!("[Editor] Discarded draft for list {}", draft.list_id);
        }

        if let Err(e) = self.drafts.clear_draft(&draft.list_id).await {
            log::warn!("[Editor] Failed to clear draft for list {}: {}", draft.list_id, e);
        }
        Ok(())
    }

    pub fn list(&self) -> Option<&RankedList> {
        self.local.as_ref()
    }

    pub fn remote(&self) -> Option<&RankedList> {
        self.remote.as_ref()
    }

    pub fn is_owner(&self) -> bool {
        self.local
            .as_ref()
            .map(|l| self.user.is_current_user(&l.owner_id))
            .unwrap_or(false)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn notices(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn has_changes(&self) -> bool {
        match (&self.local, &self.remote) {
            (Some(local), Some(remote)) => has_changes(local, remote),
            _ => false,
        }
    }

    pub fn changed_fields(&self) -> ChangeSet {
        match (&self.local, &self.remote) {
            (Some(local), Some(remote)) => changed_fields(local, remote),
            _ => ChangeSet::default(),
        }
    }

    fn editable(&mut self) -> Result<&mut RankedList> {
        let local = self.local.as_mut().ok_or(WatchlistError::NotLoaded)?;
        if !self.user.is_current_user(&local.owner_id) {
            return Err(WatchlistError::NotOwner);
        }
        // Any new edit makes the session draftable again.
        self.has_saved = false;
        Ok(local)
    }

    pub fn move_up(&mut self, index: usize) -> Result<bool> {
        let list = self.editable()?;
        Ok(reorder::move_up(&mut list.entries, index)?)
    }

    pub fn move_down(&mut self, index: usize) -> Result<bool> {
        let list = self.editable()?;
        Ok(reorder::move_down(&mut list.entries, index)?)
    }

    pub fn relocate(&mut self, old_index: usize, new_index: usize) -> Result<bool> {
        let list = self.editable()?;
        Ok(reorder::relocate(&mut list.entries, old_index, new_index)?)
    }

    pub fn apply_order(&mut self, new_order: &[i64]) -> Result<bool> {
        let list = self.editable()?;
        Ok(reorder::apply_order(&mut list.entries, new_order, |e| e.id))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(WatchlistError::Validation("title cannot be empty".to_string()));
        }
        self.editable()?.title = title;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.editable()?.description = description.into();
        Ok(())
    }

    pub fn set_public(&mut self, public: bool) -> Result<()> {
        self.editable()?.is_public = public;
        Ok(())
    }

    pub fn add_tag(&mut self, tag: &str) -> Result<bool> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(false);
        }
        Ok(self.editable()?.tags.insert(tag.to_string()))
    }

    pub fn remove_tag(&mut self, tag: &str) -> Result<bool> {
        Ok(self.editable()?.tags.remove(tag))
    }

    pub fn add_entry(&mut self, entry: RankedEntry) -> Result<bool> {
        Ok(self.editable()?.insert_entry(entry))
    }

    pub fn remove_entry(&mut self, id: i64) -> Result<Option<RankedEntry>> {
        Ok(self.editable()?.remove_entry(id))
    }

    /// Marks a save as in flight. A second call before [`ListEditor::finish_save`]
    /// is rejected.
    pub fn begin_save(&mut self) -> Result<SaveRequest> {
        if self.saving {
            return Err(WatchlistError::SaveInProgress);
        }
        let local = self.local.as_ref().ok_or(WatchlistError::NotLoaded)?;
        if !self.user.is_current_user(&local.owner_id) {
            return Err(WatchlistError::NotOwner);
        }
        self.saving = true;
        Ok(SaveRequest {
            list_id: local.id.clone(),
            update: local.to_update(),
            snapshot: local.clone(),
        })
    }

    pub fn finish_save(&mut self, request: SaveRequest, outcome: &Result<()>) {
        self.saving = false;
        match outcome {
            Ok(()) => {
                log::info!("[Editor] Saved list {}", request.list_id);
                // Edits made while the request was in flight are still unsaved.
                self.has_saved = self
                    .local
                    .as_ref()
                    .map_or(true, |l| !has_changes(l, &request.snapshot));
                self.remote = Some(request.snapshot);
                self.notices.push(Notice::info("List updated"));
            }
            Err(e) => {
                log::error!("[Editor] Failed to update list {}: {}", request.list_id, e);
                self.notices.push(Notice::error("Failed to update list"));
            }
        }
    }

    pub async fn save(&mut self) -> Result<()> {
        let request = self.begin_save()?;
        let outcome = self.lists.update_list(&request.list_id, &request.update).await;
        self.finish_save(request, &outcome);
        outcome
    }

    /// Called when the editor is about to close. Writes a draft only when
    /// there are unsaved changes and the session did not just save.
    pub async fn leave(&mut self) -> Result<Option<Draft>> {
        if !self.drafts_enabled || self.has_saved || !self.has_changes() {
            return Ok(None);
        }
        let Some(local) = self.local.as_ref() else {
            return Ok(None);
        };
        match self.drafts.save_draft(&local.id, local).await {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                log::error!("[Editor] Failed to store draft for list {}: {}", local.id, e);
                Err(e)
            }
        }
    }
}
