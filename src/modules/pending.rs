// Pending-change detection between a local edit and the last remote snapshot.

use crate::state::RankedList;

/// Which parts of a list differ from the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub title: bool,
    pub description: bool,
    pub entries: bool,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        !(self.title || self.description || self.entries)
    }
}

/// Compares entries position by position; same membership in a different
/// order counts as a change.
pub fn changed_fields(local: &RankedList, remote: &RankedList) -> ChangeSet {
    let entries = local.entries.len() != remote.entries.len()
        || local
            .entries
            .iter()
            .zip(remote.entries.iter())
            .any(|(l, r)| l.id != r.id);

    ChangeSet {
        title: local.title != remote.title,
        description: local.description != remote.description,
        entries,
    }
}

pub fn has_changes(local: &RankedList, remote: &RankedList) -> bool {
    !changed_fields(local, remote).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{sample_list, RankedEntry};

    #[test]
    fn test_same_list_has_no_changes() {
        let list = sample_list(&[1, 2, 3]);
        assert!(!has_changes(&list, &list));
        assert!(changed_fields(&list, &list).is_empty());
    }

    #[test]
    fn test_reordering_is_a_change() {
        let remote = sample_list(&[1, 2, 3]);
        let local = sample_list(&[3, 2, 1]);
        assert!(has_changes(&local, &remote));
        assert_eq!(
            changed_fields(&local, &remote),
            ChangeSet { title: false, description: false, entries: true }
        );
    }

    #[test]
    fn test_title_and_description_changes() {
        let remote = sample_list(&[1]);
        let mut local = remote.clone();
        local.title = "Y".to_string();
        assert!(changed_fields(&local, &remote).title);

        let mut local = remote.clone();
        local.description = "best of 2024".to_string();
        let changes = changed_fields(&local, &remote);
        assert!(changes.description);
        assert!(!changes.title);
    }

    #[test]
    fn test_added_entry_is_a_change() {
        let remote = sample_list(&[1, 2]);
        let mut local = remote.clone();
        local.insert_entry(RankedEntry::new(3, "Movie 3"));
        assert!(has_changes(&local, &remote));
    }

    #[test]
    fn test_entry_metadata_is_ignored() {
        let remote = sample_list(&[1, 2]);
        let mut local = remote.clone();
        local.entries[0].poster_path = Some("/poster.jpg".to_string());
        local.is_public = !remote.is_public;
        assert!(!has_changes(&local, &remote));
    }
}
