//! In-memory record store. Every mutation of the roster and of the pending
//! draft goes through [`RecordStore`], which keeps two invariants: ids are
//! unique within the collection, and the draft is in edit mode exactly when
//! it carries the id of the record being edited.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::models::{PlayerField, PlayerFields, PlayerId, PlayerRecord};

/// The form's pending, not-yet-committed input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DraftState {
    /// Nothing typed yet.
    #[default]
    Empty,
    /// Input staged for a new record.
    Creating(PlayerFields),
    /// Input staged as a replacement for the record with `id`.
    Editing { id: PlayerId, fields: PlayerFields },
}

impl DraftState {
    /// Staged values, or `None` when nothing has been typed.
    pub fn fields(&self) -> Option<&PlayerFields> {
        match self {
            DraftState::Empty => None,
            DraftState::Creating(fields) => Some(fields),
            DraftState::Editing { fields, .. } => Some(fields),
        }
    }

    /// Id of the record being edited, if any.
    pub fn editing_id(&self) -> Option<PlayerId> {
        match self {
            DraftState::Editing { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// The "editing" flag, derived from the variant so it cannot drift from
    /// the draft id.
    pub fn is_editing(&self) -> bool {
        matches!(self, DraftState::Editing { .. })
    }
}

/// Result of committing the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new record was appended.
    Created(PlayerId),
    /// The record was replaced in place.
    Updated(PlayerId),
    /// Create was rejected because these fields are empty. Nothing changed.
    Incomplete(Vec<PlayerField>),
    /// The draft pointed at a record that no longer exists. The draft was
    /// reset and the collection left alone.
    Missing(PlayerId),
    /// The commit does not match the draft's mode (for example updating
    /// while creating). Nothing changed.
    NotApplicable,
}

/// Ordered roster plus the single in-progress draft.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<PlayerRecord>,
    draft: DraftState,
    next_local_id: u64,
    seeded: bool,
}

impl RecordStore {
    /// Empty store waiting for its seed load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record in display order: seed order first, then creation order.
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    /// Number of records currently in the roster.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True before the seed arrives, after a failed seed, or once every
    /// record has been deleted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by id. Ids come from rendered rows, so `None` only
    /// happens for stale ids.
    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Row index of the record, used by the table to keep the selection on
    /// an updated record.
    pub fn position_of(&self, id: PlayerId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    /// The pending form input.
    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    /// Whether the submit control currently means "Update".
    pub fn is_editing(&self) -> bool {
        self.draft.is_editing()
    }

    /// Whether a seed load has been applied. Later seed loads are ignored.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Current draft values, blank when nothing is staged.
    pub fn draft_fields(&self) -> PlayerFields {
        self.draft.fields().cloned().unwrap_or_default()
    }

    /// Replace the whole collection with seed data. Only the first call has
    /// any effect. Duplicate ids in the payload keep their first occurrence.
    pub fn load_seed(&mut self, records: Vec<PlayerRecord>) {
        if self.seeded {
            warn!("ignoring repeated seed load");
            return;
        }

        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id) {
                unique.push(record);
            } else {
                warn!(id = %record.id, "dropping seed record with duplicate id");
            }
        }

        info!(count = unique.len(), "seed records loaded");
        self.records = unique;
        self.seeded = true;
    }

    /// Stage a single field value as the user types. An empty draft turns
    /// into a pending creation; an edit stays an edit.
    pub fn set_field(&mut self, field: PlayerField, value: impl Into<String>) {
        let value = value.into();
        match &mut self.draft {
            DraftState::Empty => {
                let mut fields = PlayerFields::default();
                *fields.get_mut(field) = value;
                self.draft = DraftState::Creating(fields);
            }
            DraftState::Creating(fields) | DraftState::Editing { fields, .. } => {
                *fields.get_mut(field) = value;
            }
        }

        // Only literally empty fields fold back; a typed space is input.
        if matches!(&self.draft, DraftState::Creating(fields) if fields.is_blank()) {
            self.draft = DraftState::Empty;
        }
    }

    /// Append the draft as a new record. Empty fields reject the commit and
    /// leave both the collection and the draft as they were.
    pub fn commit_create(&mut self) -> CommitOutcome {
        let fields = match &self.draft {
            DraftState::Editing { .. } => return CommitOutcome::NotApplicable,
            DraftState::Empty => PlayerFields::default(),
            DraftState::Creating(fields) => fields.clone(),
        };

        let missing = fields.missing();
        if !missing.is_empty() {
            debug!(?missing, "create rejected");
            return CommitOutcome::Incomplete(missing);
        }

        let id = self.allocate_id();
        self.records.push(PlayerRecord::new(id, fields));
        self.draft = DraftState::Empty;
        debug!(%id, "record created");
        CommitOutcome::Created(id)
    }

    /// Copy the record into the draft for editing. Returns `false` and leaves
    /// the draft alone when no record has `id`.
    pub fn begin_edit(&mut self, id: PlayerId) -> bool {
        let Some(record) = self.get(id) else {
            debug!(%id, "edit requested for unknown record");
            return false;
        };

        self.draft = DraftState::Editing {
            id,
            fields: record.fields(),
        };
        true
    }

    /// Write the draft back over the record it was taken from, keeping its
    /// position. The draft is reset whether or not the record still exists.
    pub fn commit_update(&mut self) -> CommitOutcome {
        let (id, fields) = match std::mem::take(&mut self.draft) {
            DraftState::Editing { id, fields } => (id, fields),
            other => {
                self.draft = other;
                return CommitOutcome::NotApplicable;
            }
        };

        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                *record = PlayerRecord::new(id, fields);
                debug!(%id, "record updated");
                CommitOutcome::Updated(id)
            }
            None => {
                debug!(%id, "update target no longer exists");
                CommitOutcome::Missing(id)
            }
        }
    }

    /// The single submit control: update while editing, create otherwise.
    pub fn submit(&mut self) -> CommitOutcome {
        if self.is_editing() {
            self.commit_update()
        } else {
            self.commit_create()
        }
    }

    /// Throw away whatever is staged.
    pub fn cancel_draft(&mut self) {
        self.draft = DraftState::Empty;
    }

    /// Remove the record with `id`, keeping the order of the rest. An edit
    /// in progress for the same record is discarded with it.
    pub fn delete_record(&mut self, id: PlayerId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        let removed = self.records.len() != before;

        if removed {
            debug!(%id, "record deleted");
            if self.draft.editing_id() == Some(id) {
                self.draft = DraftState::Empty;
            }
        }
        removed
    }

    fn allocate_id(&mut self) -> PlayerId {
        self.next_local_id += 1;
        PlayerId::Local(self.next_local_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> PlayerRecord {
        PlayerRecord::new(
            PlayerId::Remote(id),
            PlayerFields::new(name, format!("Team {name}"), format!("Position {name}")),
        )
    }

    fn stage(store: &mut RecordStore, name: &str, team: &str, position: &str) {
        store.set_field(PlayerField::Name, name);
        store.set_field(PlayerField::Team, team);
        store.set_field(PlayerField::Position, position);
    }

    fn seeded() -> RecordStore {
        let mut store = RecordStore::new();
        store.load_seed(vec![record(1, "A"), record(2, "B"), record(3, "C")]);
        store
    }

    fn names(store: &RecordStore) -> Vec<&str> {
        store.records().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn typing_into_empty_draft_starts_a_creation() {
        let mut store = RecordStore::new();
        store.set_field(PlayerField::Name, "Ann");
        assert_eq!(
            store.draft(),
            &DraftState::Creating(PlayerFields::new("Ann", "", ""))
        );

        store.set_field(PlayerField::Name, "");
        assert_eq!(store.draft(), &DraftState::Empty);
    }

    #[test]
    fn typed_whitespace_is_kept_in_the_draft() {
        let mut store = RecordStore::new();
        store.set_field(PlayerField::Name, " ");
        assert_eq!(store.draft_fields().name, " ");
        assert_eq!(
            store.draft(),
            &DraftState::Creating(PlayerFields::new(" ", "", ""))
        );
    }

    #[test]
    fn whitespace_counts_as_present_on_create() {
        let mut store = RecordStore::new();
        stage(&mut store, "Ann", " ", "GK");

        let outcome = store.commit_create();
        let CommitOutcome::Created(id) = outcome else {
            panic!("expected create, got {outcome:?}");
        };
        assert_eq!(store.get(id).map(|r| r.team.as_str()), Some(" "));
        assert_eq!(store.draft(), &DraftState::Empty);
    }

    #[test]
    fn create_appends_and_resets_draft() {
        let mut store = seeded();
        stage(&mut store, "D", "Team D", "Position D");

        let outcome = store.commit_create();
        let CommitOutcome::Created(id) = outcome else {
            panic!("expected create, got {outcome:?}");
        };
        assert_eq!(names(&store), ["A", "B", "C", "D"]);
        assert_eq!(store.get(id).map(|r| r.team.as_str()), Some("Team D"));
        assert_eq!(store.draft(), &DraftState::Empty);
        assert!(!store.is_editing());
    }

    #[test]
    fn incomplete_create_changes_nothing() {
        let mut store = seeded();
        stage(&mut store, "D", "", "Position D");
        let draft_before = store.draft().clone();

        assert_eq!(
            store.commit_create(),
            CommitOutcome::Incomplete(vec![PlayerField::Team])
        );
        assert_eq!(names(&store), ["A", "B", "C"]);
        assert_eq!(store.draft(), &draft_before);
    }

    #[test]
    fn empty_draft_cannot_be_created() {
        let mut store = RecordStore::new();
        assert_eq!(
            store.commit_create(),
            CommitOutcome::Incomplete(PlayerField::ALL.to_vec())
        );
        assert!(store.is_empty());
    }

    #[test]
    fn created_ids_are_never_reused() {
        let mut store = seeded();
        let mut seen: HashSet<PlayerId> = store.records().iter().map(|r| r.id).collect();

        for round in 0..20 {
            stage(&mut store, "X", "Team X", "Position X");
            let CommitOutcome::Created(id) = store.commit_create() else {
                panic!("create failed in round {round}");
            };
            assert!(seen.insert(id), "id {id} was handed out twice");
            if round % 3 == 0 {
                assert!(store.delete_record(id));
            }
        }
    }

    #[test]
    fn edit_then_update_without_changes_is_identity() {
        let mut store = seeded();
        let before = store.get(PlayerId::Remote(2)).cloned();

        assert!(store.begin_edit(PlayerId::Remote(2)));
        assert!(store.is_editing());
        assert_eq!(store.draft().editing_id(), Some(PlayerId::Remote(2)));

        assert_eq!(
            store.commit_update(),
            CommitOutcome::Updated(PlayerId::Remote(2))
        );
        assert_eq!(store.get(PlayerId::Remote(2)).cloned(), before);
        assert_eq!(store.draft(), &DraftState::Empty);
        assert!(!store.is_editing());
    }

    #[test]
    fn update_replaces_in_place_without_validation() {
        let mut store = seeded();
        store.begin_edit(PlayerId::Remote(2));
        store.set_field(PlayerField::Team, "");
        store.set_field(PlayerField::Name, "Bee");

        assert_eq!(store.submit(), CommitOutcome::Updated(PlayerId::Remote(2)));
        assert_eq!(names(&store), ["A", "Bee", "C"]);
        assert_eq!(store.records()[1].team, "");
    }

    #[test]
    fn edit_of_unknown_id_is_ignored() {
        let mut store = seeded();
        stage(&mut store, "D", "", "");
        let draft_before = store.draft().clone();

        assert!(!store.begin_edit(PlayerId::Local(99)));
        assert_eq!(store.draft(), &draft_before);
    }

    #[test]
    fn update_of_vanished_record_resets_draft_only() {
        let mut store = seeded();
        store.begin_edit(PlayerId::Remote(3));
        store.records.retain(|r| r.id != PlayerId::Remote(3));

        assert_eq!(
            store.commit_update(),
            CommitOutcome::Missing(PlayerId::Remote(3))
        );
        assert_eq!(names(&store), ["A", "B"]);
        assert_eq!(store.draft(), &DraftState::Empty);
    }

    #[test]
    fn commits_must_match_draft_mode() {
        let mut store = seeded();
        stage(&mut store, "D", "Team D", "Position D");
        assert_eq!(store.commit_update(), CommitOutcome::NotApplicable);
        assert!(matches!(store.draft(), DraftState::Creating(_)));

        store.begin_edit(PlayerId::Remote(1));
        assert_eq!(store.commit_create(), CommitOutcome::NotApplicable);
        assert!(store.is_editing());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn delete_is_idempotent_and_keeps_order() {
        let mut store = seeded();
        assert!(store.delete_record(PlayerId::Remote(2)));
        let after_once = store.records().to_vec();

        assert!(!store.delete_record(PlayerId::Remote(2)));
        assert_eq!(store.records(), after_once.as_slice());
        assert_eq!(names(&store), ["A", "C"]);

        stage(&mut store, "D", "Team D", "Position D");
        store.commit_create();
        assert_eq!(names(&store), ["A", "C", "D"]);
    }

    #[test]
    fn deleting_the_edited_record_discards_the_edit() {
        let mut store = seeded();
        store.begin_edit(PlayerId::Remote(1));
        store.set_field(PlayerField::Name, "changed");

        store.delete_record(PlayerId::Remote(2));
        assert_eq!(store.draft().editing_id(), Some(PlayerId::Remote(1)));

        store.delete_record(PlayerId::Remote(1));
        assert_eq!(store.draft(), &DraftState::Empty);
        assert!(!store.is_editing());
    }

    #[test]
    fn seed_applies_once_and_drops_duplicate_ids() {
        let mut store = RecordStore::new();
        store.load_seed(vec![record(1, "A"), record(1, "A2"), record(2, "B")]);
        assert!(store.is_seeded());
        assert_eq!(names(&store), ["A", "B"]);

        store.load_seed(vec![record(9, "Z")]);
        assert_eq!(names(&store), ["A", "B"]);
    }

    #[test]
    fn cancel_draft_leaves_edit_mode() {
        let mut store = seeded();
        store.begin_edit(PlayerId::Remote(1));
        store.cancel_draft();
        assert!(!store.is_editing());
        assert_eq!(store.draft_fields(), PlayerFields::default());
    }
}
