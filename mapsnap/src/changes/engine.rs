//! Incremental change detection over generations of drawables.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tracing::debug;

use crate::drawable::DrawableObject;

/// How two multi-record groups sharing an id are paired up.
///
/// With more than one record per id, the engine pairs every old record
/// with a distinct new record. If any old record is left unpaired, the
/// whole group counts as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMatching {
    /// An old record pairs with the first unpaired new record that does
    /// *not* draw the same.
    ///
    /// This is the historical behaviour and reports a group of identical
    /// records as changed while letting some edits through silently. It
    /// stays the default until confirmed against real data.
    #[default]
    Literal,
    /// An old record pairs with the first unpaired new record that draws
    /// the same, so only genuinely edited groups are reported.
    Equality,
}

impl GroupMatching {
    fn pairs(self, old: &DrawableObject, new: &DrawableObject) -> bool {
        match self {
            GroupMatching::Literal => !old.same_drawing_as(new),
            GroupMatching::Equality => old.same_drawing_as(new),
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    drawables: HashMap<i64, Vec<DrawableObject>>,
    selected: HashSet<i64>,
}

/// Computes the records that must be redrawn between successive updates.
///
/// Object and selection updates are tracked separately but share the id
/// to group mapping: a selection change returns the current records of
/// every id whose selection state flipped. Calls are serialized.
#[derive(Debug, Default)]
pub struct ChangeSetEngine {
    matching: GroupMatching,
    state: Mutex<EngineState>,
}

impl ChangeSetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matching(matching: GroupMatching) -> Self {
        Self {
            matching,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn matching(&self) -> GroupMatching {
        self.matching
    }

    /// Replaces the stored drawables and returns what changed.
    ///
    /// Records of new ids are returned in input order, followed by the old
    /// records of removed ids and both old and new records of changed ids.
    /// The input is copied, so later changes to the caller's records do not
    /// affect the stored generation.
    pub fn update_objects<'a, I>(&self, objects: I) -> Vec<DrawableObject>
    where
        I: IntoIterator<Item = &'a DrawableObject>,
    {
        let mut state = self.state.lock();
        let mut changes = Vec::new();

        let mut next: HashMap<i64, Vec<DrawableObject>> = HashMap::new();
        for object in objects {
            let copy = object.clone();
            if !state.drawables.contains_key(&object.global_row_id) {
                changes.push(copy.clone());
            }
            next.entry(object.global_row_id).or_default().push(copy);
        }
        let added = changes.len();

        let mut removed = 0usize;
        let mut changed = 0usize;
        for (id, old_group) in &state.drawables {
            match next.get(id) {
                None => {
                    removed += 1;
                    changes.extend(old_group.iter().cloned());
                }
                Some(new_group) => {
                    if self.group_changed(old_group, new_group) {
                        changed += 1;
                        changes.extend(old_group.iter().cloned());
                        changes.extend(new_group.iter().cloned());
                    }
                }
            }
        }

        state.drawables = next;

        debug!(
            ids = state.drawables.len(),
            added,
            removed,
            changed,
            changeset = changes.len(),
            "Drawable changes computed"
        );
        changes
    }

    /// Replaces the selection and returns the records of every id whose
    /// selection state flipped.
    ///
    /// Ids without a known drawable group contribute nothing.
    pub fn update_selected(&self, selected: &HashSet<i64>) -> Vec<DrawableObject> {
        let mut state = self.state.lock();

        let flipped: Vec<i64> = selected
            .symmetric_difference(&state.selected)
            .copied()
            .collect();
        state.selected = selected.clone();

        let changes: Vec<DrawableObject> = flipped
            .iter()
            .filter_map(|id| state.drawables.get(id))
            .flat_map(|group| group.iter().cloned())
            .collect();

        debug!(
            flipped = flipped.len(),
            changeset = changes.len(),
            "Selection changes computed"
        );
        changes
    }

    /// The stored records for `id`.
    pub fn current_group(&self, id: i64) -> Option<Vec<DrawableObject>> {
        self.state.lock().drawables.get(&id).cloned()
    }

    pub fn selected(&self) -> HashSet<i64> {
        self.state.lock().selected.clone()
    }

    /// Forgets all drawables and the selection.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.drawables.clear();
        state.selected.clear();
    }

    fn group_changed(&self, old: &[DrawableObject], new: &[DrawableObject]) -> bool {
        if old.len() != new.len() {
            return true;
        }
        if let ([old], [new]) = (old, new) {
            return !old.same_drawing_as(new);
        }

        let mut unpaired: Vec<&DrawableObject> = new.iter().collect();
        for record in old {
            match unpaired.iter().position(|candidate| self.matching.pairs(record, candidate)) {
                Some(index) => {
                    unpaired.remove(index);
                }
                None => return true,
            }
        }
        false
    }
}
