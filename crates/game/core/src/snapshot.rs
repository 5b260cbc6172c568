//! Precalculated snapshots and their application to live state.

use crate::action::ActionKey;
use crate::clock::Timestamp;
use crate::result::{ActionResult, Popup};
use crate::state::{EncounterSections, EncounterState, SpellProgress};

/// Everything known about one action before it is replayed: the state it
/// leads to, its result and the popup to show for it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    key: ActionKey,
    state: EncounterState,
    result: ActionResult,
    popup: Popup,
    created_at: Timestamp,
}

impl Snapshot {
    pub fn new(
        key: ActionKey,
        state: EncounterState,
        result: ActionResult,
        popup: Popup,
        created_at: Timestamp,
    ) -> Self {
        Self {
            key,
            state,
            result,
            popup,
            created_at,
        }
    }

    pub fn key(&self) -> ActionKey {
        self.key
    }

    pub fn resulting_state(&self) -> &EncounterState {
        &self.state
    }

    pub fn result(&self) -> &ActionResult {
        &self.result
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Equality ignoring every clock-derived timestamp.
    pub fn same_outcome(&self, other: &Snapshot) -> bool {
        let stacks = |s: &Snapshot| {
            s.state
                .status()
                .iter()
                .map(|i| (i.definition.clone(), i.stacks))
                .collect::<Vec<_>>()
        };
        self.key == other.key
            && self.result == other.result
            && self.popup == other.popup
            && outcome_spell(self.state.spell()) == outcome_spell(other.state.spell())
            && self.state.action_index() == other.state.action_index()
            && stacks(self) == stacks(other)
    }

    /// SHA-256 over the bincode encoding of the snapshot's outcome.
    ///
    /// Clock-derived timestamps (creation time, state time, spell start,
    /// applied-at) are left out, so two precalculations of the same input
    /// digest equally whatever clock they ran under.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(&DigestView::of(self))?;
        Ok(Sha256::digest(&bytes).into())
    }
}

/// Spell progress without its start time.
fn outcome_spell(spell: &SpellProgress) -> SpellProgress {
    SpellProgress {
        started_at: None,
        ..spell.clone()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct DigestView<'a> {
    key: &'a ActionKey,
    spell: SpellProgress,
    status: Vec<(&'a crate::state::StatusEffectDefinition, u32)>,
    index: crate::action::ActionIndex,
    result: &'a ActionResult,
    popup: &'a Popup,
}

#[cfg(feature = "serde")]
impl<'a> DigestView<'a> {
    fn of(snapshot: &'a Snapshot) -> Self {
        Self {
            key: &snapshot.key,
            spell: outcome_spell(snapshot.state.spell()),
            status: snapshot
                .state
                .status()
                .iter()
                .map(|i| (&i.definition, i.stacks))
                .collect(),
            index: snapshot.state.action_index(),
            result: &snapshot.result,
            popup: &snapshot.popup,
        }
    }
}

/// Digest of a whole cast: the snapshot digests folded in order.
#[cfg(feature = "serde")]
pub fn sequence_digest(snapshots: &[Snapshot]) -> Result<[u8; 32], bincode::Error> {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for snapshot in snapshots {
        hasher.update(snapshot.digest()?);
    }
    Ok(hasher.finalize().into())
}

/// Writes a snapshot's resulting sections back into a live state.
///
/// Spell progress and status effects are replaced together from the snapshot;
/// every other part of `live` is carried forward unchanged.
pub fn apply_encounter_snapshot<S>(live: &S, snapshot: &Snapshot) -> S
where
    S: EncounterSections + Clone,
{
    let mut next = live.clone();
    let (spell, status) = snapshot.state.clone().into_sections();
    next.replace_sections(spell, status);
    next
}
