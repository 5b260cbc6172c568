use core::fmt;

use super::Action;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// A playable card contributing one or more actions to a spell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub actions: Vec<Action>,
}

impl Card {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: CardId(id),
            name: name.into(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// Actions of a spell in play order: card order first, then action order
/// within each card.
pub fn flatten_cards(cards: &[Card]) -> impl Iterator<Item = &Action> + '_ {
    cards.iter().flat_map(|card| card.actions.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionId, DamageAction};
    use crate::action::Element;

    #[test]
    fn flattening_keeps_card_then_action_order() {
        let cards = vec![
            Card::new(1, "first")
                .with_action(Action::damage(10, "a", DamageAction::flat(1, Element::Fire)))
                .with_action(Action::damage(11, "b", DamageAction::flat(2, Element::Fire))),
            Card::new(2, "second")
                .with_action(Action::damage(20, "c", DamageAction::flat(3, Element::Cold))),
        ];

        let ids: Vec<ActionId> = flatten_cards(&cards).map(|a| a.id).collect();
        assert_eq!(ids, vec![ActionId(10), ActionId(11), ActionId(20)]);
    }
}
