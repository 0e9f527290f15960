use serde::Serialize;

/// Role of a card in the visible part of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardPhase {
    /// Just swiped away, still animating out
    Previous,
    Current,
    Next,
    /// Deepest visible card
    Last,
}

/// The handful of result indices that are on screen around the current one.
///
/// Recomputed from `(position, len)` on every move instead of tagging
/// individual restaurants, so no stale phase can survive a list replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CardWindow {
    pub previous: Option<usize>,
    pub current: Option<usize>,
    pub next: Option<usize>,
    pub last: Option<usize>,
}

impl CardWindow {
    #[must_use]
    pub fn around(position: usize, len: usize) -> Self {
        if position >= len {
            return Self::default();
        }
        let within = |index: usize| (index < len).then_some(index);
        Self {
            previous: position.checked_sub(1),
            current: Some(position),
            next: within(position + 1),
            last: within(position + 2),
        }
    }

    #[must_use]
    pub fn phase_of(&self, index: usize) -> Option<CardPhase> {
        self.iter()
            .find_map(|(phase, at)| (at == index).then_some(phase))
    }

    /// Visible cards from the bottom of the stack to the top.
    pub fn iter(&self) -> impl Iterator<Item = (CardPhase, usize)> + '_ {
        [
            (CardPhase::Last, self.last),
            (CardPhase::Next, self.next),
            (CardPhase::Current, self.current),
            (CardPhase::Previous, self.previous),
        ]
        .into_iter()
        .filter_map(|(phase, index)| index.map(|index| (phase, index)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
