use super::participant::{ParticipantId, SuccessLevel};

/// Outcome of one participant's test in the current round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollResult {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub success_level: SuccessLevel,
}

impl RollResult {
    pub fn new(
        participant_id: ParticipantId,
        participant_name: impl Into<String>,
        success_level: SuccessLevel,
    ) -> Self {
        Self {
            participant_id,
            participant_name: participant_name.into(),
            success_level,
        }
    }
}

/// Ordered results for one side, holding at most one entry per participant.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResultList(Vec<RollResult>);

impl ResultList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns a list with `entry` merged in.
    ///
    /// An existing entry for the same participant is replaced in place, so the
    /// participant keeps its position; otherwise the entry is appended.
    #[must_use]
    pub fn upsert(&self, entry: RollResult) -> Self {
        let mut entries = self.0.clone();
        match entries
            .iter_mut()
            .find(|r| r.participant_id == entry.participant_id)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Self(entries)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&RollResult> {
        self.0.iter().find(|r| &r.participant_id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RollResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowest success level, or `None` when nobody has rolled.
    pub fn lowest(&self) -> Option<SuccessLevel> {
        self.0.iter().map(|r| r.success_level).min()
    }

    /// Highest success level, or `None` when nobody has rolled.
    pub fn highest(&self) -> Option<SuccessLevel> {
        self.0.iter().map(|r| r.success_level).max()
    }
}

impl FromIterator<RollResult> for ResultList {
    fn from_iter<I: IntoIterator<Item = RollResult>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ResultList::new(), |list, entry| list.upsert(entry))
    }
}
