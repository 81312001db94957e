//! @ai:module:intent Structured model of the narrative analysis
//! @ai:module:layer domain
//! @ai:module:public_api NarrativeSection, NarrativeSections
//! @ai:module:stateless true

use crate::prompt::SectionId;
use serde::Serialize;

/// @ai:intent One analysis section recovered from model text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeSection {
    pub id: SectionId,
    /// Heading text as written by the model, decoration removed
    pub heading: String,
    pub body: String,
}

/// @ai:intent Sections found in a narrative, kept in report order
/// @ai:invariant at most one entry per SectionId, sorted by SectionId
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NarrativeSections {
    sections: Vec<NarrativeSection>,
}

impl NarrativeSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Add a section, keeping the first one seen for each id
    /// @ai:post returns false when the id was already present
    pub fn insert(&mut self, section: NarrativeSection) -> bool {
        match self.sections.binary_search_by_key(&section.id, |s| s.id) {
            Ok(_) => false,
            Err(pos) => {
                self.sections.insert(pos, section);
                true
            }
        }
    }

    pub fn get(&self, id: SectionId) -> Option<&NarrativeSection> {
        self.sections
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|pos| &self.sections[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &NarrativeSection> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Expected sections that were not found, in report order
    pub fn missing(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|id| self.get(*id).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.sections.len() == SectionId::ALL.len()
    }
}
