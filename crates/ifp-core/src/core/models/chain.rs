use super::ids::CompoundId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,                          // Chain identifier (e.g., 'A', 'B')
    pub(crate) compounds: Vec<CompoundId>, // Ordered list of compounds in this chain
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            compounds: Vec::new(),
        }
    }

    pub fn compounds(&self) -> &[CompoundId] {
        &self.compounds
    }

    /// Zero-based position of a compound within the chain.
    pub fn position_of(&self, compound_id: CompoundId) -> Option<usize> {
        self.compounds.iter().position(|&id| id == compound_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    #[test]
    fn position_of_reports_insertion_index() {
        let mut chain = Chain::new('A');
        let first = CompoundId::from(KeyData::from_ffi(1));
        let second = CompoundId::from(KeyData::from_ffi(2));
        chain.compounds.push(first);
        chain.compounds.push(second);
        assert_eq!(chain.position_of(first), Some(0));
        assert_eq!(chain.position_of(second), Some(1));
        assert_eq!(chain.position_of(CompoundId::from(KeyData::from_ffi(3))), None);
    }
}
