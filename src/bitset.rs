/// Fixed-size membership set over a closed integer domain.
use crate::field::FieldValueType;

const BLOCK_BITS: usize = u64::BITS as usize;

/// Set of integers from `[start, end]`, stored as a bitset
/// indexed by `value - start`.
///
/// Insertion is restricted to the domain, membership tests are total:
/// any value outside the domain is simply not a member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct DomainSet {
    start: FieldValueType,
    end: FieldValueType,
    blocks: Vec<u64>,
}

impl DomainSet {
    /// Panics if `end` is less than `start`.
    pub(crate) fn new(start: FieldValueType, end: FieldValueType) -> Self {
        if end < start {
            panic!("domain end is less than domain start");
        }

        let len = (end - start + 1) as usize;
        Self {
            start,
            end,
            blocks: vec![0; len.div_ceil(BLOCK_BITS)],
        }
    }

    #[inline]
    pub(crate) fn start(&self) -> FieldValueType {
        self.start
    }

    #[inline]
    pub(crate) fn end(&self) -> FieldValueType {
        self.end
    }

    /// Panics if `value` is out of the domain, caller is responsible for validation.
    pub(crate) fn insert(&mut self, value: FieldValueType) {
        if value < self.start || value > self.end {
            panic!("value {value} is out of domain {}..={}", self.start, self.end);
        }

        let index = (value - self.start) as usize;
        self.blocks[index / BLOCK_BITS] |= 1 << (index % BLOCK_BITS);
    }

    /// Marks the whole domain as members.
    pub(crate) fn fill(&mut self) {
        let len = (self.end - self.start + 1) as usize;
        for (block_index, block) in self.blocks.iter_mut().enumerate() {
            let used = (len - block_index * BLOCK_BITS).min(BLOCK_BITS);
            *block = if used == BLOCK_BITS { u64::MAX } else { (1 << used) - 1 };
        }
    }

    #[inline]
    pub(crate) fn contains(&self, value: FieldValueType) -> bool {
        if value < self.start || value > self.end {
            return false;
        }

        let index = (value - self.start) as usize;
        self.blocks[index / BLOCK_BITS] & (1 << (index % BLOCK_BITS)) != 0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.blocks.iter().all(|block| *block == 0)
    }

    /// Highest member of the set, or `None` if the set is empty.
    pub(crate) fn last(&self) -> Option<FieldValueType> {
        for (block_index, block) in self.blocks.iter().enumerate().rev() {
            if *block != 0 {
                let bit = BLOCK_BITS - 1 - block.leading_zeros() as usize;
                return Some(self.start + (block_index * BLOCK_BITS + bit) as FieldValueType);
            }
        }

        None
    }

    /// Members in ascending order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = FieldValueType> + '_ {
        (self.start..=self.end).filter(|value| self.contains(*value))
    }
}
