/// The `limit <count> [offset <offset>]` clause.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Limit {
    pub(crate) count: u64,
    pub(crate) offset: Option<u64>,
}

impl Limit {
    pub fn new(count: u64) -> Self {
        Limit {
            count,
            offset: None,
        }
    }

    pub fn with_offset(count: u64, offset: u64) -> Self {
        Limit {
            count,
            offset: Some(offset),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }
}
