use super::{ColumnId, TableId};

/// How the right side of a join is combined with the left side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDirection {
    Inner,
    LeftOuter,
    RightOuter,
}

impl JoinDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinDirection::Inner => "inner join",
            JoinDirection::LeftOuter => "left outer join",
            JoinDirection::RightOuter => "right outer join",
        }
    }
}

/// A representation of a `JOIN` statement.
#[derive(Debug, PartialEq, Clone)]
pub enum Join {
    /// `cross join <right>`
    Cross { right: TableId },
    /// `<direction> <right> on <free text>`
    Raw {
        direction: JoinDirection,
        right: TableId,
        on: String,
    },
    /// `<direction> <right> on left = right`, the right table being the one
    /// of the right column.
    Column {
        direction: JoinDirection,
        left: ColumnId,
        right: ColumnId,
    },
    /// A composite key join, columns are paired by position.
    Key {
        direction: JoinDirection,
        left: Vec<ColumnId>,
        right: Vec<ColumnId>,
    },
}

impl Join {
    /// The table added by this join. Absent only for a key join without columns.
    pub fn right_table(&self) -> Option<TableId> {
        match self {
            Join::Cross { right } | Join::Raw { right, .. } => Some(*right),
            Join::Column { right, .. } => Some(right.table_id),
            Join::Key { right, .. } => right.first().map(|column| column.table_id),
        }
    }

    pub fn direction(&self) -> Option<JoinDirection> {
        match self {
            Join::Cross { .. } => None,
            Join::Raw { direction, .. }
            | Join::Column { direction, .. }
            | Join::Key { direction, .. } => Some(*direction),
        }
    }
}
