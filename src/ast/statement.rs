use crate::ast::{Query, Union};

/// A renderable statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Box<Query>),
    Union(Box<Union>),
}

impl Statement {
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Statement::Union(_))
    }
}

impl From<Query> for Statement {
    fn from(query: Query) -> Self {
        Statement::Query(Box::new(query))
    }
}

impl From<Union> for Statement {
    fn from(union: Union) -> Self {
        Statement::Union(Box::new(union))
    }
}
