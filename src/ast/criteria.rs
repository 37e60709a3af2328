use serde_json::Value;

use super::{ColumnId, Expression, Operator};

/// The boolean combinator placed before a criterion that is not the first of its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

/// What is checked against the left side of a column criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Rendered verbatim after the left side, e.g. `= 1`.
    Text(String),
    Operator(Operator),
}

/// A piece of a raw criterion. Fragments are rendered one after the other
/// without any separator.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Expression(Expression),
    Operator(Operator),
    Value(Value),
    Criteria(Criteria),
}

impl Fragment {
    pub fn value(value: impl Into<Value>) -> Self {
        Fragment::Value(value.into())
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Text(text.to_string())
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::Text(text)
    }
}

impl From<ColumnId> for Fragment {
    fn from(column: ColumnId) -> Self {
        Fragment::Expression(column.into())
    }
}

impl From<Expression> for Fragment {
    fn from(expression: Expression) -> Self {
        Fragment::Expression(expression)
    }
}

impl From<Operator> for Fragment {
    fn from(operator: Operator) -> Self {
        Fragment::Operator(operator)
    }
}

impl From<Criteria> for Fragment {
    fn from(criteria: Criteria) -> Self {
        Fragment::Criteria(criteria)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CriterionKind {
    /// A selectable checked against a condition.
    Column { left: Expression, condition: Condition },
    /// Free-form fragments.
    Raw(Vec<Fragment>),
    /// A nested chain, rendered between parentheses.
    Criteria(Criteria),
}

/// One element of a [Criteria] chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub(crate) combinator: Option<LogicalOperator>,
    pub(crate) kind: CriterionKind,
}

impl Criterion {
    pub fn column(left: impl Into<Expression>, condition: Condition) -> Self {
        Criterion {
            combinator: None,
            kind: CriterionKind::Column {
                left: left.into(),
                condition,
            },
        }
    }

    /// A criterion made of free-form fragments.
    ///
    /// ```rust
    /// # use sqlweave::{ast::*, renderer::{Inline, Renderer}};
    /// let mut catalog = Catalog::default();
    /// let toto = catalog.add_table("Toto");
    /// let a = catalog.add_column(toto, "a", ValueType::Integer);
    ///
    /// let query = Query::select([a])
    ///     .from(toto)
    ///     .where_(Criterion::raw(["coalesce(".into(), Fragment::from(a), ", 0) ".into(), eq(1).into()]));
    ///
    /// assert_eq!(
    ///     "select Toto.a from Toto where coalesce(Toto.a, 0) = 1",
    ///     Inline::build(&catalog, &query.into())
    /// );
    /// ```
    pub fn raw<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Fragment>,
    {
        Criterion {
            combinator: None,
            kind: CriterionKind::Raw(fragments.into_iter().collect()),
        }
    }

    pub fn combinator(&self) -> Option<LogicalOperator> {
        self.combinator
    }

    pub fn kind(&self) -> &CriterionKind {
        &self.kind
    }

    pub(crate) fn combined_with(mut self, combinator: LogicalOperator) -> Self {
        self.combinator = Some(combinator);
        self
    }
}

impl From<Criteria> for Criterion {
    fn from(criteria: Criteria) -> Self {
        Criterion {
            combinator: None,
            kind: CriterionKind::Criteria(criteria),
        }
    }
}

/// An ordered chain of criteria forming a boolean tree through nesting.
///
/// Grouping is structural: a nested `Criteria` is always rendered between
/// parentheses, so no operator precedence is involved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    pub(crate) criteria: Vec<Criterion>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a chain with the given criterion.
    pub fn of(criterion: impl Into<Criterion>) -> Self {
        Criteria {
            criteria: vec![criterion.into()],
        }
    }

    pub fn and(self, criterion: impl Into<Criterion>) -> Self {
        self.add(LogicalOperator::And, criterion)
    }

    pub fn or(self, criterion: impl Into<Criterion>) -> Self {
        self.add(LogicalOperator::Or, criterion)
    }

    pub fn add(mut self, combinator: LogicalOperator, criterion: impl Into<Criterion>) -> Self {
        self.push(combinator, criterion);
        self
    }

    pub fn push(&mut self, combinator: LogicalOperator, criterion: impl Into<Criterion>) {
        self.criteria
            .push(criterion.into().combined_with(combinator));
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }
}
