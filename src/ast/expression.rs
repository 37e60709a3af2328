use serde_json::Value;

use super::{Catalog, ColumnId, Function, ValueType};

/// An object that can be aliased.
pub trait Aliasable {
    type Target;

    /// Alias the item for usage elsewhere in the query.
    fn alias<T>(self, alias: T) -> Self::Target
    where
        T: Into<String>;
}

/// A selectable: something that can be positioned in a projection, on the
/// left side of a criterion or as a compared value.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub(crate) kind: ExpressionKind,
    pub(crate) alias: Option<String>,
}

impl Expression {
    /// The type of the expression, dictates how it's implemented in the query.
    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    /// The name alias of the expression, how it can referred in the query.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The declared type of the values this expression yields, when known.
    pub fn value_type(&self, catalog: &Catalog) -> Option<ValueType> {
        match &self.kind {
            ExpressionKind::Column(column) => Some(catalog.column_def(*column).value_type.clone()),
            ExpressionKind::Function(function) => function.value_type(catalog),
            ExpressionKind::Parameterized(value) => Some(match value {
                Value::Bool(_) => ValueType::Boolean,
                Value::Number(n) if n.is_f64() => ValueType::Double,
                Value::Number(_) => ValueType::BigInt,
                Value::String(_) => ValueType::Text,
                _ => ValueType::Json,
            }),
            ExpressionKind::Raw(_) => None,
        }
    }

    /// The name under which the expression is exposed once projected: its
    /// alias if any, else the column name, function name or raw text.
    pub fn projected_name(&self, catalog: &Catalog) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }

        match &self.kind {
            ExpressionKind::Column(column) => catalog.column_def(*column).name.clone(),
            ExpressionKind::Function(function) => function.name().to_string(),
            ExpressionKind::Raw(text) => text.clone(),
            ExpressionKind::Parameterized(value) => value.to_string(),
        }
    }
}

/// An expression we can compare and use in database queries.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// Anything that we must parameterize before querying
    Parameterized(Value),
    /// Will be rendered as-is to the SQL statement. Carefully escape, if needed.
    Raw(String),
    /// A column of a table registered in the catalog
    Column(ColumnId),
    /// A database function call
    Function(Box<Function>),
}

/// A quick alias to create a raw value expression.
pub fn raw(value: impl Into<String>) -> Expression {
    Expression::from(ExpressionKind::Raw(value.into()))
}

impl From<Function> for Expression {
    fn from(f: Function) -> Self {
        Expression {
            kind: ExpressionKind::Function(Box::new(f)),
            alias: None,
        }
    }
}

impl From<ColumnId> for Expression {
    fn from(column: ColumnId) -> Self {
        Expression {
            kind: ExpressionKind::Column(column),
            alias: None,
        }
    }
}

impl<T> From<T> for Expression
where
    T: Into<Value>,
{
    fn from(p: T) -> Self {
        Expression {
            kind: ExpressionKind::Parameterized(p.into()),
            alias: None,
        }
    }
}

impl From<ExpressionKind> for Expression {
    fn from(kind: ExpressionKind) -> Self {
        Self { kind, alias: None }
    }
}

impl Aliasable for Expression {
    type Target = Expression;

    fn alias<T>(mut self, alias: T) -> Self::Target
    where
        T: Into<String>,
    {
        self.alias = Some(alias.into());
        self
    }
}

impl Aliasable for ColumnId {
    type Target = Expression;

    fn alias<T>(self, alias: T) -> Self::Target
    where
        T: Into<String>,
    {
        Expression::from(self).alias(alias)
    }
}

impl Aliasable for Function {
    type Target = Expression;

    fn alias<T>(self, alias: T) -> Self::Target
    where
        T: Into<String>,
    {
        Expression::from(self).alias(alias)
    }
}
