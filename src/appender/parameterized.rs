use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::{Error, Result};

/// The name of a parameter: synthetic for anonymous values, or given by
/// the caller for placeholders bound at finalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamName {
    Index(usize),
    Named(String),
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamName::Index(index) => write!(f, "{index}"),
            ParamName::Named(name) => write!(f, "{name}"),
        }
    }
}

/// How positional placeholders are written in the finalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterStyle {
    /// `?`
    #[default]
    Positional,
    /// `$1`, `$2`, ...
    Numbered,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Param(ParamName),
}

#[derive(Debug, Clone, PartialEq)]
struct Binding {
    value: Option<Value>,
    expandable: bool,
}

/// SQL text with named placeholders, and the values bound so far.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterizedSql {
    segments: Vec<Segment>,
    bindings: IndexMap<ParamName, Binding>,
    next_index: usize,
}

impl ParameterizedSql {
    pub(crate) fn push_text(&mut self, text: &str) {
        match self.segments.last_mut() {
            Some(Segment::Text(last)) => last.push_str(text),
            _ => self.segments.push(Segment::Text(text.to_string())),
        }
    }

    pub(crate) fn push_value(&mut self, value: Value) -> ParamName {
        self.next_index += 1;
        let name = ParamName::Index(self.next_index);

        self.bindings.insert(
            name.clone(),
            Binding {
                value: Some(value),
                expandable: false,
            },
        );
        self.segments.push(Segment::Param(name.clone()));

        name
    }

    pub(crate) fn push_named(&mut self, name: &str, expandable: bool) -> ParamName {
        let name = ParamName::Named(name.to_string());

        self.bindings
            .entry(name.clone())
            .and_modify(|binding| binding.expandable |= expandable)
            .or_insert(Binding {
                value: None,
                expandable,
            });
        self.segments.push(Segment::Param(name.clone()));

        name
    }

    /// Supplies the runtime value of a named placeholder. Binding a name
    /// absent from the text has no effect.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Some(binding) = self.bindings.get_mut(&ParamName::Named(name.to_string())) {
            binding.value = Some(value.into());
        }

        self
    }

    /// Names of the parameters, in first occurrence order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParamName> {
        self.bindings.keys()
    }

    /// Whether every placeholder has a value.
    pub fn is_bound(&self) -> bool {
        self.bindings.values().all(|binding| binding.value.is_some())
    }

    /// The text with placeholders written as `:name`.
    pub fn template(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.clone(),
                Segment::Param(name) => format!(":{name}"),
            })
            .collect()
    }

    /// Finalizes with `?` placeholders.
    pub fn finalize(&self) -> Result<PreparedSql> {
        self.finalize_with(ParameterStyle::Positional)
    }

    /// Numbers placeholders in order of appearance, expanding the
    /// expandable ones to as many placeholders as their value has items.
    ///
    /// ```rust
    /// # use sqlweave::{ast::*, renderer::{Prepared, Renderer}, appender::ParameterStyle};
    /// # fn main() -> sqlweave::Result<()> {
    /// let mut catalog = Catalog::default();
    /// let toto = catalog.add_table("Toto");
    /// let a = catalog.add_column(toto, "a", ValueType::Integer);
    /// let b = catalog.add_column(toto, "b", ValueType::Integer);
    ///
    /// let query = Query::select([a]).from(toto).where_(a.in_named("ids")).and(b.equals(param("b")));
    ///
    /// let prepared = Prepared::build(&catalog, &query.into())
    ///     .bind("ids", vec![4, 5])
    ///     .bind("b", 6)
    ///     .finalize_with(ParameterStyle::Numbered)?;
    ///
    /// assert_eq!("select Toto.a from Toto where Toto.a in ($1, $2) and Toto.b = $3", prepared.sql());
    /// # Ok(())
    /// # }
    /// ```
    pub fn finalize_with(&self, style: ParameterStyle) -> Result<PreparedSql> {
        let mut sql = String::new();
        let mut values = BTreeMap::new();

        let mut placeholder = |sql: &mut String, value: Value| {
            let position = values.len() + 1;

            match style {
                ParameterStyle::Positional => sql.push('?'),
                ParameterStyle::Numbered => {
                    sql.push('$');
                    sql.push_str(&position.to_string());
                }
            }

            values.insert(position, value);
        };

        for segment in &self.segments {
            let name = match segment {
                Segment::Text(text) => {
                    sql.push_str(text);
                    continue;
                }
                Segment::Param(name) => name,
            };

            let binding = self
                .bindings
                .get(name)
                .ok_or_else(|| Error::UnboundParameter(name.to_string()))?;

            match (&binding.value, binding.expandable) {
                (Some(Value::Array(items)), true) => {
                    for (index, item) in items.iter().enumerate() {
                        if index > 0 {
                            sql.push_str(", ");
                        }

                        placeholder(&mut sql, item.clone());
                    }
                }
                (Some(value), _) => placeholder(&mut sql, value.clone()),
                (None, true) => return Err(Error::MissingExpansionSize(name.to_string())),
                (None, false) => return Err(Error::UnboundParameter(name.to_string())),
            }
        }

        trace!(
            parameters = self.bindings.len(),
            positions = values.len(),
            "statement finalized"
        );

        Ok(PreparedSql { sql, values })
    }
}

/// SQL text ready for execution, with the value of each 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSql {
    sql: String,
    values: BTreeMap<usize, Value>,
}

impl PreparedSql {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &BTreeMap<usize, Value> {
        &self.values
    }

    pub fn into_parts(self) -> (String, BTreeMap<usize, Value>) {
        (self.sql, self.values)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sql() -> ParameterizedSql {
        let mut sql = ParameterizedSql::default();

        sql.push_text("a = ");
        sql.push_value(json!(1));
        sql.push_text(" and b in (");
        sql.push_named("bs", true);
        sql.push_text(") and c = ");
        sql.push_named("c", false);
        sql.push_text(" and d = ");
        sql.push_named("c", false);

        sql
    }

    #[test]
    fn expansion_renumbers_following_positions() {
        let prepared = sql()
            .bind("bs", json!([2, 3, 4]))
            .bind("c", "x")
            .finalize_with(ParameterStyle::Numbered)
            .unwrap();

        assert_eq!(
            "a = $1 and b in ($2, $3, $4) and c = $5 and d = $6",
            prepared.sql()
        );
        assert_eq!(
            BTreeMap::from([
                (1, json!(1)),
                (2, json!(2)),
                (3, json!(3)),
                (4, json!(4)),
                (5, json!("x")),
                (6, json!("x")),
            ]),
            *prepared.values()
        );
    }

    #[test]
    fn expandable_without_value_is_an_error() {
        let error = sql().bind("c", 1).finalize().unwrap_err();

        assert!(matches!(error, Error::MissingExpansionSize(name) if name == "bs"));
    }

    #[test]
    fn plain_placeholder_without_value_is_an_error() {
        let error = sql().bind("bs", json!([1])).finalize().unwrap_err();

        assert!(matches!(error, Error::UnboundParameter(name) if name == "c"));
    }

    #[test]
    fn template_shows_names() {
        assert_eq!(
            "a = :1 and b in (:bs) and c = :c and d = :c",
            sql().template()
        );
        assert!(!sql().is_bound());
    }

    #[test]
    fn scalar_value_of_expandable_placeholder_is_a_single_parameter() {
        let prepared = sql().bind("bs", 7).bind("c", 8).finalize().unwrap();

        assert_eq!("a = ? and b in (?) and c = ? and d = ?", prepared.sql());
        assert_eq!(4, prepared.values().len());
    }
}
