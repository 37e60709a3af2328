use serde_json::Value;

use crate::{
    appender::{ParameterizedSql, SqlAppender},
    ast::Catalog,
    renderer::{NameEscaper, NoEscape, Renderer},
};

/// A visitor writing values as placeholders. The values are collected with
/// the text and numbered when the result is finalized.
#[derive(Debug)]
pub struct Prepared<'a> {
    appender: SqlAppender<'a>,
    escaper: Box<dyn NameEscaper>,
}

impl<'a> Prepared<'a> {
    pub fn with_escaper(catalog: &'a Catalog, escaper: impl NameEscaper + 'static) -> Self {
        Prepared {
            appender: SqlAppender::new(catalog),
            escaper: Box::new(escaper),
        }
    }
}

impl<'a> Renderer<'a> for Prepared<'a> {
    type Output = ParameterizedSql;

    fn new(catalog: &'a Catalog) -> Self {
        Self::with_escaper(catalog, NoEscape)
    }

    fn finish(self) -> ParameterizedSql {
        self.appender.into_parameterized()
    }

    fn appender(&self) -> &SqlAppender<'a> {
        &self.appender
    }

    fn appender_mut(&mut self) -> &mut SqlAppender<'a> {
        &mut self.appender
    }

    fn escaper(&self) -> &dyn NameEscaper {
        self.escaper.as_ref()
    }

    fn visit_value(&mut self, value: &Value) {
        self.appender.push_value(value.clone());
    }

    fn visit_named(&mut self, name: &str, expandable: bool) {
        self.appender.push_named(name, expandable);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        appender::ParameterStyle,
        ast::*,
        renderer::{Prepared, Renderer},
        Error,
    };

    fn expected_values<T>(sql: &'static str, params: Vec<T>) -> (String, Vec<Value>)
    where
        T: Into<Value>,
    {
        (
            String::from(sql),
            params.into_iter().map(|p| p.into()).collect(),
        )
    }

    fn build(catalog: &Catalog, statement: impl Into<Statement>) -> (String, Vec<Value>) {
        let prepared = Prepared::build(catalog, &statement.into())
            .finalize()
            .unwrap();
        let (sql, values) = prepared.into_parts();

        (sql, values.into_values().collect())
    }

    #[test]
    fn test_toto_example() {
        let expected = expected_values(
            "select t.a, t.b from Toto as t where t.b = ? and t.a in (?, ?, ?) limit ?",
            vec![1, 1, 2, 3, 2],
        );

        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);
        let b = catalog.add_column(toto, "b", ValueType::Integer);

        let query = Query::select([a, b])
            .from_aliased(toto, "t")
            .where_(b.equals(1))
            .and(a.in_values([1, 2, 3]))
            .limit(2);

        assert_eq!(expected, build(&catalog, query));
    }

    #[test]
    fn test_values_follow_occurrence_order() {
        let expected = expected_values(
            "select Toto.a, ? from Toto where (Toto.a between ? and ? or Toto.b like ?) and Toto.a <> ? limit ? offset ?",
            vec![json!("x"), json!(1), json!(5), json!("%y"), json!(7), json!(10), json!(20)],
        );

        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);
        let b = catalog.add_column(toto, "b", ValueType::Text);

        let query = Query::select([Expression::from(a), Expression::from("x")])
            .from(toto)
            .where_(Criteria::of(a.between(1, 5)).or(b.ends_with("y")))
            .and(a.not_equals(7))
            .limit_offset(10, 20);

        assert_eq!(expected, build(&catalog, query));
    }

    #[test]
    fn test_null_checks_bind_nothing() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);

        let query = Query::select([a])
            .from(toto)
            .where_(a.equals(Value::Null))
            .and(a.in_values([Value::Null]));

        let (sql, values) = build(&catalog, query);

        assert_eq!(
            "select Toto.a from Toto where Toto.a is null and Toto.a in (null)",
            sql
        );
        assert!(values.is_empty());
    }

    #[test]
    fn test_named_parameter_reuses_its_value() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);
        let b = catalog.add_column(toto, "b", ValueType::Integer);

        let query = Query::select([a])
            .from(toto)
            .where_(a.equals(param("v")))
            .or(b.greater_than(param("v")));

        let prepared = Prepared::build(&catalog, &query.into())
            .bind("v", 3)
            .finalize_with(ParameterStyle::Numbered)
            .unwrap();

        assert_eq!(
            "select Toto.a from Toto where Toto.a = $1 or Toto.b > $2",
            prepared.sql()
        );
        assert_eq!(vec![&json!(3), &json!(3)], prepared.values().values().collect::<Vec<_>>());
    }

    #[test]
    fn test_named_in_list_requires_its_size() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);

        let query = Query::select([a]).from(toto).where_(a.in_named("ids"));
        let parameterized = Prepared::build(&catalog, &query.into());

        assert!(matches!(
            parameterized.finalize(),
            Err(Error::MissingExpansionSize(name)) if name == "ids"
        ));

        let prepared = parameterized.bind("ids", vec![1, 2, 3]).finalize().unwrap();
        assert_eq!(
            "select Toto.a from Toto where Toto.a in (?, ?, ?)",
            prepared.sql()
        );
        assert_eq!(3, prepared.values().len());
    }

    #[test]
    fn test_pseudo_table_values_come_first_when_joined_first() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);

        let inner: Query = Query::select([a]).from(toto).where_(a.greater_than(1)).into();
        let filtered = inner.as_pseudo_table(&mut catalog, None);
        let filtered_a = catalog.column(filtered, "a").unwrap();

        let other = catalog.clone_table(toto);
        let other_a = catalog.column(other, "a").unwrap();

        let query = Query::select([other_a])
            .from_aliased(other, "o")
            .inner_join(other_a, filtered_a)
            .with_alias(filtered, "f")
            .where_(other_a.lower_than(9));

        let expected = expected_values(
            "select o.a from Toto as o inner join (select Toto.a from Toto where Toto.a > ?) as f on o.a = f.a where o.a < ?",
            vec![1, 9],
        );

        assert_eq!(expected, build(&catalog, query));
    }
}
