use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::{Bean, BeanKey, MaterializationContext, Row};
use crate::Result;

/// Creates the bean of a row, or finds it in the identity cache.
pub struct BeanFactory<T> {
    key_columns: Option<Vec<String>>,
    construct: Rc<dyn Fn(&BeanKey) -> T>,
}

impl<T: 'static> BeanFactory<T> {
    /// A factory identifying beans by the values of `columns`.
    ///
    /// Rows with a `null` key component have no bean. Rows repeating a key
    /// already read during the traversal reuse its bean.
    pub fn keyed<I, S, F>(columns: I, construct: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&BeanKey) -> T + 'static,
    {
        BeanFactory {
            key_columns: Some(columns.into_iter().map(Into::into).collect()),
            construct: Rc::new(construct),
        }
    }

    /// A factory creating a fresh bean for every row.
    pub fn no_identifier<F>(construct: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        BeanFactory {
            key_columns: None,
            construct: Rc::new(move |_: &BeanKey| construct()),
        }
    }

    pub fn key_columns(&self) -> Option<&[String]> {
        self.key_columns.as_deref()
    }

    /// The bean of the current row, and whether it was created by this call.
    pub fn produce(
        &self,
        row: &dyn Row,
        ctx: &mut MaterializationContext,
    ) -> Result<Option<(Bean<T>, bool)>> {
        let Some(columns) = &self.key_columns else {
            let bean = Bean::new((self.construct)(&BeanKey::new(Vec::new())));
            ctx.retain(&bean);

            return Ok(Some((bean, true)));
        };

        let key = BeanKey::new(
            columns
                .iter()
                .map(|column| row.get(column))
                .collect::<Result<Vec<_>>>()?,
        );

        if key.is_null() {
            return Ok(None);
        }

        if let Some(bean) = ctx.cached::<T>(&key) {
            return Ok(Some((bean, false)));
        }

        let bean = Bean::new((self.construct)(&key));
        ctx.cache(key, &bean);

        Ok(Some((bean, true)))
    }

    /// The same factory reading its key from renamed columns. Columns
    /// missing from `aliases` keep their label.
    pub fn with_aliases(&self, aliases: &HashMap<String, String>) -> Self {
        BeanFactory {
            key_columns: self.key_columns.as_ref().map(|columns| {
                columns
                    .iter()
                    .map(|column| aliases.get(column).unwrap_or(column).clone())
                    .collect()
            }),
            construct: Rc::clone(&self.construct),
        }
    }

    /// A factory with the same key columns building another bean type.
    pub fn substitute<U, F>(&self, construct: F) -> BeanFactory<U>
    where
        F: Fn(&BeanKey) -> U + 'static,
    {
        BeanFactory {
            key_columns: self.key_columns.clone(),
            construct: Rc::new(construct),
        }
    }
}

impl<T> Clone for BeanFactory<T> {
    fn clone(&self) -> Self {
        BeanFactory {
            key_columns: self.key_columns.clone(),
            construct: Rc::clone(&self.construct),
        }
    }
}

impl<T> fmt::Debug for BeanFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanFactory")
            .field("key_columns", &self.key_columns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::materialize::{InMemoryCursor, ResultCursor};

    fn id_of(key: &BeanKey) -> i64 {
        key.single().and_then(|value| value.as_i64()).unwrap_or_default()
    }

    #[test]
    fn keyed_factory_reuses_cached_beans() {
        let factory = BeanFactory::keyed(["id"], id_of);
        let mut ctx = MaterializationContext::new();
        let mut cursor = InMemoryCursor::new(["id"])
            .with_row([json!(7)])
            .with_row([json!(7)])
            .with_row([json!(null)]);

        cursor.advance().unwrap();
        let (first, created) = factory.produce(&cursor, &mut ctx).unwrap().unwrap();
        assert!(created);
        assert_eq!(7, *first.borrow());

        cursor.advance().unwrap();
        let (again, created) = factory.produce(&cursor, &mut ctx).unwrap().unwrap();
        assert!(!created);
        assert_eq!(first, again);

        cursor.advance().unwrap();
        assert!(factory.produce(&cursor, &mut ctx).unwrap().is_none());
    }

    #[test]
    fn no_identifier_factory_always_creates() {
        let factory = BeanFactory::no_identifier(|| 0);
        let mut ctx = MaterializationContext::new();
        let mut cursor = InMemoryCursor::new(["id"])
            .with_row([json!(1)])
            .with_row([json!(1)]);

        cursor.advance().unwrap();
        let (first, _) = factory.produce(&cursor, &mut ctx).unwrap().unwrap();
        cursor.advance().unwrap();
        let (second, created) = factory.produce(&cursor, &mut ctx).unwrap().unwrap();

        assert!(created);
        assert_ne!(first, second);
        assert_eq!(0, ctx.cached_beans());
    }

    #[test]
    fn aliases_rename_key_columns() {
        let aliases = HashMap::from([(String::from("id"), String::from("book_id"))]);
        let factory = BeanFactory::keyed(["id", "version"], id_of).with_aliases(&aliases);

        assert_eq!(
            Some(&[String::from("book_id"), String::from("version")][..]),
            factory.key_columns()
        );
    }
}
