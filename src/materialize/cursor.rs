use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// The current row of a result.
pub trait Row {
    /// The value of the column labelled `label`.
    fn get(&self, label: &str) -> Result<Value>;

    /// The value of the column at `index`, starting at 0.
    fn get_at(&self, index: usize) -> Result<Value>;
}

impl dyn Row + '_ {
    /// Reads a column as a typed value.
    ///
    /// ```rust
    /// # use sqlweave::materialize::*;
    /// let mut cursor = InMemoryCursor::new(["id", "name"]).with_row([1.into(), "Ann".into()]);
    /// cursor.advance().unwrap();
    ///
    /// let row: &dyn Row = &cursor;
    /// assert_eq!(1_i64, row.read::<i64>("id").unwrap());
    /// assert_eq!(Some(String::from("Ann")), row.read("name").unwrap());
    /// ```
    pub fn read<T: DeserializeOwned>(&self, label: &str) -> Result<T> {
        let value = self.get(label)?;

        serde_json::from_value(value).map_err(|source| Error::ColumnConversion {
            column: label.to_string(),
            source,
        })
    }
}

/// A forward-only result, positioned before its first row until advanced.
pub trait ResultCursor: Row {
    /// Moves to the next row. Returns `false` once past the last row.
    fn advance(&mut self) -> Result<bool>;
}

/// A result held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryCursor {
    labels: Vec<String>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
}

impl InMemoryCursor {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InMemoryCursor {
            labels: labels.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            position: None,
        }
    }

    pub fn with_row<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.push_row(values);
        self
    }

    pub fn push_row<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.rows.push(values.into_iter().collect());
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn current(&self) -> Result<&[Value]> {
        self.position
            .and_then(|position| self.rows.get(position))
            .map(Vec::as_slice)
            .ok_or_else(|| Error::Cursor(anyhow!("the cursor is not positioned on a row")))
    }
}

impl Row for InMemoryCursor {
    fn get(&self, label: &str) -> Result<Value> {
        let index = self
            .labels
            .iter()
            .position(|candidate| candidate == label)
            .ok_or_else(|| Error::ColumnNotFound(label.to_string()))?;

        self.get_at(index)
    }

    fn get_at(&self, index: usize) -> Result<Value> {
        let row = self.current()?;

        match row.get(index) {
            Some(value) => Ok(value.clone()),
            None if index < self.labels.len() => Ok(Value::Null),
            None => Err(Error::ColumnIndexOutOfBounds(index)),
        }
    }
}

impl ResultCursor for InMemoryCursor {
    fn advance(&mut self) -> Result<bool> {
        let next = self.position.map_or(0, |position| position + 1);
        self.position = Some(next.min(self.rows.len()));

        Ok(next < self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_by_label_and_position() {
        let mut cursor = InMemoryCursor::new(["a", "b"])
            .with_row([json!(1), json!("x")])
            .with_row([json!(2)]);

        assert!(matches!(cursor.get("a"), Err(Error::Cursor(_))));

        assert!(cursor.advance().unwrap());
        assert_eq!(json!("x"), cursor.get("b").unwrap());
        assert_eq!(json!(1), cursor.get_at(0).unwrap());

        assert!(cursor.advance().unwrap());
        assert_eq!(Value::Null, cursor.get("b").unwrap());
        assert!(matches!(cursor.get("c"), Err(Error::ColumnNotFound(label)) if label == "c"));
        assert!(matches!(cursor.get_at(5), Err(Error::ColumnIndexOutOfBounds(5))));

        assert!(!cursor.advance().unwrap());
        assert!(!cursor.advance().unwrap());
    }

    #[test]
    fn json_columns_read_into_structs() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Address {
            city: String,
            zip: Option<String>,
        }

        let mut cursor =
            InMemoryCursor::new(["address"]).with_row([json!({ "city": "Lyon", "zip": null })]);
        cursor.advance().unwrap();

        let row: &dyn Row = &cursor;
        let address: Address = row.read("address").unwrap();

        assert_eq!(
            Address {
                city: String::from("Lyon"),
                zip: None
            },
            address
        );
    }

    #[test]
    fn typed_read_reports_the_column() {
        let mut cursor = InMemoryCursor::new(["a"]).with_row([json!("not a number")]);
        cursor.advance().unwrap();

        let row: &dyn Row = &cursor;
        let error = row.read::<i32>("a").unwrap_err();

        assert!(matches!(error, Error::ColumnConversion { column, .. } if column == "a"));
    }
}
