use std::hash::{Hash, Hasher};

use serde_json::Value;

/// The identity of a bean, read from one or more key columns.
///
/// Keys are compared and hashed by content, so a composite key read again
/// from another row finds the same bean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanKey(Vec<Value>);

impl BeanKey {
    pub fn new(values: Vec<Value>) -> Self {
        BeanKey(values)
    }

    /// A key with a `null` component identifies no bean.
    pub fn is_null(&self) -> bool {
        self.0.iter().any(Value::is_null)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// The only component of a single column key.
    pub fn single(&self) -> Option<&Value> {
        match self.0.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }
}

impl Hash for BeanKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);

        for value in &self.0 {
            hash_value(value, state);
        }
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0_u8.hash(state),
        Value::Bool(b) => {
            1_u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2_u8.hash(state);
            n.to_string().hash(state);
        }
        Value::String(s) => {
            3_u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4_u8.hash(state);
            items.len().hash(state);

            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            5_u8.hash(state);
            map.len().hash(state);

            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));

            for (key, item) in entries {
                key.hash(state);
                hash_value(item, state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn composite_keys_match_by_content() {
        let mut beans = HashMap::new();
        beans.insert(BeanKey::new(vec![json!(1), json!("a")]), "first");

        let read_again = BeanKey::new(vec![json!(1), json!("a")]);

        assert_eq!(Some(&"first"), beans.get(&read_again));
        assert_eq!(None, beans.get(&BeanKey::new(vec![json!(1), json!("b")])));
    }

    #[test]
    fn any_null_component_makes_a_null_key() {
        assert!(BeanKey::new(vec![json!(1), Value::Null]).is_null());
        assert!(!BeanKey::new(vec![json!(1), json!(2)]).is_null());
        assert_eq!(Some(&json!(3)), BeanKey::new(vec![json!(3)]).single());
    }

    fn hash_of(key: &BeanKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn object_components_hash_by_content() {
        let first = BeanKey::new(vec![json!({ "city": "Lyon", "zip": "69001" })]);
        let same = BeanKey::new(vec![json!({ "zip": "69001", "city": "Lyon" })]);
        let other = BeanKey::new(vec![json!({ "city": "Nice", "zip": "06000" })]);

        assert_eq!(first, same);
        assert_eq!(hash_of(&first), hash_of(&same));
        assert_ne!(hash_of(&first), hash_of(&other));
    }
}
