use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{Aliasable, Catalog, ColumnId, Expression, FromClause, JoinDirection, TableId};
use crate::{Error, Result};

/// A table joined in a [JoinTree].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinNode {
    table: TableId,
    alias: String,
    parent: Option<String>,
    direction: Option<JoinDirection>,
    left: Vec<ColumnId>,
    right: Vec<ColumnId>,
}

impl JoinNode {
    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The name of the node this one is joined to, absent for the root.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// Named tables joined together from a root, as a relation graph maps them.
///
/// Every node gets a unique alias. When a table is joined more than once
/// (a self join, or a cycle in the relation graph), it is cloned in the
/// catalog so that each occurrence keeps its own identity and alias.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTree {
    nodes: IndexMap<String, JoinNode>,
    used_aliases: HashSet<String>,
}

impl JoinTree {
    /// Starts a tree from its root table, aliased with the table name.
    pub fn new(catalog: &Catalog, name: impl Into<String>, root: TableId) -> Self {
        let alias = table_name(catalog, root);
        let mut nodes = IndexMap::new();

        nodes.insert(
            name.into(),
            JoinNode {
                table: root,
                alias: alias.clone(),
                parent: None,
                direction: None,
                left: Vec::new(),
                right: Vec::new(),
            },
        );

        JoinTree {
            nodes,
            used_aliases: HashSet::from([alias]),
        }
    }

    /// Joins a table to the node named `parent`. The `right` columns
    /// designate the joined table, the `left` ones are read on the parent
    /// table. Returns the id under which the joined table lives in the
    /// tree, which differs from the given one if the table was already
    /// part of the tree. Node names are unique: reusing one fails with
    /// [DuplicateJoin](Error::DuplicateJoin).
    ///
    /// ```rust
    /// # use sqlweave::{ast::*, Error};
    /// let mut catalog = Catalog::default();
    /// let person = catalog.add_table("Person");
    /// let id = catalog.add_column(person, "id", ValueType::BigInt);
    /// let friend_id = catalog.add_column(person, "friend_id", ValueType::BigInt);
    ///
    /// let mut tree = JoinTree::new(&catalog, "person", person);
    /// let friend = tree
    ///     .add_join(&mut catalog, "person", "friend", JoinDirection::LeftOuter, vec![friend_id], vec![id])
    ///     .unwrap();
    ///
    /// assert_ne!(person, friend);
    /// assert_eq!(Some("Person_Person"), tree.alias_of("friend"));
    ///
    /// let unknown = tree.add_join(&mut catalog, "nobody", "x", JoinDirection::Inner, vec![id], vec![id]);
    /// assert!(matches!(unknown, Err(Error::UnknownJoin(name)) if name == "nobody"));
    /// ```
    pub fn add_join(
        &mut self,
        catalog: &mut Catalog,
        parent: &str,
        name: impl Into<String>,
        direction: JoinDirection,
        left: Vec<ColumnId>,
        right: Vec<ColumnId>,
    ) -> Result<TableId> {
        let name: String = name.into();

        if self.nodes.contains_key(&name) {
            return Err(Error::DuplicateJoin(name));
        }

        let parent_node = self
            .nodes
            .get(parent)
            .ok_or_else(|| Error::UnknownJoin(parent.to_string()))?;

        let parent_table = parent_node.table;
        let parent_alias = parent_node.alias.clone();

        let left = left
            .into_iter()
            .map(|column| ColumnId::new(parent_table, column.column_index))
            .collect();

        let (table, right) = match right.first().map(ColumnId::table_id) {
            Some(table) if self.contains_table(table) => {
                let clone = catalog.clone_table(table);
                debug!(table = table.index(), clone = clone.index(), "table cloned for join");

                let right = right
                    .into_iter()
                    .map(|column| ColumnId::new(clone, column.column_index))
                    .collect();

                (clone, right)
            }
            Some(table) => (table, right),
            None => return Err(Error::UnknownJoin(parent.to_string())),
        };

        let alias = self.unique_alias(format!("{parent_alias}_{}", table_name(catalog, table)));

        self.nodes.insert(
            name,
            JoinNode {
                table,
                alias,
                parent: Some(parent.to_string()),
                direction: Some(direction),
                left,
                right,
            },
        );

        Ok(table)
    }

    pub fn node(&self, name: &str) -> Option<&JoinNode> {
        self.nodes.get(name)
    }

    pub fn table_of(&self, name: &str) -> Option<TableId> {
        self.nodes.get(name).map(JoinNode::table)
    }

    pub fn alias_of(&self, name: &str) -> Option<&str> {
        self.nodes.get(name).map(JoinNode::alias)
    }

    /// Node names, root first then in joining order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// The `from` clause joining every node, with their aliases.
    pub fn to_from(&self) -> FromClause {
        let mut from = FromClause::default();

        for node in self.nodes.values() {
            match node.direction {
                None => {
                    from.set_root(node.table);
                }
                Some(direction) => {
                    from.key_join(direction, node.left.clone(), node.right.clone());
                }
            }

            from.set_alias(node.table, node.alias.clone());
        }

        from
    }

    /// Every column of every node, labelled `<alias>_<column>`.
    pub fn select_all(&self, catalog: &Catalog) -> Vec<Expression> {
        self.nodes
            .values()
            .flat_map(|node| {
                catalog.columns(node.table).into_iter().map(move |column| {
                    let label = format!("{}_{}", node.alias, catalog.column_def(column).name());
                    Expression::from(column).alias(label)
                })
            })
            .collect()
    }

    /// The labels under which the columns of a node are selected by
    /// [select_all](Self::select_all), keyed by column name.
    pub fn column_labels(&self, catalog: &Catalog, name: &str) -> Result<HashMap<String, String>> {
        let node = self
            .nodes
            .get(name)
            .ok_or_else(|| Error::UnknownJoin(name.to_string()))?;

        Ok(catalog
            .table(node.table)
            .columns()
            .iter()
            .map(|column| {
                (
                    column.name().to_string(),
                    format!("{}_{}", node.alias, column.name()),
                )
            })
            .collect())
    }

    fn contains_table(&self, table: TableId) -> bool {
        self.nodes.values().any(|node| node.table == table)
    }

    fn unique_alias(&mut self, base: String) -> String {
        let mut alias = base.clone();
        let mut counter = 1;

        while self.used_aliases.contains(&alias) {
            alias = format!("{base}_{counter}");
            counter += 1;
        }

        trace!(%alias, "join alias assigned");
        self.used_aliases.insert(alias.clone());
        alias
    }
}

fn table_name(catalog: &Catalog, table: TableId) -> String {
    catalog
        .table(table)
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("t{}", table.index()))
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::renderer::{Inline, Renderer};

    fn catalog() -> (Catalog, TableId, TableId) {
        let mut catalog = Catalog::default();

        let person = catalog.add_table("Person");
        catalog.add_column(person, "id", ValueType::BigInt);
        catalog.add_column(person, "name", ValueType::Text);

        let address = catalog.add_table("Address");
        catalog.add_column(address, "id", ValueType::BigInt);
        catalog.add_column(address, "person_id", ValueType::BigInt);

        (catalog, person, address)
    }

    #[test]
    fn aliases_follow_the_join_path() {
        let (mut catalog, person, address) = catalog();
        let person_id = catalog.column(person, "id").unwrap();
        let address_person = catalog.column(address, "person_id").unwrap();

        let mut tree = JoinTree::new(&catalog, "root", person);
        let joined = tree
            .add_join(
                &mut catalog,
                "root",
                "home",
                JoinDirection::LeftOuter,
                vec![person_id],
                vec![address_person],
            )
            .unwrap();

        assert_eq!(address, joined);
        assert_eq!(Some("Person"), tree.alias_of("root"));
        assert_eq!(Some("Person_Address"), tree.alias_of("home"));
    }

    #[test]
    fn same_table_twice_gets_distinct_identities_and_aliases() {
        let (mut catalog, person, address) = catalog();
        let person_id = catalog.column(person, "id").unwrap();
        let address_person = catalog.column(address, "person_id").unwrap();

        let mut tree = JoinTree::new(&catalog, "root", person);
        let home = tree
            .add_join(
                &mut catalog,
                "root",
                "home",
                JoinDirection::LeftOuter,
                vec![person_id],
                vec![address_person],
            )
            .unwrap();
        let work = tree
            .add_join(
                &mut catalog,
                "root",
                "work",
                JoinDirection::LeftOuter,
                vec![person_id],
                vec![address_person],
            )
            .unwrap();

        assert_ne!(home, work);
        assert_eq!(Some("Person_Address"), tree.alias_of("home"));
        assert_eq!(Some("Person_Address_1"), tree.alias_of("work"));

        let from = tree.to_from();
        assert_eq!(Some("Person_Address"), from.alias_of(home));
        assert_eq!(Some("Person_Address_1"), from.alias_of(work));
        assert_eq!(vec![person, home, work], from.tables());
    }

    #[test]
    fn select_all_labels_columns_with_node_alias() {
        let (mut catalog, person, address) = catalog();
        let person_id = catalog.column(person, "id").unwrap();
        let address_person = catalog.column(address, "person_id").unwrap();

        let mut tree = JoinTree::new(&catalog, "root", person);
        tree.add_join(
            &mut catalog,
            "root",
            "home",
            JoinDirection::Inner,
            vec![person_id],
            vec![address_person],
        )
        .unwrap();

        let labels: Vec<_> = tree
            .select_all(&catalog)
            .iter()
            .map(|expression| expression.alias().map(str::to_string))
            .collect();

        assert_eq!(
            vec![
                Some("Person_id".to_string()),
                Some("Person_name".to_string()),
                Some("Person_Address_id".to_string()),
                Some("Person_Address_person_id".to_string()),
            ],
            labels
        );

        let home_labels = tree.column_labels(&catalog, "home").unwrap();
        assert_eq!("Person_Address_person_id", home_labels["person_id"]);
    }

    #[test]
    fn renders_a_query_over_the_whole_tree() {
        let (mut catalog, person, address) = catalog();
        let person_id = catalog.column(person, "id").unwrap();
        let address_person = catalog.column(address, "person_id").unwrap();

        let mut tree = JoinTree::new(&catalog, "root", person);

        for name in ["home", "work"] {
            tree.add_join(
                &mut catalog,
                "root",
                name,
                JoinDirection::LeftOuter,
                vec![person_id],
                vec![address_person],
            )
            .unwrap();
        }

        let mut query = Query::new();
        query.select_clause_mut().add_all(tree.select_all(&catalog));
        *query.from_clause_mut() = tree.to_from();

        assert_eq!(
            "select Person.id as Person_id, Person.name as Person_name, \
             Person_Address.id as Person_Address_id, \
             Person_Address.person_id as Person_Address_person_id, \
             Person_Address_1.id as Person_Address_1_id, \
             Person_Address_1.person_id as Person_Address_1_person_id \
             from Person as Person \
             left outer join Address as Person_Address on Person.id = Person_Address.person_id \
             left outer join Address as Person_Address_1 on Person.id = Person_Address_1.person_id",
            Inline::build(&catalog, &query.into())
        );
    }

    #[test]
    fn node_names_cannot_be_reused() {
        let (mut catalog, person, address) = catalog();
        let person_id = catalog.column(person, "id").unwrap();
        let address_person = catalog.column(address, "person_id").unwrap();

        let mut tree = JoinTree::new(&catalog, "root", person);
        let duplicate = tree.add_join(
            &mut catalog,
            "root",
            "root",
            JoinDirection::Inner,
            vec![person_id],
            vec![address_person],
        );

        assert!(matches!(duplicate, Err(crate::Error::DuplicateJoin(name)) if name == "root"));
        assert_eq!(Some("Person"), tree.alias_of("root"));
        assert_eq!(1, tree.names().count());
    }
}
