use serde::{Deserialize, Serialize};

/// Primary key definition preserving column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub table: String,
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: vec![column.into()],
        }
    }
}

/// Foreign key from a child (fact) table to a parent (dimension) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub child_table: String,
    pub columns: Vec<String>,
    pub parent_table: String,
    pub parent_columns: Vec<String>,
}

impl ForeignKey {
    /// Single-column key where both sides share the column name.
    pub fn on_shared_column(
        child_table: impl Into<String>,
        parent_table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        let column = column.into();
        Self {
            child_table: child_table.into(),
            columns: vec![column.clone()],
            parent_table: parent_table.into(),
            parent_columns: vec![column],
        }
    }

    /// Constraint name as created in the warehouse: `{parent}_{child}_fk`.
    pub fn constraint_name(&self) -> String {
        format!("{}_{}_fk", self.parent_table, self.child_table)
    }
}

/// Table-level constraint definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    PrimaryKey(PrimaryKey),
    ForeignKey(ForeignKey),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_name_puts_parent_first() {
        let fk = ForeignKey::on_shared_column("orders_table", "dim_users", "user_uuid");
        assert_eq!(fk.constraint_name(), "dim_users_orders_table_fk");
        assert_eq!(fk.parent_columns, vec!["user_uuid".to_string()]);
    }
}
