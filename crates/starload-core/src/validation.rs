use std::collections::{BTreeMap, BTreeSet};

use crate::constraints::Constraint;
use crate::error::{Error, Result};
use crate::warehouse::WarehouseModel;

/// Validate internal consistency of a warehouse model.
///
/// This checks:
/// - duplicate tables/columns
/// - primary key columns exist
/// - foreign key columns and referenced targets exist
/// - each table has at most one primary key
pub fn validate_warehouse(model: &WarehouseModel) -> Result<()> {
    let mut catalog: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for table in &model.tables {
        if catalog.contains_key(table.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}",
                table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column name: {}.{}",
                    table.name, column
                )));
            }
        }
        catalog.insert(table.name.as_str(), columns);
    }

    for table in &model.tables {
        let columns = &catalog[table.name.as_str()];
        let mut primary_keys = 0;

        for constraint in &table.constraints {
            match constraint {
                Constraint::PrimaryKey(pk) => {
                    primary_keys += 1;
                    if pk.table != table.name {
                        return Err(Error::InvalidSchema(format!(
                            "primary key for {} declared on {}",
                            pk.table, table.name
                        )));
                    }
                    for column in &pk.columns {
                        if !columns.contains(column.as_str()) {
                            return Err(Error::InvalidSchema(format!(
                                "primary key column not found: {}.{}",
                                table.name, column
                            )));
                        }
                    }
                }
                Constraint::ForeignKey(fk) => {
                    if fk.columns.len() != fk.parent_columns.len() {
                        return Err(Error::InvalidSchema(format!(
                            "foreign key {} has {} columns but references {}",
                            fk.constraint_name(),
                            fk.columns.len(),
                            fk.parent_columns.len()
                        )));
                    }

                    let child_columns = catalog.get(fk.child_table.as_str()).ok_or_else(|| {
                        Error::InvalidSchema(format!(
                            "referencing table not found: {}",
                            fk.child_table
                        ))
                    })?;
                    for column in &fk.columns {
                        if !child_columns.contains(column.as_str()) {
                            return Err(Error::InvalidSchema(format!(
                                "foreign key column not found: {}.{}",
                                fk.child_table, column
                            )));
                        }
                    }

                    let parent_columns =
                        catalog.get(fk.parent_table.as_str()).ok_or_else(|| {
                            Error::InvalidSchema(format!(
                                "referenced table not found: {}",
                                fk.parent_table
                            ))
                        })?;
                    for column in &fk.parent_columns {
                        if !parent_columns.contains(column.as_str()) {
                            return Err(Error::InvalidSchema(format!(
                                "referenced column not found: {}.{}",
                                fk.parent_table, column
                            )));
                        }
                    }
                }
            }
        }

        if primary_keys > 1 {
            return Err(Error::InvalidSchema(format!(
                "multiple primary keys on {}",
                table.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{ForeignKey, PrimaryKey};
    use crate::warehouse::WarehouseTable;

    fn star() -> WarehouseModel {
        WarehouseModel {
            tables: vec![
                WarehouseTable::new("orders_table")
                    .with_column("card_number")
                    .with_constraint(Constraint::ForeignKey(ForeignKey::on_shared_column(
                        "orders_table",
                        "dim_card_details",
                        "card_number",
                    ))),
                WarehouseTable::new("dim_card_details")
                    .with_column("card_number")
                    .with_constraint(Constraint::PrimaryKey(PrimaryKey::new(
                        "dim_card_details",
                        "card_number",
                    ))),
            ],
        }
    }

    #[test]
    fn accepts_consistent_star() {
        assert!(validate_warehouse(&star()).is_ok());
    }

    #[test]
    fn rejects_missing_referenced_column() {
        let mut model = star();
        model.tables[1].columns.clear();
        model.tables[1].constraints.clear();
        let err = validate_warehouse(&model).expect_err("missing column");
        assert!(err.to_string().contains("dim_card_details.card_number"));
    }

    #[test]
    fn rejects_duplicate_tables() {
        let mut model = star();
        model.tables.push(WarehouseTable::new("orders_table"));
        assert!(matches!(
            validate_warehouse(&model),
            Err(Error::InvalidSchema(_))
        ));
    }
}
