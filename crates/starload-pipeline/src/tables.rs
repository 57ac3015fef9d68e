//! Fixed warehouse table specs: target table, column types and the
//! migrations run after each load.

use starload_core::{
    build_load_order, validate_warehouse, ColumnHint, Constraint, Entity, Error, ForeignKey,
    PrimaryKey, SqlType, WarehouseModel, WarehouseTable, INDEX_COLUMN,
};

use crate::migrations::Migration;

pub const ORDERS_TABLE: &str = "orders_table";

/// How one entity lands in the warehouse.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub entity: Entity,
    pub table: &'static str,
    /// Column types applied when the table is created.
    pub hints: &'static [ColumnHint],
    pub migrations: &'static [Migration],
}

impl TableSpec {
    pub fn primary_key(&self) -> Option<&'static str> {
        self.migrations.iter().find_map(|migration| match migration {
            Migration::PrimaryKey { column } => Some(*column),
            _ => None,
        })
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.migrations.iter().filter_map(|migration| match migration {
            Migration::ForeignKey { column } => Some(*column),
            _ => None,
        })
    }
}

const fn hint(column: &'static str, sql_type: SqlType) -> ColumnHint {
    ColumnHint::new(column, sql_type)
}

const ORDERS_HINTS: &[ColumnHint] = &[
    hint("date_uuid", SqlType::Uuid),
    hint("user_uuid", SqlType::Uuid),
    hint("card_number", SqlType::Varchar(20)),
    hint("store_code", SqlType::Varchar(20)),
    hint("product_code", SqlType::Varchar(20)),
    hint("product_quantity", SqlType::SmallInt),
];

const USERS_HINTS: &[ColumnHint] = &[
    hint("first_name", SqlType::Varchar(255)),
    hint("last_name", SqlType::Varchar(255)),
    hint("country_code", SqlType::Varchar(2)),
    hint("user_uuid", SqlType::Uuid),
    hint("date_of_birth", SqlType::Date),
    hint("join_date", SqlType::Date),
];

const CARDS_HINTS: &[ColumnHint] = &[
    hint("card_number", SqlType::Varchar(30)),
    hint("date_payment_confirmed", SqlType::Date),
];

const CARDS_TYPES: &[ColumnHint] = &[
    hint("card_number", SqlType::Varchar(30)),
    hint("expiry_date", SqlType::Varchar(5)),
    hint("date_payment_confirmed", SqlType::Date),
];

const STORES_HINTS: &[ColumnHint] = &[
    hint("index", SqlType::BigInt),
    hint("address", SqlType::Varchar(255)),
    hint("longitude", SqlType::Float),
    hint("latitude", SqlType::Float),
    hint("locality", SqlType::Varchar(255)),
    hint("store_code", SqlType::Varchar(13)),
    hint("staff_numbers", SqlType::SmallInt),
    hint("opening_date", SqlType::Date),
    hint("store_type", SqlType::Varchar(255)),
    hint("country_code", SqlType::Varchar(2)),
    hint("continent", SqlType::Varchar(255)),
];

const PRODUCTS_HINTS: &[ColumnHint] = &[
    hint("index", SqlType::BigInt),
    hint("product_name", SqlType::Varchar(255)),
    hint("category", SqlType::Varchar(50)),
    hint("product_price", SqlType::Varchar(20)),
    hint("weight", SqlType::Float),
    hint("ean", SqlType::Varchar(30)),
    hint("product_code", SqlType::Varchar(12)),
    hint("date_added", SqlType::Date),
    hint("uuid", SqlType::Uuid),
    hint("removed", SqlType::Varchar(30)),
];

const PRODUCTS_TYPES: &[ColumnHint] = &[
    hint("product_price", SqlType::Float),
    hint("weight", SqlType::Float),
    hint("ean", SqlType::Varchar(15)),
    hint("product_code", SqlType::Varchar(12)),
    hint("date_added", SqlType::Date),
    hint("uuid", SqlType::Uuid),
    hint("still_available", SqlType::Boolean),
    hint("weight_class", SqlType::Varchar(20)),
];

const DATE_TIMES_HINTS: &[ColumnHint] = &[hint("index", SqlType::BigInt)];

const DATE_TIMES_TYPES: &[ColumnHint] = &[
    hint("month", SqlType::Varchar(15)),
    hint("year", SqlType::Varchar(5)),
    hint("day", SqlType::Varchar(10)),
    hint("time_period", SqlType::Varchar(30)),
    hint("date_uuid", SqlType::Uuid),
];

/// Every warehouse table, fact table first.
pub static TABLE_SPECS: [TableSpec; 6] = [
    TableSpec {
        entity: Entity::Orders,
        table: ORDERS_TABLE,
        hints: ORDERS_HINTS,
        migrations: &[],
    },
    TableSpec {
        entity: Entity::Users,
        table: "dim_users",
        hints: USERS_HINTS,
        migrations: &[
            Migration::PrimaryKey { column: "user_uuid" },
            Migration::ForeignKey { column: "user_uuid" },
        ],
    },
    TableSpec {
        entity: Entity::Cards,
        table: "dim_card_details",
        hints: CARDS_HINTS,
        migrations: &[
            Migration::AlterTypes {
                columns: CARDS_TYPES,
            },
            Migration::PrimaryKey {
                column: "card_number",
            },
            Migration::ForeignKey {
                column: "card_number",
            },
        ],
    },
    TableSpec {
        entity: Entity::Stores,
        table: "dim_store_details",
        hints: STORES_HINTS,
        migrations: &[
            Migration::PrimaryKey {
                column: "store_code",
            },
            Migration::ForeignKey {
                column: "store_code",
            },
        ],
    },
    TableSpec {
        entity: Entity::Products,
        table: "dim_products",
        hints: PRODUCTS_HINTS,
        migrations: &[
            Migration::AddColumn {
                column: hint("weight_class", SqlType::Varchar(20)),
            },
            Migration::WeightClass {
                weight: "weight",
                class: "weight_class",
            },
            Migration::RenameColumn {
                from: "removed",
                to: "still_available",
            },
            Migration::FlagToBoolean {
                column: "still_available",
                true_value: "Still_avaliable",
            },
            Migration::StripCharacter {
                column: "product_price",
                character: "£",
            },
            Migration::AlterTypes {
                columns: PRODUCTS_TYPES,
            },
            Migration::PrimaryKey {
                column: "product_code",
            },
            Migration::ForeignKey {
                column: "product_code",
            },
        ],
    },
    TableSpec {
        entity: Entity::DateTimes,
        table: "dim_date_times",
        hints: DATE_TIMES_HINTS,
        migrations: &[
            Migration::AlterTypes {
                columns: DATE_TIMES_TYPES,
            },
            Migration::PrimaryKey { column: "date_uuid" },
            Migration::ForeignKey { column: "date_uuid" },
        ],
    },
];

pub fn table_spec(entity: Entity) -> &'static TableSpec {
    match entity {
        Entity::Orders => &TABLE_SPECS[0],
        Entity::Users => &TABLE_SPECS[1],
        Entity::Cards => &TABLE_SPECS[2],
        Entity::Stores => &TABLE_SPECS[3],
        Entity::Products => &TABLE_SPECS[4],
        Entity::DateTimes => &TABLE_SPECS[5],
    }
}

/// The star schema declared by [`TABLE_SPECS`], validated.
pub fn warehouse_model() -> Result<WarehouseModel, Error> {
    let tables = TABLE_SPECS
        .iter()
        .map(|spec| {
            let schema = spec.entity.schema();
            let columns = std::iter::once(INDEX_COLUMN)
                .chain(schema.fields.iter().map(|field| field.name))
                .chain(spec.hints.iter().map(|hint| hint.column))
                .chain(spec.migrations.iter().filter_map(|migration| match migration {
                    Migration::AddColumn { column } => Some(column.column),
                    Migration::RenameColumn { to, .. } => Some(*to),
                    _ => None,
                }));
            let mut table = columns.fold(WarehouseTable::new(spec.table), WarehouseTable::with_column);
            if let Some(column) = spec.primary_key() {
                table = table.with_constraint(Constraint::PrimaryKey(PrimaryKey::new(spec.table, column)));
            }
            table
        })
        .collect::<Vec<_>>();

    // Foreign keys live on the fact table, pointing at each dimension.
    let mut model = WarehouseModel { tables };
    let references: Vec<ForeignKey> = TABLE_SPECS
        .iter()
        .flat_map(|spec| {
            spec.foreign_keys()
                .map(|column| ForeignKey::on_shared_column(ORDERS_TABLE, spec.table, column))
        })
        .collect();
    if let Some(orders) = model.tables.iter_mut().find(|table| table.name == ORDERS_TABLE) {
        for fk in references {
            orders.constraints.push(Constraint::ForeignKey(fk));
        }
    }

    validate_warehouse(&model)?;
    Ok(model)
}

/// Entities in warehouse load order: the fact table before the dimensions it
/// references.
pub fn load_order() -> Result<Vec<Entity>, Error> {
    let model = warehouse_model()?;
    let report = build_load_order(&model);
    let order = report.load_order.ok_or_else(|| {
        Error::InvalidSchema(format!(
            "foreign keys form a cycle: {}",
            report.cycle.unwrap_or_default().join(" -> ")
        ))
    })?;
    Ok(order
        .iter()
        .filter_map(|table| TABLE_SPECS.iter().find(|spec| spec.table == table.as_str()))
        .map(|spec| spec.entity)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_cover_every_entity_once() {
        for entity in Entity::ALL {
            assert_eq!(table_spec(entity).entity, entity);
        }
    }

    #[test]
    fn fact_table_loads_first() {
        let order = load_order().expect("order");
        assert_eq!(
            order,
            vec![
                Entity::Orders,
                Entity::Cards,
                Entity::DateTimes,
                Entity::Products,
                Entity::Stores,
                Entity::Users,
            ]
        );
    }

    #[test]
    fn model_declares_keys_on_shared_columns() {
        let model = warehouse_model().expect("model");
        let orders = model.table(ORDERS_TABLE).expect("orders");
        assert_eq!(orders.foreign_keys().count(), 5);
        assert!(orders.primary_key().is_none());
        let products = model.table("dim_products").expect("products");
        assert_eq!(products.primary_key().map(|pk| pk.columns.clone()), Some(vec!["product_code".to_string()]));
        assert!(products.columns.contains(&"still_available".to_string()));
    }
}
