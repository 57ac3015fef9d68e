use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{ClosedSet, CodeKind, FieldType};

/// Record kinds that flow through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Entity {
    Users,
    Cards,
    Stores,
    Products,
    Orders,
    DateTimes,
}

impl Entity {
    pub const ALL: [Entity; 6] = [
        Entity::Users,
        Entity::Cards,
        Entity::Stores,
        Entity::Products,
        Entity::Orders,
        Entity::DateTimes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Cards => "cards",
            Entity::Stores => "stores",
            Entity::Products => "products",
            Entity::Orders => "orders",
            Entity::DateTimes => "date-times",
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        match self {
            Entity::Users => &USERS,
            Entity::Cards => &CARDS,
            Entity::Stores => &STORES,
            Entity::Products => &PRODUCTS,
            Entity::Orders => &ORDERS,
            Entity::DateTimes => &DATE_TIMES,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Entity::ALL
            .into_iter()
            .find(|entity| entity.name() == value)
            .ok_or_else(|| Error::Unsupported(format!("unknown entity '{value}'")))
    }
}

/// One named column and its semantic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

const fn field(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec { name, field_type }
}

/// Column reshaping applied before row-level cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Reshape {
    Drop { column: &'static str },
    Rename { from: &'static str, to: &'static str },
    MoveBefore { column: &'static str, anchor: &'static str },
    EnsureIndex,
}

/// Ordered field layout of one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntitySchema {
    pub entity: Entity,
    pub reshape: &'static [Reshape],
    pub fields: &'static [FieldSpec],
    /// Rows whose value here cleans to null are removed.
    pub drop_on: Option<&'static str>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

static USERS: EntitySchema = EntitySchema {
    entity: Entity::Users,
    reshape: &[],
    fields: &[
        field("first_name", FieldType::FreeText { strict: true }),
        field("last_name", FieldType::FreeText { strict: true }),
        field("date_of_birth", FieldType::Date),
        field("company", FieldType::FreeText { strict: false }),
        field("email_address", FieldType::Email),
        field("address", FieldType::FreeText { strict: false }),
        field("country", FieldType::Country { code_field: "country_code" }),
        field(
            "country_code",
            FieldType::CountryCode {
                country_field: Some("country"),
            },
        ),
        field("phone_number", FieldType::Phone),
        field("join_date", FieldType::Date),
        field("user_uuid", FieldType::Uuid),
    ],
    drop_on: None,
};

static CARDS: EntitySchema = EntitySchema {
    entity: Entity::Cards,
    reshape: &[],
    fields: &[
        field("card_number", FieldType::CardNumber),
        field("expiry_date", FieldType::ExpiryDate),
        field("card_provider", FieldType::Enum(ClosedSet::CardProviders)),
        field("date_payment_confirmed", FieldType::Date),
    ],
    drop_on: Some("card_number"),
};

static STORES: EntitySchema = EntitySchema {
    entity: Entity::Stores,
    reshape: &[
        Reshape::Drop { column: "lat" },
        Reshape::MoveBefore {
            column: "latitude",
            anchor: "longitude",
        },
    ],
    fields: &[
        field("address", FieldType::FreeText { strict: false }),
        field("latitude", FieldType::Float),
        field("longitude", FieldType::Float),
        field("locality", FieldType::FreeText { strict: true }),
        field("store_code", FieldType::Code(CodeKind::Store)),
        field("staff_numbers", FieldType::Integer { min_digits: 10 }),
        field("opening_date", FieldType::Date),
        field("store_type", FieldType::Enum(ClosedSet::StoreTypes)),
        field("country_code", FieldType::CountryCode { country_field: None }),
        field("continent", FieldType::Continent),
    ],
    drop_on: Some("store_code"),
};

static PRODUCTS: EntitySchema = EntitySchema {
    entity: Entity::Products,
    reshape: &[
        Reshape::Rename {
            from: "EAN",
            to: "ean",
        },
        Reshape::EnsureIndex,
    ],
    fields: &[
        field("product_name", FieldType::ProductName),
        field("product_price", FieldType::Money),
        field("weight", FieldType::Weight),
        field("category", FieldType::Enum(ClosedSet::ProductCategories)),
        field("ean", FieldType::Ean),
        field("date_added", FieldType::Date),
        field("uuid", FieldType::Uuid),
        field("removed", FieldType::Enum(ClosedSet::ProductAvailability)),
        field("product_code", FieldType::Code(CodeKind::Product)),
    ],
    drop_on: Some("product_code"),
};

static ORDERS: EntitySchema = EntitySchema {
    entity: Entity::Orders,
    reshape: &[
        Reshape::Drop { column: "level_0" },
        Reshape::Drop {
            column: "first_name",
        },
        Reshape::Drop { column: "last_name" },
        Reshape::Drop { column: "1" },
    ],
    fields: &[
        field("date_uuid", FieldType::Uuid),
        field("user_uuid", FieldType::Uuid),
        field("card_number", FieldType::CardNumber),
        field("store_code", FieldType::Code(CodeKind::Store)),
        field("product_code", FieldType::Code(CodeKind::Product)),
        field("product_quantity", FieldType::Integer { min_digits: 10 }),
    ],
    drop_on: None,
};

static DATE_TIMES: EntitySchema = EntitySchema {
    entity: Entity::DateTimes,
    reshape: &[],
    fields: &[
        field("timestamp", FieldType::Timestamp),
        field("month", FieldType::Bounded { min: 1, max: 13 }),
        field("year", FieldType::Bounded { min: 1901, max: 2100 }),
        field("day", FieldType::Bounded { min: 1, max: 32 }),
        field("time_period", FieldType::Enum(ClosedSet::TimePeriods)),
        field("date_uuid", FieldType::Uuid),
    ],
    drop_on: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_names_round_trip_through_from_str() {
        for entity in Entity::ALL {
            assert_eq!(entity.name().parse::<Entity>().ok(), Some(entity));
        }
        assert!("legacy_users".parse::<Entity>().is_err());
    }

    #[test]
    fn drop_fields_are_declared_in_schema() {
        for entity in Entity::ALL {
            let schema = entity.schema();
            assert_eq!(schema.entity, entity);
            if let Some(drop_on) = schema.drop_on {
                assert!(schema.field(drop_on).is_some(), "{entity}: {drop_on}");
            }
        }
    }

    #[test]
    fn paired_country_fields_point_at_each_other() {
        let users = Entity::Users.schema();
        let country = users.field("country").map(|field| field.field_type);
        assert_eq!(
            country,
            Some(FieldType::Country {
                code_field: "country_code"
            })
        );
        let code = users.field("country_code").map(|field| field.field_type);
        assert_eq!(
            code,
            Some(FieldType::CountryCode {
                country_field: Some("country")
            })
        );
    }
}
