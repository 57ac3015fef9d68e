use serde::{Deserialize, Serialize};
use starload_core::Entity;
use starload_extract::Source;

const PUBLIC_BUCKET_URL: &str = "https://data-handling-public.s3.eu-west-1.amazonaws.com";
const STORE_API_URL: &str = "https://aqj7u5id95.execute-api.eu-west-1.amazonaws.com/prod";

/// Upstream source of every entity.
///
/// Any entry missing from the configuration falls back to the default
/// location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCatalog {
    pub users: Source,
    pub cards: Source,
    pub stores: Source,
    pub products: Source,
    pub orders: Source,
    pub date_times: Source,
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self {
            users: Source::DatabaseTable {
                table: "legacy_users".to_string(),
            },
            cards: Source::PdfDocument {
                location: format!("{PUBLIC_BUCKET_URL}/card_details.pdf"),
            },
            stores: Source::StoreApi {
                count_url: format!("{STORE_API_URL}/number_stores"),
                detail_url: format!("{STORE_API_URL}/store_details"),
            },
            products: Source::CsvObject {
                location: "s3://data-handling-public/products.csv".to_string(),
            },
            orders: Source::DatabaseTable {
                table: "orders_table".to_string(),
            },
            date_times: Source::JsonObject {
                url: format!("{PUBLIC_BUCKET_URL}/date_details.json"),
            },
        }
    }
}

impl SourceCatalog {
    pub fn source(&self, entity: Entity) -> &Source {
        match entity {
            Entity::Users => &self.users,
            Entity::Cards => &self.cards,
            Entity::Stores => &self.stores,
            Entity::Products => &self.products,
            Entity::Orders => &self.orders,
            Entity::DateTimes => &self.date_times,
        }
    }
}
