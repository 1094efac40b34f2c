//! Product events - wire payloads for index synchronization
//!
//! Two payload shapes travel over the transport:
//!
//! - `Created`/`Updated` carry the full product as JSON, so the sync side can
//!   upsert without a read-back.
//! - `Deleted`/`ViewsIncremented`/`BuysIncremented` carry the raw id bytes
//!   (not JSON-wrapped). Increment events deliberately carry no delta: a
//!   delta would double-count under duplicate delivery, while a bare id tells
//!   the handler to re-read the authoritative counters and overwrite the
//!   index copy, which is idempotent under replay.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;

/// Event topic - one transport partition per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductTopic {
    Created,
    Updated,
    Deleted,
    ViewsIncremented,
    BuysIncremented,
}

impl ProductTopic {
    /// Every topic, in the order the worker subscribes to them
    pub const ALL: [ProductTopic; 5] = [
        ProductTopic::Created,
        ProductTopic::Updated,
        ProductTopic::Deleted,
        ProductTopic::ViewsIncremented,
        ProductTopic::BuysIncremented,
    ];

    /// Transport-facing topic name
    pub fn wire_name(&self) -> &'static str {
        match self {
            ProductTopic::Created => "product_created",
            ProductTopic::Updated => "product_updated",
            ProductTopic::Deleted => "product_deleted",
            ProductTopic::ViewsIncremented => "product_views_inc",
            ProductTopic::BuysIncremented => "product_buys_inc",
        }
    }

    /// Whether this topic carries a full product (JSON) or a bare id
    pub fn carries_product(&self) -> bool {
        matches!(self, ProductTopic::Created | ProductTopic::Updated)
    }
}

impl std::fmt::Display for ProductTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Decoded event payload
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Product(Product),
    Id(String),
}

/// Payload decode failure - terminal for the message, the cursor advances
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid product JSON on {topic}: {source}")]
    Json {
        topic: ProductTopic,
        #[source]
        source: serde_json::Error,
    },
    #[error("non-UTF8 id payload on {topic}")]
    IdEncoding { topic: ProductTopic },
}

/// Serialize a full product for a `Created`/`Updated` message body
pub fn encode_product(product: &Product) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(product)
}

/// Serialize a bare id for the id-carrying topics
pub fn encode_id(id: &str) -> Vec<u8> {
    id.as_bytes().to_vec()
}

/// Decode a message body according to its topic's wire shape
pub fn decode(topic: ProductTopic, body: &[u8]) -> Result<EventPayload, DecodeError> {
    if topic.carries_product() {
        let product: Product =
            serde_json::from_slice(body).map_err(|source| DecodeError::Json { topic, source })?;
        Ok(EventPayload::Product(product))
    } else {
        let id = std::str::from_utf8(body)
            .map_err(|_| DecodeError::IdEncoding { topic })?
            .to_string();
        Ok(EventPayload::Id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn sample_product() -> Product {
        Product {
            id: "p-1".into(),
            name: "Trail Shoe".into(),
            description: "Lightweight trail running shoe".into(),
            price: Decimal::new(7999, 2),
            category: "Sports".into(),
            tags: vec!["running".into(), "outdoor".into()],
            brand: "Acme".into(),
            views: 3,
            buys: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn product_topics_round_trip_as_json() {
        let product = sample_product();
        let body = encode_product(&product).unwrap();
        let decoded = decode(ProductTopic::Created, &body).unwrap();
        assert_eq!(decoded, EventPayload::Product(product));
    }

    #[test]
    fn id_topics_carry_raw_bytes_not_json() {
        let body = encode_id("p-42");
        assert_eq!(body, b"p-42");
        let decoded = decode(ProductTopic::ViewsIncremented, &body).unwrap();
        assert_eq!(decoded, EventPayload::Id("p-42".into()));
    }

    #[test]
    fn malformed_product_json_is_a_decode_error() {
        let err = decode(ProductTopic::Updated, b"{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Json { .. }));
    }

    #[test]
    fn wire_names_match_the_broker_topics() {
        let names: Vec<&str> = ProductTopic::ALL.iter().map(|t| t.wire_name()).collect();
        assert_eq!(
            names,
            [
                "product_created",
                "product_updated",
                "product_deleted",
                "product_views_inc",
                "product_buys_inc"
            ]
        );
    }
}
