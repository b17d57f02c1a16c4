//! Versioned "created/changed" notifications for market-data entities
//!
//! Older subscribers consume one notification per stored document, routed by a
//! `{dataType}.{assetClass}/{assetId}` subject. Version 1 (or an unversioned
//! document) is announced as `DataCreated`; anything later as `DataChanged`.

use crate::PublishError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use types::MarketDataEntity;
use uuid::Uuid;

pub const DATA_CREATED: &str = "DataCreated";
pub const DATA_CHANGED: &str = "DataChanged";

/// Event type for a document version
pub fn event_type_for(version: Option<u32>) -> &'static str {
    if version.unwrap_or(0) > 1 {
        DATA_CHANGED
    } else {
        DATA_CREATED
    }
}

/// Notification in the event-grid schema
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataNotification {
    id: Uuid,
    subject: String,
    event_type: &'static str,
    event_time: DateTime<Utc>,
    data_version: String,
    data: Value,
}

impl MarketDataNotification {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn event_type(&self) -> &str {
        self.event_type
    }

    pub fn event_time(&self) -> DateTime<Utc> {
        self.event_time
    }

    /// Schema version of the entity
    pub fn data_version(&self) -> &str {
        &self.data_version
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// Map an entity to its notification; `None` is rejected as `InvalidPayload`
pub fn map_market_data_event<E>(entity: Option<&E>) -> Result<MarketDataNotification, PublishError>
where
    E: MarketDataEntity + Serialize + ?Sized,
{
    let entity = entity.ok_or_else(|| PublishError::invalid_payload("market data entity is absent"))?;

    Ok(MarketDataNotification {
        id: Uuid::new_v4(),
        subject: entity.subject(),
        event_type: event_type_for(entity.version()),
        event_time: Utc::now(),
        data_version: entity.schema_version().to_string(),
        data: serde_json::to_value(entity)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::FxSpotPriceData;

    fn entity(version: Option<u32>) -> FxSpotPriceData {
        let mut data = FxSpotPriceData::example();
        data.base.version = version;
        data
    }

    #[test]
    fn test_event_type_by_version() {
        assert_eq!(event_type_for(None), DATA_CREATED);
        assert_eq!(event_type_for(Some(0)), DATA_CREATED);
        assert_eq!(event_type_for(Some(1)), DATA_CREATED);
        assert_eq!(event_type_for(Some(2)), DATA_CHANGED);
        assert_eq!(event_type_for(Some(17)), DATA_CHANGED);
    }

    #[test]
    fn test_version_one_is_created() {
        let notification = map_market_data_event(Some(&entity(Some(1)))).unwrap();
        assert_eq!(notification.event_type(), "DataCreated");
    }

    #[test]
    fn test_version_two_is_changed() {
        let notification = map_market_data_event(Some(&entity(Some(2)))).unwrap();
        assert_eq!(notification.event_type(), "DataChanged");
    }

    #[test]
    fn test_subject_and_data_version() {
        let notification = map_market_data_event(Some(&entity(Some(3)))).unwrap();
        assert_eq!(notification.subject(), "price.spot.fx/eurusd");
        assert_eq!(notification.data_version(), "1.0.0");
        assert_eq!(notification.data()["assetId"], "eurusd");
    }

    #[test]
    fn test_absent_entity_rejected() {
        let err = map_market_data_event::<FxSpotPriceData>(None).unwrap_err();
        assert!(matches!(err, PublishError::InvalidPayload(_)));
    }

    #[test]
    fn test_wire_shape() {
        let notification = map_market_data_event(Some(&entity(Some(2)))).unwrap();
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["eventType"], "DataChanged");
        assert_eq!(json["subject"], "price.spot.fx/eurusd");
        assert_eq!(json["dataVersion"], "1.0.0");
        assert!(json["eventTime"].is_string());
        assert!(json["id"].is_string());
    }
}
