use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::Coordinates;
use crate::database::document::{json_field, Document};
use crate::filter::FieldValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumbers {
    pub primary: String,
    pub secondary: String,
    pub whatsapp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailAddresses {
    pub general: String,
    pub support: String,
    pub careers: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub weekdays: String,
    pub saturday: String,
    pub sunday: String,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            weekdays: "Mon - Fri: 8:00 AM - 6:00 PM".to_string(),
            saturday: "Sat: 9:00 AM - 2:00 PM".to_string(),
            sunday: "Sun: Closed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
    pub instagram: String,
    pub youtube: String,
}

/// The company's public contact details. One row per deployment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub company_name: String,
    pub address: Json<Address>,
    pub phone: Json<PhoneNumbers>,
    pub email: Json<EmailAddresses>,
    pub business_hours: Json<BusinessHours>,
    pub social_links: Json<SocialLinks>,
    pub google_maps_embed: String,
    pub coordinates: Json<Coordinates>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for ContactInfo {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company_name: "Javelin Security".to_string(),
            address: Json(Address::default()),
            phone: Json(PhoneNumbers::default()),
            email: Json(EmailAddresses::default()),
            business_hours: Json(BusinessHours::default()),
            social_links: Json(SocialLinks::default()),
            google_maps_embed: String::new(),
            coordinates: Json(Coordinates::default()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for [`ContactInfo`]. Each nested object is merged key by key
/// into the stored one; scalar fields replace when present and non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfoPatch {
    pub company_name: Option<String>,
    pub address: Option<Map<String, Value>>,
    pub phone: Option<Map<String, Value>>,
    pub email: Option<Map<String, Value>>,
    pub business_hours: Option<Map<String, Value>>,
    pub social_links: Option<Map<String, Value>>,
    pub google_maps_embed: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl ContactInfo {
    pub fn apply_patch(&mut self, patch: ContactInfoPatch) -> Result<(), serde_json::Error> {
        if let Some(p) = patch.address {
            self.address = Json(merge_object(&self.address.0, p)?);
        }
        if let Some(p) = patch.phone {
            self.phone = Json(merge_object(&self.phone.0, p)?);
        }
        if let Some(p) = patch.email {
            self.email = Json(merge_object(&self.email.0, p)?);
        }
        if let Some(p) = patch.business_hours {
            self.business_hours = Json(merge_object(&self.business_hours.0, p)?);
        }
        if let Some(p) = patch.social_links {
            self.social_links = Json(merge_object(&self.social_links.0, p)?);
        }
        if let Some(name) = patch.company_name.filter(|n| !n.trim().is_empty()) {
            self.company_name = name.trim().to_string();
        }
        if let Some(embed) = patch.google_maps_embed.filter(|e| !e.is_empty()) {
            self.google_maps_embed = embed;
        }
        if let Some(coordinates) = patch.coordinates {
            self.coordinates = Json(coordinates);
        }
        Ok(())
    }
}

/// Shallow merge: keys in `patch` overwrite the serialized form of `current`.
fn merge_object<T>(current: &T, patch: Map<String, Value>) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut base = match serde_json::to_value(current)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    base.extend(patch);
    serde_json::from_value(Value::Object(base))
}

impl Document for ContactInfo {
    const TABLE: &'static str = "contact_info";

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("company_name", self.company_name.clone().into()),
            ("address", json_field(&self.address.0)),
            ("phone", json_field(&self.phone.0)),
            ("email", json_field(&self.email.0)),
            ("business_hours", json_field(&self.business_hours.0)),
            ("social_links", json_field(&self.social_links.0)),
            ("google_maps_embed", self.google_maps_embed.clone().into()),
            ("coordinates", json_field(&self.coordinates.0)),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_include_business_hours() {
        let info = ContactInfo::default();
        assert_eq!(info.company_name, "Javelin Security");
        assert_eq!(info.business_hours.sunday, "Sun: Closed");
    }

    #[test]
    fn patch_merges_nested_objects_shallowly() {
        let mut info = ContactInfo::default();
        info.address.0.city = "Abuja".to_string();
        info.phone.0.primary = "+234 1".to_string();

        let patch: ContactInfoPatch = serde_json::from_value(json!({
            "address": { "street": "1 Guard Road" },
            "businessHours": { "sunday": "Sun: By appointment" },
            "companyName": ""
        }))
        .unwrap();
        info.apply_patch(patch).unwrap();

        assert_eq!(info.address.street, "1 Guard Road");
        assert_eq!(info.address.city, "Abuja");
        assert_eq!(info.phone.primary, "+234 1");
        assert_eq!(info.business_hours.sunday, "Sun: By appointment");
        assert_eq!(info.business_hours.weekdays, "Mon - Fri: 8:00 AM - 6:00 PM");
        assert_eq!(info.company_name, "Javelin Security");
    }
}
