use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;
use crate::database::document::Document;
use crate::filter::FieldValue;

text_enum! {
    MeetingType {
        InPerson => "in-person",
        PhoneCall => "phone-call",
        VideoCall => "video-call",
    }
}

impl MeetingType {
    pub fn label(&self) -> &'static str {
        match self {
            MeetingType::InPerson => "In-Person Meeting",
            MeetingType::PhoneCall => "Phone Call",
            MeetingType::VideoCall => "Video Call",
        }
    }
}

text_enum! {
    AppointmentStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
        Completed => "completed",
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub client_name: String,
    pub company_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub meeting_type: MeetingType,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub alternate_date: Option<NaiveDate>,
    pub alternate_time: Option<String>,
    pub service_interest: String,
    pub message: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Appointment {
    const TABLE: &'static str = "appointments";

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("client_name", self.client_name.clone().into()),
            ("company_name", self.company_name.clone().into()),
            ("email", self.email.clone().into()),
            ("phone", self.phone.clone().into()),
            ("meeting_type", self.meeting_type.into()),
            ("preferred_date", self.preferred_date.into()),
            ("preferred_time", self.preferred_time.clone().into()),
            ("alternate_date", self.alternate_date.into()),
            ("alternate_time", self.alternate_time.clone().into()),
            ("service_interest", self.service_interest.clone().into()),
            ("message", self.message.clone().into()),
            ("status", self.status.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
