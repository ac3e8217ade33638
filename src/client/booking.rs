//! Four-step meeting booking form: contact, meeting type, schedule, details.
//!
//! Each step gates "next" on its own required fields. Nothing is sent until
//! [`BookingWizard::submit`], which posts the whole payload at once.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{ApiClient, ClientError};
use crate::database::models::{Appointment, MeetingType};

/// `(value, label)` pairs offered for `serviceInterest`.
pub const SERVICES: &[(&str, &str)] = &[
    ("manned-guarding", "Manned Guarding"),
    ("mobile-patrol", "Mobile Patrol"),
    ("event-security", "Event Security"),
    ("corporate-security", "Corporate Security"),
    ("residential-security", "Residential Security"),
    ("vip-protection", "VIP Protection"),
    ("other", "Other / Multiple Services"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookingStep {
    Contact,
    MeetingType,
    Schedule,
    Details,
}

impl BookingStep {
    pub fn number(&self) -> u8 {
        match self {
            BookingStep::Contact => 1,
            BookingStep::MeetingType => 2,
            BookingStep::Schedule => 3,
            BookingStep::Details => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStep::Contact => "Your Info",
            BookingStep::MeetingType => "Meeting Type",
            BookingStep::Schedule => "Schedule",
            BookingStep::Details => "Details",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            BookingStep::Contact => Some(BookingStep::MeetingType),
            BookingStep::MeetingType => Some(BookingStep::Schedule),
            BookingStep::Schedule => Some(BookingStep::Details),
            BookingStep::Details => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            BookingStep::Contact => None,
            BookingStep::MeetingType => Some(BookingStep::Contact),
            BookingStep::Schedule => Some(BookingStep::MeetingType),
            BookingStep::Details => Some(BookingStep::Schedule),
        }
    }
}

/// The request body for `POST /appointments`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub client_name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub meeting_type: Option<MeetingType>,
    pub preferred_date: String,
    pub preferred_time: String,
    pub alternate_date: String,
    pub alternate_time: String,
    pub service_interest: String,
    pub message: String,
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub reference: String,
    pub appointment: Appointment,
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: BookingStep,
    pub details: BookingDetails,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWizard {
    pub fn new() -> Self {
        Self { step: BookingStep::Contact, details: BookingDetails::default() }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    /// Whether the current step has what it needs. The details step has no
    /// required fields of its own.
    pub fn can_advance(&self) -> bool {
        let d = &self.details;
        match self.step {
            BookingStep::Contact => {
                filled(&d.client_name) && filled(&d.company_name) && filled(&d.email) && filled(&d.phone)
            }
            BookingStep::MeetingType => d.meeting_type.is_some(),
            BookingStep::Schedule => filled(&d.preferred_date) && filled(&d.preferred_time),
            BookingStep::Details => true,
        }
    }

    /// Moves forward when the current step is complete. Returns the step now shown.
    pub fn next(&mut self) -> Result<BookingStep, ClientError> {
        if !self.can_advance() {
            return Err(ClientError::IncompleteStep(self.step.label()));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> BookingStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Runs every remaining step gate, then sends the booking.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<BookingConfirmation, ClientError> {
        while self.step != BookingStep::Details {
            self.next()?;
        }
        let appointment = client.book_appointment(&self.details).await?;
        Ok(BookingConfirmation { reference: booking_reference(), appointment })
    }
}

/// A display reference such as `JVL-M2X8K1ZQ-4F7QA`.
pub fn booking_reference() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let random = u64::from_le_bytes(Uuid::new_v4().as_bytes()[..8].try_into().unwrap_or([0; 8]));
    let suffix: String = base36(random).chars().take(5).collect();
    format!("JVL-{}-{:0>5}", base36(millis).to_uppercase(), suffix.to_uppercase())
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Half-hour slots from 09:00 AM to 05:00 PM inclusive.
pub fn time_slots() -> Vec<String> {
    (18..=34)
        .map(|half_hours: u32| {
            let hour = half_hours / 2;
            let minute = (half_hours % 2) * 30;
            let (display, meridiem) = match hour {
                0..=11 => (hour, "AM"),
                12 => (12, "PM"),
                _ => (hour - 12, "PM"),
            };
            format!("{:02}:{:02} {}", display, minute, meridiem)
        })
        .collect()
}
