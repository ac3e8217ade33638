pub mod appointment;
pub mod contact;
pub mod contact_info;
pub mod gallery_item;
pub mod job_application;
pub mod news_post;
pub mod site;
pub mod team_member;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus, MeetingType};
pub use contact::{Contact, ContactStatus};
pub use contact_info::{
    Address, BusinessHours, ContactInfo, ContactInfoPatch, EmailAddresses, PhoneNumbers, SocialLinks,
};
pub use gallery_item::{GalleryCategory, GalleryItem};
pub use job_application::JobApplication;
pub use news_post::{AuthorRef, NewsCategory, NewsPost, NewsPostView, PostStatus};
pub use site::Site;
pub use team_member::{TeamMember, TeamSocialLinks};
pub use user::{Role, User};

use serde::{Deserialize, Serialize};

/// Declares a string-valued enum stored as TEXT. Generates serde names,
/// `as_str`, `FromStr`, and the sqlx decode impls.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("'{}' is not a valid {}", other, stringify!($name))),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<$name>()?)
            }
        }

        impl From<$name> for $crate::filter::FieldValue {
            fn from(v: $name) -> Self {
                $crate::filter::FieldValue::Text(Some(v.as_str().to_string()))
            }
        }
    };
}

pub(crate) use text_enum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A `{value, label}` pair for category pickers.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
}
