use serde_json::json;
use sqlx::types::Json;
use tracing::info;

use super::admin::{ensure_admin, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
use super::open_store;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::{
    Address, BusinessHours, ContactInfo, EmailAddresses, GalleryCategory, GalleryItem, PhoneNumbers, Site,
    SocialLinks, TeamMember, TeamSocialLinks,
};
use crate::database::Store;
use crate::filter::Filter;

/// What a seeding run did, per collection.
#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub admin_created: bool,
    pub team_members: usize,
    pub sites: usize,
    pub gallery_items: usize,
    pub contact_info_created: bool,
}

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let (db, store) = open_store().await?;
    let report = seed(&store).await?;
    db.close().await;

    output_success(
        &output_format,
        &format!(
            "Seeding complete. Login with {} / {} and change the password.",
            DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD
        ),
        Some(json!({ "report": report })),
    )
}

/// Populates an empty database with sample content. Each collection is
/// skipped when it already has rows.
pub async fn seed(store: &Store) -> anyhow::Result<SeedReport> {
    let (_, admin_created) = ensure_admin(store, "Admin", DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD).await?;

    let mut report = SeedReport { admin_created, ..Default::default() };

    if store.team.count(Filter::new()).await? == 0 {
        for member in sample_team() {
            store.team.insert(member).await?;
            report.team_members += 1;
        }
    } else {
        info!("Team members already exist, skipping");
    }

    if store.sites.count(Filter::new()).await? == 0 {
        for site in sample_sites() {
            store.sites.insert(site).await?;
            report.sites += 1;
        }
    } else {
        info!("Sites already exist, skipping");
    }

    if store.gallery.count(Filter::new()).await? == 0 {
        for item in sample_gallery() {
            store.gallery.insert(item).await?;
            report.gallery_items += 1;
        }
    } else {
        info!("Gallery items already exist, skipping");
    }

    if store.contact_info.count(Filter::new()).await? == 0 {
        store.contact_info.insert(sample_contact_info()).await?;
        report.contact_info_created = true;
    } else {
        info!("Contact info already exists, skipping");
    }

    Ok(report)
}

fn sample_team() -> Vec<TeamMember> {
    let image = "/assets/images/team/placeholder.jpg";
    let people = [
        (
            "John Doe",
            "CEO & Founder",
            "With over 20 years of experience in the security industry, John founded Javelin Security with a vision to provide comprehensive security solutions.",
            TeamSocialLinks {
                linkedin: "https://linkedin.com".to_string(),
                twitter: "https://twitter.com".to_string(),
                ..Default::default()
            },
        ),
        (
            "Jane Smith",
            "Operations Director",
            "Jane oversees all operational aspects of Javelin Security, ensuring our clients receive the highest quality service.",
            TeamSocialLinks { linkedin: "https://linkedin.com".to_string(), ..Default::default() },
        ),
        (
            "Mike Johnson",
            "Security Manager",
            "Mike manages our team of security professionals and ensures all sites are properly staffed and secured.",
            TeamSocialLinks { linkedin: "https://linkedin.com".to_string(), ..Default::default() },
        ),
    ];

    people
        .into_iter()
        .zip(1..)
        .map(|((name, position, bio, links), order)| {
            let mut member = TeamMember::new(name, position, bio, image.to_string());
            member.social_links = Json(links);
            member.display_order = order;
            member
        })
        .collect()
}

fn sample_sites() -> Vec<Site> {
    let image = "/assets/images/sites/placeholder.jpg";
    let mut lagos = Site::new(
        "Lagos Headquarters",
        "Lagos, Nigeria",
        "Our main headquarters providing comprehensive security services across the Lagos metropolitan area.",
        image.to_string(),
    );
    lagos.services = vec!["Armed Guards".into(), "CCTV Monitoring".into(), "24/7 Patrol".into()];
    lagos.display_order = 1;

    let mut abuja = Site::new(
        "Abuja Branch",
        "Abuja, Nigeria",
        "Serving the Federal Capital Territory with premium security solutions for government and corporate clients.",
        image.to_string(),
    );
    abuja.services = vec!["VIP Protection".into(), "Event Security".into(), "Access Control".into()];
    abuja.display_order = 2;

    vec![lagos, abuja]
}

fn sample_gallery() -> Vec<GalleryItem> {
    let image = "/assets/images/gallery/placeholder.jpg";
    [
        ("Security Team Training", "Our team undergoing advanced security training", GalleryCategory::Team),
        ("Corporate Event Security", "Providing security for a major corporate event", GalleryCategory::Events),
        ("Patrol Operations", "Our security personnel on patrol duty", GalleryCategory::WorkInAction),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, description, category), order)| {
        let mut item = GalleryItem::new(title, category, image.to_string());
        item.description = description.to_string();
        item.display_order = order;
        item
    })
    .collect()
}

fn sample_contact_info() -> ContactInfo {
    ContactInfo {
        address: Json(Address {
            street: "123 Security Street".to_string(),
            city: "Lagos".to_string(),
            state: "Lagos State".to_string(),
            country: "Nigeria".to_string(),
            postal_code: "100001".to_string(),
        }),
        phone: Json(PhoneNumbers {
            primary: "+234 800 000 0000".to_string(),
            secondary: "+234 800 000 0001".to_string(),
            whatsapp: "+234 800 000 0000".to_string(),
        }),
        email: Json(EmailAddresses {
            general: "info@javelinsecurity.com".to_string(),
            support: "support@javelinsecurity.com".to_string(),
            careers: "careers@javelinsecurity.com".to_string(),
        }),
        business_hours: Json(BusinessHours {
            sunday: "Sun: Closed (Emergency calls accepted)".to_string(),
            ..Default::default()
        }),
        social_links: Json(SocialLinks {
            facebook: "https://facebook.com/javelinsecurity".to_string(),
            twitter: "https://twitter.com/javelinsecurity".to_string(),
            linkedin: "https://linkedin.com/company/javelinsecurity".to_string(),
            instagram: "https://instagram.com/javelinsecurity".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}
