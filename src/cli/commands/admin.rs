use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use super::open_store;
use crate::auth::hash_password;
use crate::cli::config::build_client;
use crate::cli::utils::{output_counts, output_record, output_success};
use crate::cli::OutputFormat;
use crate::database::models::user::normalize_email;
use crate::database::models::{AppointmentStatus, Role, User};
use crate::database::{Document, Store};
use crate::filter::Filter;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@javelin.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create the superadmin account if it does not exist (database)")]
    Create {
        #[arg(long, default_value = DEFAULT_ADMIN_EMAIL)]
        email: String,
        #[arg(long, default_value = DEFAULT_ADMIN_PASSWORD)]
        password: String,
        #[arg(long, default_value = "Admin")]
        name: String,
    },

    #[command(about = "Set every user to role admin and reactivate them (database)")]
    FixRoles,

    #[command(about = "List appointment requests (API)")]
    Appointments {
        #[arg(long, help = "pending, confirmed, cancelled or completed")]
        status: Option<String>,
    },

    #[command(about = "Change an appointment's status (API)")]
    SetStatus {
        id: Uuid,
        #[arg(help = "pending, confirmed, cancelled or completed")]
        status: String,
    },

    #[command(about = "List contact messages (API)")]
    Contacts {
        #[arg(long, help = "new, read, replied or archived")]
        status: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },

    #[command(about = "Show inbox and booking counts (API)")]
    Stats,
}

pub async fn handle(cmd: AdminCommands, url: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Create { email, password, name } => {
            let (db, store) = open_store().await?;
            let (user, created) = ensure_admin(&store, &name, &email, &password).await?;
            db.close().await;

            let message = if created {
                format!("Admin user created: {} ({})", user.email, user.role)
            } else {
                format!("Admin user already exists: {} ({})", user.email, user.role)
            };
            output_success(&output_format, &message, Some(json!({ "user": user, "created": created })))
        }
        AdminCommands::FixRoles => {
            let (db, store) = open_store().await?;
            let updated = fix_roles(&store).await?;
            db.close().await;

            if updated.is_empty() {
                return output_success(&output_format, "No users found; register one first", None);
            }
            output_success(
                &output_format,
                &format!("Updated {} user(s) to role admin, active", updated.len()),
                Some(json!({ "users": updated })),
            )
        }
        AdminCommands::Appointments { status } => {
            let appointments = build_client(url)?.appointments(status.as_deref()).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&appointments)?),
                OutputFormat::Text => {
                    if appointments.is_empty() {
                        println!("No appointments");
                    }
                    for a in &appointments {
                        println!(
                            "{}  {:10}  {} {}  {} <{}>  {}",
                            a.id,
                            a.status,
                            a.preferred_date,
                            a.preferred_time,
                            a.client_name,
                            a.email,
                            a.meeting_type.label()
                        );
                    }
                }
            }
            Ok(())
        }
        AdminCommands::SetStatus { id, status } => {
            let status: AppointmentStatus = status.parse().map_err(anyhow::Error::msg)?;
            let appointment = build_client(url)?.set_appointment_status(id, status).await?;
            output_record(&output_format, "Appointment updated", &json!(appointment))
        }
        AdminCommands::Contacts { status, page } => {
            let listing = build_client(url)?.contacts(status.as_deref(), page).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing.items)?),
                OutputFormat::Text => {
                    println!("Page {} of {} ({} messages)", listing.current_page, listing.pages.max(1), listing.total);
                    for c in &listing.items {
                        println!("{}  {:8}  {} <{}>  {}", c.id, c.status, c.name, c.email, c.subject);
                    }
                }
            }
            Ok(())
        }
        AdminCommands::Stats => {
            let client = build_client(url)?;
            let contacts = client.contact_stats().await?;
            let appointments = client.appointment_stats().await?;
            match output_format {
                OutputFormat::Json => {
                    let stats = json!({ "contacts": contacts, "appointments": appointments });
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                    Ok(())
                }
                OutputFormat::Text => {
                    output_counts(&output_format, "Contact messages", &contacts)?;
                    output_counts(&output_format, "Appointments", &appointments)
                }
            }
        }
    }
}

/// Returns the existing user for `email`, or creates a superadmin.
pub async fn ensure_admin(store: &Store, name: &str, email: &str, password: &str) -> anyhow::Result<(User, bool)> {
    let email = normalize_email(email);
    if let Some(existing) = store.users.select_one(Filter::new().where_eq("email", email.as_str())).await? {
        return Ok((existing, false));
    }

    let user = User::new(name, &email, hash_password(password)?, Role::Superadmin);
    let user = store.users.insert(user).await?;
    tracing::info!(email = %user.email, "Created superadmin");
    Ok((user, true))
}

/// Every user becomes an active admin. Returns the emails touched.
pub async fn fix_roles(store: &Store) -> anyhow::Result<Vec<String>> {
    let users = store.users.select_any(Filter::new().order("created_at asc")).await?;
    let mut updated = Vec::with_capacity(users.len());
    for mut user in users {
        user.role = Role::Admin;
        user.is_active = true;
        user.touch(chrono::Utc::now());
        let user = store.users.update(user).await?;
        updated.push(user.email);
    }
    Ok(updated)
}
