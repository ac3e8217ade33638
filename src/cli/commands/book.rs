use clap::Args;
use serde_json::json;

use crate::cli::config::build_client;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::booking::{time_slots, SERVICES};
use crate::client::{BookingWizard, ClientError};
use crate::database::models::MeetingType;

#[derive(Args)]
pub struct BookArgs {
    #[arg(long, help = "Your full name")]
    pub name: Option<String>,
    #[arg(long, help = "Company name")]
    pub company: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, help = "in-person, phone-call or video-call")]
    pub meeting_type: Option<String>,
    #[arg(long, help = "Preferred date (YYYY-MM-DD)")]
    pub date: Option<String>,
    #[arg(long, help = "Preferred time, e.g. \"10:30 AM\"")]
    pub time: Option<String>,
    #[arg(long, help = "Alternate date (YYYY-MM-DD)")]
    pub alt_date: Option<String>,
    #[arg(long, help = "Alternate time")]
    pub alt_time: Option<String>,
    #[arg(long, help = "Service of interest, e.g. manned-guarding")]
    pub service: Option<String>,
    #[arg(long)]
    pub message: Option<String>,
    #[arg(long, help = "List meeting types, services and time slots, then exit")]
    pub options: bool,
}

pub async fn handle(args: BookArgs, url: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    if args.options {
        return print_options(&output_format);
    }

    let meeting_type = match args.meeting_type.as_deref() {
        Some(raw) => Some(raw.parse::<MeetingType>().map_err(anyhow::Error::msg)?),
        None => None,
    };

    let mut wizard = BookingWizard::new();
    let details = &mut wizard.details;
    details.client_name = args.name.unwrap_or_default();
    details.company_name = args.company.unwrap_or_default();
    details.email = args.email.unwrap_or_default();
    details.phone = args.phone.unwrap_or_default();
    details.meeting_type = meeting_type;
    details.preferred_date = args.date.unwrap_or_default();
    details.preferred_time = args.time.unwrap_or_default();
    details.alternate_date = args.alt_date.unwrap_or_default();
    details.alternate_time = args.alt_time.unwrap_or_default();
    details.service_interest = args.service.unwrap_or_default();
    details.message = args.message.unwrap_or_default();

    let client = build_client(url)?;
    match wizard.submit(&client).await {
        Ok(confirmation) => output_success(
            &output_format,
            &format!("Appointment request submitted. Booking reference {}", confirmation.reference),
            Some(json!({
                "reference": confirmation.reference,
                "appointment": confirmation.appointment,
            })),
        ),
        Err(ClientError::IncompleteStep(step)) => output_error(
            &output_format,
            &format!("Step {} ({}) is incomplete", wizard.step().number(), step),
            Some("INCOMPLETE_BOOKING"),
        ),
        Err(e) => Err(e.into()),
    }
}

fn print_options(output_format: &OutputFormat) -> anyhow::Result<()> {
    let meeting_types: Vec<_> = MeetingType::ALL
        .iter()
        .map(|m| json!({ "value": m.as_str(), "label": m.label() }))
        .collect();
    let services: Vec<_> = SERVICES.iter().map(|(v, l)| json!({ "value": v, "label": l })).collect();

    match output_format {
        OutputFormat::Json => {
            let options = json!({
                "meetingTypes": meeting_types,
                "services": services,
                "timeSlots": time_slots(),
            });
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        OutputFormat::Text => {
            println!("Meeting types:");
            for m in MeetingType::ALL {
                println!("  {:12} {}", m.as_str(), m.label());
            }
            println!("Services:");
            for (value, label) in SERVICES {
                println!("  {:22} {}", value, label);
            }
            println!("Time slots: {}", time_slots().join(", "));
        }
    }
    Ok(())
}
