use super::OutgoingMail;
use crate::database::models::{Appointment, Contact, JobApplication};

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(label: &str, value: &str) -> String {
    format!("<p><strong>{}:</strong> {}</p>\n", label, escape_html(value))
}

fn paragraphs(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

pub fn contact_notification(to: &str, contact: &Contact) -> OutgoingMail {
    let mut html = String::from("<h2>New Contact Form Submission</h2>\n");
    html.push_str(&row("Name", &contact.name));
    html.push_str(&row("Email", &contact.email));
    html.push_str(&row("Phone", contact.phone.as_deref().unwrap_or("Not provided")));
    html.push_str(&row("Subject", &contact.subject));
    html.push_str("<p><strong>Message:</strong></p>\n");
    html.push_str(&format!("<p>{}</p>\n", paragraphs(&contact.message)));

    OutgoingMail {
        to: to.to_string(),
        subject: format!("New Contact Form Submission: {}", contact.subject),
        html,
    }
}

pub fn appointment_notification(to: &str, appointment: &Appointment) -> OutgoingMail {
    let mut html = String::from("<h2>New Appointment Request</h2>\n");
    html.push_str(&row("Client", &appointment.client_name));
    if let Some(company) = &appointment.company_name {
        html.push_str(&row("Company", company));
    }
    html.push_str(&row("Email", &appointment.email));
    html.push_str(&row("Phone", &appointment.phone));
    html.push_str(&row("Meeting Type", appointment.meeting_type.label()));
    html.push_str(&row(
        "Preferred",
        &format!("{} at {}", appointment.preferred_date, appointment.preferred_time),
    ));
    if let Some(date) = appointment.alternate_date {
        let time = appointment.alternate_time.as_deref().unwrap_or("");
        html.push_str(&row("Alternate", format!("{} {}", date, time).trim()));
    }
    html.push_str(&row("Service", &appointment.service_interest));
    if let Some(message) = &appointment.message {
        html.push_str(&format!("<p>{}</p>\n", paragraphs(message)));
    }

    OutgoingMail {
        to: to.to_string(),
        subject: format!("New Appointment Request: {}", appointment.client_name),
        html,
    }
}

pub fn application_notification(to: &str, application: &JobApplication) -> OutgoingMail {
    let mut html = String::from("<h2>New Job Application</h2>\n");
    html.push_str(&row("Full Name", &application.full_name));
    html.push_str(&row("Email", &application.email));
    html.push_str(&row("Phone", &application.phone));
    html.push_str(&row("State", &application.state));
    html.push_str(&row("Age", &application.age.to_string()));
    html.push_str(&row("Position", &application.position));
    if let Some(experience) = &application.experience {
        html.push_str(&row("Experience", experience));
    }
    for (label, link) in [
        ("Passport", &application.passport),
        ("CV", &application.cv),
        ("ID Card", &application.id_card),
    ] {
        if let Some(link) = link {
            html.push_str(&row(label, link));
        }
    }
    if let Some(message) = &application.message {
        html.push_str(&format!("<p>{}</p>\n", paragraphs(message)));
    }

    OutgoingMail {
        to: to.to_string(),
        subject: format!("New Job Application: {} ({})", application.full_name, application.position),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn contact_mail_escapes_user_input() {
        let contact = Contact::new("<script>", "a@b.com", None, "Quote", "line1\nline2");
        let mail = contact_notification("admin@javelin.com", &contact);
        assert_eq!(mail.to, "admin@javelin.com");
        assert_eq!(mail.subject, "New Contact Form Submission: Quote");
        assert!(mail.html.contains("&lt;script&gt;"));
        assert!(mail.html.contains("Not provided"));
        assert!(mail.html.contains("line1<br>line2"));
    }
}
