mod common;

use anyhow::Result;
use javelin_api::filter::Filter;
use reqwest::multipart::Part;
use reqwest::StatusCode;

use common::{body, form, pdf, png, TestServer};

fn applicant() -> reqwest::multipart::Form {
    form(&[
        ("fullName", "Emeka Nwosu"),
        ("email", "emeka@example.com"),
        ("phone", "+234 803 555 0101"),
        ("state", "Enugu"),
        ("age", "29"),
        ("position", "Security Guard"),
        ("experience", "3-5 years"),
    ])
}

#[tokio::test]
async fn application_with_documents_is_stored_and_hr_notified() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let fields = applicant().part("cv", pdf("cv.pdf")).part("passport", png("passport.png"));
    let resp = server.client.post(server.url("/api/applications")).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Application submitted successfully! We will review and contact you soon.");
    assert_eq!(server.storage.stored(), 2);

    let sent = server.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "hr@javelin.com");
    assert_eq!(sent[0].subject, "New Job Application: Emeka Nwosu (Security Guard)");

    let resp = server.client.get(server.url("/api/applications")).bearer_auth(&token).send().await?;
    let (_, listing) = body(resp).await?;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["data"][0]["cv"], "/uploads/cv-2.pdf");
    assert!(listing["data"][0]["idCard"].is_null());
    Ok(())
}

#[tokio::test]
async fn underage_applicant_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let fields = form(&[
        ("fullName", "Young Applicant"),
        ("email", "young@example.com"),
        ("phone", "0800"),
        ("state", "Lagos"),
        ("age", "16"),
        ("position", "Guard"),
    ]);
    let resp = server.client.post(server.url("/api/applications")).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"]["age"], "Age must be between 18 and 65");
    assert_eq!(server.state.store.applications.count(Filter::new()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn one_bad_document_stores_nothing() -> Result<()> {
    let server = TestServer::start().await?;
    let script = Part::bytes(b"echo hi".to_vec()).file_name("run.sh").mime_str("text/x-shellscript")?;
    let fields = applicant().part("cv", pdf("cv.pdf")).part("idCard", script);
    let resp = server.client.post(server.url("/api/applications")).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid file type. Only JPEG, PNG, PDF, DOC, DOCX allowed.");
    assert_eq!(server.storage.stored(), 0);
    assert_eq!(server.state.store.applications.count(Filter::new()).await?, 0);
    Ok(())
}

fn large_pdf(name: &str, len: usize) -> Part {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(len, b' ');
    Part::bytes(bytes).file_name(name.to_string()).mime_str("application/pdf").unwrap()
}

#[tokio::test]
async fn three_documents_near_the_file_limit_are_accepted() -> Result<()> {
    let server = TestServer::start().await?;
    let four_mib = 4 * 1024 * 1024;

    let fields = applicant()
        .part("passport", large_pdf("passport.pdf", four_mib))
        .part("cv", large_pdf("cv.pdf", four_mib))
        .part("idCard", large_pdf("id.pdf", four_mib));
    let resp = server.client.post(server.url("/api/applications")).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    assert_eq!(server.storage.stored(), 3);
    Ok(())
}
