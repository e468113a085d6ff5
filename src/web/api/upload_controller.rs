use rocket::State;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Header;
use rocket::tokio::io::AsyncReadExt;

use crate::dispatch::{Attachment, DispatchReport, DispatchRequest, Mailer};
use crate::recipients::{FileFormat, extract_addresses};
use crate::tools::log_message_and_return;
use crate::web::error::UploadError;
use crate::web::error::UploadError::{CantReadUpload, NoEmailFile, NoValidEmailAddress};

const SUCCESS_MESSAGE: &str = "Emails sent successfully";
const SENT_HEADER: &str = "X-Emails-Sent";
const FAILED_HEADER: &str = "X-Emails-Failed";
const DEFAULT_ATTACHMENT_FILENAME: &str = "attachment";

#[derive(FromForm)]
pub struct Upload<'r> {
    #[field(name = "emailFile")]
    email_file: Option<TempFile<'r>>,
    attachment: Option<TempFile<'r>>,
    subject: Option<String>,
    message: Option<String>,
}

/// Sent once every email has been attempted, whatever their outcome.
/// How many of them actually left is told by the headers.
#[derive(Responder)]
#[response(status = 200, content_type = "plain")]
pub struct DispatchSummary {
    message: &'static str,
    sent: Header<'static>,
    failed: Header<'static>,
}

impl From<&DispatchReport> for DispatchSummary {
    fn from(report: &DispatchReport) -> Self {
        Self {
            message: SUCCESS_MESSAGE,
            sent: Header::new(SENT_HEADER, report.succeeded().to_string()),
            failed: Header::new(FAILED_HEADER, report.failed().to_string()),
        }
    }
}

/// Read the addresses from the email file,
/// then send the message, and the attachment if any, to each of them.
#[post("/upload", data = "<upload>")]
pub async fn upload(
    mailer: &State<Mailer>,
    upload: Form<Upload<'_>>,
) -> Result<DispatchSummary, UploadError> {
    let upload = upload.into_inner();

    let email_file = upload
        .email_file
        .filter(|file| file.len() > 0)
        .ok_or(NoEmailFile)?;
    let format = FileFormat::detect(
        original_filename(&email_file).as_deref(),
        content_type(&email_file).as_deref(),
    );
    let content = read_temp_file(&email_file).await?;
    let addresses = extract_addresses(&content, format)?;
    if addresses.is_empty() {
        return Err(NoValidEmailAddress);
    }

    let attachment = match upload.attachment.filter(is_present) {
        Some(file) => Some(read_attachment(&file).await?),
        None => None,
    };
    let request = DispatchRequest::new(
        upload.subject.unwrap_or_default(),
        upload.message.unwrap_or_default(),
        attachment,
    );

    let report = mailer.dispatch(&addresses, &request).await;

    Ok(DispatchSummary::from(&report))
}

/// Anything that is not a form can't carry an email file.
#[post("/upload", rank = 2)]
pub async fn upload_without_form() -> UploadError {
    NoEmailFile
}

/// Browsers send an empty, nameless part when no file has been picked.
fn is_present(file: &TempFile<'_>) -> bool {
    file.len() > 0 || original_filename(file).is_some()
}

/// Name of the file on the user's computer, without any path.
fn original_filename(file: &TempFile<'_>) -> Option<String> {
    file.raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

fn content_type(file: &TempFile<'_>) -> Option<String> {
    file.content_type().map(|content_type| content_type.to_string())
}

async fn read_attachment(file: &TempFile<'_>) -> Result<Attachment, UploadError> {
    let content = read_temp_file(file).await?;
    let filename = original_filename(file).unwrap_or(DEFAULT_ATTACHMENT_FILENAME.to_owned());

    Ok(Attachment::new(filename, content_type(file), content))
}

async fn read_temp_file(file: &TempFile<'_>) -> Result<Vec<u8>, UploadError> {
    let reader = file
        .open()
        .await
        .map_err(log_message_and_return("Can't open uploaded file", CantReadUpload))?;
    rocket::tokio::pin!(reader);

    let mut content = Vec::with_capacity(file.len() as usize);
    reader
        .read_to_end(&mut content)
        .await
        .map_err(log_message_and_return("Can't read uploaded file", CantReadUpload))?;

    Ok(content)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::{Client, LocalResponse};

    use crate::dispatch::Mailer;
    use crate::dispatch::transport::tests::StubTransport;
    use crate::tools::test::tests::{MultipartBody, email_xlsx_file, init_logger};
    use crate::web::api::upload_controller::{upload, upload_without_form};

    const XLSX_CONTENT_TYPE: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    const ADDRESSES: [&str; 3] = ["a@test.com", "b@test.com", "c@test.com"];

    async fn get_client(transport: Arc<StubTransport>) -> Client {
        init_logger();
        let rocket = rocket::build()
            .manage(Mailer::new(Box::new(transport), None))
            .mount("/", routes![upload, upload_without_form]);

        Client::tracked(rocket).await.unwrap()
    }

    async fn post(client: &Client, body: MultipartBody) -> LocalResponse<'_> {
        client
            .post("/upload")
            .header(MultipartBody::content_type())
            .body(body.finish())
            .dispatch()
            .await
    }

    fn email_file(body: MultipartBody, addresses: &[Option<&str>]) -> MultipartBody {
        body.file("emailFile", "emails.xlsx", XLSX_CONTENT_TYPE, &email_xlsx_file(addresses))
    }

    fn three_addresses() -> Vec<Option<&'static str>> {
        vec![Some(ADDRESSES[0]), None, Some(ADDRESSES[1]), Some(""), Some(ADDRESSES[2])]
    }

    fn assert_header(response: &LocalResponse<'_>, name: &str, expected_value: &str) {
        assert_eq!(Some(expected_value), response.headers().get_one(name));
    }

    #[async_test]
    async fn should_send_to_every_address() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;
        let body = email_file(MultipartBody::default(), &three_addresses())
            .file("attachment", "report.pdf", "application/pdf", b"%PDF-1.4")
            .text("subject", "Hello")
            .text("message", "Hello everyone");

        let response = post(&client, body).await;

        assert_eq!(Status::Ok, response.status());
        assert_header(&response, "X-Emails-Sent", "3");
        assert_header(&response, "X-Emails-Failed", "0");
        assert_eq!(
            Some("Emails sent successfully".to_owned()),
            response.into_string().await
        );

        let sent = transport.sent();
        assert_eq!(
            ADDRESSES.to_vec(),
            sent.iter().map(|message| message.recipient.as_str()).collect::<Vec<_>>()
        );
        for message in sent {
            assert_eq!("Hello", message.request.subject());
            assert_eq!("Hello everyone", message.request.body());
            let attachment = message.request.attachment().as_ref().unwrap();
            assert_eq!("report.pdf", attachment.filename());
            assert_eq!(&Some("application/pdf".to_owned()), attachment.content_type());
            assert_eq!(b"%PDF-1.4".to_vec(), *attachment.content());
        }
    }

    #[async_test]
    async fn should_succeed_even_when_some_sends_fail() {
        let transport = Arc::new(StubTransport::default().failing_for(ADDRESSES[1]));
        let client = get_client(transport.clone()).await;
        let body = email_file(MultipartBody::default(), &three_addresses())
            .text("subject", "Hello")
            .text("message", "Hello everyone");

        let response = post(&client, body).await;

        assert_eq!(Status::Ok, response.status());
        assert_header(&response, "X-Emails-Sent", "2");
        assert_header(&response, "X-Emails-Failed", "1");
        assert_eq!(3, transport.sent().len());
    }

    #[async_test]
    async fn should_send_without_attachment() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;
        let body = email_file(MultipartBody::default(), &three_addresses())
            .text("subject", "Hello")
            .text("message", "Hello everyone");

        let response = post(&client, body).await;

        assert_eq!(Status::Ok, response.status());
        assert!(
            transport
                .sent()
                .iter()
                .all(|message| message.request.attachment().is_none())
        );
    }

    #[async_test]
    async fn should_strip_path_from_attachment_filename() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;
        let body = email_file(MultipartBody::default(), &[Some(ADDRESSES[0])]).file(
            "attachment",
            "documents/2025/notes.txt",
            "text/plain",
            b"notes",
        );

        let response = post(&client, body).await;

        assert_eq!(Status::Ok, response.status());
        let sent = transport.sent();
        let attachment = sent[0].request.attachment().as_ref().unwrap();
        assert_eq!("notes.txt", attachment.filename());
        assert_eq!("", sent[0].request.subject());
    }

    #[async_test]
    async fn should_read_csv_email_file() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;
        let body = MultipartBody::default().file(
            "emailFile",
            "emails.csv",
            "text/csv",
            b"Name,Email\nJon,jon@test.com\nJonette,\n",
        );

        let response = post(&client, body).await;

        assert_eq!(Status::Ok, response.status());
        assert_header(&response, "X-Emails-Sent", "1");
        assert_eq!("jon@test.com", transport.sent()[0].recipient);
    }

    #[async_test]
    async fn should_reject_upload_without_email_file() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;
        let body = MultipartBody::default()
            .file("attachment", "report.pdf", "application/pdf", b"%PDF-1.4")
            .text("subject", "Hello")
            .text("message", "Hello everyone");

        let response = post(&client, body).await;

        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            Some("No email file uploaded.".to_owned()),
            response.into_string().await
        );
        assert!(transport.sent().is_empty());
    }

    #[async_test]
    async fn should_reject_upload_that_is_not_a_form() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;

        let response = client
            .post("/upload")
            .header(ContentType::JSON)
            .body(r#"{"subject": "Hello"}"#)
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            Some("No email file uploaded.".to_owned()),
            response.into_string().await
        );
        assert!(transport.sent().is_empty());
    }

    #[async_test]
    async fn should_reject_upload_without_body() {
        let client = get_client(Arc::new(StubTransport::default())).await;

        let response = client.post("/upload").dispatch().await;

        assert_eq!(Status::BadRequest, response.status());
    }

    #[async_test]
    async fn should_reject_email_file_without_address() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;
        let body = email_file(MultipartBody::default(), &[None, Some(""), Some("  ")])
            .text("subject", "Hello");

        let response = post(&client, body).await;

        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            Some("No valid email addresses found in the uploaded file.".to_owned()),
            response.into_string().await
        );
        assert!(transport.sent().is_empty());
    }

    #[async_test]
    async fn should_reject_unreadable_email_file() {
        let transport = Arc::new(StubTransport::default());
        let client = get_client(transport.clone()).await;
        let body = MultipartBody::default().file(
            "emailFile",
            "emails.xlsx",
            XLSX_CONTENT_TYPE,
            b"This is not a workbook",
        );

        let response = post(&client, body).await;

        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            Some("Unable to read the uploaded email file.".to_owned()),
            response.into_string().await
        );
        assert!(transport.sent().is_empty());
    }
}
