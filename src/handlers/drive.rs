use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

const UPLOAD_ENDPOINT: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id,name,webViewLink";
const FALLBACK_TITLE: &str = "Untitled Oreganote";

/// A file created in the user's Drive.
#[derive(Debug, Clone)]
pub struct DriveFile {
    pub file_id: String,
    pub file_name: String,
    pub web_view_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveCreateResponse {
    id: String,
    name: String,
    web_view_link: Option<String>,
}

/// Uploads a note as a plain-text file to the root of the user's Drive.
/// A valid OAuth2 access token is a hard precondition for this one
/// operation; a leading `Bearer ` prefix is tolerated and stripped.
pub async fn upload_note(title: &str, content: &str, access_token: &str) -> Result<DriveFile> {
    let token = access_token
        .strip_prefix("Bearer ")
        .unwrap_or(access_token)
        .trim();
    if token.is_empty() {
        return Err(anyhow!("A Google Drive access token is required"));
    }

    let title = title.trim();
    let file_name = format!(
        "{}.txt",
        if title.is_empty() { FALLBACK_TITLE } else { title }
    );

    let metadata = serde_json::json!({
        "name": file_name,
        "parents": ["root"],
    });

    // Drive's multipart upload wants multipart/related: a JSON metadata
    // part followed by the media part.
    let boundary = "oreganote_drive_upload";
    let body = format!(
        "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n\
         --{boundary}\r\nContent-Type: text/plain\r\n\r\n{content}\r\n--{boundary}--\r\n"
    );

    let response = Client::new()
        .post(UPLOAD_ENDPOINT)
        .bearer_auth(token)
        .header(
            CONTENT_TYPE,
            format!("multipart/related; boundary={boundary}"),
        )
        .body(body)
        .send()
        .await
        .context("Failed to reach Google Drive")?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(anyhow!(
            "Authentication failed. Check that the access token is valid and the Drive API is enabled"
        ));
    }
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(anyhow!("Drive upload failed: {status} {detail}"));
    }

    let created: DriveCreateResponse = response
        .json()
        .await
        .context("Invalid response from Google Drive")?;

    Ok(DriveFile {
        file_id: created.id,
        file_name: created.name,
        web_view_link: created.web_view_link,
    })
}
