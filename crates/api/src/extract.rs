//! Decoding of admin write requests into a kind tag, an optional id, a
//! field set and at most one image upload.
//!
//! Two encodings are accepted on the same route: a JSON document
//! `{ kind, id?, fields }` for text-only kinds, and `multipart/form-data`
//! where every text part is a field and the single file part is the image.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use studio_core::record::{ContentKind, FieldSet, ValidationError};
use studio_core::upload::{Asset, UploadLimits};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";
const OCTET_STREAM: &str = "application/octet-stream";

/// A decoded create or update request.
#[derive(Debug, Default)]
pub struct Submission {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub fields: FieldSet,
    pub asset: Option<Asset>,
}

impl Submission {
    pub fn kind(&self) -> Result<ContentKind, ValidationError> {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ValidationError::MissingParameter("kind"))?
            .parse()
    }

    /// The record id, required for updates.
    pub fn require_id(&self) -> Result<&str, ValidationError> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingParameter("id"))
    }
}

#[derive(Debug, Deserialize)]
struct JsonSubmission {
    #[serde(alias = "model")]
    kind: Option<String>,
    id: Option<String>,
    #[serde(default, alias = "data")]
    fields: Map<String, Value>,
}

impl FromRequest<AppState> for Submission {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
            return decode_multipart(multipart, state.limits()).await;
        }

        let Json(body) = Json::<JsonSubmission>::from_request(req, state)
            .await
            .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
        let mut fields = FieldSet::from_json(body.fields)?;
        drop_blank_image(&mut fields);
        Ok(Submission {
            kind: body.kind,
            id: body.id,
            fields,
            asset: None,
        })
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

/// Browsers submit an empty `image` field when no file was chosen.
fn drop_blank_image(fields: &mut FieldSet) {
    if fields.get(IMAGE_FIELD).is_some_and(|v| v.trim().is_empty()) {
        fields.remove(IMAGE_FIELD);
    }
}

async fn decode_multipart(
    mut multipart: Multipart,
    limits: UploadLimits,
) -> ApiResult<Submission> {
    let malformed = |e: axum::extract::multipart::MultipartError| {
        ApiError::from(ValidationError::MalformedBody(e.body_text()))
    };
    let mut submission = Submission::default();

    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await.map_err(malformed)?;
            match name.as_str() {
                "kind" | "model" => submission.kind = Some(value),
                "id" => submission.id = Some(value),
                _ => submission.fields.insert(name, value),
            }
            continue;
        };

        if name != IMAGE_FIELD {
            return Err(ValidationError::UnexpectedFilePart { field: name }.into());
        }
        let media_type = field.content_type().unwrap_or(OCTET_STREAM).to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(malformed)? {
            limits.check_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }
        // An empty file input still produces a part with no name and no bytes.
        if bytes.is_empty() && file_name.is_empty() {
            continue;
        }
        if submission.asset.is_some() {
            return Err(ValidationError::DuplicateAsset.into());
        }

        let mut asset = Asset::new(bytes, media_type);
        if !file_name.is_empty() {
            asset = asset.with_original_name(file_name);
        }
        submission.asset = Some(asset);
    }

    drop_blank_image(&mut submission.fields);
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use studio_core::asset::{AssetStore, Locator};

    use crate::routes::testing::{multipart_request, read_json, send, TestApp, BOUNDARY};

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    fn form(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, media_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; \
                             filename=\"{file_name}\"\r\nContent-Type: {media_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn multipart_update_with_id_replaces_the_image() {
        let app = TestApp::new();
        let created = send(
            &app,
            multipart_request(
                Method::POST,
                "/content",
                form(&[
                    Part::Text("kind", "service"),
                    Part::Text("title", "Albums"),
                    Part::Text("description", "Printed and bound"),
                    Part::File("image", "old.png", "image/png", b"old-bytes"),
                ]),
            ),
        )
        .await;
        assert_eq!(created.status(), StatusCode::OK);
        let created = read_json(created).await["data"].clone();
        let id = created["id"].as_str().unwrap().to_string();
        let old = Locator::new(created["image"].as_str().unwrap());

        let updated = send(
            &app,
            multipart_request(
                Method::PUT,
                "/content",
                form(&[
                    Part::Text("kind", "service"),
                    Part::Text("id", &id),
                    Part::Text("title", "Heirloom albums"),
                    Part::File("image", "new.png", "image/png", b"new-bytes"),
                ]),
            ),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::OK);
        let updated = read_json(updated).await["data"].clone();
        assert_eq!(updated["id"], id.as_str());
        assert_eq!(updated["title"], "Heirloom albums");
        assert_eq!(updated["description"], "Printed and bound");

        let new = Locator::new(updated["image"].as_str().unwrap());
        assert_ne!(new, old);
        assert_eq!(app.store.read(&new).await.unwrap().unwrap(), b"new-bytes");
        assert_eq!(app.store.read(&old).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_file_input_is_ignored() {
        let app = TestApp::new();
        let response = send(
            &app,
            multipart_request(
                Method::POST,
                "/content",
                form(&[
                    Part::Text("kind", "testimonial"),
                    Part::Text("name", "Jane Doe"),
                    Part::Text("content", "Lovely photos"),
                    Part::Text("rating", "5"),
                    Part::File("image", "", "application/octet-stream", b""),
                ]),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(app.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_image_text_field_is_dropped() {
        let app = TestApp::new();
        let response = send(
            &app,
            multipart_request(
                Method::POST,
                "/content",
                form(&[
                    Part::Text("kind", "testimonial"),
                    Part::Text("name", "Jane Doe"),
                    Part::Text("content", "Lovely photos"),
                    Part::Text("rating", "5"),
                    Part::Text("image", " "),
                ]),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let data = read_json(response).await["data"].clone();
        assert!(data.get("image").is_none());
    }

    #[tokio::test]
    async fn second_image_part_is_rejected() {
        let app = TestApp::new();
        let response = send(
            &app,
            multipart_request(
                Method::POST,
                "/content",
                form(&[
                    Part::Text("kind", "service"),
                    Part::Text("title", "Albums"),
                    Part::Text("description", "Printed"),
                    Part::File("image", "a.png", "image/png", b"first"),
                    Part::File("image", "b.png", "image/png", b"second"),
                ]),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("only one `image`"));
        assert!(app.repository.is_empty().await);
        assert!(app.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_image_is_rejected_while_streaming() {
        let app = TestApp::new();
        let limit = app_limit();
        let image = vec![0u8; limit + 1];
        let response = send(
            &app,
            multipart_request(
                Method::POST,
                "/content",
                form(&[
                    Part::Text("kind", "service"),
                    Part::Text("title", "Albums"),
                    Part::Text("description", "Printed"),
                    Part::File("image", "big.png", "image/png", &image),
                ]),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("upload limit"));
        assert!(app.repository.is_empty().await);
        assert!(app.store.list().await.unwrap().is_empty());
    }

    fn app_limit() -> usize {
        crate::config::AppConfig::for_tests("unused".into()).max_upload_bytes
    }
}
