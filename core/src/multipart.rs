//! `multipart/form-data` encoding for image uploads.
//!
//! The backend reads the file from a fixed `image` field and any extra
//! string fields that follow it. ureq has no form builder, so the body is
//! written here; the mock server decodes it with axum's `Multipart`, which
//! the integration tests exercise on every upload.

use uuid::Uuid;

/// Form field the backend reads the uploaded file from.
pub const FILE_FIELD: &str = "image";

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    /// Guess the content type from the file extension.
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Self {
        let content_type = mime_guess::from_path(file_name).first_or_octet_stream();
        Self::new(file_name, content_type.essence_str(), bytes)
    }
}

/// An encoded multipart body and its `Content-Type` header value.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encode `file` under [`FILE_FIELD`] followed by `fields` in order.
pub fn encode(file: &FileUpload, fields: &[(String, String)]) -> MultipartBody {
    let boundary = format!("----listings-{}", Uuid::new_v4().simple());
    encode_with_boundary(file, fields, &boundary)
}

pub(crate) fn encode_with_boundary(
    file: &FileUpload,
    fields: &[(String, String)],
    boundary: &str,
) -> MultipartBody {
    let mut bytes = Vec::with_capacity(file.bytes.len() + 256);

    bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    bytes.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{}\"\r\n",
            escape_quotes(&file.file_name)
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
    bytes.extend_from_slice(&file.bytes);
    bytes.extend_from_slice(b"\r\n");

    for (name, value) in fields {
        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        bytes.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape_quotes(name)).as_bytes(),
        );
        bytes.extend_from_slice(value.as_bytes());
        bytes.extend_from_slice(b"\r\n");
    }

    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes,
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "%22").replace(['\r', '\n'], " ")
}
