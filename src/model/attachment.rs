//! File attachments returned by `exportFileAttachments`.
//!
//! The server answers in one of two shapes:
//! - a SOAP response whose `attachments` block lists each file, content
//!   base64-encoded ([`Attachment`])
//! - a multipart body with the file as a binary part ([`MimeAttachment`])

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde_json::{Map, Value};

use super::field_text;
use crate::codec::multipart::{self, Part};
use crate::error::{BigMachinesError, Result};
use crate::response::MultiPart;

/// Result of an attachment export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportedAttachments {
    /// Multipart download of a single file.
    Mime(MimeAttachment),
    /// Attachments listed in the SOAP response, in document order.
    Listed(Vec<Attachment>),
}

/// One entry of the `attachments` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    raw: Map<String, Value>,
}

impl Attachment {
    /// Wrap one attachment entry.
    pub fn new(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    /// Build one attachment per entry of an `attachments` block.
    ///
    /// An entry holding repeated elements yields one attachment per element.
    /// Non-object entries are skipped.
    pub fn from_attachments(block: &Map<String, Value>) -> Vec<Self> {
        block
            .values()
            .flat_map(|entry| match entry {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
            .filter_map(Value::as_object)
            .map(|raw| Self::new(raw.clone()))
            .collect()
    }

    /// Any field of the entry, as text.
    pub fn get(&self, field: &str) -> Option<String> {
        self.raw.get(field).and_then(field_text)
    }

    pub fn variable_name(&self) -> Option<String> {
        self.get("variable_name")
    }

    pub fn filename(&self) -> Option<String> {
        self.get("filename")
    }

    pub fn document_number(&self) -> Option<u32> {
        self.get("document_number")?.trim().parse().ok()
    }

    /// Decoded file content, if the entry carries any.
    ///
    /// # Errors
    ///
    /// Returns [`BigMachinesError::Base64`] if `file_content` is not valid
    /// base64.
    pub fn content(&self) -> Result<Option<Vec<u8>>> {
        match self.raw.get("file_content").and_then(Value::as_str) {
            Some(encoded) => {
                let compact: String = encoded.split_whitespace().collect();
                Ok(Some(STANDARD.decode(compact)?))
            }
            None => Ok(None),
        }
    }

    /// The raw entry.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

/// A file delivered as a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeAttachment {
    /// Response headers of the download.
    pub headers: Vec<(String, String)>,
    /// Content type of the file part.
    pub content_type: Option<String>,
    /// Content id of the file part, without angle brackets.
    pub content_id: Option<String>,
    /// File name from the part's `Content-Disposition`.
    pub filename: Option<String>,
    /// File bytes.
    pub content: Bytes,
}

impl MimeAttachment {
    /// Pick the file part out of a multipart response.
    ///
    /// The first part that is not the SOAP envelope is the file. If every
    /// part looks like an envelope, the last one is used.
    ///
    /// # Errors
    ///
    /// Returns [`BigMachinesError::Multipart`] if the response declares no
    /// boundary or has no parts.
    pub fn from_multipart(response: MultiPart) -> Result<Self> {
        let content_type = response.header("content-type").unwrap_or_default();
        let boundary = multipart::boundary(content_type).ok_or_else(|| {
            BigMachinesError::Multipart(format!("no boundary in content type {content_type:?}"))
        })?;

        let mut parts = multipart::split(&response.body, &boundary)?;
        let index = parts
            .iter()
            .position(|part| !part.is_soap_envelope())
            .or_else(|| parts.len().checked_sub(1))
            .ok_or_else(|| BigMachinesError::Multipart("multipart body has no parts".into()))?;
        let part = parts.swap_remove(index);

        Ok(Self::from_part(response.headers, part))
    }

    fn from_part(headers: Vec<(String, String)>, part: Part) -> Self {
        let filename = part
            .header("content-disposition")
            .and_then(|cd| multipart::header_param(cd, "filename"));
        let content_id = part
            .header("content-id")
            .map(|id| id.trim_matches(|c| c == '<' || c == '>').to_string());
        Self {
            headers,
            content_type: part.content_type().map(str::to_string),
            content_id,
            filename,
            content: part.body,
        }
    }
}
