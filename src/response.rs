//! Decoded API response envelope.
//!
//! Wraps the raw top-level JSON structure and exposes a parsed view of
//! `payload.supporters` as [`Supporter`] models. The view is computed once
//! on first access and cached; the envelope is immutable otherwise.

use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::errors::ApiError;
use crate::models::{Model, Supporter};

#[derive(Debug)]
pub struct ResponseEnvelope {
    raw: Value,
    supporters: OnceLock<Vec<Supporter>>,
}

impl ResponseEnvelope {
    /// Decodes a raw response body. Anything that is not valid JSON is a
    /// `MalformedResponse` error.
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        let raw: Value = serde_json::from_str(body).map_err(|e| {
            ApiError::MalformedResponse(format!("can't process API response: {}", e))
        })?;
        Ok(Self {
            raw,
            supporters: OnceLock::new(),
        })
    }

    /// The decoded top-level structure.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Raw top-level field lookup; `None` for anything absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// Parsed view of `payload.supporters`, built once and cached.
    ///
    /// Entries whose `result` is `"NOT_FOUND"` are skipped. An absent
    /// supporters array yields an empty view, not an error.
    pub fn supporters(&self) -> Result<&[Supporter], ApiError> {
        if let Some(parsed) = self.supporters.get() {
            return Ok(parsed);
        }
        let built = self.build_supporters()?;
        Ok(self.supporters.get_or_init(|| built))
    }

    fn build_supporters(&self) -> Result<Vec<Supporter>, ApiError> {
        let entries = match self
            .raw
            .get("payload")
            .and_then(|payload| payload.get("supporters"))
            .and_then(Value::as_array)
        {
            Some(entries) => entries,
            None => return Ok(Vec::new()),
        };

        let mut supporters = Vec::new();
        for entry in entries {
            let entry = match entry.as_object() {
                Some(obj) => obj,
                None => continue,
            };
            if entry.get("result").and_then(Value::as_str) == Some("NOT_FOUND") {
                continue;
            }
            supporters.push(supporter_from_entry(entry)?);
        }
        tracing::debug!("Parsed {} supporter(s) from response payload", supporters.len());
        Ok(supporters)
    }
}

/// Builds a [`Supporter`] from one `payload.supporters` entry.
///
/// The entry's fields are bulk-assigned as raw attributes (bypassing
/// custom-field interception), then `contacts` entries are demultiplexed by
/// type into `email`/`cellphone`/`workphone`/`homephone` attributes and
/// `customFieldValues` entries replayed through `add_custom_field`.
fn supporter_from_entry(entry: &Map<String, Value>) -> Result<Supporter, ApiError> {
    let mut supporter = Supporter::new();
    supporter
        .record_mut()
        .set("attributes", Value::Object(entry.clone()));

    if let Some(contacts) = entry.get("contacts").and_then(Value::as_array) {
        for contact in contacts {
            let attribute = match contact.get("type").and_then(Value::as_str) {
                Some("EMAIL") => "email",
                Some("CELL_PHONE") => "cellphone",
                Some("WORK_PHONE") => "workphone",
                Some("HOME_PHONE") => "homephone",
                _ => continue,
            };
            if let Some(value) = contact.get("value") {
                supporter.record_mut().set(attribute, value.clone());
            }
        }
    }

    if let Some(fields) = entry.get("customFieldValues").and_then(Value::as_array) {
        for field in fields {
            supporter.add_custom_field(
                field.get("fieldId").and_then(Value::as_str),
                field.get("name").and_then(Value::as_str),
                field.get("value").cloned().unwrap_or(Value::Null),
                field.get("type").and_then(Value::as_str),
            )?;
        }
    }

    Ok(supporter)
}
