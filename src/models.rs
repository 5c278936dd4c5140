//! Domain models for the supporter API.
//!
//! [`Record`] is the generic attribute bag: callers may set any attribute,
//! but only names on the declared-field allow-list survive serialization.
//! [`Supporter`] specializes it with the fixed field set the remote schema
//! recognizes plus an ordered custom-field collection transmitted through
//! the separate `customFieldValues` wire array.

use regex::Regex;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::transforms::{
    eval_custom_field, transform_address, transform_date_of_birth, transform_gender,
    transform_phone, TransformFn, TransformRegistry,
};

/// Fixed attribute names the remote wire schema recognizes directly.
/// Everything else set on a supporter stays in memory and is skipped at
/// serialization time.
pub const DECLARED_FIELDS: &[&str] = &[
    "supporterId",
    "title",
    "firstName",
    "middleName",
    "lastName",
    "suffix",
    "dateOfBirth",
    "gender",
    "externalSystemId",
    "address",
];

/// Generic attribute bag backing a model.
///
/// Attributes keep insertion order (serialization order matches the order
/// the caller set them). The declared-field list is checked when casting to
/// the wire format, not at write time, so arbitrary attributes are always
/// accepted and retained.
#[derive(Debug, Clone)]
pub struct Record {
    attributes: Map<String, Value>,
    declared: &'static [&'static str],
    transforms: TransformRegistry,
}

impl Record {
    pub fn new(declared: &'static [&'static str], transforms: TransformRegistry) -> Self {
        Self {
            attributes: Map::new(),
            declared,
            transforms,
        }
    }

    /// Returns an attribute value, or `None` for anything unset. Unknown
    /// names are never an error.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets a single attribute. The reserved name `attributes` bulk-replaces
    /// the whole mapping when given an object (the inbound parser uses this
    /// to assign raw response entries wholesale).
    pub fn set(&mut self, name: &str, value: Value) {
        if name == "attributes" {
            if let Value::Object(map) = value {
                self.attributes = map;
                return;
            }
        }
        self.attributes.insert(name.to_string(), value);
    }

    /// Read-only view of all attributes, declared or not.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Looks up the transform registered for a field name, if any.
    pub fn transform_for(&self, name: &str) -> Option<TransformFn> {
        self.transforms.get(name).copied()
    }

    /// Casts the declared subset of attributes to wire values, applying
    /// registered transforms. Walks attributes in insertion order.
    pub fn serialize_declared(&self) -> Result<Map<String, Value>, ApiError> {
        let mut output = Map::new();
        for (key, value) in &self.attributes {
            if !self.declared.contains(&key.as_str()) {
                continue;
            }
            let cast = match self.transform_for(key) {
                Some(transform) => transform(value)?,
                None => value.clone(),
            };
            output.insert(key.clone(), cast);
        }
        Ok(output)
    }
}

/// Serialization contract shared by models.
///
/// `to_serializable` casts the declared fields, then hands the output to
/// `on_serialize` so the concrete model can append wire-only structures
/// (or clear the output entirely).
pub trait Model {
    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Hook invoked after declared-field casting; mutates the output map.
    fn on_serialize(&self, output: &mut Map<String, Value>) -> Result<(), ApiError>;

    /// Builds the full wire object for this model.
    fn to_serializable(&self) -> Result<Map<String, Value>, ApiError> {
        let mut output = self.record().serialize_declared()?;
        self.on_serialize(&mut output)?;
        Ok(output)
    }

    /// Canonical JSON rendering of [`Model::to_serializable`].
    fn to_json_string(&self) -> Result<String, ApiError> {
        let output = self.to_serializable()?;
        Ok(serde_json::to_string(&output)?)
    }
}

/// A single custom field attached to a supporter.
///
/// `value` holds the add-time evaluated value; `property` is the normalized
/// name used for late transform lookup (or a generated token when the field
/// only has an ID).
#[derive(Debug, Clone)]
pub struct CustomField {
    pub field_id: Option<String>,
    pub name: Option<String>,
    pub value: Value,
    pub property: String,
}

/// The supporter data model: fixed declared fields plus arbitrary custom
/// fields, serialized into the remote schema's supporter object.
#[derive(Debug, Clone)]
pub struct Supporter {
    record: Record,
    // Insertion order is wire order for customFieldValues.
    custom_fields: Vec<(String, CustomField)>,
}

impl Supporter {
    pub fn new() -> Self {
        let mut transforms: TransformRegistry = TransformRegistry::new();
        transforms.insert("address", transform_address as TransformFn);
        transforms.insert("dateOfBirth", transform_date_of_birth as TransformFn);
        transforms.insert("gender", transform_gender as TransformFn);
        // Late-transform hook for a custom field literally named "phone"
        transforms.insert("phone", transform_phone as TransformFn);
        Self {
            record: Record::new(DECLARED_FIELDS, transforms),
            custom_fields: Vec::new(),
        }
    }

    /// Returns a value by name; custom fields shadow plain attributes.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some((_, field)) = self.custom_fields.iter().find(|(key, _)| key.as_str() == name) {
            return Some(&field.value);
        }
        self.record.get(name)
    }

    /// Sets a value by name; an existing custom field at that key is
    /// updated in place, anything else lands in the attribute bag.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some((_, field)) = self
            .custom_fields
            .iter_mut()
            .find(|(key, _)| key.as_str() == name)
        {
            field.value = value;
            return;
        }
        self.record.set(name, value);
    }

    /// Adds (or replaces) a custom field.
    ///
    /// At least one of `field_id`/`name` is required, and composite values
    /// are rejected; both are caller errors. The value is evaluated against
    /// `field_type` immediately, so reading it back returns the wire value.
    pub fn add_custom_field(
        &mut self,
        field_id: Option<&str>,
        name: Option<&str>,
        value: Value,
        field_type: Option<&str>,
    ) -> Result<(), ApiError> {
        let field_id = field_id.filter(|s| !s.is_empty());
        let name = name.filter(|s| !s.is_empty());
        if field_id.is_none() && name.is_none() {
            return Err(ApiError::InvalidCustomField(
                "custom field can not be added without an ID or a name".to_string(),
            ));
        }
        if value.is_array() || value.is_object() {
            return Err(ApiError::UnsupportedValueType(
                "composite value as custom field is not supported".to_string(),
            ));
        }

        let key = match name {
            Some(n) => normalize_custom_key(n),
            // Unwrap is safe: the None/None case was rejected above.
            None => field_id.unwrap().to_string(),
        };
        let property = match name {
            Some(n) => normalize_custom_key(n),
            None => Uuid::new_v4().simple().to_string(),
        };
        let field = CustomField {
            field_id: field_id.map(str::to_string),
            name: name.map(str::to_string),
            value: eval_custom_field(&value, field_type)?,
            property,
        };

        // Replacing an existing key keeps its wire position.
        if let Some(slot) = self.custom_fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = field;
        } else {
            self.custom_fields.push((key, field));
        }
        Ok(())
    }

    /// Custom fields in insertion order.
    pub fn custom_fields(&self) -> impl Iterator<Item = &CustomField> {
        self.custom_fields.iter().map(|(_, field)| field)
    }

    /// The supporter's `supporterId` attribute, when set.
    pub fn supporter_id(&self) -> Option<&str> {
        self.record.get("supporterId").and_then(Value::as_str)
    }
}

impl Default for Supporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for Supporter {
    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    /// Assembles the `contacts` and `customFieldValues` wire arrays.
    ///
    /// The remote schema anchors every supporter on an email contact: with
    /// no `email` attribute the whole output is cleared and nothing is sent.
    fn on_serialize(&self, output: &mut Map<String, Value>) -> Result<(), ApiError> {
        let email = match self.record.get("email") {
            Some(value) => value.clone(),
            None => {
                output.clear();
                return Ok(());
            }
        };

        let mut contacts = vec![json!({
            "type": "EMAIL",
            "value": email,
            "status": "OPT_IN",
        })];
        // Fixed order; phone entries carry no status field.
        for (attribute, contact_type) in [
            ("cellphone", "CELL_PHONE"),
            ("workphone", "WORK_PHONE"),
            ("homephone", "HOME_PHONE"),
        ] {
            if let Some(value) = self.record.get(attribute) {
                contacts.push(json!({
                    "type": contact_type,
                    "value": transform_phone(value)?,
                }));
            }
        }
        output.insert("contacts".to_string(), Value::Array(contacts));

        if !self.custom_fields.is_empty() {
            let mut rows = Vec::with_capacity(self.custom_fields.len());
            for field in self.custom_fields() {
                let mut row = Map::new();
                if let Some(id) = field.field_id.as_deref().filter(|s| !s.is_empty()) {
                    row.insert("fieldId".to_string(), json!(id));
                }
                if let Some(name) = field.name.as_deref().filter(|s| !s.is_empty()) {
                    row.insert("name".to_string(), json!(name));
                }
                // Values are evaluated at add time; a transform registered
                // under the derived property name runs on the stored value.
                let value = match self.record.transform_for(&field.property) {
                    Some(transform) => transform(&field.value)?,
                    None => field.value.clone(),
                };
                row.insert("value".to_string(), value);
                rows.push(Value::Object(row));
            }
            output.insert("customFieldValues".to_string(), Value::Array(rows));
        }
        Ok(())
    }
}

/// Derives a custom field's storage key from its display name: runs of
/// whitespace and `. ? @ - _` collapse away, then the first character is
/// lowercased.
fn normalize_custom_key(name: &str) -> String {
    let stripped = Regex::new(r"[\s\.\?@\-_]+").unwrap().replace_all(name, "");
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
