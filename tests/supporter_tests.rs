/// Unit tests for the Supporter model serialization contract:
/// email-anchored output, contact assembly, custom field handling.
use rust_engage_api::errors::ApiError;
use rust_engage_api::models::{Model, Supporter};
use rust_engage_api::response::ResponseEnvelope;
use serde_json::{json, Value};

mod casting_tests {
    use super::*;

    #[test]
    fn test_casting_without_email_is_empty() {
        let mut supporter = Supporter::new();
        supporter.set("randomValue", json!("5f2b1a"));
        supporter.set("firstName", json!("Alejandro"));
        supporter.set("cellphone", json!("1234567890"));
        assert!(supporter.to_serializable().unwrap().is_empty());
    }

    #[test]
    fn test_casting_only_happens_on_declared_fields() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter.set("randomValue", json!("5f2b1a"));
        supporter.set("firstName", json!("Alejandro"));
        let output = supporter.to_serializable().unwrap();
        assert!(!output.is_empty());
        assert!(output.contains_key("firstName"));
        assert!(!output.contains_key("randomValue"));
        assert!(!output.contains_key("email"));
    }

    #[test]
    fn test_string_casting() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter.set("firstName", json!("Alejandro"));
        assert_eq!(
            supporter.to_json_string().unwrap(),
            "{\"firstName\":\"Alejandro\",\"contacts\":[{\"type\":\"EMAIL\",\
             \"value\":\"test@testing.test\",\"status\":\"OPT_IN\"}]}"
        );
    }

    #[test]
    fn test_email_only_output() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        let output = supporter.to_serializable().unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(
            output["contacts"],
            json!([{"type": "EMAIL", "value": "test@testing.test", "status": "OPT_IN"}])
        );
    }
}

mod contact_tests {
    use super::*;

    fn contact_types(output: &serde_json::Map<String, Value>) -> Vec<&str> {
        output["contacts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["type"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_cellphone_contact() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter.set("cellphone", json!("1234567890"));
        let output = supporter.to_serializable().unwrap();
        let contact = &output["contacts"][1];
        assert_eq!(contact["type"], "CELL_PHONE");
        assert_eq!(contact["value"], "123-456-7890");
        // Phone contacts carry no status field
        assert!(contact.get("status").is_none());
    }

    #[test]
    fn test_contact_ordering_is_fixed() {
        let mut supporter = Supporter::new();
        // Set in scrambled order; wire order must not change
        supporter.set("homephone", json!("323.456.7890"));
        supporter.set("workphone", json!("(223) 456-7890"));
        supporter.set("email", json!("test@testing.test"));
        supporter.set("cellphone", json!("123-456-7890"));
        let output = supporter.to_serializable().unwrap();
        assert_eq!(
            contact_types(&output),
            ["EMAIL", "CELL_PHONE", "WORK_PHONE", "HOME_PHONE"]
        );
    }

    #[test]
    fn test_only_present_phones_emitted() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter.set("workphone", json!("2234567890"));
        let output = supporter.to_serializable().unwrap();
        assert_eq!(contact_types(&output), ["EMAIL", "WORK_PHONE"]);
        assert_eq!(output["contacts"][1]["value"], "223-456-7890");
    }
}

mod custom_field_tests {
    use super::*;

    #[test]
    fn test_boolean_custom_field_defaults() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter
            .add_custom_field(None, Some("target"), json!(false), None)
            .unwrap();
        let output = supporter.to_serializable().unwrap();
        assert_eq!(output["customFieldValues"][0]["value"], json!(false));
    }

    #[test]
    fn test_boolean_custom_field_coerces_zero() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter
            .add_custom_field(None, Some("target"), json!(0), Some("BOOLEAN"))
            .unwrap();
        let output = supporter.to_serializable().unwrap();
        assert_eq!(output["customFieldValues"][0]["value"], json!(false));
    }

    #[test]
    fn test_date_custom_field_formats() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter
            .add_custom_field(None, Some("target"), json!("1985-08-06"), Some("DATE"))
            .unwrap();
        let output = supporter.to_serializable().unwrap();
        assert_eq!(
            output["customFieldValues"][0]["value"],
            json!("1985-08-06T00:00:00.000Z")
        );
    }

    #[test]
    fn test_custom_field_row_shape() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter
            .add_custom_field(Some("abc"), Some("age"), json!(20), None)
            .unwrap();
        assert_eq!(supporter.get("age"), Some(&json!(20)));
        let output = supporter.to_serializable().unwrap();
        assert_eq!(
            output["customFieldValues"][0],
            json!({"fieldId": "abc", "name": "age", "value": 20})
        );
    }

    #[test]
    fn test_custom_field_without_name_uses_field_id_key() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter
            .add_custom_field(Some("field-123"), None, json!("v"), None)
            .unwrap();
        assert_eq!(supporter.get("field-123"), Some(&json!("v")));
        let output = supporter.to_serializable().unwrap();
        let row = &output["customFieldValues"][0];
        assert_eq!(row["fieldId"], "field-123");
        // No name key at all when the field has no name
        assert!(row.get("name").is_none());
    }

    #[test]
    fn test_custom_field_insertion_order_preserved() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        for (i, name) in ["alpha", "beta", "gamma"].into_iter().enumerate() {
            supporter
                .add_custom_field(None, Some(name), json!(i), Some("NUMBER"))
                .unwrap();
        }
        let output = supporter.to_serializable().unwrap();
        let names: Vec<&str> = output["customFieldValues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_custom_field_without_id_and_name_rejected() {
        let mut supporter = Supporter::new();
        let err = supporter
            .add_custom_field(None, None, json!(1), None)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCustomField(_)));
    }

    #[test]
    fn test_array_custom_field_rejected() {
        let mut supporter = Supporter::new();
        let err = supporter
            .add_custom_field(Some("x"), None, json!([1, 2]), None)
            .unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedValueType(_)));
    }
}

mod round_trip_tests {
    use super::*;

    #[test]
    fn test_serialized_supporter_survives_inbound_parse() {
        let mut supporter = Supporter::new();
        supporter.set("email", json!("test@testing.test"));
        supporter.set("cellphone", json!("1234567890"));
        supporter.set("firstName", json!("Alejandro"));
        supporter
            .add_custom_field(Some("abc"), Some("age"), json!(20), None)
            .unwrap();
        supporter
            .add_custom_field(None, Some("member"), json!(true), None)
            .unwrap();
        let wire = supporter.to_serializable().unwrap();

        let response = json!({"payload": {"supporters": [wire]}}).to_string();
        let envelope = ResponseEnvelope::parse(&response).unwrap();
        let parsed = &envelope.supporters().unwrap()[0];

        assert_eq!(parsed.get("email"), Some(&json!("test@testing.test")));
        assert_eq!(parsed.get("cellphone"), Some(&json!("123-456-7890")));
        assert_eq!(parsed.get("firstName"), Some(&json!("Alejandro")));
        assert_eq!(parsed.get("age"), Some(&json!(20)));
        assert_eq!(parsed.get("member"), Some(&json!(true)));
    }
}
