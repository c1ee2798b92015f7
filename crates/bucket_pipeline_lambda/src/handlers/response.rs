use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Unwraps an API Gateway proxy event into its JSON body. Direct invocations
/// pass through unchanged and a missing payload is treated as `{}`. Only a
/// string body that is not JSON is an error.
pub fn normalize_apigw_event(event: Value) -> Result<Value, String> {
    if event.is_null() {
        return Ok(json!({}));
    }

    let Some(body) = event.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::String(text) if text.trim().is_empty() => Ok(json!({})),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        other => Ok(other.clone()),
    }
}

pub fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json!({"Content-Type": "application/json"}),
            body,
        },
        Err(error) => error_response(
            500,
            json!({
                "error": "serialization_error",
                "message": error.to_string(),
            }),
        ),
    }
}

pub fn error_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    let body = serde_json::to_string(&payload).unwrap_or_else(|error| {
        json!({
            "error": "serialization_error",
            "message": error.to_string(),
        })
        .to_string()
    });

    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_direct_invocation_payload_through() {
        let payload = normalize_apigw_event(json!({"readFirstObject": true}))
            .expect("payload should normalize");
        assert_eq!(payload, json!({"readFirstObject": true}));
    }

    #[test]
    fn unwraps_string_and_object_bodies() {
        let from_string = normalize_apigw_event(json!({"body": "{\"readFirstObject\":true}"}))
            .expect("string body should normalize");
        let from_object = normalize_apigw_event(json!({"body": {"readFirstObject": true}}))
            .expect("object body should normalize");

        assert_eq!(from_string, from_object);
    }

    #[test]
    fn treats_missing_payload_as_empty_request() {
        assert_eq!(
            normalize_apigw_event(Value::Null).expect("null should normalize"),
            json!({})
        );
        assert_eq!(
            normalize_apigw_event(json!({"body": null})).expect("null body should normalize"),
            json!({})
        );
    }

    #[test]
    fn non_object_payloads_pass_through() {
        assert_eq!(
            normalize_apigw_event(json!("ping")).expect("string payload should normalize"),
            json!("ping")
        );
        assert_eq!(
            normalize_apigw_event(json!({"body": 42})).expect("numeric body should normalize"),
            json!(42)
        );
    }

    #[test]
    fn rejects_malformed_json_body() {
        let error = normalize_apigw_event(json!({"body": "{not json"}))
            .expect_err("malformed body should fail");
        assert!(error.starts_with("Malformed JSON body"));
    }
}
