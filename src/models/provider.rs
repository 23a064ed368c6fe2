//! Wire shapes for the two Google image APIs.
//!
//! Shape A is the API-key `:generateImages` call, Shape B the Vertex `:predict` call.

use serde_json::{json, Value};

/// Field names carrying base64 bytes in `:predict` responses, checked in order.
pub const PREDICTION_BYTE_FIELDS: [&str; 3] =
    ["bytesBase64", "bytesBase64Encoded", "imageBytesBase64"];

pub fn generate_images_payload(prompt: &str, number_of_images: u32, aspect_ratio: &str) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": prompt }]
            }
        ],
        "generationConfig": {
            "numberOfImages": number_of_images,
            "aspectRatio": aspect_ratio
        }
    })
}

pub fn predict_payload(prompt: &str) -> Value {
    json!({
        "instances": [{ "prompt": prompt }]
    })
}

/// `generatedImages[*].image.imageBytes`, dropping entries without bytes.
pub fn extract_generated_images(payload: &Value) -> Vec<String> {
    payload
        .get("generatedImages")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    entry
                        .get("image")
                        .and_then(|image| image.get("imageBytes"))
                        .and_then(Value::as_str)
                        .filter(|bytes| !bytes.is_empty())
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn extract_predictions(payload: &Value) -> Vec<String> {
    payload
        .get("predictions")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(prediction_bytes).collect())
        .unwrap_or_default()
}

fn prediction_bytes(row: &Value) -> Option<String> {
    PREDICTION_BYTE_FIELDS.iter().find_map(|field| {
        row.get(*field)
            .and_then(Value::as_str)
            .filter(|bytes| !bytes.is_empty())
            .map(str::to_string)
    })
}

/// Best human-readable message inside an upstream error payload.
/// Array-wrapped bodies (`[{ "error": {...} }]`) are read through their first element.
pub fn upstream_message(details: &Value) -> Option<String> {
    if let Some(first) = details.as_array().and_then(|rows| rows.first()) {
        return upstream_message(first);
    }
    let error = details.get("error");
    error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.and_then(Value::as_str))
        .or_else(|| details.get("message").and_then(Value::as_str))
        .or_else(|| details.get("raw").and_then(Value::as_str))
        .or_else(|| details.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_images_payload_shape() {
        let payload = generate_images_payload("a red fox", 1, "16:9");
        assert_eq!(payload["contents"][0]["role"], "user");
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "a red fox");
        assert_eq!(payload["generationConfig"]["numberOfImages"], 1);
        assert_eq!(payload["generationConfig"]["aspectRatio"], "16:9");
    }

    #[test]
    fn test_predict_payload_shape() {
        assert_eq!(
            predict_payload("a red fox"),
            json!({ "instances": [{ "prompt": "a red fox" }] })
        );
    }

    #[test]
    fn test_generated_images_filters_missing_entries() {
        let payload = json!({
            "generatedImages": [
                { "image": { "imageBytes": "AAA" } },
                { "image": {} },
                null,
                { "image": { "imageBytes": "" } }
            ]
        });
        assert_eq!(extract_generated_images(&payload), vec!["AAA".to_string()]);
        assert!(extract_generated_images(&json!({})).is_empty());
    }

    #[test]
    fn test_predictions_field_priority() {
        let payload = json!({ "predictions": [{ "bytesBase64Encoded": "ZZZ" }] });
        assert_eq!(extract_predictions(&payload), vec!["ZZZ".to_string()]);

        let payload = json!({
            "predictions": [
                { "bytesBase64": "ONE", "bytesBase64Encoded": "TWO", "imageBytesBase64": "THREE" },
                { "imageBytesBase64": "LAST" },
                { "mimeType": "image/png" }
            ]
        });
        assert_eq!(
            extract_predictions(&payload),
            vec!["ONE".to_string(), "LAST".to_string()]
        );
    }

    #[test]
    fn test_upstream_message_lookup() {
        let nested = json!({
            "error": { "code": 429, "message": "Quota exceeded for aiplatform" }
        });
        assert_eq!(
            upstream_message(&nested).as_deref(),
            Some("Quota exceeded for aiplatform")
        );
        assert_eq!(
            upstream_message(&json!({ "raw": "Not Found" })).as_deref(),
            Some("Not Found")
        );
        assert_eq!(upstream_message(&json!({ "code": 7 })), None);

        let wrapped = json!([{ "error": { "code": 400, "message": "Quota exceeded for metric" } }]);
        assert_eq!(
            upstream_message(&wrapped).as_deref(),
            Some("Quota exceeded for metric")
        );
        assert_eq!(upstream_message(&json!([])), None);
    }
}
