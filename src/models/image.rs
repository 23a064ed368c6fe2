use crate::error::{ImagenError, Result};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Parses an inbound body. An empty body reads as `{}`; a body that is
    /// not valid JSON is an input error rather than an empty request.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            json!({})
        } else {
            serde_json::from_slice(body)
                .map_err(|_| ImagenError::InvalidRequest("Invalid JSON body".into()))?
        };

        match value.get("prompt") {
            None | Some(Value::Null) => Err(ImagenError::InvalidRequest("Missing prompt".into())),
            Some(Value::String(prompt)) if prompt.trim().is_empty() => {
                Err(ImagenError::InvalidRequest("Missing prompt".into()))
            }
            Some(Value::String(prompt)) => Ok(Self::new(prompt.clone())),
            Some(_) => Err(ImagenError::InvalidRequest(
                "prompt must be a string".into(),
            )),
        }
    }
}

/// Response envelope sent back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{ "images": ["<base64>", ...] }`
    Images,
    /// `{ "image": "<base64>" }`, first image only
    Image,
}

impl ResponseShape {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "images" | "list" => Ok(ResponseShape::Images),
            "image" | "single" => Ok(ResponseShape::Image),
            other => Err(ImagenError::ConfigError(format!(
                "IMAGEN_RESPONSE_SHAPE must be 'images' or 'image', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub images: Vec<String>, // Base64 encoded
    pub model: String,
}

impl GenerationResult {
    pub fn new(images: Vec<String>, model: impl Into<String>) -> Self {
        Self {
            images,
            model: model.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_body(self, shape: ResponseShape) -> Result<Value> {
        match shape {
            ResponseShape::Images => Ok(json!({ "images": self.images })),
            ResponseShape::Image => match self.images.into_iter().next() {
                Some(image) => Ok(json!({ "image": image })),
                None => Err(ImagenError::NoImage { model: self.model }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_parsing() {
        let request = GenerationRequest::from_body(br#"{"prompt":"a red fox"}"#).unwrap();
        assert_eq!(request.prompt, "a red fox");
    }

    #[test]
    fn test_missing_prompt_variants() {
        let bodies: [&[u8]; 4] = [b"", b"{}", br#"{"prompt":null}"#, br#"{"prompt":"   "}"#];
        for body in bodies {
            let err = GenerationRequest::from_body(body).unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.to_string(), "Missing prompt");
        }
    }

    #[test]
    fn test_wrong_type_and_bad_json() {
        let err = GenerationRequest::from_body(br#"{"prompt":42}"#).unwrap_err();
        assert_eq!(err.to_string(), "prompt must be a string");

        let err = GenerationRequest::from_body(b"{prompt:").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Invalid JSON body");

        let err = GenerationRequest::from_body(b"[1,2]").unwrap_err();
        assert_eq!(err.to_string(), "Missing prompt");
    }

    #[test]
    fn test_envelopes() {
        let result = GenerationResult::new(vec!["AAA".into(), "BBB".into()], "imagen");
        assert_eq!(
            result.clone().into_body(ResponseShape::Images).unwrap(),
            json!({ "images": ["AAA", "BBB"] })
        );
        assert_eq!(
            result.into_body(ResponseShape::Image).unwrap(),
            json!({ "image": "AAA" })
        );

        let empty = GenerationResult::new(vec![], "imagen-4.0-generate-001");
        assert_eq!(
            empty.clone().into_body(ResponseShape::Images).unwrap(),
            json!({ "images": [] })
        );
        let err = empty.into_body(ResponseShape::Image).unwrap_err();
        assert_eq!(err.to_string(), "No image returned from imagen-4.0-generate-001");
    }
}
