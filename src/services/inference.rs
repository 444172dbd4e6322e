// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AI inference: captions, hashtags, and text color contrast suggestions.

use super::{decode, HttpTransport, ServiceError};
use crate::config::InferenceConfig;
use crate::models::style::HexColor;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Description sent when the user has not written one.
pub const DEFAULT_DESCRIPTION: &str = "A beautiful picture.";

pub trait InferenceService: Send + Sync {
    /// Write a short caption for an image description.
    fn generate_caption(&self, description: &str) -> Result<String, ServiceError>;

    /// Suggest hashtags for a photo and its description.
    fn generate_hashtags(&self, photo_data_uri: &str, description: &str) -> Result<Vec<String>, ServiceError>;

    /// Suggest a text color that contrasts with the photo.
    fn suggest_text_color(&self, photo_data_uri: &str, text_color: HexColor) -> Result<HexColor, ServiceError>;
}

/// Description to send for a caption request.
pub fn caption_description(description: &str) -> &str {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        DEFAULT_DESCRIPTION
    } else {
        trimmed
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptionRequest<'a> {
    image_description: &'a str,
}

#[derive(Deserialize)]
struct CaptionResponse {
    caption: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashtagsRequest<'a> {
    photo_data_uri: &'a str,
    description: &'a str,
}

#[derive(Deserialize)]
struct HashtagsResponse {
    hashtags: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextColorRequest<'a> {
    photo_data_uri: &'a str,
    text_color: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextColorResponse {
    adjusted_text_color: String,
}

/// Inference over the HTTP JSON endpoints `/caption`, `/hashtags` and
/// `/text-color`.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    transport: HttpTransport,
    api_key: Option<String>,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            transport: HttpTransport::new(&config.base_url, config.timeouts)?,
            api_key: config.api_key.clone(),
        })
    }

    fn post<T: serde::de::DeserializeOwned>(&self, path: &str, body: impl Serialize) -> Result<T, ServiceError> {
        let body = serde_json::to_value(body).map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        let text = self
            .transport
            .send(Method::POST, path, self.api_key.as_deref(), Some(&body))?;
        decode(&text)
    }
}

fn require_image(photo_data_uri: &str, what: &str) -> Result<(), ServiceError> {
    if photo_data_uri.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("Image data is required to {what}.")));
    }
    Ok(())
}

impl InferenceService for HttpInferenceClient {
    fn generate_caption(&self, description: &str) -> Result<String, ServiceError> {
        let response: CaptionResponse = self.post(
            "/caption",
            CaptionRequest {
                image_description: caption_description(description),
            },
        )?;
        Ok(response.caption)
    }

    fn generate_hashtags(&self, photo_data_uri: &str, description: &str) -> Result<Vec<String>, ServiceError> {
        require_image(photo_data_uri, "generate hashtags")?;
        let response: HashtagsResponse = self.post(
            "/hashtags",
            HashtagsRequest {
                photo_data_uri,
                description,
            },
        )?;
        Ok(response.hashtags)
    }

    fn suggest_text_color(&self, photo_data_uri: &str, text_color: HexColor) -> Result<HexColor, ServiceError> {
        require_image(photo_data_uri, "adjust text color")?;
        let response: TextColorResponse = self.post(
            "/text-color",
            TextColorRequest {
                photo_data_uri,
                text_color: text_color.to_string(),
            },
        )?;
        parse_suggested_color(&response.adjusted_text_color)
    }
}

fn parse_suggested_color(raw: &str) -> Result<HexColor, ServiceError> {
    raw.parse::<HexColor>()
        .map_err(|e| ServiceError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_description_uses_default() {
        assert_eq!(caption_description(""), DEFAULT_DESCRIPTION);
        assert_eq!(caption_description("   "), DEFAULT_DESCRIPTION);
        assert_eq!(caption_description(" beach day "), "beach day");
    }

    #[test]
    fn test_request_bodies_use_wire_names() {
        let body = serde_json::to_value(CaptionRequest {
            image_description: "dog",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"imageDescription": "dog"}));

        let body = serde_json::to_value(TextColorRequest {
            photo_data_uri: "data:image/png;base64,AA==",
            text_color: HexColor::WHITE.to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"photoDataUri": "data:image/png;base64,AA==", "textColor": "#FFFFFF"})
        );
    }

    #[test]
    fn test_responses_decode() {
        let r: HashtagsResponse = decode(r##"{"hashtags":["#sun","#sea"]}"##).unwrap();
        assert_eq!(r.hashtags, vec!["#sun", "#sea"]);
        let r: TextColorResponse = decode(r##"{"adjustedTextColor":"#1a1a1a"}"##).unwrap();
        assert_eq!(parse_suggested_color(&r.adjusted_text_color).unwrap(), HexColor { r: 0x1a, g: 0x1a, b: 0x1a });
    }

    #[test]
    fn test_bad_suggested_color_is_parse_error() {
        assert!(matches!(parse_suggested_color("dark blue"), Err(ServiceError::Parse(_))));
    }

    #[test]
    fn test_missing_image_is_rejected_before_sending() {
        let client = HttpInferenceClient::new(&InferenceConfig::default()).unwrap();
        let err = client.generate_hashtags("", "beach").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m.contains("hashtags")));
        let err = client.suggest_text_color(" ", HexColor::WHITE).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
