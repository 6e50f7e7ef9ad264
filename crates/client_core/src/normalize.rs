//! Translation from the detection service's loosely-typed JSON into
//! [`DisplayModel`]. Nothing outside this module reads raw response fields.

use serde_json::{Map, Value};
use shared::domain::{
    AnalysisMetadata, Confidence, DisplayModel, Explanation, HighlightSegment, RelatedArticle,
};

pub const FAILURE_VERDICT: &str = "Error";
pub const FAKE_VERDICT: &str = "Fake News";
pub const REAL_VERDICT: &str = "Real News";
pub const EMPTY_INPUT_QUERY: &str = "Error analyzing content";
pub const FAILURE_DESCRIPTION: &str =
    "An error occurred while analyzing the content. Please try again.";
pub const BACKEND_RUNNING_HINT: &str = "Please check if the backend server is running";
pub const CREDENTIALS_HINT: &str = "Make sure all required API keys are configured";

/// Never fails: every field the service omits or mangles falls back to a default.
pub fn normalize(raw: &Value, original_input: &str) -> DisplayModel {
    let is_fake = raw.get("isFake").and_then(Value::as_bool).unwrap_or(false);
    let verdict = non_empty_str(raw.get("verdict"));
    // Without a label from the service, the flag decides.
    let verdict_label = verdict
        .clone()
        .or_else(|| non_empty_str(raw.get("prediction")))
        .unwrap_or_else(|| (if is_fake { FAKE_VERDICT } else { REAL_VERDICT }).to_string());

    DisplayModel {
        query: non_empty_str(raw.get("query")).unwrap_or_else(|| original_input.to_string()),
        confidence: confidence(raw.get("confidence")),
        is_fake,
        explanation: Explanation {
            verdict: verdict.unwrap_or_else(|| verdict_label.clone()),
            reasons: string_list(raw.get("key_factors")),
        },
        verdict_label,
        highlighted_query: highlighted_query(raw.get("highlightedQuery"), original_input),
        description: non_empty_str(raw.get("description")).unwrap_or_default(),
        related_articles: related_articles(raw.get("references")),
        share_url: raw
            .get("whatsapp_share")
            .and_then(|share| non_empty_str(share.get("share_url"))),
        metadata: raw.get("metadata").and_then(Value::as_object).map(metadata),
    }
}

/// Failure payload for a non-2xx answer; the service's detail is the only reason.
pub fn backend_failure(detail: &str, original_input: &str) -> DisplayModel {
    failure(vec![detail.to_string()], original_input)
}

/// Failure payload for a call that never produced a usable response.
pub fn transport_failure(message: &str, original_input: &str) -> DisplayModel {
    failure(
        vec![
            message.to_string(),
            BACKEND_RUNNING_HINT.to_string(),
            CREDENTIALS_HINT.to_string(),
        ],
        original_input,
    )
}

fn failure(reasons: Vec<String>, original_input: &str) -> DisplayModel {
    let query = if original_input.trim().is_empty() {
        EMPTY_INPUT_QUERY
    } else {
        original_input
    };
    DisplayModel {
        query: query.to_string(),
        confidence: Confidence::UNDECIDED,
        is_fake: false,
        verdict_label: FAILURE_VERDICT.to_string(),
        highlighted_query: vec![HighlightSegment::plain(query)],
        explanation: Explanation {
            verdict: FAILURE_VERDICT.to_string(),
            reasons,
        },
        description: FAILURE_DESCRIPTION.to_string(),
        related_articles: Vec::new(),
        share_url: None,
        metadata: None,
    }
}

fn confidence(value: Option<&Value>) -> Confidence {
    match value {
        Some(Value::Object(pair)) => {
            match (number(pair.get("fake")), number(pair.get("real"))) {
                (Some(fake), Some(real)) => Confidence { fake, real },
                (Some(fake), None) => Confidence::from_fake(fake),
                (None, Some(real)) => Confidence {
                    fake: 100.0 - real,
                    real,
                },
                (None, None) => Confidence::UNDECIDED,
            }
        }
        Some(scalar) => number(Some(scalar))
            .map(Confidence::from_fake)
            .unwrap_or(Confidence::UNDECIDED),
        None => Confidence::UNDECIDED,
    }
}

fn highlighted_query(value: Option<&Value>, original_input: &str) -> Vec<HighlightSegment> {
    let segments: Vec<HighlightSegment> = value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => HighlightSegment::plain(text.as_str()),
                    other => HighlightSegment {
                        text: other
                            .get("text")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        is_suspicious: other
                            .get("isSuspicious")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    if segments.is_empty() {
        vec![HighlightSegment::plain(original_input)]
    } else {
        segments
    }
}

fn related_articles(value: Option<&Value>) -> Vec<RelatedArticle> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::Object(fields) => RelatedArticle {
                title: field_str(fields, "title"),
                source: field_str(fields, "source"),
                url: field_str(fields, "url"),
            },
            Value::String(url) => RelatedArticle {
                url: url.clone(),
                ..RelatedArticle::default()
            },
            _ => RelatedArticle::default(),
        })
        .collect()
}

fn metadata(fields: &Map<String, Value>) -> AnalysisMetadata {
    AnalysisMetadata {
        input_type: fields.get("input_type").and_then(Value::as_str).map(str::to_string),
        processing_time: number(fields.get("processing_time")),
        services_checked: fields.get("services_checked").and_then(Value::as_u64),
        services_successful: fields.get("services_successful").and_then(Value::as_u64),
        model_prediction: fields
            .get("model_prediction")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(single)) if !single.trim().is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn field_str(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
