use super::*;
use serde_json::json;

#[test]
fn confidence_pair_is_used_as_is() {
    let model = normalize(&json!({ "confidence": { "fake": 82, "real": 18 } }), "claim");
    assert_eq!(model.confidence, Confidence { fake: 82.0, real: 18.0 });
}

#[test]
fn bare_confidence_is_the_fake_share() {
    for fake in [0.0, 12.5, 50.0, 73.0, 100.0] {
        let model = normalize(&json!({ "confidence": fake }), "claim");
        assert_eq!(model.confidence, Confidence { fake, real: 100.0 - fake });
    }
}

#[test]
fn missing_confidence_is_even_split() {
    let model = normalize(&json!({}), "claim");
    assert_eq!(model.confidence, Confidence { fake: 50.0, real: 50.0 });
}

#[test]
fn half_filled_confidence_derives_the_other_side() {
    let model = normalize(&json!({ "confidence": { "real": 30 } }), "claim");
    assert_eq!(model.confidence, Confidence { fake: 70.0, real: 30.0 });
}

#[test]
fn pair_need_not_sum_to_hundred() {
    let model = normalize(&json!({ "confidence": { "fake": 40, "real": 40 } }), "claim");
    assert_eq!(model.confidence, Confidence { fake: 40.0, real: 40.0 });
}

#[test]
fn is_fake_is_not_inferred_from_confidence() {
    let model = normalize(&json!({ "confidence": { "fake": 99, "real": 1 } }), "claim");
    assert!(!model.is_fake);
    let model = normalize(&json!({ "isFake": true, "confidence": 1 }), "claim");
    assert!(model.is_fake);
}

#[test]
fn verdict_label_prefers_verdict_then_prediction() {
    let model = normalize(&json!({ "verdict": "Fake", "prediction": "Real" }), "claim");
    assert_eq!(model.verdict_label, "Fake");
    let model = normalize(&json!({ "prediction": "Real" }), "claim");
    assert_eq!(model.verdict_label, "Real");
    assert_eq!(model.explanation.verdict, "Real");
    let model = normalize(&json!({}), "claim");
    assert_eq!(model.verdict_label, REAL_VERDICT);
}

#[test]
fn unlabelled_verdict_follows_is_fake() {
    let model = normalize(&json!({ "isFake": true, "confidence": 90 }), "claim");
    assert_eq!(model.verdict_label, "Fake News");
    assert_eq!(model.explanation.verdict, "Fake News");
    assert!(crate::share::share_message(&model).contains("Verdict: Fake News"));

    let model = normalize(&json!({ "isFake": false, "confidence": 10 }), "claim");
    assert_eq!(model.verdict_label, "Real News");
    assert_eq!(model.explanation.verdict, "Real News");
}

#[test]
fn missing_highlights_become_one_plain_segment() {
    let model = normalize(&json!({ "query": "service summary" }), "original claim");
    assert_eq!(model.highlighted_query, vec![HighlightSegment::plain("original claim")]);
    assert_eq!(model.query, "service summary");

    let model = normalize(&json!({ "highlightedQuery": [] }), "original claim");
    assert_eq!(model.highlighted_query.len(), 1);
    assert!(!model.highlighted_query[0].is_suspicious);
}

#[test]
fn highlights_pass_through_in_order() {
    let raw = json!({
        "highlightedQuery": [
            { "text": "Scientists ", "isSuspicious": false },
            { "text": "confirm miracle cure", "isSuspicious": true },
        ]
    });
    let model = normalize(&raw, "Scientists confirm miracle cure");
    assert_eq!(
        model.highlighted_query,
        vec![
            HighlightSegment::plain("Scientists "),
            HighlightSegment {
                text: "confirm miracle cure".into(),
                is_suspicious: true,
            },
        ]
    );
}

#[test]
fn reasons_default_to_empty() {
    let model = normalize(&json!({ "verdict": "Real" }), "claim");
    assert!(model.explanation.reasons.is_empty());
    let model = normalize(&json!({ "key_factors": ["no sources", "sensational tone"] }), "claim");
    assert_eq!(model.explanation.reasons, vec!["no sources", "sensational tone"]);
}

#[test]
fn references_map_without_dropping_entries() {
    let raw = json!({
        "references": [
            { "title": "Fact check", "source": "Reuters", "url": "https://reuters.com/a" },
            { "title": "No url" },
            42,
        ]
    });
    let model = normalize(&raw, "claim");
    assert_eq!(model.related_articles.len(), 3);
    assert_eq!(model.related_articles[0].source, "Reuters");
    assert_eq!(model.related_articles[1].title, "No url");
    assert_eq!(model.related_articles[1].url, "");
    assert_eq!(model.related_articles[2], RelatedArticle::default());
}

#[test]
fn share_url_and_metadata_are_lifted() {
    let raw = json!({
        "whatsapp_share": { "share_url": "https://wa.me/?text=hi", "message": "hi" },
        "metadata": {
            "input_type": "url",
            "processing_time": 17.4,
            "services_checked": 6,
            "services_successful": 4,
            "model_prediction": "FAKE",
        }
    });
    let model = normalize(&raw, "claim");
    assert_eq!(model.share_url.as_deref(), Some("https://wa.me/?text=hi"));
    let metadata = model.metadata.expect("metadata");
    assert_eq!(metadata.input_type.as_deref(), Some("url"));
    assert_eq!(metadata.services_successful, Some(4));
    assert_eq!(metadata.processing_time, Some(17.4));
}

#[test]
fn non_object_payloads_still_normalize() {
    for raw in [json!(null), json!([1, 2, 3]), json!("text"), json!(7)] {
        let model = normalize(&raw, "claim");
        assert_eq!(model.query, "claim");
        assert_eq!(model.confidence, Confidence::UNDECIDED);
        assert!(model.related_articles.is_empty());
    }
}

#[test]
fn transport_failure_leads_with_error_message() {
    let model = transport_failure("connection refused", "https://example.com");
    assert_eq!(model.verdict_label, "Error");
    assert!(!model.is_fake);
    assert_eq!(model.confidence, Confidence::UNDECIDED);
    assert_eq!(model.explanation.reasons[0], "connection refused");
    assert!(model.explanation.reasons.len() >= 3);
    assert!(model.explanation.reasons.iter().any(|r| r == BACKEND_RUNNING_HINT));
    assert!(model.explanation.reasons.iter().any(|r| r == CREDENTIALS_HINT));
    assert!(model.related_articles.is_empty());
    assert_eq!(model.highlighted_query, vec![HighlightSegment::plain("https://example.com")]);
}

#[test]
fn failure_without_input_uses_placeholder_query() {
    let model = backend_failure("Image could not be processed", "");
    assert_eq!(model.query, EMPTY_INPUT_QUERY);
    assert_eq!(model.highlighted_query, vec![HighlightSegment::plain(EMPTY_INPUT_QUERY)]);
    assert_eq!(model.explanation.reasons, vec!["Image could not be processed"]);
}
