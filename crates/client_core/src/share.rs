use shared::domain::DisplayModel;
use url::form_urlencoded;

pub const SHARE_BASE_URL: &str = "https://wa.me/";
pub const BRAND_NAME: &str = "SachAI";

/// Link for sharing a verdict. The service usually pre-builds one; when it
/// did not, the message is assembled here from the display model.
pub fn share_link(model: &DisplayModel) -> String {
    if let Some(url) = model.share_url.as_deref().filter(|url| !url.trim().is_empty()) {
        return url.to_string();
    }
    format!("{SHARE_BASE_URL}?text={}", encode_component(&share_message(model)))
}

/// Percent-encodes `text` for a query value, with spaces as `%20` rather than `+`.
fn encode_component(text: &str) -> String {
    // A space is the only byte serialized as a bare "+"; a literal '+' becomes "%2B".
    form_urlencoded::byte_serialize(text.as_bytes())
        .map(|chunk| if chunk == "+" { "%20" } else { chunk })
        .collect()
}

pub fn share_message(model: &DisplayModel) -> String {
    let summary = if model.description.is_empty() {
        model.explanation.verdict.as_str()
    } else {
        model.description.as_str()
    };
    format!(
        "{BRAND_NAME} Analysis Results\n\nNews: {}\n\nVerdict: {}\nConfidence: {}%\n\n{summary}\n\nChecked with {BRAND_NAME} - Your trusted fact-checking companion",
        model.query, model.verdict_label, model.confidence.fake,
    )
}
