//! The dermatology analysis prompt.
//!
//! Message content is product copy: the model is steered toward a single
//! compact JSON object so the extractor downstream has something to find.

/// System instruction fixing the response schema and safety posture.
pub const SYSTEM_PROMPT: &str = "You are a dermatologist assistant. Analyze skin lesion images. \
Respond ONLY in compact JSON with keys: condition (string), confidence (0-1), advice (string), \
urgency (one of: 'emergency','soon','routine','none'), medications (object with fields: \
otc [array of strings], prescription [array of strings], caution [string]). Always return the \
most likely condition with confidence. If multiple conditions are possible, return the most \
probable one with confidence and mention uncertainty in advice. OTC items should be \
non-prescription and region-agnostic (e.g., benzoyl peroxide 2.5-5%, adapalene 0.1%). \
Prescription items must include a clinician disclaimer in 'caution' and avoid exact dosing. \
Do NOT include any text outside the JSON object.";

/// User-turn text, with the caller's note appended when present.
pub fn user_text(description: Option<&str>) -> String {
    let notes = match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => format!("\nPatient notes: {d}"),
        None => "\nPatient notes: (none provided)".to_string(),
    };
    format!(
        "Analyze the attached image and respond in JSON only. Do not include code fences or any \
         extra text\u{2014}return a single JSON object.{notes}"
    )
}

/// Build the full message list for one analysis: a system turn plus a user
/// turn carrying the text and the image reference.
pub fn analysis_messages(description: Option<&str>, image_url: &str) -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "role": "system",
            "content": SYSTEM_PROMPT,
        }),
        serde_json::json!({
            "role": "user",
            "content": [
                { "type": "text", "text": user_text(description) },
                { "type": "image_url", "image_url": { "url": image_url } },
            ],
        }),
    ]
}
