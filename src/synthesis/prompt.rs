//! Review prompt and response schema.

use serde_json::{Value, json};

use super::persona::Persona;
use crate::types::{EvidencePackage, Verdict};

/// JSON Schema of a verdict record
pub fn verdict_schema() -> Value {
    let labels: Vec<&str> = Verdict::ALL.iter().map(Verdict::label).collect();
    let string_list = json!({"type": "array", "items": {"type": "string"}});

    json!({
        "type": "object",
        "properties": {
            "verdict": {"type": "string", "enum": labels},
            "roast": string_list,
            "good_things": string_list,
            "suggestions": string_list
        },
        "required": ["verdict", "roast", "good_things", "suggestions"]
    })
}

/// Persona instructions followed by the evidence report
pub fn compose(persona: &Persona, evidence: &EvidencePackage) -> String {
    format!(
        "{}\n\nHere is the Scout's report:\n{}\n\n\
         Respond with JSON only: {{\"verdict\": \"Ship It | Almost There | Skip It\", \
         \"roast\": [...], \"good_things\": [...], \"suggestions\": [...]}}",
        persona.instructions,
        evidence.render()
    )
}
