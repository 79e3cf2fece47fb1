//! Analysis prompt construction.

/// Document types the model is asked to choose from.
pub const DOCUMENT_TYPES: &[&str] = &["contract", "invoice", "report"];

/// Required-field guidance per document type. Not a validation schema: the
/// model may report other names.
pub const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    (
        "contract",
        &["party_1", "party_2", "signature", "date", "payment_terms"],
    ),
    (
        "invoice",
        &["invoice_number", "amount", "due_date", "tax", "bill_to", "bill_from"],
    ),
];

pub fn required_fields(document_type: &str) -> Option<&'static [&'static str]> {
    REQUIRED_FIELDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(document_type))
        .map(|(_, fields)| *fields)
}

/// Build the classification prompt for a document's text.
pub fn build_prompt(content: &str) -> String {
    let field_lines: String = DOCUMENT_TYPES
        .iter()
        .filter_map(|document_type| {
            required_fields(document_type)
                .map(|fields| format!("   - For {}s: {}\n", document_type, fields.join(", ")))
        })
        .collect();

    format!(
        r#"You are a document analysis assistant. Analyze the following text and:
1. Classify the document as one of: {types}.
2. Check for missing required fields:
{field_lines}3. Return a JSON object with keys:
   - document_type (string)
   - missing_fields (list of strings)
   - recommendations (string, optional)
   - confidence (float, between 0 and 1, representing confidence in the detected type)
Only output valid JSON.
Document text:
'''
{content}
'''
"#,
        types = format_choices(DOCUMENT_TYPES),
        field_lines = field_lines,
        content = content,
    )
}

fn format_choices(choices: &[&str]) -> String {
    match choices {
        [] => String::new(),
        [only] => only.to_string(),
        [head @ .., last] => format!("{}, or {}", head.join(", "), last),
    }
}
