//! Prompt construction and result formatting

/// Placeholder replaced by the recognized text
pub const TEXT_PLACEHOLDER: &str = "{text}";

pub const DEFAULT_PROMPT_TEMPLATE: &str = "Please explain the meaning and context of: {text}";

/// Build the generation prompt from the configured template.
///
/// Templates without a placeholder get the text appended on its own paragraph.
pub fn explain_prompt(template: &str, text: &str) -> String {
    if template.contains(TEXT_PLACEHOLDER) {
        template.replace(TEXT_PLACEHOLDER, text)
    } else if template.trim().is_empty() {
        text.to_string()
    } else {
        format!("{}\n\n{}", template.trim_end(), text)
    }
}

/// Text block shown in the main window once an explanation arrives
pub fn format_explanation(selected_text: &str, explanation: &str) -> String {
    format!("Selected text: {selected_text}\n\nExplanation:\n{explanation}")
}
