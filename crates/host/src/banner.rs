use serde::Serialize;

/// Dismissible notice for a runtime error inside the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBanner {
    /// Error text relayed by the document
    pub message: String,

    /// Label of the remediation action
    pub remediation: String,

    /// Ready-made request to send back to the assistant
    pub fix_request: String,

    /// How many times this message was reported while shown
    pub occurrences: usize,
}

impl ErrorBanner {
    pub fn new(message: &str, remediation: &str, entry: Option<&str>) -> Self {
        let message = message.trim();
        let message = if message.is_empty() {
            "Unknown script error"
        } else {
            message
        };
        let location = entry
            .map(|entry| format!(" of `{entry}`"))
            .unwrap_or_default();

        Self {
            message: message.to_string(),
            remediation: remediation.to_string(),
            fix_request: format!(
                "The live preview{location} reported a runtime error:\n\n{message}\n\n\
Please fix the code so the page runs without errors and send the complete corrected files."
            ),
            occurrences: 1,
        }
    }
}
