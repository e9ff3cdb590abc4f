use serde::Serialize;

use crate::audio::domain::transcript::TranscriptionResult;

/// The one object printed per run. Only the text leaves the process.
#[derive(Serialize, Debug, PartialEq)]
pub struct TranscriptOutput<'a> {
    pub text: &'a str,
}

impl<'a> From<&'a TranscriptionResult> for TranscriptOutput<'a> {
    fn from(result: &'a TranscriptionResult) -> Self {
        Self {
            text: &result.text,
        }
    }
}

/// Render a result as a single newline-terminated JSON line.
pub fn render_json_line(result: &TranscriptionResult) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(&TranscriptOutput::from(result))?;
    line.push('\n');
    Ok(line)
}
