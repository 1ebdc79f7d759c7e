use probe_llm::{CompletionResult, ProbeError, Result, TokenLogProbability};
use std::io::Write;

pub const SEPARATOR: &str = "=================================";
pub const ALTERNATIVE_SEPARATOR: &str = "   =======";
pub const RECORD_SEPARATOR: &str = "--------------";

pub const CONTENT_LOG_PROBABILITIES_HEADER: &str = "Content token log probabilities:";
pub const REFUSAL_LOG_PROBABILITIES_HEADER: &str = "Refusal token log probabilities:";

/// One line or group of lines in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Separator,
    Role,
    /// First content segment only
    Content,
    Model,
    CreatedAt,
    FinishReason,
    /// Input, output and total token counts
    Usage,
    /// Always printed, even when empty
    Refusal,
    Id,
    SystemFingerprint,
    /// Skipped when there are no content log probabilities
    ContentLogProbabilities,
    /// Skipped when there are no refusal log probabilities
    RefusalLogProbabilities,
}

struct LogProbabilityBlock {
    header: &'static str,
    sub_header: &'static str,
    record_separator: Option<&'static str>,
}

const CONTENT_BLOCK: LogProbabilityBlock = LogProbabilityBlock {
    header: CONTENT_LOG_PROBABILITIES_HEADER,
    sub_header: "   Top log probabilities for this token:",
    record_separator: Some(RECORD_SEPARATOR),
};

const REFUSAL_BLOCK: LogProbabilityBlock = LogProbabilityBlock {
    header: REFUSAL_LOG_PROBABILITIES_HEADER,
    sub_header: "   Refusal top log probabilities for this token:",
    record_separator: None,
};

impl Section {
    /// Every section, in report order
    pub const ALL: [Section; 12] = [
        Section::Separator,
        Section::Role,
        Section::Content,
        Section::Model,
        Section::CreatedAt,
        Section::FinishReason,
        Section::Usage,
        Section::Refusal,
        Section::Id,
        Section::SystemFingerprint,
        Section::ContentLogProbabilities,
        Section::RefusalLogProbabilities,
    ];

    pub fn render<W: Write + ?Sized>(self, result: &CompletionResult, out: &mut W) -> Result<()> {
        match self {
            Section::Separator => writeln!(out, "{}", SEPARATOR)?,
            Section::Role => writeln!(out, "Message role: {}", result.role)?,
            Section::Content => {
                let text = result.first_text().ok_or_else(|| {
                    ProbeError::MalformedResult(format!(
                        "completion {} has no content segment",
                        result.id
                    ))
                })?;
                writeln!(out, "Message content: {}", text)?;
            }
            Section::Model => writeln!(out, "Model: {}", result.model)?,
            Section::CreatedAt => writeln!(out, "Created At: {}", result.created_at.to_rfc3339())?,
            Section::FinishReason => writeln!(out, "Finish reason: {}", result.finish_reason)?,
            Section::Usage => {
                writeln!(out, "Input tokens usage: {}", result.usage.input_tokens)?;
                writeln!(out, "Output tokens usage: {}", result.usage.output_tokens)?;
                writeln!(out, "Total tokens usage: {}", result.usage.total_tokens)?;
            }
            Section::Refusal => writeln!(out, "Refusal: {}", result.refusal)?,
            Section::Id => writeln!(out, "Id: {}", result.id)?,
            Section::SystemFingerprint => {
                writeln!(out, "System fingerprint: {}", result.system_fingerprint)?
            }
            Section::ContentLogProbabilities => {
                render_block(&CONTENT_BLOCK, &result.content_token_log_probabilities, out)?
            }
            Section::RefusalLogProbabilities => {
                render_block(&REFUSAL_BLOCK, &result.refusal_token_log_probabilities, out)?
            }
        }
        Ok(())
    }
}

fn render_block<W: Write + ?Sized>(
    block: &LogProbabilityBlock,
    entries: &[TokenLogProbability],
    out: &mut W,
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(out, "{}", block.header)?;
    for entry in entries {
        writeln!(out, "Token: {}", entry.token)?;
        writeln!(out, "Log probability: {}", entry.log_probability)?;
        writeln!(out, "{}", block.sub_header)?;

        // Delivery order, no re-sorting
        for top in &entry.top_log_probabilities {
            writeln!(out, "   Token: {}", top.token)?;
            writeln!(out, "   Log probability: {}", top.log_probability)?;
            writeln!(out, "{}", ALTERNATIVE_SEPARATOR)?;
        }

        if let Some(separator) = block.record_separator {
            writeln!(out, "{}", separator)?;
        }
    }
    Ok(())
}
