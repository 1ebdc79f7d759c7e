use crate::section::Section;
use probe_llm::{CompletionResult, ProbeError, Result};
use std::io::Write;

/// Renders a completion as an ordered list of sections.
///
/// The report is built in memory first, so a failing section never leaves
/// partial output on the target stream. Rendering is pure: the same result
/// always produces the same bytes, and usage numbers are printed as
/// reported without validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFormatter {
    sections: Vec<Section>,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self {
            sections: Section::ALL.to_vec(),
        }
    }
}

impl ResultFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter applying only `sections`, in the given order
    pub fn with_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            sections: sections.into_iter().collect(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Render the full report into a buffer.
    ///
    /// `None` stands for a response that carried no completion at all and
    /// fails with `InvalidInput`.
    pub fn render(&self, result: Option<&CompletionResult>) -> Result<Vec<u8>> {
        let result = result.ok_or_else(|| {
            ProbeError::InvalidInput("no completion result to format".to_string())
        })?;

        tracing::debug!(id = %result.id, sections = self.sections.len(), "Rendering completion report");

        let mut buffer = Vec::new();
        for section in &self.sections {
            section.render(result, &mut buffer)?;
        }
        Ok(buffer)
    }

    pub fn write<W: Write + ?Sized>(&self, result: Option<&CompletionResult>, out: &mut W) -> Result<()> {
        let report = self.render(result)?;
        out.write_all(&report)?;
        out.flush()?;
        Ok(())
    }

    /// Write the report to standard output
    pub fn print(&self, result: Option<&CompletionResult>) -> Result<()> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.write(result, &mut lock)
    }
}
