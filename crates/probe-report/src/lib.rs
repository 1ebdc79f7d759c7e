//! # probe-report
//!
//! Renders a [`probe_llm::CompletionResult`] as a fixed, line-oriented report.
//! Each line or group of lines is a [`Section`]; a [`ResultFormatter`] applies
//! sections in order and writes the finished report in one go.
//!
//! ```rust,no_run
//! # fn show(result: &probe_llm::CompletionResult) -> probe_llm::Result<()> {
//! probe_report::ResultFormatter::new().print(Some(result))
//! # }
//! ```

pub mod formatter;
pub mod section;

pub use formatter::ResultFormatter;
pub use section::{
    Section, ALTERNATIVE_SEPARATOR, CONTENT_LOG_PROBABILITIES_HEADER, RECORD_SEPARATOR,
    REFUSAL_LOG_PROBABILITIES_HEADER, SEPARATOR,
};
