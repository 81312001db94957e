//! @ai:module:intent Report formatting, composition and email templates
//! @ai:module:layer application
//! @ai:module:public_api ReportComposer, ComposedReport, ComposeError, MarkdownFormatter, FormatError

pub mod composer;
pub mod formatter;
pub mod template;

pub use composer::{ComposeError, ComposedReport, ReportComposer};
pub use formatter::{escape_html, FormatError, MarkdownFormatter};
pub use template::{contact_message_html, report_document};
