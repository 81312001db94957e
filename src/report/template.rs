//! @ai:module:intent HTML boilerplate for the report and contact emails
//! @ai:module:layer infrastructure
//! @ai:module:public_api report_document, contact_message_html
//! @ai:module:stateless true

use crate::report::formatter::escape_html;
use chrono::{DateTime, Utc};

/// @ai:intent Wrap formatted analysis HTML in the full report document
/// @ai:pre body is already formatted HTML
/// @ai:effects pure
pub fn report_document(body: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Idea Evaluation Report</title>
  </head>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px;">
    <div style="background-color: #f8f9fa; padding: 20px; border-radius: 8px; margin-bottom: 30px;">
      <h1 style="color: #2C3E50; margin-bottom: 10px;">Your Idea Evaluation Report</h1>
      <p style="color: #666;">Thank you for using our idea evaluation service. Below is a detailed analysis of your idea.</p>
    </div>
    {body}
    <div style="margin-top: 40px; padding-top: 20px; border-top: 2px solid #ECF0F1; color: #666; font-size: 14px;">
      <p>This report was generated by our AI-powered evaluation system. For any questions or feedback, please contact us.</p>
      <p>Generated {date}</p>
    </div>
  </body>
</html>
"#,
        date = generated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// @ai:intent Contact relay email; sender and message are escaped, message newlines become breaks
/// @ai:effects pure
pub fn contact_message_html(sender: &str, message: &str) -> String {
    let message = escape_html(message.trim()).replace("\r\n", "\n").replace('\n', "<br>");
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #2C3E50;">New Contact Message</h1>
  <div style="background-color: #f8f9fa; padding: 20px; border-radius: 5px;">
    <p><strong>From:</strong> {sender}</p>
    <p><strong>Message:</strong></p>
    <p>{message}</p>
  </div>
</div>
"#,
        sender = escape_html(sender),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_document_wraps_body() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let html = report_document("<p>analysis</p>", at);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Idea Evaluation Report</title>"));
        assert!(html.contains("<p>analysis</p>"));
        assert!(html.contains("Generated 2024-05-01 09:30 UTC"));
    }

    #[test]
    fn test_contact_message_escapes_and_breaks_lines() {
        let html = contact_message_html("a@b.co", "Hi <team>\nsecond line");
        assert!(html.contains("<p><strong>From:</strong> a@b.co</p>"));
        assert!(html.contains("<p>Hi &lt;team&gt;<br>second line</p>"));
    }
}
