pub mod text;

use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = output.envelope.to_json(pretty)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Text => render_text(&mut out, output)?,
    }

    out.flush()?;
    Ok(())
}

fn render_text(out: &mut impl Write, output: &CommandOutput) -> Result<(), CliError> {
    writeln!(out, "{}", output.text)?;

    let envelope = &output.envelope;
    if !envelope.meta.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out)?;
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stockbrief_core::{Envelope, EnvelopeError};

    use super::*;
    use crate::metadata::envelope_meta;

    #[test]
    fn text_output_lists_warnings_and_errors() {
        let meta = envelope_meta("yahoo", 5, vec![String::from("news unavailable: down")])
            .expect("meta");
        let error = EnvelopeError::new("field.unavailable", "news: down")
            .expect("error")
            .with_source("yahoo");
        let envelope = Envelope::with_errors(meta, json!({}), vec![error]).expect("envelope");
        let output = CommandOutput {
            envelope,
            text: String::from("AAPL news (source: yahoo)"),
        };

        let mut buffer = Vec::new();
        render_text(&mut buffer, &output).expect("rendering to memory");
        let rendered = String::from_utf8(buffer).expect("utf8");

        assert!(rendered.starts_with("AAPL news (source: yahoo)\n"));
        assert!(rendered.contains("warnings:\n  - news unavailable: down"));
        assert!(rendered.contains("errors:\n  - field.unavailable: news: down"));
    }
}
