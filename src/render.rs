//! Terminal rendering of pipeline outcomes

use crate::pipeline::DispatchOutcome;
use crossterm::style::Stylize;
use std::io::{self, Write};

pub const TITLE: &str = "AI Assistant with Currency Conversion";
pub const PROMPT: &str = "Ask me anything or request currency conversion:";
pub const EMPTY_INPUT_WARNING: &str = "Please enter a question or currency conversion request.";
pub const PROCESSING: &str = "Processing your request...";

/// One rendered line and how it should look
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Info(String),
    Text(String),
    Warning(String),
    Error(String),
    Status(String),
}

pub fn banners(outcome: &DispatchOutcome) -> Vec<Banner> {
    match outcome {
        DispatchOutcome::Conversion(result) => vec![
            Banner::Success(format!(
                "{} {} = {} {}",
                result.amount, result.base, result.converted_amount, result.target
            )),
            Banner::Info(format!(
                "Conversion rate: 1 {} = {} {}",
                result.base, result.rate, result.target
            )),
        ],
        DispatchOutcome::GeneralReply { content } => vec![Banner::Text(content.clone())],
        DispatchOutcome::Error { message } => {
            // Banners are single-line.
            let line = message.lines().collect::<Vec<_>>().join(" ");
            vec![Banner::Error(format!("Error: {line}"))]
        }
    }
}

/// Writes banners, with ANSI colors when `color` is set.
pub struct Renderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn title(&mut self) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "{}\n", TITLE.bold().underlined())?;
        } else {
            writeln!(self.out, "{TITLE}\n")?;
        }
        self.out.flush()
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        if self.color {
            write!(self.out, "{} ", PROMPT.bold())?;
        } else {
            write!(self.out, "{PROMPT} ")?;
        }
        self.out.flush()
    }

    pub fn outcome(&mut self, outcome: &DispatchOutcome) -> io::Result<()> {
        for banner in banners(outcome) {
            self.banner(&banner)?;
        }
        self.out.flush()
    }

    pub fn banner(&mut self, banner: &Banner) -> io::Result<()> {
        if !self.color {
            let text = match banner {
                Banner::Success(t)
                | Banner::Info(t)
                | Banner::Text(t)
                | Banner::Warning(t)
                | Banner::Error(t)
                | Banner::Status(t) => t,
            };
            return writeln!(self.out, "{text}");
        }

        match banner {
            Banner::Success(t) => writeln!(self.out, "{}", t.as_str().green()),
            Banner::Info(t) => writeln!(self.out, "{}", t.as_str().cyan()),
            Banner::Text(t) => writeln!(self.out, "{t}"),
            Banner::Warning(t) => writeln!(self.out, "{}", t.as_str().yellow()),
            Banner::Error(t) => writeln!(self.out, "{}", t.as_str().red()),
            Banner::Status(t) => writeln!(self.out, "{}", t.as_str().dark_grey()),
        }?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::ConversionResult;

    fn render_plain(outcome: &DispatchOutcome) -> String {
        let mut buf = Vec::new();
        Renderer::new(&mut buf, false).outcome(outcome).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_conversion_banners() {
        let outcome = DispatchOutcome::Conversion(ConversionResult {
            base: "USD".to_string(),
            target: "EUR".to_string(),
            amount: "100".to_string(),
            converted_amount: "92.50".to_string(),
            rate: 0.925,
        });
        assert_eq!(
            render_plain(&outcome),
            "100 USD = 92.50 EUR\nConversion rate: 1 USD = 0.925 EUR\n"
        );
    }

    #[test]
    fn test_general_reply_verbatim() {
        let outcome = DispatchOutcome::GeneralReply {
            content: "Paris.\nIt is the capital.".to_string(),
        };
        assert_eq!(render_plain(&outcome), "Paris.\nIt is the capital.\n");
    }

    #[test]
    fn test_error_is_single_line() {
        let outcome = DispatchOutcome::Error {
            message: "Rate lookup failed:\nHTTP 503".to_string(),
        };
        assert_eq!(
            banners(&outcome),
            vec![Banner::Error("Error: Rate lookup failed: HTTP 503".to_string())]
        );
    }

    #[test]
    fn test_title_plain() {
        let mut buf = Vec::new();
        Renderer::new(&mut buf, false).title().unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "AI Assistant with Currency Conversion\n\n"
        );
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let mut buf = Vec::new();
        Renderer::new(&mut buf, true)
            .banner(&Banner::Warning(EMPTY_INPUT_WARNING.to_string()))
            .unwrap();
        let rendered = String::from_utf8(buf).unwrap();
        assert!(rendered.contains(EMPTY_INPUT_WARNING));
        assert!(rendered.contains('\u{1b}'));
    }
}
