//! Interactive prompt loop
//!
//! One line of input is one submission. `exit`, `quit` or end of input
//! ends the session.

use crate::pipeline::Pipeline;
use crate::render::{self, Banner, Renderer};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const INVALID_UTF8: &str = "Error: input is not valid UTF-8";

/// Print the title once, then prompt and answer until the user leaves.
/// Only I/O failures on `renderer` or `input` end the session early.
pub async fn run_session<R, W>(
    pipeline: &Pipeline,
    mut input: R,
    renderer: &mut Renderer<W>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    renderer.title()?;

    let mut buf = Vec::new();
    loop {
        renderer.prompt()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::warn!(bytes = buf.len(), "Discarding non UTF-8 input line");
            renderer.banner(&Banner::Error(INVALID_UTF8.to_string()))?;
            continue;
        };
        let text = line.trim();

        if matches!(text, "exit" | "quit") {
            break;
        }
        if text.is_empty() {
            renderer.banner(&Banner::Warning(render::EMPTY_INPUT_WARNING.to_string()))?;
            continue;
        }

        renderer.banner(&Banner::Status(render::PROCESSING.to_string()))?;
        let outcome = pipeline.run(text).await;
        tracing::debug!(
            outcome = %serde_json::to_string(&outcome).unwrap_or_default(),
            "Pipeline finished"
        );
        renderer.outcome(&outcome)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::llm::{LlmResponse, SamplingParams};
    use crate::testing::{MockLlmService, MockRateLookup};
    use std::sync::Arc;

    fn pipeline(llm: &Arc<MockLlmService>) -> Pipeline {
        let dispatcher = Dispatcher::new(llm.clone(), SamplingParams::default());
        Pipeline::new(dispatcher, Arc::new(MockRateLookup::new()))
    }

    async fn transcript(llm: &Arc<MockLlmService>, input: &[u8]) -> String {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(&mut out, false);
        run_session(&pipeline(llm), input, &mut renderer)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_blank_line_warns_without_model_call() {
        let llm = Arc::new(MockLlmService::new());

        let out = transcript(&llm, b"  \nquit\n").await;

        assert!(out.contains(render::EMPTY_INPUT_WARNING));
        assert!(!out.contains(render::PROCESSING));
        assert!(llm.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_quit_and_exit_stop_before_later_lines() {
        for command in ["quit", "exit", "  exit  "] {
            let llm = Arc::new(MockLlmService::new());
            let input = format!("{command}\nwhat is 2+2?\n");

            let out = transcript(&llm, input.as_bytes()).await;

            assert!(llm.recorded_requests().is_empty(), "{command:?}");
            assert_eq!(out.matches(render::PROMPT).count(), 1);
        }
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_response(LlmResponse::text("4"));

        // Last line without a trailing newline is still submitted.
        let out = transcript(&llm, b"what is 2+2?").await;

        assert_eq!(llm.recorded_requests().len(), 1);
        assert!(out.contains("\n4\n"));
        assert_eq!(out.matches(render::PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn test_processing_shown_before_reply() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_response(LlmResponse::text("Paris."));

        let out = transcript(&llm, b"capital of France?\n").await;

        let processing = out.find(render::PROCESSING).unwrap();
        let reply = out.find("Paris.").unwrap();
        assert!(processing < reply);
        assert_eq!(llm.recorded_requests()[0].user, "capital of France?");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_keeps_session_alive() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_response(LlmResponse::text("still here"));

        let out = transcript(&llm, b"\xff\xfe\nhello\n").await;

        assert!(out.contains(INVALID_UTF8));
        assert!(out.contains("still here"));
        assert_eq!(llm.recorded_requests().len(), 1);
        assert_eq!(llm.recorded_requests()[0].user, "hello");
    }

    #[tokio::test]
    async fn test_title_printed_once() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_response(LlmResponse::text("a"));
        llm.queue_response(LlmResponse::text("b"));

        let out = transcript(&llm, b"one\ntwo\n").await;

        assert!(out.starts_with(render::TITLE));
        assert_eq!(out.matches(render::TITLE).count(), 1);
    }
}
