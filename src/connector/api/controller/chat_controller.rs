use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::domain::{ConversationSession, Turn};

use super::super::Container;

const TITLE: &str = "💬 克隆ChatGPT";
const KEY_PROMPT: &str = "请输入秘钥：";
const MISSING_KEY_HINT: &str = "API呢，输入啊，不输入怎么跟你聊天";
const THINKING: &str = "我正在思考，稍安勿躁";
const HELP: &str = "Type a message and press Enter. /history reprints the conversation, /quit exits.";

/// Terminal chat surface: one session, one line per message.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(&self) -> Result<String> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    /// Drive a session from `input` until EOF or `/quit`.
    ///
    /// The credential is read once, first. Blank lines are skipped without
    /// contacting the model, and a failed exchange leaves the history as it was.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        write_line(&mut output, TITLE).await?;
        output.write_all(KEY_PROMPT.as_bytes()).await?;
        output.flush().await?;

        let api_key = lines.next_line().await?.unwrap_or_default();
        let api_key = api_key.trim();
        if api_key.is_empty() {
            write_line(&mut output, "").await?;
            write_line(&mut output, MISSING_KEY_HINT).await?;
            return Ok("No API key provided.".to_string());
        }

        let config = self.container.client_config().with_api_key(api_key);
        let use_case = self.container.exchange_use_case();
        let mut session = ConversationSession::new();

        write_line(&mut output, HELP).await?;
        write_history(&mut output, session.history()).await?;

        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let text = line.trim();

            match text {
                "" => continue,
                "/quit" | "/exit" => break,
                "/history" => {
                    write_history(&mut output, session.history()).await?;
                    continue;
                }
                _ => {}
            }

            write_line(&mut output, THINKING).await?;
            match use_case.execute(&mut session, text, &config).await {
                Ok(reply) => write_line(&mut output, &Turn::assistant(reply).display_line()).await?,
                Err(e) => write_line(&mut output, &format!("Error: {}", e)).await?,
            }
        }

        Ok(format!("Session ended after {} turns.", session.len()))
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn write_history<W: AsyncWrite + Unpin>(output: &mut W, history: &[Turn]) -> Result<()> {
    for turn in history {
        write_line(output, &turn.display_line()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::connector::MockCompletionClient;
    use crate::domain::{ClientConfig, DomainError};

    fn container(client: Arc<MockCompletionClient>) -> Container {
        Container::with_client(client, ClientConfig::default())
    }

    async fn run_script(container: &Container, script: &str) -> (String, String) {
        let mut output = Vec::new();
        let summary = ChatController::new(container)
            .run(script.as_bytes(), &mut output)
            .await
            .unwrap();
        (summary, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_missing_key_stops_before_chatting() {
        let client = Arc::new(MockCompletionClient::new());
        let container = container(client.clone());

        let (summary, output) = run_script(&container, "\nhello\n").await;

        assert_eq!(summary, "No API key provided.");
        assert!(output.contains(MISSING_KEY_HINT));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_lines_are_not_sent() {
        let client = Arc::new(MockCompletionClient::with_replies(["pong"]));
        let container = container(client.clone());

        let (summary, output) = run_script(&container, "key\n\n   \nping\n/quit\n").await;

        assert_eq!(client.call_count(), 1);
        assert!(output.contains("[assistant] pong"));
        assert_eq!(summary, "Session ended after 3 turns.");
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_chat_continues() {
        let client = Arc::new(MockCompletionClient::new());
        client.push_error(DomainError::transport("timed out"));
        client.push_reply("second try");
        let container = container(client.clone());

        let (summary, output) = run_script(&container, "key\nfirst\nsecond\n").await;

        assert!(output.contains("Error: Transport error: timed out"));
        assert!(output.contains("[assistant] second try"));
        assert_eq!(summary, "Session ended after 3 turns.");

        // The failed exchange left nothing behind for the next request.
        let last = client.last_request().unwrap();
        assert_eq!(last.prior_turns().len(), 1);
        assert_eq!(last.new_user_text(), "second");
    }

    #[tokio::test]
    async fn test_history_command_reprints_turns() {
        let client = Arc::new(MockCompletionClient::with_replies(["a1"]));
        let container = container(client);

        let (_, output) = run_script(&container, "key\nq1\n/history\n").await;

        assert_eq!(output.matches("[assistant] 有何贵干").count(), 2);
        assert!(output.contains("[user] q1"));
    }
}
