use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::config::HighlighterCommand;
use crate::error::HighlightError;
use crate::highlighter::{Highlighted, Highlighter};

/// A highlighter running as a child process.
///
/// Requests and responses are single-line JSON documents exchanged over the
/// child's stdin and stdout, one response per request:
///
/// ```text
/// -> {"language":"c","code":"/* a\n","continuation":null}
/// <- {"value":"<span class=\"hljs-comment\">/* a\n</span>","top":{...}}
/// <- {"error":"Unknown language: \"c\""}
/// ```
///
/// The `top` value is kept as raw JSON and sent back verbatim.
///
/// A call that fails partway through an exchange (timeout, I/O error or an
/// unreadable response) leaves the stream out of step with the requests, so
/// the child is killed and every later call fails with
/// [`HighlightError::Closed`].
pub struct ProcessHighlighter {
    program: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    line: String,
    timeout: Option<Duration>,
    broken: bool,
}

#[derive(Serialize)]
struct Request<'a> {
    language: &'a str,
    code: &'a str,
    continuation: Option<&'a JsonValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Response {
    Failed {
        error: String,
    },
    Highlighted {
        value: String,
        #[serde(default)]
        top: JsonValue,
    },
}

impl ProcessHighlighter {
    /// Start the highlighter process. Its stderr is inherited.
    pub fn spawn(command: &HighlighterCommand) -> Result<Self, HighlightError> {
        let mut child = Command::new(&command.command)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| HighlightError::Spawn {
                program: command.command.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(HighlightError::Closed);
        };

        tracing::debug!(program = %command.command, args = ?command.args, "highlighter started");

        Ok(ProcessHighlighter {
            program: command.command.clone(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            line: String::new(),
            timeout: command.timeout(),
            broken: false,
        })
    }

    /// Close the request stream and wait for the process to exit.
    pub async fn shutdown(self) -> Result<(), HighlightError> {
        let ProcessHighlighter {
            program,
            mut child,
            stdin,
            ..
        } = self;
        drop(stdin);
        let status = child.wait().await?;
        tracing::debug!(%program, %status, "highlighter exited");
        Ok(())
    }

    /// Send one request and read its response, giving up on the child if
    /// the exchange does not complete cleanly.
    async fn exchange(&mut self, request: &Request<'_>) -> Result<Response, HighlightError> {
        if self.broken {
            return Err(HighlightError::Closed);
        }
        let result = self.round_trip(request).await;
        if let Err(e) = &result {
            tracing::warn!(
                program = %self.program,
                error = %e,
                "highlighter out of step, stopping it"
            );
            self.broken = true;
            if let Err(e) = self.child.start_kill() {
                tracing::debug!(program = %self.program, error = %e, "cannot kill highlighter");
            }
        }
        result
    }

    async fn round_trip(&mut self, request: &Request<'_>) -> Result<Response, HighlightError> {
        let mut payload = serde_json::to_string(request)
            .map_err(|e| HighlightError::Protocol(e.to_string()))?;
        payload.push('\n');
        self.stdin.write_all(payload.as_bytes()).await?;
        self.stdin.flush().await?;

        self.line.clear();
        let read = self.stdout.read_line(&mut self.line);
        let n = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| HighlightError::Timeout(limit))??,
            None => read.await?,
        };
        if n == 0 {
            return Err(HighlightError::Closed);
        }

        serde_json::from_str(self.line.trim_end())
            .map_err(|e| HighlightError::Protocol(format!("{}: {}", e, self.line.trim_end())))
    }
}

impl Highlighter for ProcessHighlighter {
    type State = JsonValue;

    async fn highlight(
        &mut self,
        language: &str,
        code: &str,
        continuation: Option<&JsonValue>,
    ) -> Result<Highlighted<JsonValue>, HighlightError> {
        let request = Request {
            language,
            code,
            continuation,
        };
        match self.exchange(&request).await? {
            Response::Highlighted { value, top } => Ok(Highlighted { value, top }),
            Response::Failed { error } => Err(HighlightError::Rejected {
                language: language.to_string(),
                message: error,
            }),
        }
    }
}

impl std::fmt::Debug for ProcessHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHighlighter")
            .field("program", &self.program)
            .field("pid", &self.child.id())
            .field("timeout", &self.timeout)
            .field("broken", &self.broken)
            .finish()
    }
}
