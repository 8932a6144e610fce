//! The send-one-update-email state machine.
//!
//! A session is configured once and can send repeatedly; each send opens the
//! transport, walks the fixed command sequence, and closes it again. The
//! outcome is a latch: the first step that fails records the diagnostic, and
//! every later reply-validated step becomes a no-op. The envelope, body,
//! terminator and QUIT lines are still written after a failure; the node
//! always finishes the exchange it started, even when the outcome is
//! already decided.

use std::time::Duration;

use tokio::time;

use super::{
    command::Command,
    response::Reply,
    transport::{Transport, TransportError},
};
use crate::config::SmtpConfig;

/// Built-in response wait, restored whenever a zero duration is configured.
pub const DEFAULT_RESPONSE_WAIT: Duration = Duration::from_millis(750);

/// Status text reported when every step of a send succeeded.
pub const EMAIL_SUCCESS_STATUS: &str = "Email Sent Successfully!";

/// Status text reported when the relay connection could not be opened.
pub const CONNECT_FAILED_STATUS: &str = "Failed to connect to SMTP server";

/// Fixed MIME header block of the update email. The stray unclosed quote in
/// the charset parameter is part of the wire format peers have seen from
/// this node since day one; do not tidy it.
const MIME_HEADERS: &str = "Mime-Version: 1.0;\r\nContent-Type: text/html; charset=\"ISO-8859-1\r\nContent-Transfer-Encoding: 7bit;";

/// Where the session currently is in the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Greeting,
    Authenticating,
    SpecifyingSender,
    SpecifyingRecipient,
    StartingData,
    SendingBody,
    Terminating,
    Closed,
    Failed,
}

impl core::fmt::Display for SessionState {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt.write_str(match self {
            Self::Idle => "Idle",
            Self::Greeting => "Greeting",
            Self::Authenticating => "Authenticating",
            Self::SpecifyingSender => "SpecifyingSender",
            Self::SpecifyingRecipient => "SpecifyingRecipient",
            Self::StartingData => "StartingData",
            Self::SendingBody => "SendingBody",
            Self::Terminating => "Terminating",
            Self::Closed => "Closed",
            Self::Failed => "Failed",
        })
    }
}

/// The outcome of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    /// Whether every validated step got its expected reply.
    pub success: bool,
    /// [`EMAIL_SUCCESS_STATUS`], or the diagnostic from the first failure.
    pub status: String,
}

impl SendReport {
    fn delivered() -> Self {
        Self {
            success: true,
            status: EMAIL_SUCCESS_STATUS.to_string(),
        }
    }

    fn connect_failed() -> Self {
        Self {
            success: false,
            status: CONNECT_FAILED_STATUS.to_string(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }
}

/// One email-send attempt at a time over a [`Transport`].
pub struct SmtpSession<T: Transport> {
    transport: T,
    config: SmtpConfig,
    recipient: String,
    wait: Duration,
    state: SessionState,
    report: SendReport,
}

impl<T: Transport> SmtpSession<T> {
    /// Create a session addressing the configured default recipient.
    pub fn new(config: SmtpConfig, transport: T) -> Self {
        let recipient = config.recipient.clone();
        let wait = config.response_wait();

        Self {
            transport,
            config,
            recipient,
            wait,
            state: SessionState::Idle,
            report: SendReport::delivered(),
        }
    }

    /// Address a different recipient from the start.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Replace the recipient address.
    ///
    /// Any string is accepted as-is; nothing here checks that it looks like
    /// a mailbox.
    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.recipient = recipient.into();
    }

    /// Replace the response wait, or reset it.
    ///
    /// A positive duration replaces the current wait; zero restores
    /// [`DEFAULT_RESPONSE_WAIT`] without the caller needing to know it.
    /// That set-or-reset dual behaviour is the contract, not an error path.
    pub const fn set_timeout(&mut self, timeout: Duration) {
        self.wait = if timeout.is_zero() {
            DEFAULT_RESPONSE_WAIT
        } else {
            timeout
        };
    }

    /// The current response wait.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.wait
    }

    /// The state the session finished its last exchange in.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Send one update email with the given subject and HTML body fragment.
    ///
    /// Owns the entire exchange: connects, authenticates, transmits the
    /// envelope and body, tears the connection down, and reports the
    /// outcome. Nothing is propagated past this boundary; connection and
    /// protocol failures all fold into the returned [`SendReport`].
    pub async fn send_update_email(&mut self, subject: &str, body_html: &str) -> SendReport {
        self.report = SendReport::delivered();
        self.state = SessionState::Idle;

        if let Err(err) = self
            .transport
            .connect(&self.config.host, self.config.port)
            .await
        {
            tracing::warn!(
                host = %self.config.host,
                port = self.config.port,
                %err,
                "relay connection failed"
            );
            self.report = SendReport::connect_failed();
            self.state = SessionState::Failed;
            return self.report.clone();
        }

        tracing::info!(host = %self.config.host, port = self.config.port, "connected to relay");

        let helo = format!("HELO {}", self.config.client_name);
        let username = self.config.username.clone();
        let password = self.config.password.clone();
        let mail_from = format!("MAIL FROM: <{}>", self.config.sender);
        let rcpt_to = format!("RCPT TO: <{}>", self.recipient);

        self.advance(SessionState::Greeting);
        self.command(Command::Helo, &helo).await;

        self.advance(SessionState::Authenticating);
        self.command(Command::AuthLogin, "AUTH LOGIN").await;
        self.command(Command::Username, &username).await;
        self.command(Command::Password, &password).await;

        self.advance(SessionState::SpecifyingSender);
        self.command(Command::MailFrom, &mail_from).await;

        self.advance(SessionState::SpecifyingRecipient);
        self.command(Command::RcptTo, &rcpt_to).await;

        self.advance(SessionState::StartingData);
        self.command(Command::Data, "DATA").await;

        self.advance(SessionState::SendingBody);
        let envelope = [
            format!("From: {}", self.config.from_header),
            format!("Subject: {subject}"),
            format!("To: {}", self.recipient),
            MIME_HEADERS.to_string(),
            String::new(),
            format!("<html>\r\n<body>\r\n{body_html}\r\n</body></html>"),
        ];
        for line in &envelope {
            self.write_paced(line).await;
        }

        self.advance(SessionState::Terminating);
        self.trailing_command(Command::EndOfMessage, ".").await;
        self.trailing_command(Command::Quit, "QUIT").await;

        self.transport.close().await;
        self.advance(SessionState::Closed);

        tracing::info!(
            success = self.report.success,
            status = %self.report.status,
            "session finished"
        );

        self.report.clone()
    }

    /// Move to the next state unless the session has already failed.
    const fn advance(&mut self, next: SessionState) {
        if self.report.success {
            self.state = next;
        }
    }

    /// Latch the first failure; later ones are dropped.
    fn fail(&mut self, status: String) {
        if self.report.success {
            self.report.success = false;
            self.report.status = status;
            self.state = SessionState::Failed;
        }
    }

    fn rejected(command: Command) -> String {
        format!(
            "Did not receive response {} to {} command.",
            command.expected_reply(),
            command
        )
    }

    fn lost(command: Command, err: &TransportError) -> String {
        format!("Lost connection to relay during {command} command: {err}")
    }

    /// Issue one reply-validated command. Skipped entirely once the session
    /// has failed.
    async fn command(&mut self, command: Command, line: &str) {
        if !self.report.success {
            return;
        }

        tracing::debug!(state = %self.state, "issuing {command} command");

        if let Err(err) = self.transport.write_line(line).await {
            self.fail(Self::lost(command, &err));
            return;
        }

        let reply = self.read_reply().await;
        if reply.matches(command.expected_reply()) {
            tracing::debug!(%reply, "{command} accepted");
        } else {
            tracing::warn!(
                %reply,
                expected = command.expected_reply(),
                "unexpected reply to {command}"
            );
            self.fail(Self::rejected(command));
        }
    }

    /// Issue a trailing command ("." or QUIT): always written, but its reply
    /// is only awaited and validated while the session is still succeeding.
    async fn trailing_command(&mut self, command: Command, line: &str) {
        let validate = self.report.success;

        if let Err(err) = self.transport.write_line(line).await {
            if validate {
                self.fail(Self::lost(command, &err));
            }
            return;
        }

        if !validate {
            return;
        }

        let reply = self.read_reply().await;
        if !reply.matches(command.expected_reply()) {
            tracing::warn!(
                %reply,
                expected = command.expected_reply(),
                "unexpected reply to {command}"
            );
            self.fail(Self::rejected(command));
        }
    }

    /// Write one envelope/body line, then pause one wait period. The pause
    /// is the node's only flow control: the relay never acknowledges
    /// individual body lines.
    async fn write_paced(&mut self, line: &str) {
        if let Err(err) = self.transport.write_line(line).await {
            self.fail(format!(
                "Lost connection to relay while sending message body: {err}"
            ));
        }

        time::sleep(self.wait).await;
    }

    async fn read_reply(&mut self) -> Reply {
        match self.transport.read_available(self.wait).await {
            Ok(bytes) => Reply::parse(&bytes),
            // A dead read and a silent relay answer the same question
            Err(err) => {
                tracing::warn!(%err, "reply read failed");
                Reply::NoData
            }
        }
    }
}
