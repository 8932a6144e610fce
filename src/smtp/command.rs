use core::fmt::{self, Display, Formatter};

/// The protocol steps of one send, in issue order.
///
/// Each step has exactly one reply code the relay is expected to answer
/// with; anything else fails the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `HELO <client-name>`, consuming the relay's 220 service-ready banner.
    Helo,
    /// `AUTH LOGIN`, answered with a 334 username challenge.
    AuthLogin,
    /// The base64 username line, answered with a 334 password challenge.
    Username,
    /// The base64 password line, answered with 235 on authentication.
    Password,
    /// `MAIL FROM: <sender>`.
    MailFrom,
    /// `RCPT TO: <recipient>`.
    RcptTo,
    /// `DATA`, answered with 354 start-mail-input.
    Data,
    /// The lone `.` terminating the message body.
    EndOfMessage,
    /// `QUIT`.
    Quit,
}

impl Command {
    /// The reply code the relay must answer this step with.
    #[must_use]
    pub const fn expected_reply(self) -> u16 {
        match self {
            Self::Helo => 220,
            Self::AuthLogin | Self::Username => 334,
            Self::Password => 235,
            Self::MailFrom | Self::RcptTo | Self::EndOfMessage => 250,
            Self::Data => 354,
            Self::Quit => 221,
        }
    }
}

impl Display for Command {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            Self::Helo => "HELO",
            Self::AuthLogin => "AUTH LOGIN",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Data => "DATA",
            Self::EndOfMessage => "EOM",
            Self::Quit => "QUIT",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Command;

    #[test]
    fn test_expected_replies_in_sequence() {
        let sequence = [
            (Command::Helo, 220),
            (Command::AuthLogin, 334),
            (Command::Username, 334),
            (Command::Password, 235),
            (Command::MailFrom, 250),
            (Command::RcptTo, 250),
            (Command::Data, 354),
            (Command::EndOfMessage, 250),
            (Command::Quit, 221),
        ];

        for (command, code) in sequence {
            assert_eq!(command.expected_reply(), code, "{command}");
        }
    }

    #[test]
    fn test_friendly_names() {
        assert_eq!(Command::AuthLogin.to_string(), "AUTH LOGIN");
        assert_eq!(Command::EndOfMessage.to_string(), "EOM");
        assert_eq!(Command::MailFrom.to_string(), "MAIL FROM");
    }
}
