//! The minimal SMTP client.
//!
//! One fixed command sequence (HELO, AUTH LOGIN, credentials, MAIL FROM,
//! RCPT TO, DATA, envelope and body, ".", QUIT), each step validated against
//! the single reply code the relay is expected to return. [`SmtpSession`] owns
//! the sequencing and the first-failure-wins outcome; [`Transport`] is the
//! encrypted byte-stream boundary underneath it.

pub mod command;
pub mod response;
pub mod session;
pub mod transport;

pub use command::Command;
pub use response::Reply;
pub use session::{SendReport, SessionState, SmtpSession};
pub use transport::{TlsTransport, Transport, TransportError};
