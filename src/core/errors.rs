use std::num::ParseIntError;
use std::sync::mpsc::RecvError;
use std::{error, fmt, io};

/// Errors surfaced through `Result` rather than the log-and-drop policy the
/// callback paths use. Broker-originated failures never travel this way; they
/// are reported through the `Wrapper` callbacks or as `false`/0 returns.
#[derive(Debug)]
pub enum CtpCoreError {
    /// Contract registry violation: duplicate contract, bad multiplier, ...
    Table(String),
    /// A numeric wire field failed to parse (OrderRef, AccountID, ...).
    ParseInt(ParseIntError),
    Io(io::Error),
    /// An event channel closed with its producer gone.
    Recv(RecvError),
}

impl fmt::Display for CtpCoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CtpCoreError::Table(ref msg) => write!(f, "contract table error: {}", msg),
            CtpCoreError::ParseInt(ref err) => write!(f, "wire field parse error: {}", err),
            CtpCoreError::Io(ref err) => write!(f, "IO error: {}", err),
            CtpCoreError::Recv(ref err) => write!(f, "receive error: {}", err),
        }
    }
}

impl error::Error for CtpCoreError {
    fn cause(&self) -> Option<&dyn error::Error> {
        match self {
            CtpCoreError::Table(_) => None,
            CtpCoreError::ParseInt(ref err) => Some(err),
            CtpCoreError::Io(ref err) => Some(err),
            CtpCoreError::Recv(ref err) => Some(err),
        }
    }
}

impl From<ParseIntError> for CtpCoreError {
    fn from(err: ParseIntError) -> CtpCoreError {
        CtpCoreError::ParseInt(err)
    }
}

impl From<io::Error> for CtpCoreError {
    fn from(err: io::Error) -> CtpCoreError {
        CtpCoreError::Io(err)
    }
}

impl From<RecvError> for CtpCoreError {
    fn from(err: RecvError) -> CtpCoreError {
        CtpCoreError::Recv(err)
    }
}
