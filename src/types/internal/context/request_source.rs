use std::fmt;

/// Where an operation was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    API,
    CLI,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestSource::API => write!(f, "api"),
            RequestSource::CLI => write!(f, "cli"),
        }
    }
}
