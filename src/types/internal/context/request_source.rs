/// Entry point an operation came in through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    API,
    CLI,
}

impl std::fmt::Display for RequestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestSource::API => write!(f, "api"),
            RequestSource::CLI => write!(f, "cli"),
        }
    }
}
