use std::error::Error;
use std::fmt;

pub struct MaintError {
    pub details: String,
}

impl MaintError {
    pub fn new(msg: &str) -> MaintError {
        MaintError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for MaintError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

/// Same as [Display](fmt::Display), so errors surfacing through `?` read as plain messages
impl fmt::Debug for MaintError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.details)
    }
}

impl Error for MaintError {}
