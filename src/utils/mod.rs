//! Utility functions.

pub mod parser;

pub use parser::{classify, Intent, Keywords};

/// Zero-pad a minute value for display, e.g. `7:05`.
pub fn pad_minutes(minute: u8) -> String {
    format!("{:02}", minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_single_digit_minutes() {
        assert_eq!(pad_minutes(5), "05");
        assert_eq!(pad_minutes(30), "30");
        assert_eq!(pad_minutes(0), "00");
    }
}
