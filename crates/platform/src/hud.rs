use std::fmt;

use crate::format::DisplayNumber;

/// Multi-line battery report: one summary line followed by indented details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    summary: String,
    details: Vec<String>,
}

impl Hud {
    pub fn new(summary: String, details: Vec<String>) -> Self {
        Self { summary, details }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)?;
        for detail in &self.details {
            write!(f, "\n\t{}", detail)?;
        }
        Ok(())
    }
}

/// `50.0%`, or `unavailable` when no capacity is reported.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{}%", DisplayNumber(p)),
        None => "unavailable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_indents_details() {
        let hud = Hud::new(
            "ac power - 80.0%".to_string(),
            vec!["using ac power".to_string()],
        );
        assert_eq!(hud.to_string(), "ac power - 80.0%\n\tusing ac power");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(50.0)), "50.0%");
        assert_eq!(format_percent(Some(33.33)), "33.33%");
        assert_eq!(format_percent(None), "unavailable");
    }
}
