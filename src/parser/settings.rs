//! Debug level header: `58.0 APEX_CODE,FINEST;APEX_PROFILING,INFO;...`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One `category,level` entry of the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSetting {
    pub category: String,
    pub level: String,
}

/// `<version> APEX_CODE,<level>;APEX_PROFILING,<level>[;...]` on a line of its own
const SETTINGS_PATTERN: &str =
    r"(?mR)^[0-9]+\.[0-9]+\s(?P<list>APEX_CODE,[A-Za-z0-9_]+;APEX_PROFILING,.+)$";

fn settings_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SETTINGS_PATTERN).expect("settings pattern is valid"))
}

/// Extract the settings header, or an empty list when the log has none
///
/// The first line of the whole text that looks like a header wins; it does
/// not have to precede the trace.
pub fn parse_settings(log: &str) -> Vec<LogSetting> {
    let Some(list) = settings_pattern()
        .captures(log)
        .and_then(|captures| captures.name("list"))
    else {
        return Vec::new();
    };

    list.as_str()
        .split(';')
        .map(|entry| {
            let mut parts = entry.split(',');
            LogSetting {
                category: parts.next().unwrap_or_default().to_string(),
                level: parts.next().unwrap_or_default().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setting(category: &str, level: &str) -> LogSetting {
        LogSetting {
            category: category.to_string(),
            level: level.to_string(),
        }
    }

    #[test]
    fn test_parse_header() {
        let log = "58.0 APEX_CODE,FINEST;APEX_PROFILING,INFO;CALLOUT,NONE\n1 (1)|EXECUTION_STARTED\n";
        assert_eq!(
            parse_settings(log),
            vec![
                setting("APEX_CODE", "FINEST"),
                setting("APEX_PROFILING", "INFO"),
                setting("CALLOUT", "NONE"),
            ]
        );
    }

    #[test]
    fn test_missing_level_is_empty() {
        let log = "58.0 APEX_CODE,DEBUG;APEX_PROFILING,INFO;WAVE\n";
        assert_eq!(parse_settings(log).last(), Some(&setting("WAVE", "")));
    }

    #[test]
    fn test_no_header() {
        assert!(parse_settings("1 (1)|EXECUTION_STARTED\n").is_empty());
        assert!(parse_settings("58 APEX_CODE,DEBUG;APEX_PROFILING,INFO\n").is_empty());
        assert!(parse_settings("58.0 APEX_CODE,DEBUG;APEX_PROFILING,\n").is_empty());
    }

    #[test]
    fn test_crlf_header() {
        let log = "58.0 APEX_CODE,DEBUG;APEX_PROFILING,INFO\r\n1 (1)|EXECUTION_STARTED\r\n";
        assert_eq!(parse_settings(log)[1], setting("APEX_PROFILING", "INFO"));
    }

    #[test]
    fn test_first_header_wins() {
        let log = "junk\n58.0 APEX_CODE,DEBUG;APEX_PROFILING,INFO\n59.0 APEX_CODE,FINE;APEX_PROFILING,FINE\n";
        assert_eq!(parse_settings(log)[0], setting("APEX_CODE", "DEBUG"));
    }
}
