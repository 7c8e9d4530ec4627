//! Obfuscation of sensitive fields in log lines.
//!
//! Log lines that carry user-submitted data use a `field=value;` format;
//! [`redact_fields`] blanks the values of the listed fields before the line
//! reaches any subscriber.

use regex::Regex;

/// Fields considered personally identifiable in log output.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Replacement string for redacted values.
pub const REDACTION: &str = "***";

/// Separator between `field=value` pairs in a log line.
pub const SEPARATOR: char = ';';

/// Replace the value of each listed field in `message` with `redaction`.
///
/// Fields not listed are left untouched; field names match literally. A
/// value runs until the next separator, so it may contain `=` itself.
pub fn redact_fields(fields: &[&str], redaction: &str, message: &str, separator: char) -> String {
    if fields.is_empty() {
        return message.to_string();
    }
    let names: Vec<String> = fields.iter().map(|f| regex::escape(f)).collect();
    let pattern = format!(
        "(?P<field>{})=[^{}]*",
        names.join("|"),
        regex::escape(&separator.to_string())
    );
    let re = Regex::new(&pattern).expect("escaped field pattern is always valid");
    re.replace_all(message, format!("${{field}}={redaction}").as_str())
        .into_owned()
}
