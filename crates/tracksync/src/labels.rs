//! Mapping between issue metadata and flat remote labels.
//!
//! Type and priority travel as reserved labels (`type:bug`,
//! `priority:high`) next to the free-form labels.

use crate::entity::issue_type::IssueType;
use crate::entity::priority::Priority;

/// Prefix of the reserved issue type label.
pub const TYPE_PREFIX: &str = "type:";

/// Prefix of the reserved priority label.
pub const PRIORITY_PREFIX: &str = "priority:";

/// Color of labels without an entry in the reserved table.
pub const DEFAULT_LABEL_COLOR: &str = "ededed";

/// Metadata recovered from a remote label list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedLabels {
    pub issue_type: IssueType,
    pub priority: Priority,
    pub labels: Vec<String>,
}

/// Reserved type label, e.g. `type:story`.
pub fn type_label(issue_type: IssueType) -> String {
    format!("{TYPE_PREFIX}{}", issue_type.label_value())
}

/// Reserved priority label, e.g. `priority:low`.
pub fn priority_label(priority: Priority) -> String {
    format!("{PRIORITY_PREFIX}{}", priority.label_value())
}

/// Encode metadata as remote labels: type, priority, then free-form labels.
pub fn encode_labels(issue_type: IssueType, priority: Priority, labels: &[String]) -> Vec<String> {
    let mut encoded = Vec::with_capacity(labels.len() + 2);
    encoded.push(type_label(issue_type));
    encoded.push(priority_label(priority));
    encoded.extend(labels.iter().cloned());
    encoded
}

/// Strip `prefix` from `label`, ignoring ASCII case.
fn strip_prefix_ignore_case<'a>(label: &'a str, prefix: &str) -> Option<&'a str> {
    let head = label.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &label[prefix.len()..])
}

/// Decode remote labels back into type, priority and free-form labels.
///
/// The first recognized `type:` and `priority:` labels win and later
/// recognized ones are dropped. Reserved prefixes with an unknown value stay
/// free-form. Missing reserved labels default to `Task` and `Medium`.
pub fn decode_labels<S: AsRef<str>>(remote: &[S]) -> DecodedLabels {
    let mut issue_type = None;
    let mut priority = None;
    let mut labels = Vec::new();

    for label in remote {
        let label = label.as_ref();

        if let Some(value) = strip_prefix_ignore_case(label, TYPE_PREFIX)
            && let Ok(parsed) = value.parse::<IssueType>()
        {
            issue_type.get_or_insert(parsed);
            continue;
        }

        if let Some(value) = strip_prefix_ignore_case(label, PRIORITY_PREFIX)
            && let Ok(parsed) = value.parse::<Priority>()
        {
            priority.get_or_insert(parsed);
            continue;
        }

        labels.push(label.to_string());
    }

    DecodedLabels {
        issue_type: issue_type.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        labels,
    }
}

/// Color for a label when it is created remotely.
pub fn label_color(name: &str) -> &'static str {
    match name.to_ascii_lowercase().as_str() {
        "type:task" => "1d76db",
        "type:story" => "0e8a16",
        "type:bug" => "d73a4a",
        "type:docs" => "0075ca",
        "priority:critical" => "b60205",
        "priority:high" => "d93f0b",
        "priority:medium" => "fbca04",
        "priority:low" => "c2e0c6",
        _ => DEFAULT_LABEL_COLOR,
    }
}
