// Free-text scraping of `systemctl status` output
//
// The literal markers matched here ("active (running)", "failed (result:
// exit-code)", "Active:", "Memory:", "CPU:", "Error:") are the wire format
// between this crate and systemd; keep them verbatim.

use regex::Regex;

/// Extract the uptime duration from a line like
/// `Active: active (running) since Mon 2024-03-18 10:00:00 UTC; 4 days ago`.
pub fn parse_uptime(status_text: &str) -> Option<String> {
    let re = Regex::new(r"Active: active \(running\) since .*?; (.*?) ago").unwrap();
    re.captures(status_text).map(|caps| caps[1].to_string())
}

/// Extract the memory figure from the first `Memory:` line, verbatim.
pub fn parse_memory(status_text: &str) -> Option<String> {
    let re = Regex::new(r"Memory: (.*?)(?:\n|$)").unwrap();
    re.captures(status_text).map(|caps| caps[1].trim().to_string())
}

/// Extract the CPU figure from the first `CPU:` line, verbatim.
pub fn parse_cpu(status_text: &str) -> Option<String> {
    let re = Regex::new(r"CPU: (.*?)(?:\n|$)").unwrap();
    re.captures(status_text).map(|caps| caps[1].trim().to_string())
}

/// Extract the first `Error:` line from the status output.
///
/// Despite the field being called "last error" upstream, only the FIRST
/// occurrence is taken. Long-standing behavior; keep it.
pub fn parse_last_error(status_text: &str) -> Option<String> {
    let re = Regex::new(r"Error: (.*?)(?:\n|$)").unwrap();
    re.captures(status_text).map(|caps| caps[1].trim().to_string())
}

/// Derive the project group and sidecar suffix from a unit name.
///
/// Policy: strip the unit prefix and the `.service` extension, then split on
/// the first underscore. `projects_incognita_dashboard.service` groups under
/// `incognita` with suffix `dashboard`; a name without an underscore is the
/// primary unit of its group.
pub fn split_project_group(service_name: &str, unit_prefix: &str) -> (String, Option<String>) {
    let stem = service_name.strip_prefix(unit_prefix).unwrap_or(service_name);
    let stem = stem.strip_suffix(".service").unwrap_or(stem);
    match stem.split_once('_') {
        Some((group, rest)) => (group.to_string(), Some(rest.to_string())),
        None => (stem.to_string(), None),
    }
}
