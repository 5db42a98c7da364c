//! Text and JSON rendering of command results.

use serde::Serialize;
use std::collections::BTreeSet;
use userscout_probe::{ProbeResult, UsernameCheckSummary};

/// Human-readable block for one username.
pub fn render_results_text(username: &str, results: &[ProbeResult]) -> String {
    let mut sorted: Vec<&ProbeResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.service_name.cmp(&b.service_name));

    let mut out = format!("Results for '{username}':\n");
    for result in sorted {
        let status = if result.found { "FOUND" } else { "NOT FOUND" };
        let note = result
            .note
            .as_deref()
            .filter(|note| !note.is_empty())
            .map(|note| format!(" ({note})"))
            .unwrap_or_default();

        out.push_str(&format!(
            " - {:<20} {status}{note} {}\n",
            result.service_name.as_str(),
            result.profile_url
        ));
    }
    out
}

/// Human-readable blocks for several usernames, separated by blank lines.
pub fn render_summaries_text(summaries: &[UsernameCheckSummary]) -> String {
    summaries
        .iter()
        .map(|summary| render_results_text(&summary.username, &summary.results))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One pretty-printed JSON object per username.
pub fn render_summaries_json(summaries: &[UsernameCheckSummary]) -> serde_json::Result<String> {
    summaries
        .iter()
        .map(serde_json::to_string_pretty)
        .collect::<serde_json::Result<Vec<_>>>()
        .map(|objects| objects.join("\n"))
}

/// Pretty-printed JSON for any serializable value.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Comma-separated service names.
pub fn render_names_text(names: &[String]) -> String {
    names.join(",")
}

/// One category per line.
pub fn render_categories_text(categories: &BTreeSet<String>) -> String {
    categories
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use userscout_core::ServiceName;

    fn name(value: &str) -> ServiceName {
        ServiceName::new(value).expect("valid name")
    }

    fn sample_results() -> Vec<ProbeResult> {
        vec![
            ProbeResult::failed(
                name("reddit"),
                "alice",
                "https://www.reddit.com/user/alice",
                "timeout",
            ),
            ProbeResult::completed(
                name("GitHub"),
                "alice",
                "https://github.com/alice",
                200,
                true,
            ),
        ]
    }

    #[test]
    fn test_render_results_text() {
        let text = render_results_text("alice", &sample_results());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Results for 'alice':");
        assert_eq!(
            lines[1],
            " - GitHub               FOUND https://github.com/alice"
        );
        assert_eq!(
            lines[2],
            " - reddit               NOT FOUND (timeout) https://www.reddit.com/user/alice"
        );
    }

    #[test]
    fn test_render_summaries_text_separates_blocks() {
        let summaries = vec![
            UsernameCheckSummary {
                username: "alice".to_string(),
                results: sample_results(),
            },
            UsernameCheckSummary {
                username: "bob".to_string(),
                results: Vec::new(),
            },
        ];

        let text = render_summaries_text(&summaries);
        assert!(text.starts_with("Results for 'alice':"));
        assert!(text.contains("\n\nResults for 'bob':"));
    }

    #[test]
    fn test_render_summaries_json() {
        let summaries = vec![UsernameCheckSummary {
            username: "alice".to_string(),
            results: sample_results(),
        }];

        let json = render_summaries_json(&summaries).expect("render json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["username"], "alice");
        assert_eq!(value["results"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_render_json_array() {
        let json = render_json(&sample_results()).expect("render json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value[0]["service_name"], "reddit");
        assert_eq!(value[0]["note"], "timeout");
        assert!(value[0]["status_code"].is_null());
        assert_eq!(value[1]["found"], true);
    }

    #[test]
    fn test_render_names_and_categories() {
        assert_eq!(
            render_names_text(&["GitHub".to_string(), "GitLab".to_string()]),
            "GitHub,GitLab"
        );

        let categories: BTreeSet<String> =
            ["social", "coding"].iter().map(ToString::to_string).collect();
        assert_eq!(render_categories_text(&categories), "coding\nsocial");
    }
}
