//! Composite prompt assembly.

use crate::models::prompt::{CompositePrompt, NO_DATA_MARKER, QUESTION_LABEL, SYSTEM_LABEL};
use crate::models::Record;

/// Render matched records as `- {title}: {description}` lines.
///
/// An empty match set renders [`NO_DATA_MARKER`] so the backend never sees an
/// empty data section.
pub fn render_matches(matches: &[Record]) -> String {
    if matches.is_empty() {
        return NO_DATA_MARKER.to_string();
    }

    matches
        .iter()
        .map(|record| format!("- {}: {}", record.title, record.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the composite prompt from a directive, the match set and the
/// caller's original query.
pub fn compose(directive: &str, matches: &[Record], query: &str) -> CompositePrompt {
    compose_with_limit(directive, matches, query, None)
}

/// Like [`compose`], but cuts the rendered data section to `max_context_chars`
/// characters when a limit is given.
pub fn compose_with_limit(
    directive: &str,
    matches: &[Record],
    query: &str,
    max_context_chars: Option<usize>,
) -> CompositePrompt {
    let mut data = render_matches(matches);

    if let Some(limit) = max_context_chars.filter(|&limit| limit > 0) {
        if let Some((cut, _)) = data.char_indices().nth(limit) {
            tracing::debug!(
                limit,
                original_len = data.chars().count(),
                "Truncating retrieved context"
            );
            data.truncate(cut);
            data.push('…');
        }
    }

    CompositePrompt {
        directive: directive.to_string(),
        data,
        question: query.to_string(),
    }
}

/// Single-line solution request: directive followed by the problem text.
pub fn render_suggestion(directive: &str, problem: &str) -> String {
    format!("{} {}", directive.trim_end(), problem)
}

/// Retrieval-free prompt for persona chat: directive and message only.
pub fn render_chat(directive: &str, message: &str) -> String {
    format!("{SYSTEM_LABEL}\n{directive}\n\n{QUESTION_LABEL}\n{message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIVE: &str = "Use only the data below.";

    #[test]
    fn renders_single_match() {
        let matches = vec![Record::new("Flood risk", "Urban drainage overload")];
        let prompt = compose(DIRECTIVE, &matches, "flood");
        assert_eq!(prompt.data, "- Flood risk: Urban drainage overload");
        assert_eq!(prompt.directive, DIRECTIVE);
        assert_eq!(prompt.question, "flood");
    }

    #[test]
    fn renders_matches_one_per_line_in_order() {
        let matches = vec![Record::new("A", "first"), Record::new("B", "second")];
        assert_eq!(render_matches(&matches), "- A: first\n- B: second");
    }

    #[test]
    fn empty_match_set_uses_marker() {
        let prompt = compose(DIRECTIVE, &[], "anything");
        assert_eq!(prompt.data, NO_DATA_MARKER);
        assert!(prompt.render().contains(NO_DATA_MARKER));
    }

    #[test]
    fn record_with_empty_fields_still_renders() {
        assert_eq!(render_matches(&[Record::default()]), "- : ");
    }

    #[test]
    fn question_is_verbatim() {
        let prompt = compose(DIRECTIVE, &[], "  What about FLOODS?  ");
        assert_eq!(prompt.question, "  What about FLOODS?  ");
    }

    #[test]
    fn composed_prompt_round_trips_through_parse() {
        let matches = vec![
            Record::new("Flood risk", "Urban drainage overload"),
            Record::new("Heat islands", "Asphalt"),
        ];
        let prompt = compose(DIRECTIVE, &matches, "  Flood?\nand more ");
        let parsed = CompositePrompt::parse(&prompt.render()).unwrap();

        assert_eq!(parsed.directive, DIRECTIVE);
        assert_eq!(parsed.data, render_matches(&matches));
        assert_eq!(parsed.question, "  Flood?\nand more ");
    }

    #[test]
    fn limit_truncates_on_char_boundary() {
        let matches = vec![Record::new("Água", "chuva ácida")];
        let prompt = compose_with_limit(DIRECTIVE, &matches, "q", Some(5));
        assert_eq!(prompt.data, "- Águ…");
    }

    #[test]
    fn limit_leaves_short_context_alone() {
        let matches = vec![Record::new("A", "b")];
        let prompt = compose_with_limit(DIRECTIVE, &matches, "q", Some(100));
        assert_eq!(prompt.data, "- A: b");
    }

    #[test]
    fn zero_limit_is_ignored() {
        let prompt = compose_with_limit(DIRECTIVE, &[], "q", Some(0));
        assert_eq!(prompt.data, NO_DATA_MARKER);
    }

    #[test]
    fn chat_prompt_has_no_data_section() {
        let rendered = render_chat("Be kind.", "Hello");
        assert_eq!(rendered, "SYSTEM:\nBe kind.\n\nQUESTION:\nHello");
    }

    #[test]
    fn suggestion_joins_directive_and_problem() {
        let rendered = render_suggestion("Propose a fix: ", "Urban heat");
        assert_eq!(rendered, "Propose a fix: Urban heat");
    }
}
