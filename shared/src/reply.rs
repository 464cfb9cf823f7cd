//! Extraction of search queries from a model reply.

use serde_json::Value;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

pub const DEFAULT_PROMPT: &str = "Look at the content or concept of this drawing and give me list of 6 search queries based on it. Think outside of the box. Give the results in the form of a json code block, like:
```json
[\"query 1\", \"query 2\", \"query 3\", \"query 4\", \"query 5\", \"query 6\"]
```";

pub const DEFAULT_SEARCH_PREFIX: &str = "https://google.com/search?q=";

/// Bodies of every non-empty ```` ```json ```` fenced block, in order.
pub fn extract_json_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(JSON_FENCE) {
        let body_start = start + JSON_FENCE.len();
        // The body needs at least one character before the closing fence.
        let Some(first) = rest[body_start..].chars().next() else {
            break;
        };
        let search_from = body_start + first.len_utf8();
        let Some(end) = rest[search_from..].find(FENCE) else {
            break;
        };
        let body_end = search_from + end;
        blocks.push(&rest[body_start..body_end]);
        rest = &rest[body_end + FENCE.len()..];
    }
    blocks
}

fn strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}

/// Search queries suggested by `reply`.
///
/// The first fenced json block may hold an array of strings, or an object
/// whose first entry is such an array. Anything else yields no queries.
pub fn parse_queries(reply: &str) -> Vec<String> {
    let Some(block) = extract_json_blocks(reply).into_iter().next() else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(block) {
        Ok(Value::Array(values)) => strings(&values),
        Ok(Value::Object(map)) => match map.into_iter().next() {
            Some((_, Value::Array(values))) => strings(&values),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_block() {
        let reply = "Sure!\n```json\n[\"red fox\", \"fox drawing\"]\n```\nEnjoy.";
        assert_eq!(parse_queries(reply), vec!["red fox", "fox drawing"]);
    }

    #[test]
    fn object_block_uses_first_key() {
        let reply = "```json\n{\"zeta\": [\"first\"], \"alpha\": [\"second\"]}\n```";
        assert_eq!(parse_queries(reply), vec!["first"]);
    }

    #[test]
    fn missing_block_gives_nothing() {
        assert!(parse_queries("[\"not fenced\"]").is_empty());
        assert!(parse_queries("```\n[\"plain fence\"]\n```").is_empty());
        assert!(parse_queries("").is_empty());
    }

    #[test]
    fn malformed_block_gives_nothing() {
        assert!(parse_queries("```json\n[\"open\", \n```").is_empty());
        assert!(parse_queries("```json\n{\"k\": \"v\"}\n```").is_empty());
        assert!(parse_queries("```json [\"unterminated\"]").is_empty());
    }

    #[test]
    fn non_string_entries_are_skipped() {
        assert_eq!(parse_queries("```json\n[\"a\", 3, null, \"b\"]\n```"), vec!["a", "b"]);
    }

    #[test]
    fn extracts_every_block() {
        let reply = "```json[1]``` and ```json\n[2]\n```";
        assert_eq!(extract_json_blocks(reply), vec!["[1]", "\n[2]\n"]);
    }

    #[test]
    fn default_prompt_reply_shape_parses() {
        let start = DEFAULT_PROMPT.find(JSON_FENCE).unwrap();
        assert_eq!(parse_queries(&DEFAULT_PROMPT[start..]).len(), 6);
    }
}
