use crate::types::FileStatistics;
use once_cell::sync::Lazy;
use regex::Regex;

static XML_LEAF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<[A-Za-z_][^<>]*>[^<]*</[A-Za-z_][^<>]*>$").expect("XML leaf regex should compile")
});

const COMMENT_PREFIXES: &[&str] = &["#", ";", "//", "<!--"];

fn is_comment(trimmed: &str) -> bool {
    COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

fn is_section(trimmed: &str) -> bool {
    trimmed.len() > 2
        && trimmed.starts_with('[')
        && trimmed.ends_with(']')
        && !trimmed[1..trimmed.len() - 1].contains(['[', ']', '"', ',', '{', '}'])
}

fn is_config_item(trimmed: &str) -> bool {
    trimmed.contains('=') || trimmed.contains(':') || XML_LEAF.is_match(trimmed)
}

/// Leading whitespace width, a tab counting as four columns
fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Line, character and structure counts for `text`
pub fn file_statistics(text: &str) -> FileStatistics {
    let mut stats = FileStatistics {
        char_count: text.chars().count(),
        size_bytes: text.len(),
        ..FileStatistics::default()
    };

    // Open indentation levels, innermost last
    let mut indents: Vec<usize> = Vec::new();

    for line in text.lines() {
        stats.total_lines += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty_lines += 1;
        if is_comment(trimmed) {
            stats.comment_lines += 1;
            continue;
        }
        if is_section(trimmed) {
            stats.sections += 1;
        } else if is_config_item(trimmed) {
            stats.config_items += 1;
        }

        let width = indent_width(line);
        while indents.last().is_some_and(|&open| open >= width) {
            indents.pop();
        }
        indents.push(width);
        stats.max_depth = stats.max_depth.max(indents.len());
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_yaml() {
        let text = "# header\namf:\n  name: amf01\n  sbi:\n    port: 8080\n\nsmf: {}\n";
        assert_eq!(
            file_statistics(text),
            FileStatistics {
                total_lines: 7,
                non_empty_lines: 6,
                comment_lines: 1,
                char_count: text.chars().count(),
                size_bytes: text.len(),
                config_items: 5,
                sections: 0,
                max_depth: 3,
            }
        );
    }

    #[test]
    fn counts_ini_sections_and_xml_leaves() {
        let ini = file_statistics("[amf]\nname = amf01\n; note\n[smf]\n");
        assert_eq!((ini.sections, ini.config_items, ini.comment_lines), (2, 1, 1));

        let xml = file_statistics("<amf>\n  <name>amf01</name>\n  <port>80</port>\n</amf>\n");
        assert_eq!(xml.config_items, 2);
        assert_eq!(xml.max_depth, 2);
    }

    #[test]
    fn empty_text() {
        assert_eq!(file_statistics(""), FileStatistics::default());
    }
}
