//! Cosmetic markdown touch-ups applied to completion text before display.
//!
//! Every formatter here is idempotent: running it on its own output
//! changes nothing. Spans that already carry the markup a rule would add
//! are left alone, which is what keeps a second pass stable.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref HEADING_REGEX: Regex = Regex::new(r"(?m)^(#{1,3})[ \t]*(.+)$").unwrap();
    static ref NUMBERED_SECTION_REGEX: Regex =
        Regex::new(r"(?m)^(\d+\.)[ \t]*\*\*(.+?)\*\*").unwrap();
    static ref SECTION_NUMBER_REGEX: Regex = Regex::new(r"^\d+\.[ \t]").unwrap();
    static ref NUMBER_PREFIX_REGEX: Regex = Regex::new(r"^\d+\.[ \t]*$").unwrap();
    static ref SCORE_REGEX: Regex =
        Regex::new(r"(?i)\w+[ \t]+score:?[ \t]*\d+(?:\.\d+)?(?:/\d+)?").unwrap();
    static ref COMPLEXITY_REGEX: Regex =
        Regex::new(r"(?i)complexity:?[ \t]*(?:low|medium|high)\b").unwrap();
    static ref RISK_LEVEL_REGEX: Regex = Regex::new(r"\b(?:LOW|MEDIUM|HIGH|CRITICAL)\b").unwrap();
    static ref EXTRA_BLANK_LINES_REGEX: Regex = Regex::new(r"\n\n\n+").unwrap();
}

/// Which set of rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStyle {
    /// Headings and numbered sections only.
    Sections,
    /// Sections plus highlighted metrics and risk levels.
    Analysis,
}

pub fn format_test_cases(raw_output: &str) -> String {
    format_output(raw_output, FormatStyle::Sections, "No test cases generated.")
}

pub fn format_complexity_analysis(raw_output: &str) -> String {
    format_output(
        raw_output,
        FormatStyle::Analysis,
        "No analysis results generated.",
    )
}

pub fn format_optimization(raw_output: &str) -> String {
    format_output(
        raw_output,
        FormatStyle::Analysis,
        "No optimization recommendations generated.",
    )
}

pub fn format_documentation(raw_output: &str) -> String {
    format_output(raw_output, FormatStyle::Sections, "No documentation generated.")
}

pub fn format_migration_analysis(raw_output: &str) -> String {
    format_output(
        raw_output,
        FormatStyle::Analysis,
        "No migration analysis generated.",
    )
}

/// Wrap text in a fenced code block.
pub fn highlight_code_sections(code: &str, language: &str) -> String {
    format!("```{}\n{}\n```", language, code)
}

/// Apply the rules for `style` until the text stops changing.
///
/// One rule can expose input for another (bolding a risk word can close an
/// unterminated `N. **` section), so a single pass is not a fixed point.
pub fn format_output(raw_output: &str, style: FormatStyle, empty_message: &str) -> String {
    if raw_output.is_empty() {
        return empty_message.to_string();
    }

    let mut formatted = format_pass(raw_output, style);
    for _ in 0..MAX_PASSES {
        let next = format_pass(&formatted, style);
        if next == formatted {
            break;
        }
        formatted = next;
    }
    formatted
}

const MAX_PASSES: usize = 16;

fn format_pass(text: &str, style: FormatStyle) -> String {
    let mut formatted = bold_headings(text);
    formatted = NUMBERED_SECTION_REGEX
        .replace_all(&formatted, "### $1 $2")
        .to_string();

    if style == FormatStyle::Analysis {
        formatted = wrap_unless_marked(&formatted, &SCORE_REGEX, "`");
        formatted = wrap_unless_marked(&formatted, &COMPLEXITY_REGEX, "`");
        formatted = bold_risk_levels(&formatted);
    }

    EXTRA_BLANK_LINES_REGEX
        .replace_all(&formatted, "\n\n")
        .to_string()
}

// `### 1. Title` is the output of the numbered-section rule, keep it.
fn bold_headings(text: &str) -> String {
    HEADING_REGEX
        .replace_all(text, |caps: &Captures| {
            let level = &caps[1];
            let title = &caps[2];
            if level.len() == 3 && SECTION_NUMBER_REGEX.is_match(title) {
                caps[0].to_string()
            } else {
                format!("**{}**", title)
            }
        })
        .to_string()
}

fn wrap_unless_marked(text: &str, regex: &Regex, marker: &str) -> String {
    regex
        .replace_all(text, |caps: &Captures| {
            let found = caps.get(0).expect("group 0 is always present");
            if is_marked(text, found.start(), found.end()) {
                found.as_str().to_string()
            } else {
                format!("{marker}{}{marker}", found.as_str())
            }
        })
        .to_string()
}

fn bold_risk_levels(text: &str) -> String {
    RISK_LEVEL_REGEX
        .replace_all(text, |caps: &Captures| {
            let found = caps.get(0).expect("group 0 is always present");
            let line_start = text[..found.start()].rfind('\n').map_or(0, |i| i + 1);
            let line_prefix = &text[line_start..found.start()];

            let skip = is_marked(text, found.start(), found.end())
                || text[line_start..].starts_with('#')
                || NUMBER_PREFIX_REGEX.is_match(line_prefix);

            if skip {
                found.as_str().to_string()
            } else {
                format!("**{}**", found.as_str())
            }
        })
        .to_string()
}

/// True when the span touches existing emphasis or code markup.
fn is_marked(text: &str, start: usize, end: usize) -> bool {
    let is_markup = |c: char| c == '*' || c == '`';
    let before = text[..start].chars().next_back().is_some_and(is_markup);
    let after = text[end..].chars().next().is_some_and(is_markup);
    before || after
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};

    const SAMPLE_ANALYSIS: &str = "# Complexity Report

## Summary
Cyclomatic complexity: High for the main loop.



1. **Complexity Metrics**
   - Maintainability score: 6/10
   - Overall risk is HIGH, with one CRITICAL path
1. HIGH priority items first
### 2. Already a section
#### Deep heading
- Quality score 7.5 (MEDIUM)
";

    #[test]
    fn test_empty_output_uses_placeholder() {
        assert_eq!("No test cases generated.", format_test_cases(""));
        assert_eq!("No analysis results generated.", format_complexity_analysis(""));
        assert_eq!("No documentation generated.", format_documentation(""));
        assert_eq!("No optimization recommendations generated.", format_optimization(""));
        assert_eq!("No migration analysis generated.", format_migration_analysis(""));
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!("OK", format_test_cases("OK"));
        assert_eq!("OK", format_complexity_analysis("OK"));
    }

    #[test]
    fn test_headings_become_bold() {
        let formatted = format_test_cases("# Title\n## Sub title\n###Third\ntext");
        assert_eq!("**Title**\n**Sub title**\n**Third**\ntext", formatted);
    }

    #[test]
    fn test_numbered_sections_become_headings() {
        let formatted =
            format_test_cases("1. **Test Case Overview** - summary\n2.**Input Data Sets**");
        assert_eq!(
            "### 1. Test Case Overview - summary\n### 2. Input Data Sets",
            formatted
        );
    }

    #[test]
    fn test_blank_lines_collapse_to_one() {
        assert_eq!("a\n\nb", format_test_cases("a\n\n\nb"));
        assert_eq!("a\n\nb", format_test_cases("a\n\n\n\n\n\nb"));
        assert_eq!("a\n\nb", format_test_cases("a\n\nb"));
        assert_eq!("a\nb", format_test_cases("a\nb"));
    }

    #[test]
    fn test_metrics_and_risk_levels_are_highlighted() {
        let formatted = format_complexity_analysis(
            "Maintainability score: 6/10\nCyclomatic complexity: high\nRisk: HIGH",
        );
        assert_eq!(
            "`Maintainability score: 6/10`\nCyclomatic `complexity: high`\nRisk: **HIGH**",
            formatted
        );
    }

    #[test]
    fn test_sections_style_leaves_metrics_alone() {
        let text = "Maintainability score: 6/10\nRisk: HIGH";
        assert_eq!(text, format_documentation(text));
    }

    #[test]
    fn test_sample_analysis_output() {
        let expected = "**Complexity Report**

**Summary**
Cyclomatic `complexity: High` for the main loop.

### 1. Complexity Metrics
   - `Maintainability score: 6/10`
   - Overall risk is **HIGH**, with one **CRITICAL** path
1. HIGH priority items first
### 2. Already a section
**# Deep heading**
- `Quality score 7.5` (**MEDIUM**)
";
        assert_eq!(expected, format_complexity_analysis(SAMPLE_ANALYSIS));
    }

    const FORMATTERS: [fn(&str) -> String; 5] = [
        format_test_cases,
        format_complexity_analysis,
        format_optimization,
        format_documentation,
        format_migration_analysis,
    ];

    fn is_stable(input: &str) -> bool {
        FORMATTERS.iter().all(|format| {
            let once = format(input);
            format(&once) == once
        })
    }

    #[test]
    fn test_formatters_are_idempotent() {
        let inputs = [
            SAMPLE_ANALYSIS,
            "OK",
            "1. HIGH risk\n## Risk HIGH level\n1. **HIGH**\n",
            "`Quality score: 8 points` and HIGH/LOW\n\n\n\n",
            "## 1. **Bold** title\n# HIGH Risk\ncomplexity: HIGH\n",
            "1.**complexity2. : HIGH",
            " LOW\n\n\n2. **\tLOW/10/10## x",
            "",
        ];

        for input in inputs {
            assert!(is_stable(input), "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_unclosed_section_bold_settles_in_one_call() {
        let once = format_complexity_analysis("1.**complexity2. : HIGH");
        assert_eq!("### 1. complexity2. : HIGH**", once);
    }

    /// Text assembled from the fragments the rules react to.
    #[derive(Debug, Clone)]
    struct MarkdownSoup(String);

    impl Arbitrary for MarkdownSoup {
        fn arbitrary(g: &mut Gen) -> Self {
            const TOKENS: &[&str] = &[
                "#", "## ", "### ", "1.", "2. ", "**", "*", "`", " ", "\t", "\n", "\n\n\n",
                "HIGH", "LOW", "MEDIUM", "CRITICAL", "complexity", "complexity: ", "low",
                "score", " score: ", "7", "/10", ".5", "x", "Risk", ":",
            ];
            let len = usize::arbitrary(g) % 24;
            let text = (0..len)
                .filter_map(|_| g.choose(TOKENS))
                .copied()
                .collect::<String>();
            MarkdownSoup(text)
        }
    }

    #[quickcheck_macros::quickcheck]
    fn test_markdown_soup_is_stable(input: MarkdownSoup) -> bool {
        is_stable(&input.0)
    }

    #[quickcheck_macros::quickcheck]
    fn test_arbitrary_text_is_stable(input: String) -> bool {
        is_stable(&input)
    }

    #[test]
    fn test_formatted_output_keeps_original_text() {
        let formatted = format_complexity_analysis("OK");
        assert!(formatted.contains("OK"));
    }

    #[test]
    fn test_highlight_code_sections() {
        assert_eq!(
            "```xml\n<process/>\n```",
            highlight_code_sections("<process/>", "xml")
        );
    }
}
