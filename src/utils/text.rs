const TAB_WIDTH: usize = 8;

/// Trim a triple-quoted style multi-line string.
///
/// Tabs are expanded, the common indentation of every line after the first
/// is removed, the first line is stripped, trailing whitespace goes from all
/// lines and leading/trailing blank lines are dropped.
pub fn trim_docstring(docstring: &str) -> String {
    if docstring.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = docstring.lines().map(expand_tabs).collect();

    // First line doesn't count towards the indentation
    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| line.chars().count() - line.trim_start().chars().count())
        .min();

    let mut trimmed: Vec<String> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        trimmed.push(first.trim().to_string());
    }
    if let Some(indent) = indent {
        for line in lines.iter().skip(1) {
            trimmed.push(skip_chars(line, indent).trim_end().to_string());
        }
    }

    while trimmed.last().is_some_and(|l| l.is_empty()) {
        trimmed.pop();
    }
    let leading_blank = trimmed.iter().take_while(|l| l.is_empty()).count();
    trimmed.drain(..leading_blank);

    trimmed.join("\n")
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}

/// Calculate the display width of a string, accounting for wide characters
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

fn char_width(c: char) -> usize {
    match c {
        '\u{1100}'..='\u{115F}'   // Hangul Jamo
        | '\u{2E80}'..='\u{303F}' // CJK radicals, symbols and punctuation
        | '\u{3040}'..='\u{33FF}' // Kana, Bopomofo, enclosed CJK, compatibility
        | '\u{3400}'..='\u{4DBF}' // CJK Extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
        | '\u{A000}'..='\u{A4CF}' // Yi
        | '\u{AC00}'..='\u{D7AF}' // Hangul Syllables
        | '\u{F900}'..='\u{FAFF}' // CJK Compatibility Ideographs
        | '\u{FE10}'..='\u{FE19}'
        | '\u{FE30}'..='\u{FE6F}'
        | '\u{FF00}'..='\u{FF60}' // Fullwidth forms
        | '\u{FFE0}'..='\u{FFE6}'
        | '\u{20000}'..='\u{2FFFD}' => 2,
        _ => 1,
    }
}

/// Wrap a string into lines with a given maximum display width, breaking at
/// spaces where possible.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if display_width(remaining) <= max_width {
            lines.push(remaining.to_string());
            break;
        }

        let mut width = 0;
        let mut hard_end = 0;
        let mut last_space = None;
        for (pos, ch) in remaining.char_indices() {
            let w = char_width(ch);
            if width + w > max_width {
                break;
            }
            if ch == ' ' {
                last_space = Some(pos);
            }
            width += w;
            hard_end = pos + ch.len_utf8();
        }

        match last_space {
            Some(pos) if pos > 0 => {
                lines.push(remaining[..pos].to_string());
                remaining = remaining[pos + 1..].trim_start();
            }
            _ => {
                // A single char wider than the limit still has to go somewhere
                let end = if hard_end == 0 {
                    remaining.chars().next().map_or(remaining.len(), char::len_utf8)
                } else {
                    hard_end
                };
                lines.push(remaining[..end].to_string());
                remaining = &remaining[end..];
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_docstring_removes_common_indent_and_blank_edges() {
        let doc = "
    asd
      dfe
    ";
        assert_eq!(trim_docstring(doc), "asd\n  dfe");
    }

    #[test]
    fn trim_docstring_keeps_first_line_text() {
        let doc = "  Summary line.\n\n    Details here.\n    More.\n";
        assert_eq!(trim_docstring(doc), "Summary line.\n\nDetails here.\nMore.");
    }

    #[test]
    fn trim_docstring_expands_tabs() {
        let doc = "x\n\tone\n\t  two";
        assert_eq!(trim_docstring(doc), "x\none\n  two");
    }

    #[test]
    fn trim_docstring_empty_and_blank() {
        assert_eq!(trim_docstring(""), "");
        assert_eq!(trim_docstring("   \n   \n"), "");
        assert_eq!(trim_docstring("single"), "single");
    }

    #[test]
    fn display_width_counts_wide_chars_twice() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("中文"), 4);
    }

    #[test]
    fn wrap_text_breaks_at_spaces() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn wrap_text_hard_breaks_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }
}
