//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source pane: the script being edited or run, with
//! line numbers and highlighting for keywords, word operators, literals,
//! strings and comments.
//!
//! # Rendering
//!
//! Highlighting works line by line with a small character scanner rather than
//! the real lexer, so half-typed or invalid code still renders. Block comments
//! carry over from one line to the next.

use crate::parser::lexer::{Keyword, Operator, OPERATORS};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Highlight one line. `in_comment` is true when the line starts inside a
/// block comment and is updated for the next line.
pub fn highlight_line(line: &str, in_comment: &mut bool) -> Line<'static> {
    let mut spans = Vec::new();
    let chars: Vec<char> = line.chars().collect();
    let comment_style = Style::default().fg(DEFAULT_THEME.comment);
    let mut i = 0;

    while i < chars.len() {
        if *in_comment {
            let start = i;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                i += 1;
            }
            if i < chars.len() {
                i += 2;
                *in_comment = false;
            }
            spans.push(Span::styled(collect(&chars[start..i]), comment_style));
            continue;
        }

        let c = chars[i];

        // Line comment runs to the end of the line
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            spans.push(Span::styled(collect(&chars[i..]), comment_style));
            break;
        }

        if c == '/' && chars.get(i + 1) == Some(&'*') {
            *in_comment = true;
            spans.push(Span::styled("/*".to_string(), comment_style));
            i += 2;
            continue;
        }

        if c == '"' || c == '\'' {
            let start = i;
            i += 1;
            while i < chars.len() && chars[i] != c {
                i += if chars[i] == '\\' { 2 } else { 1 };
            }
            i = (i + 1).min(chars.len());
            spans.push(Span::styled(
                collect(&chars[start..i]),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            spans.push(Span::styled(
                collect(&chars[start..i]),
                Style::default().fg(DEFAULT_THEME.number),
            ));
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word = collect(&chars[start..i]);
            let style = word_style(&word);
            spans.push(Span::styled(word, style));
            continue;
        }

        let style = match c {
            '{' | '}' | '(' | ')' => Style::default().fg(DEFAULT_THEME.primary), // Brackets
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
        i += 1;
    }

    Line::from(spans)
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

fn word_style(word: &str) -> Style {
    if let Some(keyword) = Keyword::from_word(word) {
        let color = if keyword.is_skeleton() {
            DEFAULT_THEME.skeleton
        } else {
            DEFAULT_THEME.keyword
        };
        return Style::default().fg(color).add_modifier(Modifier::BOLD);
    }

    match OPERATORS.iter().find(|(lexeme, _)| *lexeme == word) {
        Some((_, Operator::True | Operator::False | Operator::Null)) => {
            Style::default().fg(DEFAULT_THEME.literal)
        }
        Some(_) => Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::ITALIC), // ca / va / na
        None => Style::default().fg(DEFAULT_THEME.fg), // Identifiers
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    source_code: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    if total_lines > visible_height {
        *scroll_offset = (*scroll_offset).min(total_lines - visible_height);
    } else {
        *scroll_offset = 0;
    }

    // Comment state has to be tracked from the top, including hidden lines.
    let mut in_comment = false;
    let highlighted: Vec<Line> = lines
        .iter()
        .map(|line| highlight_line(line, &mut in_comment))
        .collect();

    let visible_lines: Vec<Line> = highlighted
        .into_iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, content)| {
            let mut spans = vec![Span::styled(
                format!("{:4} ", idx + 1),
                Style::default().fg(DEFAULT_THEME.comment), // Line numbers
            )];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_keywords_and_literals_are_separate_spans() {
        let mut in_comment = false;
        let line = highlight_line("ghoshit_kar x = satya;", &mut in_comment);
        assert_eq!(texts(&line), vec!["ghoshit_kar", " ", "x", " ", "=", " ", "satya", ";"]);
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(line.spans[6].style.fg, Some(DEFAULT_THEME.literal));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let mut in_comment = false;
        highlight_line("a = 1; /* start", &mut in_comment);
        assert!(in_comment);
        let line = highlight_line("still comment */ b", &mut in_comment);
        assert!(!in_comment);
        assert_eq!(line.spans[0].content, "still comment */");
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.comment));
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let mut in_comment = false;
        let line = highlight_line(r#"prakashit_kar("a\"b")"#, &mut in_comment);
        assert_eq!(texts(&line), vec!["prakashit_kar", "(", r#""a\"b""#, ")"]);
    }
}
