//! Column layout for the item list.
//! Widths are measured on visible characters so ANSI color codes never
//! push a column out of line.

use crate::search::Span;

/// Render rows under a header. Every row must already be painted; widths
/// come from the widest visible cell per column.
pub fn render_columns(headers: &[String], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let mut widths: Vec<usize> = headers.iter().map(|h| display_len(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_len(cell));
        }
    }

    let header = join_row(headers, &widths);
    let mut out = vec![header.clone(), "-".repeat(display_len(&header))];
    out.extend(rows.iter().map(|row| join_row(row, &widths)));
    out.join("\n")
}

fn join_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (cell, width))| {
            if idx == last {
                cell.clone()
            } else {
                pad_to(cell, *width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn pad_to(cell: &str, width: usize) -> String {
    let mut out = cell.to_string();
    out.push_str(&" ".repeat(width.saturating_sub(display_len(cell))));
    out
}

/// Keep at most `max` visible characters across spans, ending with an
/// ellipsis when anything was cut.
pub fn fit_spans(spans: &[Span], max: usize) -> Vec<Span> {
    let total: usize = spans.iter().map(|s| s.text().chars().count()).sum();
    if total <= max {
        return spans.to_vec();
    }
    if max == 0 {
        return Vec::new();
    }
    let mut budget = max - 1;
    let mut out = Vec::new();
    for span in spans {
        if budget == 0 {
            break;
        }
        let text: String = span.text().chars().take(budget).collect();
        budget -= text.chars().count();
        out.push(match span {
            Span::Plain(_) => Span::Plain(text),
            Span::Match(_) => Span::Match(text),
        });
    }
    out.push(Span::Plain("…".to_string()));
    out
}

/// Visible length of a string, ignoring ANSI escape sequences.
pub fn display_len(s: &str) -> usize {
    let mut len = 0;
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        len += 1;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_len_ignores_ansi() {
        assert_eq!(display_len("\x1b[1;31mred\x1b[0m"), 3);
        assert_eq!(display_len("ä…"), 2);
    }

    #[test]
    fn test_columns_align() {
        let headers = vec!["#".to_string(), "Content".to_string()];
        let rows = vec![
            vec!["0".to_string(), "a".to_string()],
            vec!["10".to_string(), "bb".to_string()],
        ];
        let out = render_columns(&headers, &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "#   Content");
        assert_eq!(lines[1], "-----------");
        assert_eq!(lines[2], "0   a");
        assert_eq!(lines[3], "10  bb");
    }

    #[test]
    fn test_fit_spans_truncates_across_runs() {
        let spans = vec![
            Span::Plain("abc".to_string()),
            Span::Match("def".to_string()),
        ];
        assert_eq!(fit_spans(&spans, 6), spans);
        assert_eq!(
            fit_spans(&spans, 5),
            vec![
                Span::Plain("abc".to_string()),
                Span::Match("d".to_string()),
                Span::Plain("…".to_string()),
            ]
        );
        assert!(fit_spans(&spans, 0).is_empty());
    }
}
