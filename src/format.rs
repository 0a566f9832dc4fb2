//! Terminal formatting for assistant replies.
//!
//! Not a markdown parser: handles the patterns that show up most in model
//! output (headings, fenced code, `**bold**`, `` `code` ``) and leaves
//! everything else untouched.

use colored::Colorize;

/// Render assistant text for the terminal.
pub fn render_markdown_lite(text: &str) -> String {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if let Some(lang) = line.trim_start().strip_prefix("```") {
            in_code_block = !in_code_block;
            if in_code_block && !lang.trim().is_empty() {
                lines.push(format!("  {}", lang.trim().dimmed()));
            }
            continue;
        }

        if in_code_block {
            lines.push(format!("  {}", line.cyan()));
        } else if let Some(heading) = heading_text(line) {
            lines.push(heading.bold().underline().to_string());
        } else {
            lines.push(render_inline(line));
        }
    }

    lines.join("\n")
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    (1..=6).contains(&level).then(|| rest.strip_prefix(' ')).flatten()
}

/// Style `**bold**` and `` `code` `` spans within one line. Unclosed
/// markers are printed as-is.
fn render_inline(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                out.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                out.push_str(&after[..end].yellow().to_string());
                rest = &after[end + 1..];
                continue;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

/// First `max_lines` lines of `text`, with a count of what was hidden.
pub fn preview_lines(text: &str, max_lines: usize) -> String {
    let total = text.lines().count();
    let mut preview = text.lines().take(max_lines).collect::<Vec<_>>().join("\n");
    if total > max_lines {
        preview.push_str(&format!("\n... ({} more lines)", total - max_lines));
    }
    preview
}
