/// Frame `text` in a rounded box, one `String` per output line.
#[must_use]
pub fn render_banner(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let lines = if lines.is_empty() { vec![""] } else { lines };
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rule = "─".repeat(width + 2);

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("╭{rule}╮"));
    for line in lines {
        let pad = width - line.chars().count();
        out.push(format!("│ {line}{} │", " ".repeat(pad)));
    }
    out.push(format!("╰{rule}╯"));
    out
}
