/// Marks a page boundary in `pdf-extract` output.
const FORM_FEED: char = '\u{c}';

const PAGE_RULE: &str = "---";

/// Shapes raw extracted text into markdown: pages are separated by a
/// horizontal rule, hard-wrapped lines are joined into paragraphs, and runs
/// of blank lines collapse into one.
pub fn text_to_markdown(text: &str) -> String {
    let pages: Vec<String> = text
        .split(FORM_FEED)
        .map(paragraphs)
        .filter(|page| !page.is_empty())
        .collect();

    let mut markdown = pages.join(&format!("\n\n{}\n\n", PAGE_RULE));
    if !markdown.is_empty() {
        markdown.push('\n');
    }
    markdown
}

fn paragraphs(page: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in page.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(line);
        } else if let Some(stem) = current
            .strip_suffix('-')
            .filter(|s| s.ends_with(char::is_alphabetic))
        {
            // Hyphenated word broken across lines
            current = format!("{}{}", stem, line);
        } else {
            current.push(' ');
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks.join("\n\n")
}
