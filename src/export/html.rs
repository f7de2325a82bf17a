use crate::models::{DailyNotes, LinkItem, SavedNote, Task};

/// Escapes the markup-significant characters before free text is embedded
/// in generated HTML.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

/// A standalone HTML document for a single note.
pub fn note_document(note: &SavedNote) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p><em>Last modified: {}</em></p>\n<pre>{}</pre>\n",
        escape(&note.name),
        note.last_modified.format("%Y-%m-%d %H:%M UTC"),
        escape(&note.content)
    );
    document(&note.name, &body)
}

/// A standalone HTML document embedding every collection under its own
/// heading.
pub fn project_document(
    notes: &[SavedNote],
    daily_notes: &DailyNotes,
    tasks: &[Task],
    links: &[LinkItem],
) -> String {
    let mut body = String::new();
    body.push_str("<h1>Oreganote Project</h1>\n");

    body.push_str("<h2>Notes</h2>\n");
    if notes.is_empty() {
        body.push_str("<p>No saved notes.</p>\n");
    }
    for note in notes {
        body.push_str(&format!(
            "<h3>{}</h3>\n<pre>{}</pre>\n",
            escape(&note.name),
            escape(&note.content)
        ));
    }

    body.push_str("<h2>Daily Notes</h2>\n<ul>\n");
    for (date, text) in daily_notes {
        body.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>\n",
            date,
            escape(text)
        ));
    }
    body.push_str("</ul>\n");

    body.push_str("<h2>Tasks</h2>\n<ul>\n");
    for task in tasks {
        let mark = if task.completed { "[x]" } else { "[ ]" };
        body.push_str(&format!("<li>{} {}</li>\n", mark, escape(&task.text)));
    }
    body.push_str("</ul>\n");

    body.push_str("<h2>Links</h2>\n<ul>\n");
    for link in links {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape(&link.url),
            escape(&link.name)
        ));
    }
    body.push_str("</ul>\n");

    document("Oreganote Project", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"a & b < c > d "e""#),
            "a &amp; b &lt; c &gt; d &quot;e&quot;"
        );
    }

    #[test]
    fn note_document_escapes_content() {
        let note = SavedNote::new(
            "Ideas <draft>".to_string(),
            "use <b> & \"quotes\"".to_string(),
        );
        let html = note_document(&note);
        assert!(html.contains("<h1>Ideas &lt;draft&gt;</h1>"));
        assert!(html.contains("use &lt;b&gt; &amp; &quot;quotes&quot;"));
        assert!(!html.contains("use <b>"));
    }

    #[test]
    fn project_document_lists_all_collections() {
        let notes = vec![SavedNote::new("A".to_string(), "body".to_string())];
        let mut daily = DailyNotes::new();
        daily.insert(
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
            "dentist".to_string(),
        );
        let tasks = vec![Task::new("Buy milk".to_string())];
        let links = vec![LinkItem::new(
            "Example".to_string(),
            "https://example.com".to_string(),
        )];

        let html = project_document(&notes, &daily, &tasks, &links);
        assert!(html.contains("<h3>A</h3>"));
        assert!(html.contains("2024-05-01"));
        assert!(html.contains("[ ] Buy milk"));
        assert!(html.contains("href=\"https://example.com\""));
    }
}
