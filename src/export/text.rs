use crate::models::{DailyNotes, LinkItem, SavedNote, Task};

fn section(out: &mut String, name: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("### {name} ###\n"));
}

/// Section-delimited plain-text dump of all four collections.
pub fn project_dump(
    notes: &[SavedNote],
    daily_notes: &DailyNotes,
    tasks: &[Task],
    links: &[LinkItem],
) -> String {
    let mut out = String::new();

    section(&mut out, "NOTES");
    for note in notes {
        out.push_str(&format!("-- {} --\n{}\n", note.name, note.content));
    }

    section(&mut out, "DAILY NOTES");
    for (date, text) in daily_notes {
        out.push_str(&format!("{date}: {text}\n"));
    }

    section(&mut out, "TASKS");
    for task in tasks {
        let mark = if task.completed { "[x]" } else { "[ ]" };
        out.push_str(&format!("{mark} {}\n", task.text));
    }

    section(&mut out, "LINKS");
    for link in links {
        out.push_str(&format!("{} -> {}\n", link.name, link.url));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_contains_every_section() {
        let dump = project_dump(&[], &DailyNotes::new(), &[], &[]);
        for header in [
            "### NOTES ###",
            "### DAILY NOTES ###",
            "### TASKS ###",
            "### LINKS ###",
        ] {
            assert!(dump.contains(header), "missing {header}");
        }
    }

    #[test]
    fn dump_renders_entries() {
        let notes = vec![SavedNote::new("A".to_string(), "body".to_string())];
        let mut daily = DailyNotes::new();
        daily.insert(
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
            "dentist".to_string(),
        );
        let mut task = Task::new("Buy milk".to_string());
        task.completed = true;
        let links = vec![LinkItem::new(
            "Example".to_string(),
            "https://example.com".to_string(),
        )];

        let dump = project_dump(&notes, &daily, &[task], &links);
        assert!(dump.contains("-- A --\nbody"));
        assert!(dump.contains("2024-05-01: dentist"));
        assert!(dump.contains("[x] Buy milk"));
        assert!(dump.contains("Example -> https://example.com"));
    }
}
