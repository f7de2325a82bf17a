//! Export Formatters
//!
//! Pure transforms from workspace state into downloadable text or markup.
//! Nothing here touches storage; callers decide where the output goes.

pub mod html;
pub mod text;

const FALLBACK_FILE_STEM: &str = "oreganote_export";

/// Derives a safe file stem from a title: non-alphanumeric characters become
/// underscores and the result is lower-cased. Titles that slugify to nothing
/// fall back to a generic name.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if slug.chars().all(|c| c == '_') {
        FALLBACK_FILE_STEM.to_string()
    } else {
        slug
    }
}

/// Suggested filename for an export of `title` with the given extension.
pub fn export_filename(title: &str, extension: &str) -> String {
    format!("{}.{}", slugify(title), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_mixed_titles() {
        assert_eq!(slugify("Grocery List"), "grocery_list");
        assert_eq!(slugify("Q3 Plan (draft)"), "q3_plan__draft_");
    }

    #[test]
    fn falls_back_when_slug_is_empty() {
        assert_eq!(slugify("!!!"), "oreganote_export");
        assert_eq!(slugify(""), "oreganote_export");
        assert_eq!(export_filename("???", "html"), "oreganote_export.html");
    }
}
