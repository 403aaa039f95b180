/// URL slugs for recipes and categories.
///
/// Lowercases ASCII alphanumerics, collapses runs of whitespace and hyphens
/// into a single hyphen, and drops everything else. The result is stable for
/// a given input, so re-deriving after a title edit is deterministic.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
        // Other punctuation contributes nothing, not even a separator.
    }
    out
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_single_word() {
        assert_eq!(slugify("Bread"), "bread");
    }

    #[test]
    fn joins_words_with_hyphens() {
        assert_eq!(slugify("Chicken Tikka Masala"), "chicken-tikka-masala");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("Slow  Cooked -- Ribs"), "slow-cooked-ribs");
    }

    #[test]
    fn drops_punctuation_without_splitting() {
        assert_eq!(slugify("Paul's Bread!"), "pauls-bread");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  Rice  "), "rice");
        assert_eq!(slugify("-Rice-"), "rice");
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(slugify("5_minute Oats"), "5_minute-oats");
    }

    #[test]
    fn symbol_only_titles_produce_empty_slug() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }
}
