/// Candidate addresses extracted from a free-text blob.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmailList {
    /// Every non-empty trimmed token, in input order.
    pub all: Vec<String>,
    /// Tokens with exactly one `@`, in input order, first occurrence only.
    pub valid: Vec<String>,
}

impl EmailList {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Split on commas and line breaks, trim, drop empties.
///
/// Validation is deliberately loose: an address is accepted iff it contains
/// exactly one `@`. Malformed tokens stay in `all` and are left out of `valid`.
pub fn parse_emails(raw: &str) -> EmailList {
    let all: Vec<String> = raw
        .split(|c: char| matches!(c, ',' | '\n' | '\r'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut valid: Vec<String> = Vec::with_capacity(all.len());
    for email in &all {
        if is_plausible_email(email) && !valid.contains(email) {
            valid.push(email.clone());
        }
    }

    EmailList { all, valid }
}

fn is_plausible_email(candidate: &str) -> bool {
    candidate.matches('@').count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert_eq!(parse_emails(""), EmailList::default());
        assert_eq!(parse_emails("   "), EmailList::default());
        assert_eq!(parse_emails(" ,\n, \r\n "), EmailList::default());
    }

    #[test]
    fn mixed_input_keeps_order() {
        let list = parse_emails("a@b.com, bad, c@d.com");
        assert_eq!(list.all, vec!["a@b.com", "bad", "c@d.com"]);
        assert_eq!(list.valid, vec!["a@b.com", "c@d.com"]);
    }

    #[test]
    fn newlines_and_commas_are_both_delimiters() {
        let list = parse_emails("x@y.io\n  z@w.io,\r\nq@r.io  ");
        assert_eq!(list.all, vec!["x@y.io", "z@w.io", "q@r.io"]);
        assert_eq!(list.valid, list.all);
    }

    #[test]
    fn zero_or_many_at_signs_are_rejected() {
        let list = parse_emails("plain, two@@at.com, a@b@c, ok@fine.org, @");
        assert_eq!(list.all.len(), 5);
        assert_eq!(list.valid, vec!["ok@fine.org", "@"]);
    }

    #[test]
    fn duplicates_are_dropped_from_valid_subset() {
        let list = parse_emails("a@b.com\na@b.com, c@d.com, a@b.com");
        assert_eq!(list.all.len(), 4);
        assert_eq!(list.valid, vec!["a@b.com", "c@d.com"]);
    }

    #[test]
    fn valid_is_ordered_subset_of_all() {
        let inputs = [
            "one@x.com,two,three@y.com\nfour@@z",
            "\n\n,,a@a, b@b ,,\n c",
            "solo@only.net",
        ];
        for raw in inputs {
            let list = parse_emails(raw);
            let mut cursor = list.all.iter();
            for v in &list.valid {
                assert!(cursor.any(|a| a == v), "{v} out of order in {raw:?}");
            }
            assert!(list.all.iter().all(|a| !a.trim().is_empty() && a.trim() == a));
        }
    }
}
