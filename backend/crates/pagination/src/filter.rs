//! Case-insensitive substring filter for list views.

/// Characters that act as wildcards in backend pattern matches.
const WILDCARDS: [char; 2] = ['*', '%'];

/// Normalised, non-empty search term.
///
/// The term is trimmed and stripped of wildcard characters so it always
/// matches literally. A blank term means "no filter".
///
/// # Examples
/// ```
/// use pagination::SearchFilter;
///
/// let filter = SearchFilter::parse(Some("  ac*me ")).expect("non-blank term");
/// assert_eq!(filter.as_str(), "acme");
/// assert!(filter.matches("ACME Corp"));
/// assert!(SearchFilter::parse(Some("   ")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    term: String,
    folded: String,
}

impl SearchFilter {
    /// Parse an optional raw search term, returning `None` when blank.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let term: String = raw?
            .trim()
            .chars()
            .filter(|ch| !WILDCARDS.contains(ch))
            .collect();
        if term.is_empty() {
            return None;
        }
        let folded = term.to_lowercase();
        Some(Self { term, folded })
    }

    /// The sanitised term as supplied by the caller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.term.as_str()
    }

    /// Whether `candidate` contains the term, ignoring case.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.to_lowercase().contains(&self.folded)
    }
}
