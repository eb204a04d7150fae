//! Plain article text extracted from a source page

/// Non-empty, whitespace-normalized article text.
///
/// Construction fails for text that is empty after trimming, so holding an
/// `ArticleText` means there is something to generate from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText(String);

impl ArticleText {
    /// Wrap extracted text, or `None` if it is blank
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == text.len() {
            Some(Self(text))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The full text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Prefix of at most `max_chars` characters, cut on a char boundary
    ///
    /// # Examples
    ///
    /// ```
    /// use branchcast_domain::ArticleText;
    ///
    /// let text = ArticleText::new("héllo world").unwrap();
    /// assert_eq!(text.prefix(5), "héllo");
    /// assert_eq!(text.prefix(100), "héllo world");
    /// ```
    pub fn prefix(&self, max_chars: usize) -> &str {
        match self.0.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}
