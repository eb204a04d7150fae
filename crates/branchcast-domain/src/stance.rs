//! Stance module - editorial direction of a batch

use std::fmt;

/// Editorial direction applied uniformly to every variant in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    /// Supportive of the article's main subject
    Support,

    /// Critical of the article's main subject
    Oppose,
}

impl Stance {
    /// Wire name used by the HTTP API and the archive
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Support => "PRO",
            Stance::Oppose => "ANTI",
        }
    }

    /// Parse a stance from its wire name.
    ///
    /// Accepts `PRO`/`ANTI` and the long forms `SUPPORT`/`OPPOSE`, in any case.
    ///
    /// # Examples
    ///
    /// ```
    /// use branchcast_domain::Stance;
    ///
    /// assert_eq!(Stance::parse("pro"), Some(Stance::Support));
    /// assert_eq!(Stance::parse("OPPOSE"), Some(Stance::Oppose));
    /// assert_eq!(Stance::parse("neutral"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PRO" | "SUPPORT" => Some(Stance::Support),
            "ANTI" | "OPPOSE" => Some(Stance::Oppose),
            _ => None,
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
