use std::fmt;

/// Occurrence counts for `<h1>` through `<h6>`
///
/// All six levels are always present and default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingCounts([u32; 6]);

impl HeadingCounts {
    pub fn new(counts: [u32; 6]) -> Self {
        Self(counts)
    }

    /// Count for a heading level in `1..=6`; other levels are always zero
    pub fn get(&self, level: u8) -> u32 {
        match level {
            1..=6 => self.0[usize::from(level - 1)],
            _ => 0,
        }
    }

    pub fn set(&mut self, level: u8, count: u32) {
        if let 1..=6 = level {
            self.0[usize::from(level - 1)] = count;
        }
    }

    /// Iterates `(level, count)` pairs in level order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1u8..=6).zip(self.0.iter().copied())
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> [u32; 6] {
        self.0
    }
}

impl fmt::Display for HeadingCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(level, count)| format!("h{}={}", level, count))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Structured output of one successful page analysis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageAnalysis {
    pub html_version: String,
    /// Trimmed text of the first `<title>`, empty when absent
    pub page_title: String,
    pub heading_counts: HeadingCounts,
    pub internal_link_count: u32,
    pub external_link_count: u32,
    /// Absolute URLs of broken links, in document order
    pub broken_links: Vec<String>,
    pub login_form_detected: bool,
}

impl PageAnalysis {
    pub fn total_links(&self) -> u32 {
        self.internal_link_count + self.external_link_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_counts_default_to_zero() {
        let counts = HeadingCounts::default();
        for level in 1..=6 {
            assert_eq!(counts.get(level), 0);
        }
        assert_eq!(counts.iter().count(), 6);
    }

    #[test]
    fn test_heading_counts_set_and_get() {
        let mut counts = HeadingCounts::default();
        counts.set(1, 2);
        counts.set(6, 5);
        counts.set(7, 9);

        assert_eq!(counts.get(1), 2);
        assert_eq!(counts.get(6), 5);
        assert_eq!(counts.get(0), 0);
        assert_eq!(counts.get(7), 0);
        assert_eq!(counts.total(), 7);
    }

    #[test]
    fn test_heading_counts_display() {
        let counts = HeadingCounts::new([1, 0, 3, 0, 0, 0]);
        assert_eq!(counts.to_string(), "h1=1 h2=0 h3=3 h4=0 h5=0 h6=0");
    }

    #[test]
    fn test_total_links() {
        let analysis = PageAnalysis {
            internal_link_count: 4,
            external_link_count: 3,
            ..Default::default()
        };
        assert_eq!(analysis.total_links(), 7);
    }
}
