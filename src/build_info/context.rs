//! Build identity shared by every step of a build-info collection

use tracing::Span;

/// Identity of the build being recorded, plus the span its steps log under.
///
/// Passed by reference into the cache locator, graph resolver and
/// orchestrator instead of relying on an ambient logger.
#[derive(Debug, Clone)]
pub struct BuildContext {
    name: Option<String>,
    number: Option<String>,
    project: Option<String>,
    span: Span,
}

impl BuildContext {
    /// Create a context; blank values are treated as not provided
    pub fn new(name: Option<String>, number: Option<String>, project: Option<String>) -> Self {
        let name = name.filter(|s| !s.trim().is_empty());
        let number = number.filter(|s| !s.trim().is_empty());
        let project = project.filter(|s| !s.trim().is_empty());

        let span = tracing::info_span!(
            "build",
            name = name.as_deref().unwrap_or(""),
            number = number.as_deref().unwrap_or("")
        );

        Self {
            name,
            number,
            project,
            span,
        }
    }

    /// Context without a build identity (collection is skipped)
    pub fn anonymous() -> Self {
        Self::new(None, None, None)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Span that build-info steps log under
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Both build name and build number are set
    pub fn name_and_number_provided(&self) -> bool {
        self.name.is_some() && self.number.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provided_requires_both() {
        let ctx = BuildContext::new(Some("app".to_string()), Some("7".to_string()), None);
        assert!(ctx.name_and_number_provided());

        let ctx = BuildContext::new(Some("app".to_string()), None, None);
        assert!(!ctx.name_and_number_provided());

        assert!(!BuildContext::anonymous().name_and_number_provided());
    }

    #[test]
    fn blank_values_are_not_provided() {
        let ctx = BuildContext::new(Some("app".to_string()), Some("  ".to_string()), Some(String::new()));
        assert!(!ctx.name_and_number_provided());
        assert_eq!(ctx.number(), None);
        assert_eq!(ctx.project(), None);
    }
}
