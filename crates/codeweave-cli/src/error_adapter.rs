//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the CLI's error type and miette's
//! rich diagnostic formatting. Scenario syntax errors carry the scenario text
//! and the offending span, so miette can point at the exact location.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use codeweave::CodeweaveError;

use crate::CliError;

/// Adapter rendering any [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) => "codeweave::io",
            CliError::Config(_) => "codeweave::config",
            CliError::ScenarioSyntax { .. } | CliError::Scenario(_) => "codeweave::scenario",
            CliError::Codeweave(err) => match err {
                CodeweaveError::NotFound { .. } => "codeweave::not_found",
                CodeweaveError::InvalidRelationship { .. } => "codeweave::invalid_relationship",
                CodeweaveError::CrossLayoutGroup { .. } => "codeweave::cross_layout_group",
                CodeweaveError::Cancelled => "codeweave::cancelled",
                CodeweaveError::Discovery(_) => "codeweave::discovery",
                CodeweaveError::Graph(_) => "codeweave::graph",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Codeweave(CodeweaveError::InvalidRelationship { .. }) => {
                "check the stereotypes of both entities in the scenario"
            }
            CliError::Scenario(_) => "every relationship and the expansion seed must name a declared entity",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::ScenarioSyntax { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let CliError::ScenarioSyntax {
            span: Some(span), ..
        } = self.0
        else {
            return None;
        };
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &CliError) -> String {
        ErrorAdapter(err)
            .code()
            .map(|code| code.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_codes_follow_error_kind() {
        assert_eq!(code_of(&CliError::Config("bad".into())), "codeweave::config");
        assert_eq!(
            code_of(&CliError::Codeweave(CodeweaveError::Cancelled)),
            "codeweave::cancelled"
        );
        assert_eq!(
            code_of(&CliError::Codeweave(CodeweaveError::Discovery("down".into()))),
            "codeweave::discovery"
        );
    }

    #[test]
    fn test_syntax_errors_point_into_the_source() {
        let err = CliError::ScenarioSyntax {
            message: "expected `=`".into(),
            src: "[[entity]\nkey".into(),
            span: Some(10..13),
        };
        let adapter = ErrorAdapter(&err);

        assert!(adapter.source_code().is_some());
        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 10);
        assert_eq!(labels[0].len(), 3);
    }

    #[test]
    fn test_plain_errors_have_no_labels() {
        let err = CliError::Scenario("unknown entity `X`".into());
        assert!(ErrorAdapter(&err).labels().is_none());
        assert!(ErrorAdapter(&err).help().is_some());
    }
}
