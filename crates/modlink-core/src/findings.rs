//! Structured diagnostics.
//!
//! Every anomaly met while resolving modules becomes a [`Finding`] with a
//! stable code. Codes are SCREAMING_SNAKE_CASE and stable across versions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message keys for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCode {
    /// Import declaration without a target namespace.
    MissingNamespaceUri,
    /// Import namespace is not a valid URI.
    InvalidNamespaceUri,
    /// Included module reports a different namespace than its includer.
    NamespaceMismatchOnInclude,
    /// Imported module reports a different namespace than the import.
    NamespaceMismatchOnImport,
    /// A namespace-less module was reached through an import.
    IllegalChameleonImport,
    /// No location could be found for an imported namespace.
    UnresolvedLibraryNamespace,
    /// An include path could not be turned into a location.
    UnresolvedInclude,
    /// A checksum is required but absent.
    MissingCrc,
    /// The declared checksum does not match the content.
    InvalidCrc,
    /// The loader could not parse the module content.
    ModuleParseError,
    /// A module with the same namespace and name is already in the model.
    DuplicateModule,
    /// Include/import nesting exceeded the configured depth.
    DepthLimitReached,
    UnknownExceptionDuringModuleLoad,
    UnknownExceptionDuringTransformation,
    UnknownExceptionDuringValidation,
}

impl FindingCode {
    /// All codes, in declaration order.
    pub const ALL: [FindingCode; 15] = [
        Self::MissingNamespaceUri,
        Self::InvalidNamespaceUri,
        Self::NamespaceMismatchOnInclude,
        Self::NamespaceMismatchOnImport,
        Self::IllegalChameleonImport,
        Self::UnresolvedLibraryNamespace,
        Self::UnresolvedInclude,
        Self::MissingCrc,
        Self::InvalidCrc,
        Self::ModuleParseError,
        Self::DuplicateModule,
        Self::DepthLimitReached,
        Self::UnknownExceptionDuringModuleLoad,
        Self::UnknownExceptionDuringTransformation,
        Self::UnknownExceptionDuringValidation,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingNamespaceUri => "MISSING_NAMESPACE_URI",
            Self::InvalidNamespaceUri => "INVALID_NAMESPACE_URI",
            Self::NamespaceMismatchOnInclude => "NAMESPACE_MISMATCH_ON_INCLUDE",
            Self::NamespaceMismatchOnImport => "NAMESPACE_MISMATCH_ON_IMPORT",
            Self::IllegalChameleonImport => "ILLEGAL_CHAMELEON_IMPORT",
            Self::UnresolvedLibraryNamespace => "UNRESOLVED_LIBRARY_NAMESPACE",
            Self::UnresolvedInclude => "UNRESOLVED_INCLUDE",
            Self::MissingCrc => "MISSING_CRC",
            Self::InvalidCrc => "INVALID_CRC",
            Self::ModuleParseError => "MODULE_PARSE_ERROR",
            Self::DuplicateModule => "DUPLICATE_MODULE",
            Self::DepthLimitReached => "DEPTH_LIMIT_REACHED",
            Self::UnknownExceptionDuringModuleLoad => "UNKNOWN_EXCEPTION_DURING_MODULE_LOAD",
            Self::UnknownExceptionDuringTransformation => {
                "UNKNOWN_EXCEPTION_DURING_TRANSFORMATION"
            }
            Self::UnknownExceptionDuringValidation => "UNKNOWN_EXCEPTION_DURING_VALIDATION",
        }
    }

    /// Severity a finding with this code carries.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnresolvedLibraryNamespace | Self::DuplicateModule => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Human-readable template; `{0}`, `{1}`, ... are replaced by params.
    #[must_use]
    pub fn template(&self) -> &'static str {
        match self {
            Self::MissingNamespaceUri => "Import with prefix '{0}' does not declare a namespace",
            Self::InvalidNamespaceUri => "Import namespace '{0}' is not a valid URI: {1}",
            Self::NamespaceMismatchOnInclude => {
                "Included module was expected in namespace '{0}' but declares '{1}'"
            }
            Self::NamespaceMismatchOnImport => {
                "Imported module was expected in namespace '{0}' but declares '{1}'"
            }
            Self::IllegalChameleonImport => {
                "Module without a namespace cannot be imported as '{0}'; include it instead"
            }
            Self::UnresolvedLibraryNamespace => "No module could be located for namespace '{0}'",
            Self::UnresolvedInclude => "Include '{0}' could not be located",
            Self::MissingCrc => "Library '{0}' requires a checksum but declares none",
            Self::InvalidCrc => "Library '{0}' declares checksum {1} but its content hashes to {2}",
            Self::ModuleParseError => "Module could not be parsed: {0}",
            Self::DuplicateModule => {
                "Module '{1}' in namespace '{0}' from {2} duplicates the one loaded from {3}"
            }
            Self::DepthLimitReached => "Depth limit {0} reached",
            Self::UnknownExceptionDuringModuleLoad => "Unexpected failure loading module: {0}",
            Self::UnknownExceptionDuringTransformation => {
                "Unexpected failure assembling the model: {0}"
            }
            Self::UnknownExceptionDuringValidation => {
                "Unexpected failure validating the model: {0}"
            }
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Error or warning.
    pub severity: Severity,
    /// What the finding is about (a location or a module identity).
    pub subject: String,
    /// Stable message key.
    pub code: FindingCode,
    /// Message parameters, in template order.
    pub params: Vec<String>,
}

impl Finding {
    /// Create a finding with the code's default severity.
    pub fn new(code: FindingCode, subject: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            subject: subject.into(),
            code,
            params: Vec::new(),
        }
    }

    /// Append a message parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Override the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render the message template with this finding's params.
    #[must_use]
    pub fn message(&self) -> String {
        let mut message = self.code.template().to_string();
        for (i, param) in self.params.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), param);
        }
        message
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} ({})",
            self.severity,
            self.code,
            self.message(),
            self.subject
        )
    }
}

/// An ordered collection of findings.
///
/// Pushing a finding that is already present is a no-op, so repeated
/// passes never grow the collection with copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Findings {
    findings: Vec<Finding>,
}

impl Findings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finding unless an identical one is already present.
    pub fn push(&mut self, finding: Finding) {
        if !self.findings.contains(&finding) {
            self.findings.push(finding);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Findings carrying `code`.
    pub fn with_code(&self, code: FindingCode) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.code == code)
    }

    /// Number of findings carrying `code`.
    #[must_use]
    pub fn count(&self, code: FindingCode) -> usize {
        self.with_code(code).count()
    }

    /// Sort by severity (errors first), then code, then subject.
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| a.subject.cmp(&b.subject))
                .then_with(|| a.params.cmp(&b.params))
        });
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Finding> {
        self.findings
    }
}

impl Extend<Finding> for Findings {
    fn extend<T: IntoIterator<Item = Finding>>(&mut self, iter: T) {
        for finding in iter {
            self.push(finding);
        }
    }
}

impl FromIterator<Finding> for Findings {
    fn from_iter<T: IntoIterator<Item = Finding>>(iter: T) -> Self {
        let mut findings = Self::new();
        findings.extend(iter);
        findings
    }
}

impl IntoIterator for Findings {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

impl<'a> IntoIterator for &'a Findings {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}
