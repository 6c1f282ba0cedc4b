//! Structural validator — checks a shadow declaration against its real type
//!
//! A shadow declaration is only useful if every one of its operations lines up
//! with an operation on the real type. Anything else is a dangling annotation
//! that would silently fail to attach.
//!
//! # Checks
//!
//! 1. **Target** — the declaration names the real type's identity
//! 2. **Dangling** — every shadow operation exists on the real type by name
//! 3. **Shape** — arity, ordered parameter types and return type agree
//! 4. **Coverage** — every real operation has exactly one mirror
//! 5. **Annotations** — at most one read scope per operation (warning)
//!
//! Like the rest of the crate the validator accumulates every diagnostic
//! instead of stopping at the first one.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::model::{OperationSignature, RealType, ShadowDeclaration, TypeIdentity, TypeRef};
use crate::{Error, Result};

// ── Diagnostics ───────────────────────────────────────────

/// How a shadow operation differs from the real type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    /// Declaration is keyed to a different type
    TargetDiffers {
        expected: TypeIdentity,
        found: TypeIdentity,
    },
    /// No operation of that name exists on the real type
    NotOnRealType,
    /// Same name, different parameter count
    ArityDiffers { expected: usize, found: usize },
    /// Same name and arity, a parameter type differs
    ParameterType {
        index: usize,
        expected: TypeRef,
        found: TypeRef,
    },
    /// Same parameters, return type differs
    ReturnType { expected: TypeRef, found: TypeRef },
    /// A real operation has no mirror in the declaration
    MissingFromShadow,
    /// The same structural operation is declared more than once
    Duplicate,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Discrepancy::TargetDiffers { expected, found } => {
                write!(f, "declaration targets {}, expected {}", found, expected)
            }
            Discrepancy::NotOnRealType => write!(f, "no operation of that name on the real type"),
            Discrepancy::ArityDiffers { expected, found } => {
                write!(f, "expected {} parameter(s), found {}", expected, found)
            }
            Discrepancy::ParameterType {
                index,
                expected,
                found,
            } => write!(
                f,
                "parameter {} has type {}, expected {}",
                index, found, expected
            ),
            Discrepancy::ReturnType { expected, found } => {
                write!(f, "returns {}, expected {}", found, expected)
            }
            Discrepancy::MissingFromShadow => write!(f, "real operation has no shadow mirror"),
            Discrepancy::Duplicate => write!(f, "operation declared more than once"),
        }
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Category of validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", content = "detail", rename_all = "snake_case")]
pub enum DiagnosticKind {
    SignatureMismatch(Discrepancy),
    AnnotationConflict,
}

/// A single validation diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Operation key as declared, e.g. `ToInt32(System.IFormatProvider)`
    pub operation: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} [{}]: {}", prefix, self.operation, self.message)
    }
}

/// Result of validating one declaration — accumulates all diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub target: TypeIdentity,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(target: TypeIdentity) -> Self {
        Self {
            target,
            diagnostics: Vec::new(),
        }
    }

    /// Returns true if no errors were found (warnings are OK)
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    /// Every signature mismatch as an `Error::SignatureMismatch`.
    pub fn mismatches(&self) -> Vec<Error> {
        self.diagnostics
            .iter()
            .filter_map(|d| match &d.kind {
                DiagnosticKind::SignatureMismatch(discrepancy) => Some(Error::SignatureMismatch {
                    target: self.target.clone(),
                    operation: d.operation.clone(),
                    discrepancy: discrepancy.clone(),
                }),
                DiagnosticKind::AnnotationConflict => None,
            })
            .collect()
    }

    /// Operation keys that carry at least one error.
    pub fn rejected_operations(&self) -> BTreeSet<&str> {
        self.errors().into_iter().map(|d| d.operation.as_str()).collect()
    }

    /// Fails with the first signature mismatch, if any.
    pub fn into_result(self) -> Result<()> {
        match self.mismatches().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub(crate) fn add_mismatch(&mut self, operation: String, discrepancy: Discrepancy) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message: discrepancy.to_string(),
            operation,
            kind: DiagnosticKind::SignatureMismatch(discrepancy),
        });
    }

    fn add_warning(&mut self, operation: String, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            operation,
            kind,
            message,
        });
    }
}

// ── Public API ────────────────────────────────────────────

/// Validate a shadow declaration against the real type it claims to mirror.
///
/// Does not stop at the first mismatch — reports everything found.
pub fn validate(declaration: &ShadowDeclaration, real: &RealType) -> ValidationReport {
    let mut report = ValidationReport::new(real.identity.clone());

    if declaration.target != real.identity {
        report.add_mismatch(
            declaration.target.to_string(),
            Discrepancy::TargetDiffers {
                expected: real.identity.clone(),
                found: declaration.target.clone(),
            },
        );
        return report;
    }

    let mut covered = vec![false; real.operations.len()];
    let mut seen = BTreeSet::new();

    for op in &declaration.operations {
        let key = op.signature.key();
        if !seen.insert((key.clone(), op.signature.returns.clone())) {
            report.add_mismatch(key, Discrepancy::Duplicate);
            continue;
        }

        match real
            .operations
            .iter()
            .position(|candidate| candidate.same_shape(&op.signature))
        {
            Some(index) => covered[index] = true,
            None => report.add_mismatch(key.clone(), describe_mismatch(&op.signature, real)),
        }

        let scopes = op.annotations.read_scopes();
        if scopes.len() > 1 {
            let listed: Vec<String> = scopes.iter().map(|s| s.to_string()).collect();
            report.add_warning(
                key,
                DiagnosticKind::AnnotationConflict,
                format!("multiple read scopes declared: {}", listed.join(", ")),
            );
        }
    }

    for (index, op) in real.operations.iter().enumerate() {
        if !covered[index] {
            report.add_mismatch(op.key(), Discrepancy::MissingFromShadow);
        }
    }

    report
}

/// Explain why `shadow` has no exact counterpart on `real`.
///
/// Prefers an overload with the same arity so the reported difference is the
/// narrowest one.
fn describe_mismatch(shadow: &OperationSignature, real: &RealType) -> Discrepancy {
    let candidates: Vec<&OperationSignature> = real.overloads(&shadow.name).collect();
    let Some(first) = candidates.first() else {
        return Discrepancy::NotOnRealType;
    };

    let Some(same_arity) = candidates.iter().find(|c| c.arity() == shadow.arity()) else {
        return Discrepancy::ArityDiffers {
            expected: first.arity(),
            found: shadow.arity(),
        };
    };

    let differing = same_arity
        .parameter_types()
        .zip(shadow.parameter_types())
        .enumerate()
        .find(|(_, (expected, found))| expected != found);

    match differing {
        Some((index, (expected, found))) => Discrepancy::ParameterType {
            index,
            expected: expected.clone(),
            found: found.clone(),
        },
        None => Discrepancy::ReturnType {
            expected: same_arity.returns.clone(),
            found: shadow.returns.clone(),
        },
    }
}
