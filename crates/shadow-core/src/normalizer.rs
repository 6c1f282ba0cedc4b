//! Canonical normalizer — one deterministic form per shadow declaration
//!
//! Two declarations that differ only in operation order (or in the order
//! annotations were attached) normalize to the same canonical text and
//! therefore the same fingerprint.
//!
//! # Pipeline
//!
//! `ShadowDeclaration → normalize_declaration → serialize_canonical → SHA-256`

use sha2::{Digest, Sha256};

use crate::model::{ShadowDeclaration, ShadowOperation};

/// Sort operations by name, then by ordered parameter types, then return type.
///
/// Annotation sets are already ordered.
pub fn normalize_declaration(mut declaration: ShadowDeclaration) -> ShadowDeclaration {
    declaration.operations.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    declaration
}

fn sort_key(op: &ShadowOperation) -> (&str, Vec<&str>, &str) {
    (
        op.signature.name.as_str(),
        op.signature.parameter_types().map(|t| t.as_str()).collect(),
        op.signature.returns.as_str(),
    )
}

/// Canonical text form: one line per operation.
///
/// ```text
/// target System.IConvertible
/// op ToBoolean(System.IFormatProvider) -> System.Boolean [pure, reads(owned)]
/// ```
///
/// Parameter names are omitted; they never affect matching.
pub fn serialize_canonical(declaration: &ShadowDeclaration) -> String {
    let normalized = normalize_declaration(declaration.clone());
    let mut out = String::new();
    out.push_str("target ");
    out.push_str(&normalized.target.to_string());
    out.push('\n');
    for op in &normalized.operations {
        out.push_str("op ");
        out.push_str(&op.signature.key());
        out.push_str(" -> ");
        out.push_str(op.signature.returns.as_str());
        out.push_str(" [");
        let annotations: Vec<String> = op.annotations.iter().map(|a| a.to_string()).collect();
        out.push_str(&annotations.join(", "));
        out.push_str("]\n");
    }
    out
}

// ── SHA-256 Fingerprint ───────────────────────────────────

/// Compute the SHA-256 fingerprint of a declaration's canonical form
pub fn fingerprint(declaration: &ShadowDeclaration) -> String {
    let canonical = serialize_canonical(declaration);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
