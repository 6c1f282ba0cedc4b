//! Annotation merge — folds a shadow declaration onto its real type
//!
//! The real type's operation list is never altered: the merged view has one
//! entry per real operation, in the real type's order, each carrying the
//! annotations of its structural twin (or none).

use serde::Serialize;

use crate::model::{AnnotationSet, OperationSignature, RealType, ShadowDeclaration, TypeIdentity};
use crate::validator::{validate, ValidationReport};

/// One real operation together with the contracts attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedOperation {
    pub signature: OperationSignature,
    pub annotations: AnnotationSet,
}

/// The analyzer's view of a real type after merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractView {
    pub identity: TypeIdentity,
    pub operations: Vec<AttachedOperation>,
}

impl ContractView {
    /// A view with no contracts; used when no shadow declaration exists.
    pub fn unannotated(real: &RealType) -> Self {
        Self {
            identity: real.identity.clone(),
            operations: real
                .operations
                .iter()
                .map(|signature| AttachedOperation {
                    signature: signature.clone(),
                    annotations: AnnotationSet::new(),
                })
                .collect(),
        }
    }

    /// Annotations on the first overload named `name`.
    pub fn annotations(&self, name: &str) -> Option<&AnnotationSet> {
        self.operations
            .iter()
            .find(|op| op.signature.name == name)
            .map(|op| &op.annotations)
    }

    /// Annotations on the overload structurally equal to `signature`.
    pub fn annotations_for(&self, signature: &OperationSignature) -> Option<&AnnotationSet> {
        self.operations
            .iter()
            .find(|op| op.signature.same_shape(signature))
            .map(|op| &op.annotations)
    }

    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AttachedOperation> + 'a {
        self.operations.iter().filter(move |op| op.signature.name == name)
    }

    /// True when at least one operation carries an annotation.
    pub fn is_annotated(&self) -> bool {
        self.operations.iter().any(|op| !op.annotations.is_empty())
    }
}

/// Merged view plus the validation report explaining anything left out
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub view: ContractView,
    pub report: ValidationReport,
}

/// Attach the annotations of every structurally matching operation.
///
/// Mismatched shadow operations are reported and their annotations dropped.
/// A declaration keyed to another type attaches nothing.
pub fn merge(declaration: &ShadowDeclaration, real: &RealType) -> MergeOutcome {
    let report = validate(declaration, real);
    let mut view = ContractView::unannotated(real);

    if declaration.target == real.identity {
        let rejected = report.rejected_operations();
        for attached in &mut view.operations {
            let twin = declaration.operations.iter().find(|op| {
                op.signature.same_shape(&attached.signature)
                    && !rejected.contains(op.signature.key().as_str())
            });
            if let Some(op) = twin {
                attached.annotations.extend(&op.annotations);
            }
        }
    }

    MergeOutcome { view, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Annotation, Parameter, ReadScope, ShadowOperation};

    fn provider() -> Vec<Parameter> {
        vec![Parameter::new("provider", "System.IFormatProvider")]
    }

    fn real() -> RealType {
        RealType::new(
            TypeIdentity::new("System", "IConvertible"),
            vec![
                OperationSignature::new("ToBoolean", provider(), "System.Boolean"),
                OperationSignature::new("ToInt32", provider(), "System.Int32"),
                OperationSignature::new("ToString", provider(), "System.String"),
            ],
        )
    }

    fn annotated(sig: OperationSignature) -> ShadowOperation {
        let mut op = ShadowOperation::new(sig);
        op.annotations.insert(Annotation::Pure);
        op.annotations.insert(Annotation::reads(ReadScope::Owned));
        op
    }

    fn full_declaration(real: &RealType) -> ShadowDeclaration {
        ShadowDeclaration {
            target: real.identity.clone(),
            operations: real.operations.iter().cloned().map(annotated).collect(),
        }
    }

    #[test]
    fn test_merge_attaches_two_markers_per_conversion() {
        let real = real();
        let outcome = merge(&full_declaration(&real), &real);
        assert!(outcome.report.is_valid());
        for name in ["ToBoolean", "ToInt32", "ToString"] {
            let set = outcome.view.annotations(name).unwrap();
            assert_eq!(set.len(), 2, "{}", name);
            assert!(set.is_pure());
            assert!(set.contains(&Annotation::reads(ReadScope::Owned)));
        }
    }

    #[test]
    fn test_merge_drops_dangling_operation() {
        let real = real();
        let mut decl = full_declaration(&real);
        decl.operations.push(annotated(OperationSignature::new(
            "ToFoo",
            provider(),
            "System.Object",
        )));
        let outcome = merge(&decl, &real);
        assert!(!outcome.report.is_valid());
        assert!(outcome.view.annotations("ToFoo").is_none());
        assert_eq!(outcome.view.operations.len(), real.operations.len());
        assert_eq!(outcome.view.annotations("ToInt32").unwrap().len(), 2);
    }

    #[test]
    fn test_merge_leaves_unmatched_real_operation_bare() {
        let real = real();
        let mut decl = full_declaration(&real);
        decl.operations[1].signature.returns = "System.Int64".into();
        let outcome = merge(&decl, &real);
        assert!(outcome.view.annotations("ToInt32").unwrap().is_empty());
        assert_eq!(outcome.view.annotations("ToBoolean").unwrap().len(), 2);
    }

    #[test]
    fn test_merge_wrong_target_attaches_nothing() {
        let real = real();
        let mut decl = full_declaration(&real);
        decl.target = TypeIdentity::new("System", "IComparable");
        let outcome = merge(&decl, &real);
        assert!(!outcome.view.is_annotated());
        assert_eq!(outcome.view, ContractView::unannotated(&real));
    }

    #[test]
    fn test_annotations_for_exact_overload() {
        let real = real();
        let outcome = merge(&full_declaration(&real), &real);
        let sig = OperationSignature::new(
            "ToString",
            vec![Parameter::new("p", "System.IFormatProvider")],
            "System.String",
        );
        assert_eq!(outcome.view.annotations_for(&sig).unwrap().len(), 2);
        let other = OperationSignature::new("ToString", vec![], "System.String");
        assert!(outcome.view.annotations_for(&other).is_none());
    }
}
