//! Shadow declaration surface — authoring annotated mirrors of real types
//!
//! A [`ShadowBuilder`] starts from the real type's own operation list, so the
//! structure is mirrored rather than retyped by hand. Annotations are then
//! attached by operation name, one kind per call, or in bulk from an
//! [`AnnotationTemplate`].
//!
//! # Example
//!
//! ```ignore
//! let mut builder = ShadowBuilder::mirror(&real);
//! builder.annotate_all(&AnnotationTemplate::conversion());
//! let declaration = builder.build()?;
//! ```

use std::collections::BTreeMap;

use crate::model::{
    Annotation, AnnotationSet, OperationSignature, ReadScope, RealType, ShadowDeclaration,
    ShadowOperation,
};
use crate::validator::{validate, Discrepancy, ValidationReport};
use crate::Result;

/// A reusable bundle of annotations applied to many operations at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTemplate {
    annotations: AnnotationSet,
}

impl AnnotationTemplate {
    pub fn new(annotations: impl IntoIterator<Item = Annotation>) -> Self {
        Self {
            annotations: annotations.into_iter().collect(),
        }
    }

    /// Value conversions on an immutable receiver: pure, reading only owned state.
    pub fn conversion() -> Self {
        Self::new([Annotation::Pure, Annotation::reads(ReadScope::Owned)])
    }

    /// Side-effect-free accessors. Same markers as conversions.
    pub fn accessor() -> Self {
        Self::conversion()
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }
}

/// Builds a shadow declaration by mirroring a real type
#[derive(Debug, Clone)]
pub struct ShadowBuilder {
    real: RealType,
    declaration: ShadowDeclaration,
    /// Annotations requested for names the real type does not have
    dangling: BTreeMap<String, AnnotationSet>,
}

impl ShadowBuilder {
    /// Mirror every public operation of `real` with an empty annotation set.
    pub fn mirror(real: &RealType) -> Self {
        let mut declaration = ShadowDeclaration::new(real.identity.clone());
        declaration.operations = real
            .operations
            .iter()
            .cloned()
            .map(ShadowOperation::new)
            .collect();
        Self {
            real: real.clone(),
            declaration,
            dangling: BTreeMap::new(),
        }
    }

    /// Attach one annotation to every overload named `name`.
    pub fn annotate(&mut self, name: &str, annotation: Annotation) -> &mut Self {
        let mut hit = false;
        for op in self
            .declaration
            .operations
            .iter_mut()
            .filter(|op| op.signature.name == name)
        {
            op.annotations.insert(annotation);
            hit = true;
        }
        if !hit {
            self.dangling
                .entry(name.to_string())
                .or_default()
                .insert(annotation);
        }
        self
    }

    /// Attach one annotation to the single overload matching `signature`.
    ///
    /// A signature with no structural twin is kept as written so validation
    /// can report how it differs.
    pub fn annotate_overload(&mut self, signature: &OperationSignature, annotation: Annotation) -> &mut Self {
        match self
            .declaration
            .operations
            .iter_mut()
            .find(|op| op.signature.same_shape(signature))
        {
            Some(op) => {
                op.annotations.insert(annotation);
            }
            None => {
                let mut op = ShadowOperation::new(signature.clone());
                op.annotations.insert(annotation);
                self.declaration.operations.push(op);
            }
        }
        self
    }

    /// Apply a template to every mirrored operation.
    pub fn annotate_all(&mut self, template: &AnnotationTemplate) -> &mut Self {
        for op in &mut self.declaration.operations {
            op.annotations.extend(template.annotations());
        }
        self
    }

    /// Apply a template to every operation whose name starts with `prefix`.
    pub fn annotate_prefixed(&mut self, prefix: &str, template: &AnnotationTemplate) -> &mut Self {
        for op in self
            .declaration
            .operations
            .iter_mut()
            .filter(|op| op.signature.name.starts_with(prefix))
        {
            op.annotations.extend(template.annotations());
        }
        self
    }

    /// Validate and return the declaration together with its report.
    ///
    /// Dangling names are left out of the declaration and reported as
    /// `NotOnRealType`.
    pub fn finish(self) -> (ShadowDeclaration, ValidationReport) {
        let mut report = validate(&self.declaration, &self.real);
        for name in self.dangling.keys() {
            report.add_mismatch(name.clone(), Discrepancy::NotOnRealType);
        }
        (self.declaration, report)
    }

    /// Like [`finish`](Self::finish) but fails on the first signature mismatch.
    pub fn build(self) -> Result<ShadowDeclaration> {
        let (declaration, report) = self.finish();
        report.into_result()?;
        Ok(declaration)
    }
}
