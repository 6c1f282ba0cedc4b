//! Data model — real types, shadow declarations, behavioral annotations
//!
//! A [`RealType`] is the externally owned surface the verifier reasons about.
//! A [`ShadowDeclaration`] mirrors that surface operation for operation and
//! carries an [`AnnotationSet`] on each operation. Nothing here executes
//! anything; these are descriptions consumed by the validator and the host.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

// ── Identities and type references ────────────────────────

/// Identity of a real type: namespace plus simple name.
///
/// Displayed and parsed as `Namespace.Name`. An empty namespace displays as
/// the bare name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeIdentity {
    pub namespace: String,
    pub name: String,
}

impl TypeIdentity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl FromStr for TypeIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.ends_with('.') {
            return Err(Error::Config(format!("invalid type identity '{}'", s)));
        }
        Ok(match s.rsplit_once('.') {
            Some((namespace, name)) => TypeIdentity::new(namespace, name),
            None => TypeIdentity::new("", s),
        })
    }
}

/// Fully qualified reference to a parameter or return type, e.g. `System.Boolean`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        TypeRef(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        TypeRef(s.to_string())
    }
}

// ── Operation signatures ──────────────────────────────────

/// A named, typed parameter. Only the type takes part in structural matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Public operation signature: name, ordered parameters, return type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationSignature {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub returns: TypeRef,
}

impl OperationSignature {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, returns: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            parameters,
            returns: returns.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.parameters.iter().map(|p| &p.ty)
    }

    /// Structural equality: name, ordered parameter types, return type.
    pub fn same_shape(&self, other: &OperationSignature) -> bool {
        self.name == other.name
            && self.returns == other.returns
            && self.arity() == other.arity()
            && self.parameter_types().eq(other.parameter_types())
    }

    /// Key used to address one overload, e.g. `ToType(System.Type,System.IFormatProvider)`.
    pub fn key(&self) -> String {
        let params: Vec<&str> = self.parameter_types().map(TypeRef::as_str).collect();
        format!("{}({})", self.name, params.join(","))
    }
}

impl fmt::Display for OperationSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", p.ty, p.name)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

/// An externally owned type with a fixed public operation set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealType {
    pub identity: TypeIdentity,
    pub operations: Vec<OperationSignature>,
}

impl RealType {
    pub fn new(identity: TypeIdentity, operations: Vec<OperationSignature>) -> Self {
        Self { identity, operations }
    }

    /// All overloads sharing `name`, in declaration order.
    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a OperationSignature> + 'a {
        self.operations.iter().filter(move |op| op.name == name)
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.overloads(name).next().is_some()
    }
}

// ── Behavioral annotations ────────────────────────────────

/// How much heap state an operation may read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadScope {
    /// Reads no heap state at all
    Nothing,
    /// Reads only state exclusively owned by the receiver
    Owned,
    /// Unrestricted reads
    Everything,
}

impl fmt::Display for ReadScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadScope::Nothing => write!(f, "nothing"),
            ReadScope::Owned => write!(f, "owned"),
            ReadScope::Everything => write!(f, "everything"),
        }
    }
}

/// A declarative assertion about an operation's effects.
///
/// Not enforced here; the analyzer checks or relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// No observable mutation of pre-existing state
    Pure,
    /// Reads bounded by the given scope
    Reads { scope: ReadScope },
}

impl Annotation {
    pub fn reads(scope: ReadScope) -> Self {
        Annotation::Reads { scope }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Annotation::Pure => write!(f, "pure"),
            Annotation::Reads { scope } => write!(f, "reads({})", scope),
        }
    }
}

/// Unordered, duplicate-free set of annotations on one operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet(BTreeSet<Annotation>);

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the annotation was already present.
    pub fn insert(&mut self, annotation: Annotation) -> bool {
        self.0.insert(annotation)
    }

    pub fn extend(&mut self, other: &AnnotationSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn contains(&self, annotation: &Annotation) -> bool {
        self.0.contains(annotation)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    pub fn is_pure(&self) -> bool {
        self.0.contains(&Annotation::Pure)
    }

    /// Every distinct read scope declared on the operation.
    pub fn read_scopes(&self) -> Vec<ReadScope> {
        self.0
            .iter()
            .filter_map(|a| match a {
                Annotation::Reads { scope } => Some(*scope),
                Annotation::Pure => None,
            })
            .collect()
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        AnnotationSet(iter.into_iter().collect())
    }
}

// ── Shadow declarations ───────────────────────────────────

/// A body-less mirror of one real operation plus its annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowOperation {
    #[serde(flatten)]
    pub signature: OperationSignature,
    #[serde(default)]
    pub annotations: AnnotationSet,
}

impl ShadowOperation {
    pub fn new(signature: OperationSignature) -> Self {
        Self {
            signature,
            annotations: AnnotationSet::new(),
        }
    }
}

/// Shadow declaration keyed by the identity of the real type it mirrors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowDeclaration {
    pub target: TypeIdentity,
    pub operations: Vec<ShadowOperation>,
}

impl ShadowDeclaration {
    pub fn new(target: TypeIdentity) -> Self {
        Self {
            target,
            operations: Vec::new(),
        }
    }

    pub fn operations_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ShadowOperation> + 'a {
        self.operations.iter().filter(move |op| op.signature.name == name)
    }
}
