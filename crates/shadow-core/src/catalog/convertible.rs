//! `System.IConvertible` — value conversions to the primitive runtime types
//!
//! Every operation converts the receiver's own value, so the whole surface is
//! annotated from the conversion template.

use crate::model::{OperationSignature, Parameter, RealType, ShadowDeclaration, TypeIdentity};
use crate::surface::{AnnotationTemplate, ShadowBuilder};
use crate::Result;

const FORMAT_PROVIDER: &str = "System.IFormatProvider";

/// `ToX(IFormatProvider)` conversions and their return types, in interface order.
const CONVERSIONS: &[(&str, &str)] = &[
    ("ToBoolean", "System.Boolean"),
    ("ToByte", "System.Byte"),
    ("ToChar", "System.Char"),
    ("ToDateTime", "System.DateTime"),
    ("ToDecimal", "System.Decimal"),
    ("ToDouble", "System.Double"),
    ("ToInt16", "System.Int16"),
    ("ToInt32", "System.Int32"),
    ("ToInt64", "System.Int64"),
    ("ToSByte", "System.SByte"),
    ("ToSingle", "System.Single"),
    ("ToString", "System.String"),
];

const UNSIGNED_CONVERSIONS: &[(&str, &str)] = &[
    ("ToUInt16", "System.UInt16"),
    ("ToUInt32", "System.UInt32"),
    ("ToUInt64", "System.UInt64"),
];

pub fn identity() -> TypeIdentity {
    TypeIdentity::new("System", "IConvertible")
}

/// The real interface surface as the runtime defines it.
pub fn real_type() -> RealType {
    let provider = || vec![Parameter::new("provider", FORMAT_PROVIDER)];

    let mut operations = vec![OperationSignature::new("GetTypeCode", vec![], "System.TypeCode")];
    operations.extend(
        CONVERSIONS
            .iter()
            .map(|(name, ret)| OperationSignature::new(*name, provider(), *ret)),
    );
    operations.push(OperationSignature::new(
        "ToType",
        vec![
            Parameter::new("conversionType", "System.Type"),
            Parameter::new("provider", FORMAT_PROVIDER),
        ],
        "System.Object",
    ));
    operations.extend(
        UNSIGNED_CONVERSIONS
            .iter()
            .map(|(name, ret)| OperationSignature::new(*name, provider(), *ret)),
    );

    RealType::new(identity(), operations)
}

pub fn shadow() -> Result<ShadowDeclaration> {
    let mut builder = ShadowBuilder::mirror(&real_type());
    builder.annotate_all(&AnnotationTemplate::conversion());
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::model::{Annotation, ReadScope};

    #[test]
    fn test_surface_has_all_seventeen_operations() {
        let real = real_type();
        assert_eq!(real.operations.len(), 17);
        assert!(real.has_operation("GetTypeCode"));
        assert!(real.has_operation("ToType"));
        assert!(!real.has_operation("ToFoo"));
    }

    #[test]
    fn test_every_operation_is_pure_and_reads_owned() {
        let real = real_type();
        let view = merge(&shadow().unwrap(), &real).view;
        for op in &view.operations {
            assert_eq!(op.annotations.len(), 2, "{}", op.signature);
            assert!(op.annotations.contains(&Annotation::Pure));
            assert!(op.annotations.contains(&Annotation::reads(ReadScope::Owned)));
        }
    }

    #[test]
    fn test_to_type_takes_two_parameters() {
        let real = real_type();
        let to_type = real.overloads("ToType").next().unwrap();
        assert_eq!(to_type.key(), "ToType(System.Type,System.IFormatProvider)");
    }
}
