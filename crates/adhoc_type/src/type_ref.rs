//! Structural descriptions of declared slot types.
//!
//! `TypeRef` preserves the full structure of a type annotation the way the
//! declaring side wrote it: generic applications, array ranks, and nullable
//! wrappings all stay visible. Slot-name derivation and display rendering
//! are pure functions of this tree.

use std::fmt;
use std::fmt::Write as _;

use crate::Primitive;

/// Nullability class of a declared slot type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Nullability {
    /// The payload can never be null.
    NonNull,
    /// A nullable value type (`int?`).
    NullableValue,
    /// A nullable reference type (`string?`).
    NullableRef,
}

/// A declared slot type, preserving full structure.
///
/// Application order matters for derivation: `List<int>[]` is an array whose
/// element is a generic, `List<int[]>` is a generic whose argument is an
/// array. Both derive the slot name `ListOfInt32Array`, the collision that
/// forces an explicit name override at the shape layer.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRef {
    /// A host primitive: `int`, `bool`, `string`, ...
    Primitive(Primitive),

    /// A named type with optional generic arguments: `Guid`, `List<int>`.
    Named {
        /// The type name without arguments.
        name: String,
        /// Generic type arguments, empty if non-generic.
        args: Vec<TypeRef>,
        /// Whether the named type has value semantics (a struct).
        value_type: bool,
    },

    /// An array of the element type with the given rank (≥ 1).
    Array {
        /// Element type.
        elem: Box<TypeRef>,
        /// Number of dimensions.
        rank: u32,
    },

    /// A nullable wrapping: `T?`.
    Nullable(Box<TypeRef>),
}

impl TypeRef {
    /// Create a primitive type.
    #[inline]
    pub const fn primitive(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }

    /// Shorthand for `int`.
    #[inline]
    pub const fn int() -> Self {
        TypeRef::Primitive(Primitive::Int32)
    }

    /// Shorthand for `bool`.
    #[inline]
    pub const fn boolean() -> Self {
        TypeRef::Primitive(Primitive::Boolean)
    }

    /// Shorthand for `string`.
    #[inline]
    pub const fn string() -> Self {
        TypeRef::Primitive(Primitive::String)
    }

    /// Create a named reference type without type arguments.
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
            value_type: false,
        }
    }

    /// Create a named value type (a struct) without type arguments.
    #[inline]
    pub fn named_value(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
            value_type: true,
        }
    }

    /// Create a generic reference type application.
    #[inline]
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
            value_type: false,
        }
    }

    /// Create a single-dimensional array type.
    #[inline]
    pub fn array(elem: TypeRef) -> Self {
        Self::array_with_rank(elem, 1)
    }

    /// Create an array type with an explicit rank.
    #[inline]
    pub fn array_with_rank(elem: TypeRef, rank: u32) -> Self {
        debug_assert!(rank >= 1);
        TypeRef::Array {
            elem: Box::new(elem),
            rank,
        }
    }

    /// Create a nullable wrapping of the inner type.
    #[inline]
    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::Nullable(Box::new(inner))
    }

    /// Whether this type has value semantics.
    ///
    /// Arrays are reference types; a nullable wrapping follows its inner
    /// type's storage class.
    pub fn is_value_type(&self) -> bool {
        match self {
            TypeRef::Primitive(p) => p.is_value_type(),
            TypeRef::Named { value_type, .. } => *value_type,
            TypeRef::Array { .. } => false,
            TypeRef::Nullable(inner) => inner.is_value_type(),
        }
    }

    /// Nullability class of this type.
    pub fn nullability(&self) -> Nullability {
        match self {
            TypeRef::Nullable(inner) if inner.is_value_type() => Nullability::NullableValue,
            TypeRef::Nullable(_) => Nullability::NullableRef,
            _ => Nullability::NonNull,
        }
    }

    /// Derive the canonical slot name for this type.
    ///
    /// - primitives use their canonical name (`int` → `Int32`)
    /// - nullable value types render as `NullableOf<T>`; nullable reference
    ///   types derive from the inner type (`string?` → `String`)
    /// - arrays append `Array`, `Array2D`, `Array3D`, or `Array{N}D`
    /// - generic applications render as `<Outer>Of<Arg1><Arg2>…`, recursively
    pub fn slot_name(&self) -> String {
        match self {
            TypeRef::Primitive(p) => p.canonical_name().to_string(),
            TypeRef::Named { name, args, .. } => {
                if args.is_empty() {
                    name.clone()
                } else {
                    let mut out = name.clone();
                    out.push_str("Of");
                    for arg in args {
                        out.push_str(&arg.slot_name());
                    }
                    out
                }
            }
            TypeRef::Array { elem, rank } => {
                let mut out = elem.slot_name();
                match rank {
                    0 | 1 => out.push_str("Array"),
                    2 => out.push_str("Array2D"),
                    3 => out.push_str("Array3D"),
                    n => {
                        // slot names are plain idents, so the write cannot fail
                        let _ = write!(out, "Array{n}D");
                    }
                }
                out
            }
            TypeRef::Nullable(inner) => {
                if inner.is_value_type() {
                    format!("NullableOf{}", inner.slot_name())
                } else {
                    inner.slot_name()
                }
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => f.write_str(p.keyword()),
            TypeRef::Named { name, args, .. } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Array { elem, rank } => {
                write!(f, "{elem}[")?;
                for _ in 1..*rank {
                    f.write_str(",")?;
                }
                f.write_str("]")
            }
            TypeRef::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primitive_names() {
        assert_eq!(TypeRef::int().slot_name(), "Int32");
        assert_eq!(TypeRef::boolean().slot_name(), "Boolean");
        assert_eq!(TypeRef::string().slot_name(), "String");
    }

    #[test]
    fn nullable_value_type_names() {
        assert_eq!(
            TypeRef::nullable(TypeRef::int()).slot_name(),
            "NullableOfInt32"
        );
        assert_eq!(
            TypeRef::nullable(TypeRef::named_value("Guid")).slot_name(),
            "NullableOfGuid"
        );
    }

    #[test]
    fn nullable_reference_type_derives_from_inner() {
        assert_eq!(TypeRef::nullable(TypeRef::string()).slot_name(), "String");
    }

    #[test]
    fn array_names_by_rank() {
        let s = TypeRef::string();
        assert_eq!(TypeRef::array(s.clone()).slot_name(), "StringArray");
        assert_eq!(
            TypeRef::array_with_rank(s.clone(), 2).slot_name(),
            "StringArray2D"
        );
        assert_eq!(
            TypeRef::array_with_rank(s.clone(), 3).slot_name(),
            "StringArray3D"
        );
        assert_eq!(
            TypeRef::array_with_rank(s, 5).slot_name(),
            "StringArray5D"
        );
    }

    #[test]
    fn generic_names_compose_recursively() {
        let list_of_int = TypeRef::generic("List", vec![TypeRef::int()]);
        assert_eq!(list_of_int.slot_name(), "ListOfInt32");

        let dict = TypeRef::generic("Dictionary", vec![TypeRef::string(), TypeRef::int()]);
        assert_eq!(dict.slot_name(), "DictionaryOfStringInt32");

        let nested = TypeRef::generic("List", vec![TypeRef::generic("List", vec![TypeRef::int()])]);
        assert_eq!(nested.slot_name(), "ListOfListOfInt32");
    }

    #[test]
    fn array_of_generic_collides_with_generic_of_array() {
        let array_of_generic = TypeRef::array(TypeRef::generic("List", vec![TypeRef::int()]));
        let generic_of_array = TypeRef::generic("List", vec![TypeRef::array(TypeRef::int())]);
        assert_eq!(array_of_generic.slot_name(), "ListOfInt32Array");
        assert_eq!(generic_of_array.slot_name(), "ListOfInt32Array");
        assert_ne!(array_of_generic, generic_of_array);
    }

    #[test]
    fn display_renders_host_syntax() {
        assert_eq!(TypeRef::int().to_string(), "int");
        assert_eq!(TypeRef::nullable(TypeRef::int()).to_string(), "int?");
        assert_eq!(TypeRef::nullable(TypeRef::string()).to_string(), "string?");
        assert_eq!(
            TypeRef::generic("List", vec![TypeRef::int()]).to_string(),
            "List<int>"
        );
        assert_eq!(
            TypeRef::generic("Dictionary", vec![TypeRef::string(), TypeRef::int()]).to_string(),
            "Dictionary<string, int>"
        );
        assert_eq!(TypeRef::array(TypeRef::int()).to_string(), "int[]");
        assert_eq!(
            TypeRef::array_with_rank(TypeRef::int(), 2).to_string(),
            "int[,]"
        );
        assert_eq!(
            TypeRef::array_with_rank(TypeRef::int(), 3).to_string(),
            "int[,,]"
        );
        assert_eq!(
            TypeRef::nullable(TypeRef::generic("List", vec![TypeRef::int()])).to_string(),
            "List<int>?"
        );
    }

    #[test]
    fn nullability_classes() {
        assert_eq!(TypeRef::int().nullability(), Nullability::NonNull);
        assert_eq!(
            TypeRef::nullable(TypeRef::int()).nullability(),
            Nullability::NullableValue
        );
        assert_eq!(
            TypeRef::nullable(TypeRef::string()).nullability(),
            Nullability::NullableRef
        );
        assert_eq!(
            TypeRef::nullable(TypeRef::array(TypeRef::int())).nullability(),
            Nullability::NullableRef
        );
    }
}
