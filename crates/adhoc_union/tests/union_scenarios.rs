//! End-to-end scenarios over small, realistic union shapes.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use adhoc_union::{Shape, SlotDef, TypeRef, UnionError, UnionValue};
use pretty_assertions::assert_eq;

fn hash_of(u: &UnionValue) -> u64 {
    let mut hasher = DefaultHasher::new();
    u.hash(&mut hasher);
    hasher.finish()
}

/// `Union<string, int>` with slots `String` and `Int32`.
fn string_int_union() -> Arc<Shape> {
    Shape::builder("Union")
        .slot(SlotDef::of::<String>(TypeRef::string()))
        .slot(SlotDef::of::<i32>(TypeRef::int()))
        .build()
        .expect("shape must build")
}

#[test]
fn string_int_walkthrough() -> Result<(), UnionError> {
    let shape = string_int_union();
    let u = UnionValue::new(&shape, "String", "Ab".to_string())?;

    assert!(u.is("String"));
    assert!(!u.is("Int32"));
    assert_eq!(u.as_slot::<String>("String")?, "Ab");

    match u.as_slot::<i32>("Int32") {
        Err(UnionError::Access(err)) => {
            assert_eq!(err.to_string(), "'Union' is not of type 'int'.");
        }
        other => panic!("expected InvalidStateAccess, got {other:?}"),
    }

    assert!(u == UnionValue::new(&shape, "String", "Ab".to_string())?);

    let n = u
        .map::<i64>()
        .arm("String", |s: &String| s.len() as i64)
        .arm("Int32", |i: &i32| i64::from(*i))
        .run()?;
    assert_eq!(n, 2);
    Ok(())
}

#[test]
fn implicit_conversion_builds_the_unique_slot() -> Result<(), UnionError> {
    let shape = string_int_union();
    let u = UnionValue::from_value(&shape, 42)?;
    assert!(u.is("Int32"));
    assert_eq!(u.as_slot::<i32>("Int32")?, &42);
    Ok(())
}

/// Two stateless slots of the same underlying empty type.
#[test]
fn two_markers_of_one_type() -> Result<(), UnionError> {
    #[derive(Default, PartialEq, Eq, Hash, Debug)]
    struct Signal;

    let shape = Shape::builder("Markers")
        .slot(SlotDef::stateless::<Signal>(TypeRef::named_value("Signal")).named("Marker1"))
        .slot(SlotDef::stateless::<Signal>(TypeRef::named_value("Signal")).named("Marker2"))
        .build()?;

    let m1 = UnionValue::stateless(&shape, "Marker1")?;
    let m2 = UnionValue::stateless(&shape, "Marker2")?;

    assert!(m1 != m2);
    assert!(m1 == UnionValue::stateless(&shape, "Marker1")?);
    assert!(m2 == UnionValue::stateless(&shape, "Marker2")?);

    // equal hashes across slots are permitted; equality never is
    assert_eq!(hash_of(&m1), hash_of(&m2));

    // the accessor yields the canonical default for both
    assert_eq!(m1.as_slot::<Signal>("Marker1")?, &Signal);
    assert_eq!(m2.as_slot::<Signal>("Marker2")?, &Signal);
    Ok(())
}

#[test]
fn nullable_union_round_trip() -> Result<(), UnionError> {
    let shape = Shape::builder("MaybeText")
        .slot(SlotDef::of::<Option<String>>(TypeRef::nullable(TypeRef::string())))
        .slot(SlotDef::of::<i32>(TypeRef::int()))
        .build()?;

    // null source: no union at all
    let none = UnionValue::from_nullable::<String>(&shape, None)?;
    assert!(none.is_none());

    // non-null source: a union holding Some
    let some = UnionValue::from_nullable(&shape, Some("Ab".to_string()))?
        .expect("non-null source must build a union");
    assert_eq!(some.as_slot::<Option<String>>("String")?, &Some("Ab".to_string()));

    // direct factory: a union holding a null payload, a distinct state
    let null_inside = UnionValue::new::<Option<String>>(&shape, "String", None)?;
    assert!(null_inside.is("String"));
    assert_eq!(null_inside.as_slot::<Option<String>>("String")?, &None);
    assert!(some != null_inside);
    Ok(())
}

#[test]
fn five_slot_shape_dispatches_by_index() -> Result<(), UnionError> {
    let shape = Shape::builder("Wide")
        .slot(SlotDef::of::<bool>(TypeRef::boolean()))
        .slot(SlotDef::of::<i32>(TypeRef::int()))
        .slot(SlotDef::of::<String>(TypeRef::string()))
        .slot(SlotDef::of::<Vec<i32>>(TypeRef::generic("List", vec![TypeRef::int()])))
        .slot(SlotDef::of::<Option<i32>>(TypeRef::nullable(TypeRef::int())))
        .build()?;
    assert_eq!(shape.arity(), 5);
    assert_eq!(
        shape.slots().iter().map(|s| s.name().to_string()).collect::<Vec<_>>(),
        ["Boolean", "Int32", "String", "ListOfInt32", "NullableOfInt32"]
    );

    let u = UnionValue::new(&shape, "ListOfInt32", vec![1, 2, 3])?;
    let len = u
        .map::<usize>()
        .arm("Boolean", |_: &bool| 0)
        .arm("Int32", |_: &i32| 0)
        .arm("String", |s: &String| s.len())
        .arm("ListOfInt32", |v: &Vec<i32>| v.len())
        .arm("NullableOfInt32", |_: &Option<i32>| 0)
        .run()?;
    assert_eq!(len, 3);
    Ok(())
}

#[test]
fn context_threading_avoids_captures() -> Result<(), UnionError> {
    struct Renderer {
        prefix: &'static str,
    }

    let shape = string_int_union();
    let u = UnionValue::new(&shape, "Int32", 7)?;
    let rendered = u
        .map_with::<Renderer, String>()
        .arm("String", |r: &Renderer, s: &String| format!("{}{s}", r.prefix))
        .arm("Int32", |r: &Renderer, i: &i32| format!("{}{i}", r.prefix))
        .run(&Renderer { prefix: "value: " })?;
    assert_eq!(rendered, "value: 7");
    Ok(())
}
