use crate::mangle::{decl_name, fused_name, instance_type, mangle};
use indexmap::IndexMap;
use ply_typechecker::{BasicKind, Field, FuncType, NamedType, Type, TypeTable};
use pretty_assertions::assert_eq;

#[test]
fn test_mangled_type_spellings() {
    assert_eq!(mangle(&Type::int()), "int");
    assert_eq!(mangle(&Type::Basic(BasicKind::UntypedFloat)), "float64");
    assert_eq!(mangle(&Type::slice(Type::string())), "sliceOfstring");
    assert_eq!(mangle(&Type::map(Type::string(), Type::slice(Type::int()))), "mapOfstringTosliceOfint");
    assert_eq!(
        mangle(&Type::func(vec![Type::int(), Type::int()], Some(Type::bool()))),
        "funcOfintAndintRetbool"
    );
    assert_eq!(mangle(&Type::func(vec![Type::string()], None)), "funcOfstringRetvoid");
    assert_eq!(mangle(&Type::named("Celsius")), "Celsius");
    assert_eq!(mangle(&Type::Any), "any");

    let point = Type::Struct(vec![
        Field { name: "X".to_string(), ty: Type::int() },
        Field { name: "Y".to_string(), ty: Type::float64() },
    ]);
    assert_eq!(mangle(&point), "structOfXintAndYfloat64End");
}

#[test]
fn test_declaration_names() {
    assert_eq!(decl_name("filter", &[Type::slice(Type::int())]), "filter_sliceOfint");
    assert_eq!(
        decl_name("zip", &[Type::int(), Type::string(), Type::bool()]),
        "zip_int_string_bool"
    );
    assert_eq!(fused_name(&["filter_sliceOfint", "sum_sliceOfint"]), "filter_sliceOfint_then_sum_sliceOfint");
}

#[test]
fn test_distinct_types_never_collide() {
    let a = decl_name("map", &[Type::slice(Type::int()), Type::slice(Type::int())]);
    let b = decl_name("map", &[Type::slice(Type::slice(Type::int()))]);
    assert_ne!(a, b);
    assert_ne!(
        mangle(&Type::map(Type::int(), Type::string())),
        mangle(&Type::map(Type::string(), Type::int()))
    );

    // func(int, func() int) against func(int, func()) int
    let inner_result = Type::func(vec![Type::int(), Type::func(Vec::new(), Some(Type::int()))], None);
    let outer_result = Type::func(vec![Type::int(), Type::func(Vec::new(), None)], Some(Type::int()));
    assert_ne!(mangle(&inner_result), mangle(&outer_result));
    assert_eq!(mangle(&inner_result), "funcOfintAndfuncOfRetintRetvoid");
    assert_eq!(mangle(&outer_result), "funcOfintAndfuncOfRetvoidRetint");

    let variadic = Type::Func(FuncType {
        params: vec![Type::slice(Type::int())],
        variadic: true,
        result: None,
    });
    assert_eq!(mangle(&variadic), "funcOfvariadicsliceOfintRetvoid");
    assert_ne!(mangle(&variadic), mangle(&Type::func(vec![Type::slice(Type::int())], None)));
}

#[test]
fn test_instance_type_strips_named_collections() {
    let mut table = TypeTable::new();
    table.declare_named(NamedType {
        name: "Names".to_string(),
        underlying: Type::slice(Type::string()),
        methods: IndexMap::new(),
    });
    table.declare_named(NamedType {
        name: "Celsius".to_string(),
        underlying: Type::float64(),
        methods: IndexMap::new(),
    });

    assert_eq!(instance_type(&table, &Type::named("Names")), Type::slice(Type::string()));
    assert_eq!(instance_type(&table, &Type::named("Celsius")), Type::named("Celsius"));
    assert_eq!(instance_type(&table, &Type::Basic(BasicKind::UntypedInt)), Type::int());
}
