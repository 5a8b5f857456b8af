use rosintro_core::{ArraySize, BuiltinKind, FieldDef, MessageDef, TypeCatalog, TypeRef};

fn pose_def() -> MessageDef {
    MessageDef::new(
        "geometry_msgs",
        "Pose2D",
        vec![
            FieldDef::new("x", TypeRef::builtin(BuiltinKind::F64)),
            FieldDef::new("y", TypeRef::builtin(BuiltinKind::F64)),
            FieldDef::new("theta", TypeRef::builtin(BuiltinKind::F64)),
        ],
    )
}

#[test]
fn parse_type_names() {
    let ty = TypeRef::parse("geometry_msgs/Pose2D").unwrap();
    assert_eq!(ty.package(), "geometry_msgs");
    assert_eq!(ty.name(), "Pose2D");
    assert!(!ty.is_builtin());

    let ty = TypeRef::parse("geometry_msgs/msg/Pose2D").unwrap();
    assert_eq!(ty.base_name(), "geometry_msgs/Pose2D");

    let ty = TypeRef::parse("float32").unwrap();
    assert_eq!(ty.builtin_kind(), Some(BuiltinKind::F32));

    assert!(TypeRef::parse("Pose2D").is_none());
    assert!(TypeRef::parse("/Pose2D").is_none());
    assert!(TypeRef::parse("a/b/c/d").is_none());
}

#[test]
fn array_types_display_with_suffix() {
    let ty = TypeRef::builtin(BuiltinKind::U8).fixed_array(16);
    assert_eq!(ty.array_size(), ArraySize::Fixed(16));
    assert_eq!(ty.to_string(), "uint8[16]");
    assert_eq!(ty.element().to_string(), "uint8");

    let ty = TypeRef::message("std_msgs", "Header").variable_array();
    assert!(ty.is_array());
    assert_eq!(ty.to_string(), "std_msgs/Header[]");
}

#[test]
fn catalog_lookup() {
    let catalog = TypeCatalog::new().with(pose_def());
    assert_eq!(catalog.len(), 1);

    let def = catalog.get("geometry_msgs", "Pose2D").unwrap();
    assert_eq!(def.fields.len(), 3);

    let ty = TypeRef::message("geometry_msgs", "Pose2D").variable_array();
    assert_eq!(catalog.resolve(&ty), Some(def));
    assert!(catalog.resolve(&TypeRef::builtin(BuiltinKind::F64)).is_none());
    assert!(catalog.get("geometry_msgs", "Twist").is_none());
}

#[test]
fn insert_replaces_existing_definition() {
    let mut catalog = TypeCatalog::new().with(pose_def());
    let replacement = MessageDef::new("geometry_msgs", "Pose2D", Vec::new());
    let previous = catalog.insert(replacement).unwrap();
    assert_eq!(previous.fields.len(), 3);
    assert_eq!(catalog.len(), 1);
    assert!(catalog.get("geometry_msgs", "Pose2D").unwrap().fields.is_empty());
}

#[test]
fn type_names_are_sorted() {
    let catalog: TypeCatalog = [
        MessageDef::new("b_pkg", "Z", Vec::new()),
        MessageDef::new("a_pkg", "Y", Vec::new()),
        MessageDef::new("b_pkg", "A", Vec::new()),
    ]
    .into_iter()
    .collect();
    assert_eq!(catalog.type_names(), ["a_pkg/Y", "b_pkg/A", "b_pkg/Z"]);
}

#[test]
fn header_is_injected_once() {
    let custom = MessageDef::new(
        "std_msgs",
        "Header",
        vec![FieldDef::new("frame_id", TypeRef::builtin(BuiltinKind::String))],
    );
    let mut catalog = TypeCatalog::new().with(custom);
    catalog.ensure_builtin_types();
    assert_eq!(catalog.get("std_msgs", "Header").unwrap().fields.len(), 1);

    let mut catalog = TypeCatalog::new();
    assert!(catalog.is_empty());
    catalog.ensure_builtin_types();
    let header = catalog.get("std_msgs", "Header").unwrap();
    let names: Vec<&str> = header.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["seq", "stamp", "frame_id"]);
    assert_eq!(header.fields[1].ty.builtin_kind(), Some(BuiltinKind::Time));
}

#[test]
fn constants_are_not_wire_fields() {
    let def = MessageDef::new(
        "ex",
        "Mode",
        vec![
            FieldDef::constant("AUTO", TypeRef::builtin(BuiltinKind::U8), "1"),
            FieldDef::new("mode", TypeRef::builtin(BuiltinKind::U8)),
        ],
    );
    let wire: Vec<&str> = def.wire_fields().map(|f| f.name.as_str()).collect();
    assert_eq!(wire, ["mode"]);
    assert!(def.fields[0].is_constant());
    assert_eq!(def.to_string(), "uint8 AUTO=1\nuint8 mode\n");
}
