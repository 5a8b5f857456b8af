use rosintro_core::{BuiltinKind, DecodedValue, FieldDef, MessageDef, TypeCatalog, TypeRef};
use rosintro_flat::{FlatError, encode_to_vec, min_wire_size, skeleton, skeleton_message};

fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(MessageDef::new(
            "ex",
            "Point",
            vec![
                FieldDef::new("x", TypeRef::builtin(BuiltinKind::F32)),
                FieldDef::new("y", TypeRef::builtin(BuiltinKind::F32)),
            ],
        ))
        .with(MessageDef::new(
            "ex",
            "Path",
            vec![
                FieldDef::new("name", TypeRef::builtin(BuiltinKind::String)),
                FieldDef::new("poses", TypeRef::message("ex", "Point").variable_array()),
                FieldDef::new("corner", TypeRef::message("ex", "Point").fixed_array(2)),
            ],
        ))
}

#[test]
fn scalar_message_lists_zero_values() {
    let view = skeleton(&catalog(), &TypeRef::message("ex", "Point"), "").unwrap();
    assert_eq!(view.order, ["x", "y"]);
    assert_eq!(view.values["x"], DecodedValue::F32(0.0));
    assert_eq!(view.kinds["y"], BuiltinKind::F32);
}

#[test]
fn arrays_show_structural_paths() {
    let view = skeleton(&catalog(), &TypeRef::message("ex", "Path"), "plan").unwrap();
    assert_eq!(
        view.order,
        [
            "plan/name",
            "plan/poses.0/x",
            "plan/poses.0/y",
            "plan/corner:0/x",
            "plan/corner:0/y",
            "plan/corner:1/x",
            "plan/corner:1/y",
            "plan/corner:2/x",
            "plan/corner:2/y",
        ]
    );
    assert_eq!(view.values["plan/name"].try_str().unwrap(), "");
    assert!(!view.values.contains_key("plan/poses.0/x"));
    assert_eq!(view.kinds["plan/poses.0/x"], BuiltinKind::F32);
}

#[test]
fn skeleton_encodes_to_minimal_zero_buffer() {
    let catalog = catalog();
    let ty = TypeRef::message("ex", "Path");
    let view = skeleton(&catalog, &ty, "").unwrap();
    let size = min_wire_size(&catalog, &ty).unwrap();
    assert_eq!(size, 4 + 4 + 16);
    assert_eq!(encode_to_vec(&view).unwrap(), vec![0; size]);
}

#[test]
fn skeleton_has_no_warnings() {
    let flat = skeleton_message(&catalog(), &TypeRef::message("ex", "Path"), "").unwrap();
    assert!(flat.warnings().is_empty());
    assert_eq!(flat.len(), 9);
}

#[test]
fn unknown_type_fails() {
    let err = skeleton(&catalog(), &TypeRef::message("ex", "Nope"), "").unwrap_err();
    assert!(matches!(err, FlatError::UnknownType { ref requested, .. } if requested == "ex/Nope"));
}

#[test]
fn leafless_arrays_keep_their_length_slot() {
    let catalog = catalog()
        .with(MessageDef::new("ex", "Empty", Vec::new()))
        .with(MessageDef::new(
            "ex",
            "Markers",
            vec![
                FieldDef::new("none", TypeRef::message("ex", "Empty").variable_array()),
                FieldDef::new("count", TypeRef::builtin(BuiltinKind::U16)),
            ],
        ));
    let ty = TypeRef::message("ex", "Markers");
    let flat = skeleton_message(&catalog, &ty, "").unwrap();
    assert_eq!(flat.lengths().len(), 1);
    assert_eq!(flat.lengths()[0].len, 0);

    let view = flat.render_view();
    assert_eq!(view.order, ["none", "count"]);
    assert_eq!(encode_to_vec(&view).unwrap(), vec![0; 6]);
}
