use rosintro::{
    Introspector, IntrospectError,
    core::{BuiltinKind, DecodedValue, FieldDef, MessageDef, TypeCatalog, TypeRef},
    flat::{DecodeOptions, FlatError},
};

fn odometry_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(MessageDef::new(
            "ex",
            "Point",
            vec![
                FieldDef::new("x", TypeRef::builtin(BuiltinKind::F64)),
                FieldDef::new("y", TypeRef::builtin(BuiltinKind::F64)),
            ],
        ))
        .with(MessageDef::new(
            "ex",
            "Track",
            vec![
                FieldDef::new("header", TypeRef::message("std_msgs", "Header")),
                FieldDef::new("points", TypeRef::message("ex", "Point").variable_array()),
            ],
        ))
}

fn track_bytes(frame: &str, points: &[(f64, f64)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&10u32.to_le_bytes());
    out.extend_from_slice(&20u32.to_le_bytes());
    out.extend_from_slice(&(frame.len() as u32).to_le_bytes());
    out.extend_from_slice(frame.as_bytes());
    out.extend_from_slice(&(points.len() as i32).to_le_bytes());
    for (x, y) in points {
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
    }
    out
}

#[test]
fn builder_injects_header() {
    let introspector = Introspector::builder()
        .with_catalog(odometry_catalog())
        .build();
    assert!(introspector.catalog().get("std_msgs", "Header").is_some());
    assert_eq!(introspector.options(), &DecodeOptions::default());
}

#[test]
fn decode_and_encode_round_trip() {
    let introspector = Introspector::new(odometry_catalog());
    let bytes = track_bytes("map", &[(1.0, 2.0), (3.5, -4.0)]);

    let flat = introspector.decode("ex/msg/Track", &bytes).unwrap();
    let view = flat.render_view();
    assert_eq!(view.values["points.2/x"], DecodedValue::F64(3.5));
    assert_eq!(view.values["header/frame_id"].try_str().unwrap(), "map");

    assert_eq!(introspector.encode(&view).unwrap(), bytes);
    assert_eq!(introspector.encode_verified(&view, &bytes).unwrap(), bytes);
}

#[test]
fn prefix_from_options_is_used() {
    let introspector = Introspector::builder()
        .with_catalog(odometry_catalog())
        .with_options(DecodeOptions::new().with_prefix("track"))
        .build();
    let view = introspector.skeleton("ex/Track").unwrap();
    assert_eq!(
        view.order,
        [
            "track/header/seq",
            "track/header/stamp",
            "track/header/frame_id",
            "track/points.0/x",
            "track/points.0/y",
        ]
    );
}

#[test]
fn trailing_bytes_are_rejected() {
    let introspector = Introspector::new(odometry_catalog());
    let mut bytes = track_bytes("", &[]);
    bytes.push(0);

    let err = introspector.decode("ex/Track", &bytes).unwrap_err();
    assert!(matches!(
        err,
        IntrospectError::TrailingBytes { ref type_name, remaining: 1 } if type_name == "ex/Track"
    ));
}

#[test]
fn decode_next_walks_concatenated_records() {
    let introspector = Introspector::new(odometry_catalog());
    let mut stream = track_bytes("a", &[(1.0, 1.0)]);
    stream.extend(track_bytes("bb", &[]));

    let mut buf = stream.as_slice();
    let first = introspector.decode_next("ex/Track", &mut buf).unwrap();
    let second = introspector.decode_next("ex/Track", &mut buf).unwrap();

    assert!(buf.is_empty());
    assert_eq!(first.render_view().values["header/frame_id"].try_str().unwrap(), "a");
    assert_eq!(second.render_view().values["header/frame_id"].try_str().unwrap(), "bb");
}

#[test]
fn root_type_names_are_validated() {
    let introspector = Introspector::new(odometry_catalog());

    let err = introspector.decode("Track", &[]).unwrap_err();
    assert!(matches!(err, IntrospectError::InvalidTypeName { .. }));

    let err = introspector.decode("int32", &[]).unwrap_err();
    assert!(matches!(err, IntrospectError::InvalidTypeName { .. }));

    let err = introspector.skeleton("ex/Missing").unwrap_err();
    assert!(matches!(err, IntrospectError::UnknownRootType { ref type_name } if type_name == "ex/Missing"));
}

#[test]
fn flat_errors_are_wrapped() {
    let introspector = Introspector::new(odometry_catalog());
    let bytes = track_bytes("map", &[(1.0, 2.0)]);
    let err = introspector
        .decode("ex/Track", &bytes[..bytes.len() - 1])
        .unwrap_err();
    assert!(matches!(
        err,
        IntrospectError::Flat(FlatError::TruncatedBuffer { .. })
    ));
}

#[test]
fn batch_results_keep_input_order() {
    let introspector = Introspector::new(odometry_catalog());
    let records: Vec<Vec<u8>> = (0..32u32)
        .map(|i| {
            let points: Vec<(f64, f64)> = (0..i % 5).map(|j| (f64::from(i), f64::from(j))).collect();
            track_bytes(&format!("frame{i}"), &points)
        })
        .collect();
    let mut slices: Vec<&[u8]> = records.iter().map(Vec::as_slice).collect();
    let broken = [0u8; 3];
    slices.push(&broken);

    let results = introspector.decode_batch("ex/Track", &slices).unwrap();
    assert_eq!(results.len(), 33);

    for (i, result) in results[..32].iter().enumerate() {
        let view = result.as_ref().unwrap().render_view();
        let frame = format!("frame{i}");
        assert_eq!(view.values["header/frame_id"].try_str().unwrap(), frame);
        assert_eq!(introspector.encode(&view).unwrap(), records[i]);
    }
    assert!(results[32].is_err());
}

#[test]
fn batch_with_unknown_type_fails_up_front() {
    let introspector = Introspector::new(odometry_catalog());
    let err = introspector.decode_batch("ex/Nope", &[]).unwrap_err();
    assert!(matches!(err, IntrospectError::UnknownRootType { .. }));
}
