use chrono::{DateTime, FixedOffset, TimeZone};
use rowbind_core::{
    BinderConfig, DeclaredType, DecodeError, FieldDecl, FieldRef, IncorrectHeaderError, Record,
    RecordBinder, Schema, SchemaError, Shape, Tabular, Value, ValueError,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Record8 {
    string_field: String,
    int_field: i64,
    uint_field: u64,
    bool_field: bool,
    float_field: f64,
    optional_time_field: Option<DateTime<FixedOffset>>,
    optional_int_field: i32,
    optional_int_pointer: Option<i16>,
}

impl Record for Record8 {
    fn blank(_: &Schema) -> Self {
        Self::default()
    }

    fn shape_name(&self) -> &str {
        "record8"
    }

    fn set_field(&mut self, field: FieldRef, value: Value) -> Result<(), ValueError> {
        match field.index() {
            0 => value.assign(&mut self.string_field),
            1 => value.assign(&mut self.int_field),
            2 => value.assign(&mut self.uint_field),
            3 => value.assign(&mut self.bool_field),
            4 => value.assign(&mut self.float_field),
            5 => value.assign(&mut self.optional_time_field),
            6 => value.assign(&mut self.optional_int_field),
            7 => value.assign(&mut self.optional_int_pointer),
            other => Err(ValueError::UnknownField(other)),
        }
    }
}

impl Tabular for Record8 {
    fn shape() -> Shape {
        Shape::new("record8")
            .field(FieldDecl::new("StringField", DeclaredType::String).tag("String Field,required"))
            .field(FieldDecl::new("IntField", DeclaredType::I64).tag("Integer Field,required"))
            .field(
                FieldDecl::new("UintField", DeclaredType::U64)
                    .tag("Unsigned Integer Field,required"),
            )
            .field(FieldDecl::new("BoolField", DeclaredType::Bool).tag("Boolean Field,required"))
            .field(FieldDecl::new("FloatField", DeclaredType::F64).tag("Float Field,required"))
            .field(
                FieldDecl::new("OptionalTimeField", DeclaredType::optional(DeclaredType::Time))
                    .tag("Optional Time Field"),
            )
            .field(FieldDecl::new("OptionalIntField", DeclaredType::I32))
            .field(FieldDecl::new(
                "OptionalIntPointer",
                DeclaredType::optional(DeclaredType::I16),
            ))
    }
}

const FULL_HEADER: [&str; 8] = [
    "String Field",
    "Unsigned Integer Field",
    "Integer Field",
    "Float Field",
    "Boolean Field",
    "OptionalIntField",
    "OptionalIntPointer",
    "Optional Time Field",
];

fn decoder() -> RecordBinder<Record8> {
    RecordBinder::for_record(BinderConfig::default()).unwrap()
}

fn sample_time() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2017, 10, 9, 12, 30, 30)
        .unwrap()
}

#[test]
fn test_unsupported_field_types_fail_to_build() {
    let map_shape = Shape::new("bad").field(FieldDecl::new(
        "FieldA",
        DeclaredType::map(DeclaredType::String, DeclaredType::String),
    ));
    let result = RecordBinder::<Record8>::from_shape(&map_shape, BinderConfig::default());
    assert!(matches!(result, Err(SchemaError::UnsupportedType { .. })));

    let struct_shape = Shape::new("bad")
        .field(FieldDecl::new("FieldA", DeclaredType::Record("FieldB".to_string())));
    let result = RecordBinder::<Record8>::from_shape(&struct_shape, BinderConfig::default());
    assert!(matches!(result, Err(SchemaError::UnsupportedType { .. })));
}

#[test]
fn test_parse_header() {
    let mut decoder = decoder();

    decoder
        .reconcile_header(&[
            "String Field",
            "Unsigned Integer Field",
            "Integer Field",
            "Float Field",
            "Boolean Field",
            "OptionalIntField",
        ])
        .unwrap();

    let err = decoder
        .reconcile_header(&[
            "Unsigned Integer Field",
            "Integer Field",
            "Float Field",
            "Boolean Field",
            "OptionalIntField",
        ])
        .unwrap_err();
    assert_eq!(
        err,
        IncorrectHeaderError::MissingColumn("string field".to_string())
    );
    assert_eq!(err.to_string(), "Mandatory column \"string field\" is missing");

    decoder
        .reconcile_header(&[
            "Unsigned Integer Field",
            "Integer Field",
            "Float Field",
            "Boolean Field",
            "String Field",
        ])
        .unwrap();
}

#[test]
fn test_unknown_column_rejected_at_any_position() {
    for position in 0..=FULL_HEADER.len() {
        let mut header = FULL_HEADER.to_vec();
        header.insert(position, "Surprise");

        let err = decoder().reconcile_header(header.as_slice()).unwrap_err();
        assert_eq!(
            err,
            IncorrectHeaderError::UnexpectedColumn("Surprise".to_string())
        );
    }
}

#[test]
fn test_get_struct() {
    let mut decoder = decoder();
    decoder.reconcile_header(&FULL_HEADER).unwrap();

    let now = sample_time();
    let rec = [
        "field 1".to_string(),
        "100".to_string(),
        "-30".to_string(),
        "-200".to_string(),
        "true".to_string(),
        "50".to_string(),
        "-10".to_string(),
        now.to_rfc3339(),
    ];

    let err = decoder.new_record(&rec[..1]).unwrap_err();
    assert_eq!(err, DecodeError::RowShape { expected: 8, found: 1 });

    let value = decoder.new_record(&rec).unwrap();
    assert_eq!(
        value,
        Record8 {
            string_field: "field 1".to_string(),
            int_field: -30,
            uint_field: 100,
            bool_field: true,
            float_field: -200.0,
            optional_time_field: Some(now),
            optional_int_field: 50,
            optional_int_pointer: Some(-10),
        }
    );
}

#[test]
fn test_round_trip_canonical_text() {
    let original = Record8 {
        string_field: "héllo, world".to_string(),
        int_field: i64::MIN,
        uint_field: u64::MAX,
        bool_field: false,
        float_field: 6.02214076e23,
        optional_time_field: Some(sample_time()),
        optional_int_field: i32::MAX,
        optional_int_pointer: Some(i16::MIN),
    };

    let header = [
        "String Field",
        "Integer Field",
        "Unsigned Integer Field",
        "Boolean Field",
        "Float Field",
        "Optional Time Field",
        "OptionalIntField",
        "OptionalIntPointer",
    ];
    let row = [
        original.string_field.clone(),
        original.int_field.to_string(),
        original.uint_field.to_string(),
        original.bool_field.to_string(),
        original.float_field.to_string(),
        original.optional_time_field.unwrap().to_rfc3339(),
        original.optional_int_field.to_string(),
        original.optional_int_pointer.unwrap().to_string(),
    ];

    let mut decoder = decoder();
    decoder.reconcile_header(&header).unwrap();
    assert_eq!(decoder.new_record(&row).unwrap(), original);
}

#[test]
fn test_empty_optional_cells_stay_unset() {
    let mut decoder = decoder();
    decoder.reconcile_header(&FULL_HEADER).unwrap();

    let rec = ["", "1", "2", "3.5", "false", "0", "", ""];
    let value = decoder.new_record(&rec).unwrap();
    assert_eq!(value.string_field, "");
    assert_eq!(value.optional_time_field, None);
    assert_eq!(value.optional_int_pointer, None);

    // Non-optional numeric and bool fields do not accept empty cells
    let rec = ["x", "1", "2", "3.5", "", "0", "", ""];
    let err = decoder.new_record(&rec).unwrap_err();
    assert_eq!(err.column(), Some("boolean field"));
}

#[test]
fn test_out_of_range_narrowing_fails() {
    let mut decoder = decoder();
    decoder.reconcile_header(&FULL_HEADER).unwrap();

    let rec = ["x", "1", "2", "3.5", "true", "0", "40000", ""];
    let err = decoder.new_record(&rec).unwrap_err();
    assert_eq!(err.column(), Some("optionalintpointer"));
}

#[test]
fn test_concurrent_decode_after_reconcile() {
    let mut decoder = decoder();
    decoder
        .reconcile_header(&[
            "String Field",
            "Integer Field",
            "Unsigned Integer Field",
            "Boolean Field",
            "Float Field",
        ])
        .unwrap();

    let decoder = &decoder;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                scope.spawn(move || {
                    let id = worker.to_string();
                    decoder
                        .new_record(&[id.as_str(), "-1", "1", "true", "0.5"])
                        .unwrap()
                })
            })
            .collect();

        for (worker, handle) in handles.into_iter().enumerate() {
            let value = handle.join().unwrap();
            assert_eq!(value.string_field, worker.to_string());
        }
    });
}
