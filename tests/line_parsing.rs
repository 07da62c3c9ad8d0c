use delimited_dataset::ingestion::{format_row, parse_line, LineParser};
use delimited_dataset::types::{DataType, Metadata, Record, Schema};
use delimited_dataset::LineErrorKind;

fn four_field_schema() -> Schema {
    Schema::new(vec![
        Metadata::new("a", DataType::String).with_separator("-"),
        Metadata::new("b", DataType::String).with_separator(";"),
        Metadata::new("c", DataType::String).with_separator(";"),
        Metadata::new("d", DataType::Integer).with_separator(";"),
        Metadata::new("e", DataType::Real),
    ])
}

#[test]
fn sample_line_yields_typed_records() {
    let row = parse_line(b"A-B;AB;1;0.1", &four_field_schema()).unwrap();
    assert_eq!(
        row,
        vec![
            Record::String("A".to_string()),
            Record::String("B".to_string()),
            Record::String("AB".to_string()),
            Record::Integer(1),
            Record::Real(0.1),
        ]
    );
}

#[test]
fn sample_line_without_a_separator_is_rejected() {
    let err = parse_line(b"A-B;AB", &four_field_schema()).unwrap_err();
    assert_eq!(err.kind, LineErrorKind::MissingSeparator);
    assert_eq!(err.field, 2);
    assert_eq!(err.position, 6);
    assert_eq!(err.line, b"A-B;AB".to_vec());
    assert!(err.to_string().contains("missing separator at field 2"));
}

#[test]
fn heterogeneous_format_round_trips() {
    let schema = Schema::new(vec![
        Metadata::new("id", DataType::Integer).with_separator("|"),
        Metadata::new("note", DataType::String).with_quotes("'", "'").with_separator("|"),
        Metadata::new("tags", DataType::String).with_quotes("[", "]").with_separator("|"),
        Metadata::new("weight", DataType::Real),
    ]);

    for line in [
        "1|'plain text'|[a,b]|0.5",
        "2|'pipes | inside'|[]|-3.25",
        "3|''|[x]|1e-7",
    ] {
        let row = LineParser::new(schema.clone()).parse(line.as_bytes()).unwrap();
        let written = format_row(&schema, &row).unwrap();
        let reparsed = parse_line(&written[..written.len() - 1], &schema).unwrap();
        assert_eq!(reparsed, row, "line: {line}");
    }
}

#[test]
fn round_trip_reproduces_normalized_text() {
    let schema = Schema::new(vec![
        Metadata::new("id", DataType::Integer).with_separator(","),
        Metadata::new("name", DataType::String).with_quotes("\"", "\"").with_separator(","),
        Metadata::new("label", DataType::String),
    ]);
    let row = parse_line(b"  10 , \"x y\" ,  yes  ", &schema).unwrap();
    let written = format_row(&schema, &row).unwrap();
    assert_eq!(written, b"10,\"x y\",yes\n".to_vec());
}
