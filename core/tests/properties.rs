use handler_schema_core::{
    COMMAND_KEY, Detail, HandlerDescription, Marker, MemberKind, ParameterDescription,
    SchemaError, assemble_command, classify_parameter, validate_schema,
};

const ARG_NAMES: &[(&str, &str)] = &[
    ("configArg", "Config"),
    ("pathArg", "Path"),
    ("xArg", "X"),
    ("ÅrgArg", "Årg"),
    ("already_CappedArg", "Already_Capped"),
];

const PLAIN_NAMES: &[&str] = &["retries", "verbose", "argument", "args", "Arguments", "x"];

#[test]
fn test_arg_suffix_always_yields_argument_with_stem_name() {
    for (input, expected) in ARG_NAMES {
        for is_abstract in [false, true] {
            let c = classify_parameter(input, is_abstract).unwrap();
            assert_eq!(c.kind, MemberKind::Argument, "{input}");
            assert_eq!(&c.name, expected, "{input}");
        }
    }
}

#[test]
fn test_abstract_without_suffix_is_service() {
    for input in PLAIN_NAMES {
        let c = classify_parameter(input, true).unwrap();
        assert_eq!(c.kind, MemberKind::Service, "{input}");
    }
}

#[test]
fn test_everything_else_is_option() {
    for input in PLAIN_NAMES {
        let c = classify_parameter(input, false).unwrap();
        assert_eq!(c.kind, MemberKind::Option, "{input}");
    }
}

#[test]
fn test_unusable_names_are_invalid_input() {
    for input in ["", "   ", "Arg"] {
        assert!(
            matches!(
                classify_parameter(input, false),
                Err(SchemaError::InvalidSchemaInput(_))
            ),
            "{input:?}"
        );
    }
}

#[test]
fn test_required_is_monotonic_across_sources() {
    let handler = HandlerDescription::new("App.Run(int)", "Run", "App").with_parameter(
        ParameterDescription::new("count", "int")
            .with_marker(Marker::new("Required"))
            .with_marker(Marker::new("Description").with_value("How many"))
            .with_marker(Marker::new("Aliases").with_value("c")),
    );
    let schema = assemble_command(&handler).unwrap();
    assert!(schema.member_details["count"].required());

    let mut detail = schema.member_details["count"].clone();
    for _ in 0..3 {
        assert!(!detail.set_required(false));
        assert!(detail.required());
    }
}

#[test]
fn test_refined_kind_never_reverts_to_option() {
    for refined in [MemberKind::Argument, MemberKind::Service] {
        let mut detail = Detail::new("App.Run()#x", "x", None).unwrap();
        assert!(detail.set_kind(refined));
        assert!(!detail.set_kind(MemberKind::Option));
        assert_eq!(detail.kind(), refined);
    }
}

#[test]
fn test_description_writes_are_idempotent_and_ignore_blanks() {
    let mut detail = Detail::new("App.Run()#x", "x", None).unwrap();
    detail.set_description("Counts things");
    let once = detail.clone();
    detail.set_description("Counts things");
    assert_eq!(detail, once);

    for blank in ["", "  ", "\n\t"] {
        assert!(!detail.set_description(blank));
        assert_eq!(detail.description(), "Counts things");
    }
}

#[test]
fn test_normalized_key_collision_yields_no_schema() {
    let collisions = [
        ("count", "count"),
        ("count", " count"),
        ("target", "targetArg"),
        ("Verbose", "verbose"),
    ];
    for (first, second) in collisions {
        let handler = HandlerDescription::new("App.Run(a, b)", "Run", "App")
            .with_parameter(ParameterDescription::new(first, "string"))
            .with_parameter(ParameterDescription::new(second, "string"));
        assert!(
            matches!(
                assemble_command(&handler),
                Err(SchemaError::DuplicateParameterName(_))
            ),
            "{first} / {second}"
        );
    }
}

#[test]
fn test_worked_example() {
    let handler = HandlerDescription::new("App.Commands.Build(string, ILogger, int)", "Build", "App.Commands")
        .with_return_type("int")
        .with_parameter(ParameterDescription::new("configArg", "string"))
        .with_parameter(ParameterDescription::new("logger", "ILogger").abstract_type())
        .with_parameter(ParameterDescription::new("retries", "int").with_marker(Marker::new("Required")))
        .with_param_doc("retries", "Number of attempts");

    let schema = assemble_command(&handler).unwrap();
    assert!(validate_schema(&schema).is_empty());

    let config = &schema.member_details["configArg"];
    assert_eq!((config.kind(), config.name()), (MemberKind::Argument, "Config"));

    assert_eq!(schema.member_details["logger"].kind(), MemberKind::Service);

    let retries = &schema.member_details["retries"];
    assert_eq!((retries.kind(), retries.name()), (MemberKind::Option, "Retries"));
    assert!(retries.required());
    assert_eq!(retries.description(), "Number of attempts");

    let command = schema.detail(COMMAND_KEY).unwrap();
    assert_eq!(command.name(), "Build");
    assert_eq!(command.type_name(), Some("int"));
}

#[test]
fn test_explicit_argument_marker_outranks_service_inference() {
    let handler = HandlerDescription::new("App.Run(IReader)", "Run", "App").with_parameter(
        ParameterDescription::new("reader", "IReader")
            .abstract_type()
            .with_marker(Marker::new("Argument")),
    );
    let schema = assemble_command(&handler).unwrap();
    assert_eq!(schema.member_details["reader"].kind(), MemberKind::Argument);
    assert_eq!(schema.arguments().len(), 1);
    assert!(schema.services().is_empty());
}

#[test]
fn test_marker_order_later_description_wins() {
    let handler = HandlerDescription::new("App.Run(int)", "Run", "App")
        .with_parameter(
            ParameterDescription::new("count", "int")
                .with_marker(Marker::new("Description").with_value("first"))
                .with_marker(Marker::new("Description").with_value(""))
                .with_marker(Marker::new("Description").with_value("second")),
        )
        .with_param_doc("count", "from docs");
    let schema = assemble_command(&handler).unwrap();
    assert_eq!(schema.member_details["count"].description(), "second");
}
