use crate::helpers::*;
use graphql_runtime::ast;
use graphql_runtime::ast::Field;
use graphql_runtime::ast::Type;
use graphql_runtime::name;
use graphql_runtime::validation;
use graphql_runtime::validation::DiagnosticList;
use graphql_runtime::ExecutableDocument;

fn validate(
    schema: &graphql_runtime::Valid<graphql_runtime::Schema>,
    document: ast::Document,
) -> DiagnosticList {
    validation::validate(schema, &ExecutableDocument::from_ast(&document))
}

fn assert_diagnostic(errors: &DiagnosticList, needle: &str) {
    assert!(
        errors.iter().any(|error| error.to_string().contains(needle)),
        "expected a diagnostic containing {needle:?}, got:\n{errors}"
    );
}

#[test]
fn a_valid_document_produces_no_diagnostics() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), "foo")
                .with_selection(Field::new(name!(id))),
        ),
    );
    let errors = validate(&schema, document);
    assert!(errors.is_empty(), "unexpected diagnostics:\n{errors}");
}

#[test]
fn undefined_fragment_spreads_are_reported() {
    let schema = version_schema();
    let document =
        query_doc(query_op().with_selection(ast::FragmentSpread::new(name!(ghostFields))));
    assert_diagnostic(
        &validate(&schema, document),
        "cannot find fragment `ghostFields`",
    );
}

#[test]
fn fragment_cycles_are_reported_with_the_cycle_path() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), "foo")
                .with_selection(ast::FragmentSpread::new(name!(a))),
        ),
    )
    .with_definition(
        ast::FragmentDefinition::new(name!(a), name!(Thing))
            .with_selection(ast::FragmentSpread::new(name!(b))),
    )
    .with_definition(
        ast::FragmentDefinition::new(name!(b), name!(Thing))
            .with_selection(ast::FragmentSpread::new(name!(a))),
    );
    let errors = validate(&schema, document);
    assert_diagnostic(&errors, "cannot reference itself");
    assert_diagnostic(&errors, "a -> b -> a");
}

#[test]
fn unknown_fields_are_reported_against_their_parent_type() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), "foo")
                .with_selection(Field::new(name!(mass))),
        ),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "type `Thing` does not have a field `mass`",
    );
}

#[test]
fn leaf_fields_cannot_have_sub_selections() {
    let schema = version_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(version)).with_selection(Field::new(name!(length))),
        ),
    );
    assert_diagnostic(&validate(&schema, document), "cannot have a sub-selection");
}

#[test]
fn composite_fields_require_a_sub_selection() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(Field::new(name!(thing)).with_argument(name!(id), "foo")),
    );
    assert_diagnostic(&validate(&schema, document), "requires a sub-selection");
}

#[test]
fn required_arguments_must_be_supplied() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(Field::new(name!(thing)).with_selection(Field::new(name!(id)))),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "required argument `RootQueryType.thing(id:)`",
    );
}

#[test]
fn unknown_arguments_are_reported() {
    let schema = version_schema();
    let document = query_doc(
        query_op().with_selection(Field::new(name!(version)).with_argument(name!(format), "x")),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "argument `format` is not supported",
    );
}

#[test]
fn variable_usages_must_be_declared() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), ast::Value::Variable(name!(missing)))
                .with_selection(Field::new(name!(id))),
        ),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "variable `$missing` is not defined",
    );
}

#[test]
fn nullable_variables_cannot_flow_into_non_null_arguments() {
    let schema = thing_schema();
    let document = query_doc(
        query_op()
            .with_variable(ast::VariableDefinition::new(
                name!(id),
                Type::new_named(name!(ID)),
            ))
            .with_selection(
                Field::new(name!(thing))
                    .with_argument(name!(id), ast::Value::Variable(name!(id)))
                    .with_selection(Field::new(name!(id))),
            ),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "variable `$id: ID` cannot be used where `ID!` is expected",
    );
}

#[test]
fn skip_is_rejected_on_fragment_definitions() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), "foo")
                .with_selection(ast::FragmentSpread::new(name!(idFields))),
        ),
    )
    .with_definition(
        ast::FragmentDefinition::new(name!(idFields), name!(Thing))
            .with_directive(
                ast::Directive::new(name!(skip)).with_argument(name!("if"), true),
            )
            .with_selection(Field::new(name!(id))),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "directive `@skip` is not supported on FRAGMENT_DEFINITION",
    );
}

#[test]
fn unknown_directives_are_reported() {
    let schema = version_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(version)).with_directive(ast::Directive::new(name!(uppercase))),
        ),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "cannot find directive `@uppercase`",
    );
}

#[test]
fn one_response_key_cannot_select_two_field_names() {
    let schema = thing_schema();
    let document = query_doc(
        query_op()
            .with_selection(
                Field::new(name!(thing))
                    .with_alias(name!(it))
                    .with_argument(name!(id), "foo")
                    .with_selection(Field::new(name!(id))),
            )
            .with_selection(Field::new(name!(__typename)).with_alias(name!(it))),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "cannot select both `thing` and `__typename`",
    );
}

#[test]
fn one_response_key_cannot_mix_argument_sets() {
    let schema = thing_schema();
    let document = query_doc(
        query_op()
            .with_selection(
                Field::new(name!(thing))
                    .with_argument(name!(id), "foo")
                    .with_selection(Field::new(name!(id))),
            )
            .with_selection(
                Field::new(name!(thing))
                    .with_argument(name!(id), "bar")
                    .with_selection(Field::new(name!(id))),
            ),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "differing arguments and cannot be merged",
    );
}

#[test]
fn anonymous_operations_must_be_alone() {
    let schema = version_schema();
    let document = query_doc(query_op().with_selection(Field::new(name!(version))))
        .with_definition(query_op().with_selection(Field::new(name!(version))));
    assert_diagnostic(
        &validate(&schema, document),
        "anonymous operation must be the only operation",
    );
}

#[test]
fn operation_names_must_be_unique() {
    let schema = version_schema();
    let document = query_doc(
        query_op()
            .with_name(name!(Twice))
            .with_selection(Field::new(name!(version))),
    )
    .with_definition(
        query_op()
            .with_name(name!(Twice))
            .with_selection(Field::new(name!(version))),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "operation `Twice` is defined multiple times",
    );
}

#[test]
fn operations_without_a_matching_root_are_rejected() {
    let schema = version_schema();
    let document = query_doc(mutation_op().with_selection(Field::new(name!(version))));
    assert_diagnostic(
        &validate(&schema, document),
        "schema does not support mutation operations",
    );
}

#[test]
fn variables_must_be_declared_once_and_of_input_types() {
    let schema = thing_schema();
    let document = query_doc(
        query_op()
            .with_variable(ast::VariableDefinition::new(
                name!(v),
                Type::new_named(name!(Int)),
            ))
            .with_variable(ast::VariableDefinition::new(
                name!(v),
                Type::new_named(name!(Int)),
            ))
            .with_variable(ast::VariableDefinition::new(
                name!(t),
                Type::new_named(name!(Thing)),
            ))
            .with_selection(
                Field::new(name!(thing))
                    .with_argument(name!(id), "foo")
                    .with_selection(Field::new(name!(id))),
            ),
    );
    let errors = validate(&schema, document);
    assert_diagnostic(&errors, "variable `$v` is declared multiple times");
    assert_diagnostic(&errors, "variable `$t` must have an input type");
}

#[test]
fn unused_fragments_still_get_structural_checks() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), "foo")
                .with_selection(Field::new(name!(id))),
        ),
    )
    .with_definition(
        ast::FragmentDefinition::new(name!(stray), name!(Thing))
            .with_selection(Field::new(name!(mass))),
    );
    assert_diagnostic(
        &validate(&schema, document),
        "type `Thing` does not have a field `mass`",
    );
}
