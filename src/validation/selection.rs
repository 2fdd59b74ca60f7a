use crate::ast;
use crate::collections::HashSet;
use crate::collections::IndexMap;
use crate::schema::DirectiveLocation;
use crate::schema::FieldLookupError;
use crate::schema::InputValueDefinition;
use crate::schema::Schema;
use crate::schema::TypeDefinition;
use crate::validation::variable;
use crate::validation::DiagnosticData;
use crate::validation::DiagnosticList;
use crate::ExecutableDocument;
use crate::Name;
use crate::Node;

/// Recursively checks a selection set against the schema: field existence,
/// argument validity, leaf/composite sub-selection rules, directive
/// placement, variable usages, and response-key merging.
///
/// Fragment spreads are followed transitively, each fragment once per walk.
pub(crate) struct Walker<'a> {
    schema: &'a Schema,
    document: &'a ExecutableDocument,
    /// Variable definitions in scope; `None` when walking a fragment that no
    /// operation spreads, where usages cannot be checked against anything.
    variables: Option<&'a [Node<ast::VariableDefinition>]>,
    visited_fragments: HashSet<Name>,
    reached_fragments: &'a mut HashSet<Name>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        document: &'a ExecutableDocument,
        variables: Option<&'a [Node<ast::VariableDefinition>]>,
        reached_fragments: &'a mut HashSet<Name>,
    ) -> Self {
        Self {
            schema,
            document,
            variables,
            visited_fragments: HashSet::default(),
            reached_fragments,
        }
    }

    pub(crate) fn selection_set(
        &mut self,
        errors: &mut DiagnosticList,
        parent: &Name,
        selections: &'a [ast::Selection],
    ) {
        let document = self.document;
        let schema = self.schema;
        check_field_merging(errors, document, parent, selections);
        for selection in selections {
            match selection {
                ast::Selection::Field(field) => self.field(errors, parent, field),
                ast::Selection::FragmentSpread(spread) => {
                    validate_directives(
                        errors,
                        schema,
                        self.variables,
                        &spread.directives,
                        DirectiveLocation::FragmentSpread,
                    );
                    let Some(fragment) = document.fragments.get(&spread.fragment_name) else {
                        errors.push(
                            spread.span(),
                            DiagnosticData::UndefinedFragment {
                                name: spread.fragment_name.clone(),
                            },
                        );
                        continue;
                    };
                    self.reached_fragments.insert(spread.fragment_name.clone());
                    // Cycles are reported separately; the visited set just
                    // keeps this walk finite
                    if self.visited_fragments.insert(spread.fragment_name.clone()) {
                        self.selection_set(
                            errors,
                            &fragment.type_condition,
                            &fragment.selection_set,
                        );
                    }
                }
                ast::Selection::InlineFragment(inline) => {
                    validate_directives(
                        errors,
                        schema,
                        self.variables,
                        &inline.directives,
                        DirectiveLocation::InlineFragment,
                    );
                    let target = match &inline.type_condition {
                        Some(condition) => match schema.types.get(condition) {
                            None => {
                                errors.push(
                                    inline.span(),
                                    DiagnosticData::UndefinedDefinition {
                                        name: condition.clone(),
                                    },
                                );
                                continue;
                            }
                            Some(def) if !def.is_composite() => {
                                errors.push(
                                    inline.span(),
                                    DiagnosticData::InvalidFragmentTarget {
                                        on: condition.clone(),
                                        describe: def.describe(),
                                    },
                                );
                                continue;
                            }
                            Some(_) => condition,
                        },
                        None => parent,
                    };
                    self.selection_set(errors, target, &inline.selection_set);
                }
            }
        }
    }

    fn field(&mut self, errors: &mut DiagnosticList, parent: &Name, field: &'a Node<ast::Field>) {
        let schema = self.schema;
        validate_directives(
            errors,
            schema,
            self.variables,
            &field.directives,
            DirectiveLocation::Field,
        );
        let def = match schema.type_field(parent, &field.name) {
            Ok(def) => def,
            // An unresolved parent type was already reported where it came from
            Err(FieldLookupError::NoSuchType) => return,
            Err(FieldLookupError::NoSuchField(type_name, _)) => {
                errors.push(
                    field.span(),
                    DiagnosticData::UndefinedField {
                        type_name: type_name.clone(),
                        field_name: field.name.clone(),
                    },
                );
                return;
            }
        };
        validate_arguments(
            errors,
            schema,
            self.variables,
            &format!("{parent}.{}", field.name),
            &field.arguments,
            &def.arguments,
        );
        let inner = def.ty.inner_named_type();
        match schema.types.get(inner) {
            Some(ty_def) if ty_def.is_leaf() => {
                if !field.selection_set.is_empty() {
                    errors.push(
                        field.span(),
                        DiagnosticData::LeafFieldSelection {
                            field_name: field.name.clone(),
                            type_name: inner.clone(),
                        },
                    );
                }
            }
            Some(ty_def) if ty_def.is_composite() => {
                if field.selection_set.is_empty() {
                    errors.push(
                        field.span(),
                        DiagnosticData::MissingSubselection {
                            field_name: field.name.clone(),
                            type_name: inner.clone(),
                        },
                    );
                } else {
                    self.selection_set(errors, inner, &field.selection_set);
                }
            }
            // Input object as an output type is rejected at schema build;
            // an undefined type cannot appear in a valid schema
            Some(_) | None => {}
        }
    }
}

pub(crate) fn validate_directives(
    errors: &mut DiagnosticList,
    schema: &Schema,
    variables: Option<&[Node<ast::VariableDefinition>]>,
    directives: &ast::DirectiveList,
    location: DirectiveLocation,
) {
    for directive in directives {
        let Some(def) = schema.directive_definitions.get(&directive.name) else {
            errors.push(
                directive.span(),
                DiagnosticData::UndefinedDirective {
                    name: directive.name.clone(),
                },
            );
            continue;
        };
        if !def.locations.contains(&location) {
            errors.push(
                directive.span(),
                DiagnosticData::UnsupportedDirectiveLocation {
                    name: directive.name.clone(),
                    location,
                },
            );
        }
        validate_arguments(
            errors,
            schema,
            variables,
            &format!("@{}", directive.name),
            &directive.arguments,
            &def.arguments,
        );
    }
}

fn validate_arguments(
    errors: &mut DiagnosticList,
    schema: &Schema,
    variables: Option<&[Node<ast::VariableDefinition>]>,
    coordinate: &str,
    supplied: &[Node<ast::Argument>],
    declared: &IndexMap<Name, Node<InputValueDefinition>>,
) {
    let mut seen = HashSet::default();
    for argument in supplied {
        if !seen.insert(argument.name.clone()) {
            errors.push(
                argument.span(),
                DiagnosticData::UniqueArgument {
                    name: argument.name.clone(),
                },
            );
            continue;
        }
        let Some(def) = declared.get(&argument.name) else {
            errors.push(
                argument.span(),
                DiagnosticData::UndefinedArgument {
                    name: argument.name.clone(),
                    coordinate: coordinate.to_owned(),
                },
            );
            continue;
        };
        validate_value_usage(
            errors,
            schema,
            variables,
            &def.ty,
            def.default_value.is_some(),
            &argument.value,
        );
    }
    for def in declared.values() {
        let required = def.ty.is_non_null() && def.default_value.is_none();
        if required && !supplied.iter().any(|argument| argument.name == def.name) {
            errors.push(
                None,
                DiagnosticData::RequiredArgument {
                    name: def.name.clone(),
                    coordinate: format!("{coordinate}({}:)", def.name),
                },
            );
        }
    }
}

/// Checks variable usages inside an input value against the type expected
/// at that position, recursing through list and input object literals.
fn validate_value_usage(
    errors: &mut DiagnosticList,
    schema: &Schema,
    variables: Option<&[Node<ast::VariableDefinition>]>,
    expected_ty: &ast::Type,
    location_has_default: bool,
    value: &Node<ast::Value>,
) {
    match value.as_ref() {
        ast::Value::Variable(name) => {
            let Some(definitions) = variables else {
                return;
            };
            let Some(def) = definitions.iter().find(|def| def.name == *name) else {
                errors.push(
                    value.span(),
                    DiagnosticData::UndefinedVariable { name: name.clone() },
                );
                return;
            };
            if !variable::usage_allowed(def, expected_ty, location_has_default) {
                errors.push(
                    value.span(),
                    DiagnosticData::IncompatibleVariableUsage {
                        variable: name.clone(),
                        variable_ty: (*def.ty).clone(),
                        expected_ty: expected_ty.clone(),
                    },
                );
            }
        }
        ast::Value::List(items) => {
            for item in items {
                validate_value_usage(errors, schema, variables, expected_ty.item_type(), false, item);
            }
        }
        ast::Value::Object(entries) => {
            let Some(TypeDefinition::InputObject(input)) =
                schema.types.get(expected_ty.inner_named_type())
            else {
                return;
            };
            for (key, entry_value) in entries {
                if let Some(field) = input.fields.get(key) {
                    validate_value_usage(
                        errors,
                        schema,
                        variables,
                        &field.ty,
                        field.default_value.is_some(),
                        entry_value,
                    );
                }
            }
        }
        _ => {}
    }
}

/// Detects selections that cannot be merged under one response key:
/// different field names behind the same alias, or differing argument sets.
///
/// Fields contributed by fragments are considered when the fragment's type
/// condition matches the parent type, so that selections on sibling concrete
/// types do not conflict with each other.
fn check_field_merging(
    errors: &mut DiagnosticList,
    document: &ExecutableDocument,
    parent: &Name,
    selections: &[ast::Selection],
) {
    let mut fields: Vec<&Node<ast::Field>> = Vec::new();
    let mut visited = HashSet::default();
    collect_level_fields(document, parent, selections, &mut visited, &mut fields);

    let mut grouped: IndexMap<&Name, Vec<&Node<ast::Field>>> = IndexMap::default();
    for field in fields {
        grouped.entry(field.response_key()).or_default().push(field);
    }
    for (response_key, group) in &grouped {
        let first = group[0];
        for other in &group[1..] {
            if first.name != other.name {
                errors.push(
                    other.span(),
                    DiagnosticData::ConflictingFieldName {
                        response_key: (*response_key).clone(),
                        first: first.name.clone(),
                        second: other.name.clone(),
                    },
                );
                break;
            }
            if !same_arguments(&first.arguments, &other.arguments) {
                errors.push(
                    other.span(),
                    DiagnosticData::ConflictingFieldArguments {
                        response_key: (*response_key).clone(),
                    },
                );
                break;
            }
        }
    }
}

fn collect_level_fields<'a>(
    document: &'a ExecutableDocument,
    parent: &Name,
    selections: &'a [ast::Selection],
    visited: &mut HashSet<Name>,
    out: &mut Vec<&'a Node<ast::Field>>,
) {
    for selection in selections {
        match selection {
            ast::Selection::Field(field) => out.push(field),
            ast::Selection::FragmentSpread(spread) => {
                let Some(fragment) = document.fragments.get(&spread.fragment_name) else {
                    continue;
                };
                if fragment.type_condition == *parent
                    && visited.insert(spread.fragment_name.clone())
                {
                    collect_level_fields(
                        document,
                        parent,
                        &fragment.selection_set,
                        visited,
                        out,
                    );
                }
            }
            ast::Selection::InlineFragment(inline) => {
                let applies = match &inline.type_condition {
                    None => true,
                    Some(condition) => condition == parent,
                };
                if applies {
                    collect_level_fields(document, parent, &inline.selection_set, visited, out);
                }
            }
        }
    }
}

fn same_arguments(a: &[Node<ast::Argument>], b: &[Node<ast::Argument>]) -> bool {
    a.len() == b.len()
        && a.iter().all(|argument| {
            b.iter()
                .find(|other| other.name == argument.name)
                .is_some_and(|other| other.value == argument.value)
        })
}
