use crate::collections::HashSet;
use crate::schema::DirectiveLocation;
use crate::validation::selection::validate_directives;
use crate::validation::DiagnosticData;
use crate::validation::DiagnosticList;
use crate::validation::Valid;
use crate::validation::Walker;
use crate::ExecutableDocument;
use crate::Name;
use crate::Schema;

pub(crate) fn validate_operations(
    errors: &mut DiagnosticList,
    schema: &Valid<Schema>,
    document: &ExecutableDocument,
    reached_fragments: &mut HashSet<Name>,
) {
    for operation in document.all_operations() {
        validate_directives(
            errors,
            schema,
            Some(&operation.variables),
            &operation.directives,
            DirectiveLocation::from_operation_type(operation.operation_type),
        );

        let mut seen = HashSet::default();
        for variable in &operation.variables {
            if !seen.insert(variable.name.clone()) {
                errors.push(
                    variable.span(),
                    DiagnosticData::UniqueVariable {
                        name: variable.name.clone(),
                    },
                );
                continue;
            }
            let inner = variable.ty.inner_named_type();
            match schema.types.get(inner) {
                None => errors.push(
                    variable.span(),
                    DiagnosticData::UndefinedDefinition {
                        name: inner.clone(),
                    },
                ),
                Some(def) if !def.is_input_type() => errors.push(
                    variable.span(),
                    DiagnosticData::VariableInputType {
                        name: variable.name.clone(),
                        ty: (*variable.ty).clone(),
                    },
                ),
                Some(_) => {}
            }
        }

        let Some(root) = schema.root_operation(operation.operation_type) else {
            errors.push(
                operation.span(),
                DiagnosticData::UnsupportedOperation {
                    operation_type: operation.operation_type,
                },
            );
            continue;
        };
        let mut walker = Walker::new(
            schema,
            document,
            Some(&operation.variables),
            reached_fragments,
        );
        walker.selection_set(errors, root, &operation.selection_set);
    }
}
