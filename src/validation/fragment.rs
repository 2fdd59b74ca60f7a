use crate::ast;
use crate::collections::HashSet;
use crate::schema::DirectiveLocation;
use crate::validation::selection::validate_directives;
use crate::validation::DiagnosticData;
use crate::validation::DiagnosticList;
use crate::validation::Valid;
use crate::ExecutableDocument;
use crate::Name;
use crate::Schema;

pub(crate) fn validate_fragment_definitions(
    errors: &mut DiagnosticList,
    schema: &Valid<Schema>,
    document: &ExecutableDocument,
) {
    for fragment in document.fragments.values() {
        validate_directives(
            errors,
            schema,
            None,
            &fragment.directives,
            DirectiveLocation::FragmentDefinition,
        );
        match schema.types.get(&fragment.type_condition) {
            None => errors.push(
                fragment.span(),
                DiagnosticData::UndefinedDefinition {
                    name: fragment.type_condition.clone(),
                },
            ),
            Some(def) if !def.is_composite() => errors.push(
                fragment.span(),
                DiagnosticData::InvalidFragmentTarget {
                    on: fragment.type_condition.clone(),
                    describe: def.describe(),
                },
            ),
            Some(_) => {}
        }
    }
    detect_cycles(errors, document);
}

/// Fragment definitions must form a DAG through their spreads.
///
/// Each cycle is reported once, at its first fragment in definition order,
/// with the full path spelled out.
fn detect_cycles(errors: &mut DiagnosticList, document: &ExecutableDocument) {
    let mut in_reported_cycle: HashSet<Name> = HashSet::default();
    for name in document.fragments.keys() {
        if in_reported_cycle.contains(name) {
            continue;
        }
        let mut path = Vec::new();
        let mut visited = HashSet::default();
        if find_cycle(document, name, name, &mut path, &mut visited) {
            for member in &path {
                in_reported_cycle.insert((*member).clone());
            }
            let cycle = path
                .iter()
                .map(|member| member.as_str())
                .chain([name.as_str()])
                .collect::<Vec<_>>()
                .join(" -> ");
            errors.push(
                document.fragments[name].span(),
                DiagnosticData::FragmentCycle {
                    name: name.clone(),
                    cycle,
                },
            );
        }
    }
}

fn find_cycle<'a>(
    document: &'a ExecutableDocument,
    root: &Name,
    current: &'a Name,
    path: &mut Vec<&'a Name>,
    visited: &mut HashSet<&'a Name>,
) -> bool {
    let Some(fragment) = document.fragments.get(current) else {
        return false;
    };
    path.push(current);
    let mut spreads = Vec::new();
    collect_spreads(&fragment.selection_set, &mut spreads);
    for spread in spreads {
        if spread == root {
            return true;
        }
        if visited.insert(spread) && find_cycle(document, root, spread, path, visited) {
            return true;
        }
    }
    path.pop();
    false
}

fn collect_spreads<'a>(selections: &'a [ast::Selection], out: &mut Vec<&'a Name>) {
    for selection in selections {
        match selection {
            ast::Selection::Field(field) => collect_spreads(&field.selection_set, out),
            ast::Selection::FragmentSpread(spread) => out.push(&spread.fragment_name),
            ast::Selection::InlineFragment(inline) => {
                collect_spreads(&inline.selection_set, out)
            }
        }
    }
}
