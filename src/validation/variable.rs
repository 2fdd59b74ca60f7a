use crate::ast;
use crate::ast::Type;
use crate::Node;

/// Whether a variable may be used at a position expecting `location_ty`.
///
/// A nullable variable can flow into a non-null position only when either
/// side provides a default to fall back on; wrappers must otherwise match,
/// with the variable allowed to be stricter.
pub(crate) fn usage_allowed(
    variable_def: &Node<ast::VariableDefinition>,
    location_ty: &Type,
    location_has_default: bool,
) -> bool {
    if location_ty.is_non_null() && !variable_def.ty.is_non_null() {
        let has_non_null_variable_default = variable_def
            .default_value
            .as_ref()
            .is_some_and(|default| !default.is_null());
        if !has_non_null_variable_default && !location_has_default {
            return false;
        }
        types_compatible(&variable_def.ty, &location_ty.clone().nullable())
    } else {
        types_compatible(&variable_def.ty, location_ty)
    }
}

/// Whether a value of `variable_ty` is acceptable wherever `location_ty`
/// is expected, accounting for list and non-null wrappers.
fn types_compatible(variable_ty: &Type, location_ty: &Type) -> bool {
    match (variable_ty, location_ty) {
        // A non-null location requires a non-null variable
        (Type::Named(_) | Type::List(_), Type::NonNullNamed(_) | Type::NonNullList(_)) => false,
        (Type::NonNullNamed(variable), Type::NonNullNamed(location)) => variable == location,
        (Type::NonNullList(variable), Type::NonNullList(location)) => {
            types_compatible(variable, location)
        }
        // A non-null variable satisfies a nullable location
        (Type::NonNullNamed(variable), location) => {
            types_compatible(&Type::Named(variable.clone()), location)
        }
        (Type::NonNullList(variable), location) => {
            types_compatible(&Type::List(variable.clone()), location)
        }
        (Type::List(variable), Type::List(location)) => types_compatible(variable, location),
        (Type::List(_), Type::Named(_)) | (Type::Named(_), Type::List(_)) => false,
        (Type::Named(variable), Type::Named(location)) => variable == location,
    }
}
