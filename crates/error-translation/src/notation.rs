/// Converts a GraphQL type reference into the nested wrapper notation of the
/// target engine: `[Float!]!` becomes `NonNull(List(NonNull(Float)))`.
pub fn wrapper_notation(ty: &str) -> String {
    let ty = ty.trim();

    if let Some(inner) = ty.strip_suffix('!') {
        return format!("NonNull({})", wrapper_notation(inner));
    }

    if let Some(inner) = ty.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        return format!("List({})", wrapper_notation(inner));
    }

    ty.to_owned()
}
