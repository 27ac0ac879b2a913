//! Java type mapping and path-variable translation.

use ymir_ast::path::QueryParamType;

/// `string -> String, int -> long, float -> double, bool -> boolean,
/// date/time -> java.time.*, any -> Object`.
pub fn query_param_java_type(param_type: QueryParamType) -> &'static str {
    match param_type {
        QueryParamType::String => "String",
        QueryParamType::Int => "long",
        QueryParamType::Float => "double",
        QueryParamType::Bool => "boolean",
        QueryParamType::Date => "java.time.LocalDate",
        QueryParamType::DateTime => "java.time.LocalDateTime",
        QueryParamType::Time => "java.time.LocalTime",
        QueryParamType::Any => "Object",
    }
}

/// Same primitive-name mapping, for body-schema leaf values. Returns `None` for a type name the
/// Java target has no mapping for.
pub fn body_field_java_type(type_name: &str) -> Option<&'static str> {
    Some(match type_name {
        "string" => "String",
        "int" => "long",
        "float" => "double",
        "boolean" => "boolean",
        "date" => "java.time.LocalDate",
        "datetime" => "java.time.LocalDateTime",
        "time" => "java.time.LocalTime",
        "any" => "Object",
        _ => return None,
    })
}

/// Translates `:name` segments to `{name}` for `@RequestMapping(path=...)`,
/// and returns the list of path-variable names in left-to-right order.
pub fn translate_path_variables(raw: &str) -> (String, Vec<String>) {
    let mut translated = String::with_capacity(raw.len());
    let mut names = Vec::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' {
            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next == '/' {
                    break;
                }
                name.push(next);
                chars.next();
            }
            translated.push('{');
            translated.push_str(&name);
            translated.push('}');
            names.push(name);
        } else {
            translated.push(c);
        }
    }
    (translated, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_single_path_variable() {
        let (translated, names) = translate_path_variables("/users/:id");
        assert_eq!(translated, "/users/{id}");
        assert_eq!(names, vec!["id".to_string()]);
    }

    #[test]
    fn translates_multiple_path_variables() {
        let (translated, names) = translate_path_variables("/teams/:teamId/members/:memberId");
        assert_eq!(translated, "/teams/{teamId}/members/{memberId}");
        assert_eq!(names, vec!["teamId".to_string(), "memberId".to_string()]);
    }

    #[test]
    fn leaves_plain_path_untouched() {
        let (translated, names) = translate_path_variables("/health");
        assert_eq!(translated, "/health");
        assert!(names.is_empty());
    }
}
