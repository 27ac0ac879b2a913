//! Body-schema leaf type to `<input>` type mapping shared by the form
//! emitter.

pub fn input_type_for(type_name: &str) -> &'static str {
    match type_name {
        "int" | "float" => "number",
        "boolean" => "checkbox",
        "date" => "date",
        "datetime" => "datetime-local",
        "time" => "time",
        _ => "text",
    }
}
