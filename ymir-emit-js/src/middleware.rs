//! Project-wide middleware lowering: `env`, `json`, `cors`.

use ymir_ast::middleware::Middleware;
use ymir_ast::option_value::OptionValue;

use crate::errors::EmissionError;

pub struct MiddlewareLowering {
    /// Extra top-of-file imports this middleware needs (e.g. an env loader).
    pub imports: String,
    /// `app.use(...)` lines installed in `build(app)`.
    pub install: String,
}

pub fn lower_middleware(middleware: &Middleware) -> Result<MiddlewareLowering, EmissionError> {
    match middleware.name.as_str() {
        "env" => Ok(MiddlewareLowering {
            imports: "require(\"dotenv\").config();\n".to_string(),
            install: String::new(),
        }),
        "json" => Ok(MiddlewareLowering {
            imports: String::new(),
            install: "    app.use(express.json());\n".to_string(),
        }),
        "cors" => {
            let origin_expr = middleware
                .options
                .get("origin")
                .map(option_value_to_js)
                .unwrap_or_else(|| "\"*\"".to_string());
            Ok(MiddlewareLowering {
                imports: "const cors = require(\"cors\");\n".to_string(),
                install: format!("    app.use(cors({{ origin: {origin_expr} }}));\n"),
            })
        }
        other => Err(EmissionError::UnknownMiddleware(other.to_string())),
    }
}

/// Lowers an option value used in a middleware argument position to a JS
/// expression. A `GlobalVariable("env", NAME)` becomes `process.env.NAME`.
pub fn option_value_to_js(value: &OptionValue) -> String {
    match value {
        OptionValue::String(s) => format!("\"{s}\""),
        OptionValue::Number(n) => n.to_string(),
        OptionValue::Bool(b) => b.to_string(),
        OptionValue::GlobalVariable { name, path } if name == "env" => {
            format!("process.env.{}", path.join("."))
        }
        OptionValue::GlobalVariable { name, path } => {
            format!("/* unresolved global {name}.{} */ undefined", path.join("."))
        }
        OptionValue::Map(_) | OptionValue::List(_) => {
            serde_json::to_string(&option_value_to_json(value)).unwrap_or_else(|_| "null".to_string())
        }
    }
}

fn option_value_to_json(value: &OptionValue) -> serde_json::Value {
    match value {
        OptionValue::String(s) => serde_json::Value::String(s.clone()),
        OptionValue::Number(n) => serde_json::Number::from_f64(*n).map(serde_json::Value::Number).unwrap_or(serde_json::Value::Null),
        OptionValue::Bool(b) => serde_json::Value::Bool(*b),
        OptionValue::Map(m) => serde_json::Value::Object(m.iter().map(|(k, v)| (k.clone(), option_value_to_json(v))).collect()),
        OptionValue::List(items) => serde_json::Value::Array(items.iter().map(option_value_to_json).collect()),
        OptionValue::GlobalVariable { name, path } => serde_json::Value::String(format!("{name}.{}", path.join("."))),
    }
}
