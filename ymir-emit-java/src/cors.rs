//! CORS middleware lowering: `CorsConfigurationMVC`, plus a
//! Spring-Security variant when `useSpringSecurity` is configured.

use ymir_ast::middleware::Middleware;
use ymir_ast::option_value::OptionValue;
use ymir_config::CompilerConfig;

use crate::ir::{ClassBuilder, MethodBuilder};

pub fn emit_cors(middleware: &Middleware, config: &CompilerConfig) -> Vec<ClassBuilder> {
    let origin = middleware
        .options
        .get("origin")
        .map(option_value_to_java_string_literal)
        .unwrap_or_else(|| "\"*\"".to_string());

    let mut classes = vec![cors_configuration_mvc(&origin, &config.target.config)];
    if config.target.use_spring_security {
        classes.push(cors_configuration_security(&origin, &config.target.config));
    }
    classes
}

fn option_value_to_java_string_literal(value: &OptionValue) -> String {
    match value {
        OptionValue::String(s) => format!("\"{s}\""),
        OptionValue::GlobalVariable { name, path } if name == "env" => {
            format!("System.getenv(\"{}\")", path.join("."))
        }
        _ => "\"*\"".to_string(),
    }
}

fn cors_configuration_mvc(origin: &str, config_package: &str) -> ClassBuilder {
    let mut class = ClassBuilder::new(config_package, "CorsConfigurationMVC", false);
    class.add_import("org.springframework.context.annotation.Configuration");
    class.add_import("org.springframework.web.servlet.config.annotation.CorsRegistry");
    class.add_import("org.springframework.web.servlet.config.annotation.WebMvcConfigurer");
    class.annotations.push("@Configuration".to_string());
    class.implements.push("WebMvcConfigurer".to_string());

    let mut add_cors_mappings = MethodBuilder::new("void", "addCorsMappings");
    add_cors_mappings.annotations.push("@Override".to_string());
    add_cors_mappings.params.push(crate::ir::ParamBuilder::new("CorsRegistry", "registry"));
    add_cors_mappings
        .body_lines
        .push(format!("registry.addMapping(\"/**\").allowedOrigins({origin});"));
    class.methods.push(add_cors_mappings);
    class
}

fn cors_configuration_security(origin: &str, config_package: &str) -> ClassBuilder {
    let mut class = ClassBuilder::new(config_package, "CorsConfiguration", false);
    class.add_import("org.springframework.context.annotation.Bean");
    class.add_import("org.springframework.context.annotation.Configuration");
    class.add_import("org.springframework.security.config.annotation.web.builders.HttpSecurity");
    class.add_import("org.springframework.security.web.SecurityFilterChain");
    class.annotations.push("@Configuration".to_string());

    let mut chain = MethodBuilder::new("SecurityFilterChain", "securityFilterChain");
    chain.annotations.push("@Bean".to_string());
    chain.params.push(crate::ir::ParamBuilder::new("HttpSecurity", "http"));
    chain.throws.push("Exception".to_string());
    chain
        .body_lines
        .push(format!("http.cors(cors -> cors.configurationSource(request -> {{ var c = new org.springframework.web.cors.CorsConfiguration(); c.addAllowedOrigin({origin}); return c; }}));"));
    chain.body_lines.push("return http.build();".to_string());
    class.methods.push(chain);
    class
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn emits_only_mvc_config_without_spring_security() {
        let middleware = Middleware { name: "cors".to_string(), options: Default::default(), position: pos() };
        let classes = emit_cors(&middleware, &CompilerConfig::default());
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "CorsConfigurationMVC");
    }

    #[test]
    fn emits_security_variant_when_configured() {
        let middleware = Middleware { name: "cors".to_string(), options: Default::default(), position: pos() };
        let mut config = CompilerConfig::default();
        config.target.use_spring_security = true;
        let classes = emit_cors(&middleware, &config);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[1].name, "CorsConfiguration");
    }
}
