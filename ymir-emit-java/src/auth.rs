//! Per-auth-block lowering for the Java target: one
//! `<Name>Authenticator` interface per auth block, plus (Bearer/Basic,
//! Bearer/Full) a `<Name>AuthController` and, for Bearer/Full, a
//! `<Name>AuthUtil` that signs/verifies the token.

use ymir_ast::auth::{AuthBlock, AuthSource, AuthType, BearerMode};
use ymir_ast::option_value::OptionValue;
use ymir_config::CompilerConfig;

use crate::errors::EmissionError;
use crate::ir::{ClassBuilder, FieldBuilder, MethodBuilder, ParamBuilder};

pub fn lower_auth_block(
    block: &AuthBlock,
    config: &CompilerConfig,
    auth_package: &str,
) -> Result<Vec<ClassBuilder>, EmissionError> {
    let name = block.display_name();
    match block.auth_type {
        AuthType::ApiKey => Ok(vec![api_key_interface(block, &name, auth_package)]),
        AuthType::Bearer => {
            if !matches!(block.source, AuthSource::Header) {
                return Err(EmissionError::UnsupportedBearerSource { identity: block.identity(), source: block.source });
            }
            match config.generate_bearer_auth {
                BearerMode::None => Ok(vec![bearer_none_interface(&name, auth_package)]),
                BearerMode::Basic => Ok(vec![
                    bearer_basic_interface(&name, auth_package),
                    auth_controller(block, &name, auth_package, BearerMode::Basic),
                ]),
                BearerMode::Full => Ok(vec![
                    bearer_full_interface(&name, auth_package),
                    bearer_full_util(block, &name, auth_package),
                    auth_controller(block, &name, auth_package, BearerMode::Full),
                ]),
            }
        }
    }
}

fn username_field(block: &AuthBlock) -> String {
    block.options.get("usernameField").and_then(|v| v.as_str()).unwrap_or("username").to_string()
}

fn password_field(block: &AuthBlock) -> String {
    block.options.get("passwordField").and_then(|v| v.as_str()).unwrap_or("password").to_string()
}

/// Path mapped by `@PostMapping` on the login endpoint, relative to the
/// controller's `@RequestMapping("/auth/<name>")` base.
fn login_path(block: &AuthBlock) -> String {
    block.options.get("loginPath").and_then(|v| v.as_str()).unwrap_or("/login").to_string()
}

fn logout_path(block: &AuthBlock) -> String {
    block.options.get("logoutPath").and_then(|v| v.as_str()).unwrap_or("/logout").to_string()
}

fn with_logout(block: &AuthBlock) -> bool {
    block.options.get("withLogout").and_then(|v| v.as_bool()).unwrap_or(true)
}

/// Lowers a configured secret (literal string, or `@env.NAME`) to a Java
/// expression evaluating to the secret bytes source.
fn secret_java_expr(block: &AuthBlock) -> String {
    match block.options.get("secret") {
        Some(OptionValue::String(s)) => format!("\"{s}\""),
        Some(OptionValue::GlobalVariable { name, path }) if name == "env" => {
            format!("System.getenv(\"{}\")", path.join("."))
        }
        _ => "System.getenv(\"JWT_SECRET\")".to_string(),
    }
}

/// Parses the `expiresIn` option (`"1h"`, `"30m"`, `"45s"`, or a bare number
/// of milliseconds) into milliseconds, defaulting to one hour.
fn expires_in_millis(block: &AuthBlock) -> i64 {
    const HOUR: i64 = 3_600_000;
    match block.options.get("expiresIn") {
        Some(OptionValue::Number(n)) => *n as i64,
        Some(OptionValue::String(s)) => {
            let s = s.trim();
            if let Some(digits) = s.strip_suffix("ms") {
                digits.parse().unwrap_or(HOUR)
            } else if let Some(digits) = s.strip_suffix('h') {
                digits.parse::<i64>().map(|n| n * HOUR).unwrap_or(HOUR)
            } else if let Some(digits) = s.strip_suffix('m') {
                digits.parse::<i64>().map(|n| n * 60_000).unwrap_or(HOUR)
            } else if let Some(digits) = s.strip_suffix('s') {
                digits.parse::<i64>().map(|n| n * 1_000).unwrap_or(HOUR)
            } else {
                s.parse().unwrap_or(HOUR)
            }
        }
        _ => HOUR,
    }
}

fn api_key_interface(block: &AuthBlock, name: &str, package: &str) -> ClassBuilder {
    let mut iface = ClassBuilder::new(package, format!("{name}Authenticator"), true);
    let mut authenticate = MethodBuilder::new("boolean", format!("authenticate{name}"));
    authenticate.params.push(ParamBuilder::new("String", "apiKey"));
    iface.methods.push(authenticate);
    if block.authorization_in_use {
        let mut authorize = MethodBuilder::new("boolean", format!("authorize{name}"));
        authorize.params.push(ParamBuilder::new("String", "apiKey"));
        authorize.params.push(ParamBuilder::new("java.util.List<String>", "roles"));
        iface.methods.push(authorize);
    }
    iface
}

fn bearer_none_interface(name: &str, package: &str) -> ClassBuilder {
    let mut iface = ClassBuilder::new(package, format!("{name}Authenticator"), true);
    let mut authenticate = MethodBuilder::new("boolean", format!("authenticate{name}"));
    authenticate.params.push(ParamBuilder::new("String", "jwt"));
    iface.methods.push(authenticate);
    iface
}

fn bearer_basic_interface(name: &str, package: &str) -> ClassBuilder {
    let mut iface = ClassBuilder::new(package, format!("{name}Authenticator"), true);
    let mut validate = MethodBuilder::new("boolean", format!("validateJwtFor{name}"));
    validate.params.push(ParamBuilder::new("String", "jwt"));
    iface.methods.push(validate);

    let mut generate = MethodBuilder::new("String", format!("generateJwtFor{name}"));
    generate.params.push(ParamBuilder::new("String", "username"));
    generate.params.push(ParamBuilder::new("String", "password"));
    iface.methods.push(generate);

    let mut logout = MethodBuilder::new("void", format!("logout{name}"));
    logout.params.push(ParamBuilder::new("String", "jwt"));
    iface.methods.push(logout);
    iface
}

fn bearer_full_interface(name: &str, package: &str) -> ClassBuilder {
    let mut iface = ClassBuilder::new(package, format!("{name}Authenticator"), true);
    let mut get_payload = MethodBuilder::new("Object", format!("getJwtPayloadFor{name}"));
    get_payload.params.push(ParamBuilder::new("String", "username"));
    get_payload.params.push(ParamBuilder::new("String", "password"));
    iface.methods.push(get_payload);

    let mut validate_payload = MethodBuilder::new("boolean", format!("validateJwtPayloadFor{name}"));
    validate_payload.params.push(ParamBuilder::new("Object", "payload"));
    iface.methods.push(validate_payload);
    iface
}

/// Signs/verifies a Bearer/Full token via an algorithm constant initialized
/// from a configurable secret, with an expiration drawn from `expiresIn`.
fn bearer_full_util(block: &AuthBlock, name: &str, package: &str) -> ClassBuilder {
    let mut class = ClassBuilder::new(package, format!("{name}AuthUtil"), false);
    class.add_import("io.jsonwebtoken.Jwts");
    class.add_import("io.jsonwebtoken.SignatureAlgorithm");
    class.add_import("io.jsonwebtoken.security.Keys");

    class.add_field(FieldBuilder {
        access: "private static final".to_string(),
        java_type: "SignatureAlgorithm".to_string(),
        name: "ALGORITHM".to_string(),
        annotations: Vec::new(),
        initializer: Some("SignatureAlgorithm.HS256".to_string()),
    });
    class.add_field(FieldBuilder {
        access: "private static final".to_string(),
        java_type: "String".to_string(),
        name: "SECRET".to_string(),
        annotations: Vec::new(),
        initializer: Some(secret_java_expr(block)),
    });
    class.add_field(FieldBuilder {
        access: "private static final".to_string(),
        java_type: "long".to_string(),
        name: "EXPIRES_IN_MILLIS".to_string(),
        annotations: Vec::new(),
        initializer: Some(format!("{}L", expires_in_millis(block))),
    });

    let mut sign = MethodBuilder::new("String", "sign");
    sign.params.push(ParamBuilder::new("Object", "payload"));
    sign.body_lines.push("return Jwts.builder().setClaims((java.util.Map<String, Object>) payload).setExpiration(new java.util.Date(System.currentTimeMillis() + EXPIRES_IN_MILLIS)).signWith(Keys.hmacShaKeyFor(SECRET.getBytes()), ALGORITHM).compact();".to_string());
    class.methods.push(sign);

    let mut verify = MethodBuilder::new("Object", "verify");
    verify.params.push(ParamBuilder::new("String", "token"));
    verify.throws.push("Exception".to_string());
    verify.body_lines.push("return Jwts.parserBuilder().setSigningKey(Keys.hmacShaKeyFor(SECRET.getBytes())).build().parseClaimsJws(token).getBody();".to_string());
    class.methods.push(verify);

    class
}

fn auth_controller(block: &AuthBlock, name: &str, package: &str, mode: BearerMode) -> ClassBuilder {
    let username_field = username_field(block);
    let password_field = password_field(block);
    let logout_enabled = with_logout(block);

    let mut controller = ClassBuilder::new(package, format!("{name}AuthController"), false);
    controller.add_import("org.springframework.web.bind.annotation.RestController");
    controller.add_import("org.springframework.web.bind.annotation.RequestMapping");
    controller.add_import("org.springframework.web.bind.annotation.PostMapping");
    controller.add_import("org.springframework.web.bind.annotation.RequestBody");
    controller.add_import("org.springframework.beans.factory.annotation.Autowired");
    controller.annotations.push("@RestController".to_string());
    controller.annotations.push(format!("@RequestMapping(\"/auth/{}\")", name.to_lowercase()));

    controller.add_field(FieldBuilder {
        access: "private".to_string(),
        java_type: format!("{name}Authenticator"),
        name: "handler".to_string(),
        annotations: vec!["@Autowired".to_string()],
        initializer: None,
    });
    if mode == BearerMode::Full {
        controller.add_field(FieldBuilder {
            access: "private".to_string(),
            java_type: format!("{name}AuthUtil"),
            name: "util".to_string(),
            annotations: vec!["@Autowired".to_string()],
            initializer: None,
        });
    }

    let mut login = MethodBuilder::new("Object", "login");
    login.annotations.push(format!("@PostMapping(\"{}\")", login_path(block)));
    login.params.push({
        let mut p = ParamBuilder::new("java.util.Map<String, String>", "credentials");
        p.annotation = Some("@RequestBody".to_string());
        p
    });
    match mode {
        BearerMode::Full => {
            login.body_lines.push(format!(
                "Object payload = handler.getJwtPayloadFor{name}(credentials.get(\"{username_field}\"), credentials.get(\"{password_field}\"));"
            ));
            login.body_lines.push("if (payload == null) {".to_string());
            login.body_lines.push("    return java.util.Map.of(\"error\", \"unauthorized\");".to_string());
            login.body_lines.push("}".to_string());
            login.body_lines.push("return java.util.Map.of(\"token\", util.sign(payload));".to_string());
        }
        _ => {
            login.body_lines.push(format!(
                "String token = handler.generateJwtFor{name}(credentials.get(\"{username_field}\"), credentials.get(\"{password_field}\"));"
            ));
            login.body_lines.push("if (token == null) {".to_string());
            login.body_lines.push("    return java.util.Map.of(\"error\", \"unauthorized\");".to_string());
            login.body_lines.push("}".to_string());
            login.body_lines.push("return java.util.Map.of(\"token\", token);".to_string());
        }
    }
    controller.methods.push(login);

    if logout_enabled {
        let mut logout = MethodBuilder::new("Object", "logout");
        logout.annotations.push(format!("@PostMapping(\"{}\")", logout_path(block)));
        if mode == BearerMode::Basic {
            controller.add_import("org.springframework.web.bind.annotation.RequestHeader");
            logout.params.push({
                let mut p = ParamBuilder::new("String", "authorization");
                p.annotation = Some("@RequestHeader(\"Authorization\")".to_string());
                p
            });
            logout.body_lines.push("String jwt = authorization != null && authorization.startsWith(\"Bearer \") ? authorization.substring(7) : null;".to_string());
            logout.body_lines.push(format!("handler.logout{name}(jwt);"));
        }
        logout.body_lines.push("return java.util.Map.of(\"ok\", true);".to_string());
        controller.methods.push(logout);
    }

    controller
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    fn block(auth_type: AuthType, source: AuthSource, alias: Option<&str>) -> AuthBlock {
        AuthBlock {
            auth_type,
            source,
            field: "Authorization".to_string(),
            alias: alias.map(|s| s.to_string()),
            is_default_access: false,
            options: Default::default(),
            authorization_in_use: false,
            position: pos(),
        }
    }

    #[test]
    fn api_key_lowers_to_single_interface() {
        let b = block(AuthType::ApiKey, AuthSource::Header, Some("apiKey"));
        let classes = lower_auth_block(&b, &CompilerConfig::default(), "com.ymir.generated.auth").unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "ApiKeyAuthenticator");
        assert!(classes[0].is_interface);
    }

    #[test]
    fn bearer_full_generates_interface_util_and_controller() {
        let b = block(AuthType::Bearer, AuthSource::Header, Some("bearer"));
        let mut cfg = CompilerConfig::default();
        cfg.generate_bearer_auth = BearerMode::Full;
        let classes = lower_auth_block(&b, &cfg, "com.ymir.generated.auth").unwrap();
        assert_eq!(classes.len(), 3);
        assert_eq!(classes[0].name, "BearerAuthenticator");
        assert_eq!(classes[1].name, "BearerAuthUtil");
        assert_eq!(classes[2].name, "BearerAuthController");
    }

    #[test]
    fn bearer_sourced_from_body_is_rejected() {
        let b = block(AuthType::Bearer, AuthSource::Body, Some("bearer"));
        let err = lower_auth_block(&b, &CompilerConfig::default(), "com.ymir.generated.auth").unwrap_err();
        assert!(matches!(err, EmissionError::UnsupportedBearerSource { .. }));
    }
}
