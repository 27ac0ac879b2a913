//! Per-auth-block lowering: one private authentication
//! method on `YmirRestBase` per auth block, plus (for Bearer/Basic and
//! Bearer/Full) the login/logout route source wired in by `build(app)`.

use ymir_ast::auth::{AuthBlock, AuthSource, AuthType, BearerMode};
use ymir_config::CompilerConfig;

use crate::errors::EmissionError;
use crate::middleware::option_value_to_js;

pub struct AuthLowering {
    /// Methods appended to the `YmirRestBase` class body.
    pub class_methods: String,
    /// Extra `app.post(...)` registrations (login/logout), empty for modes
    /// that don't need one.
    pub extra_routes: String,
}

pub fn lower_auth_block(block: &AuthBlock, config: &CompilerConfig) -> Result<AuthLowering, EmissionError> {
    let name = block.display_name();
    match block.auth_type {
        AuthType::ApiKey => Ok(lower_api_key(block, &name)),
        AuthType::Bearer => {
            if !matches!(block.source, AuthSource::Header) {
                return Err(EmissionError::UnsupportedBearerSource {
                    identity: block.identity(),
                    source: block.source,
                });
            }
            match config.generate_bearer_auth {
                BearerMode::None => Ok(lower_bearer_none(&name)),
                BearerMode::Basic => Ok(lower_bearer_basic(block, &name)),
                BearerMode::Full => Ok(lower_bearer_full(block, &name)),
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

fn login_path(block: &AuthBlock, name: &str) -> String {
    block
        .options
        .get("loginPath")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("/auth/{}/login", name.to_lowercase()))
}

fn logout_path(block: &AuthBlock, name: &str) -> String {
    block
        .options
        .get("logoutPath")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("/auth/{}/logout", name.to_lowercase()))
}

fn with_logout(block: &AuthBlock) -> bool {
    block.options.get("withLogout").and_then(|v| v.as_bool()).unwrap_or(true)
}

fn secret_expr(block: &AuthBlock) -> String {
    block.options.get("secret").map(option_value_to_js).unwrap_or_else(|| "process.env.JWT_SECRET".to_string())
}

fn expires_in(block: &AuthBlock) -> String {
    block.options.get("expiresIn").and_then(|v| v.as_str()).unwrap_or("1h").to_string()
}

fn extract_source(block: &AuthBlock) -> String {
    match block.source {
        AuthSource::Header => format!("getHeader(req.headers, \"{}\")", block.field),
        AuthSource::Query => format!("req.query[\"{}\"]", block.field),
        AuthSource::Body => format!("(req.body || {{}})[\"{}\"]", block.field),
    }
}

fn lower_api_key(block: &AuthBlock, name: &str) -> AuthLowering {
    let extract = extract_source(block);
    let authorize = if block.authorization_in_use {
        format!(
            r#"
  async #authorize{name}(apiKey, roles) {{
    if (typeof this.authorize{name} !== "function") {{
      throw new Error("authorize{name}(apiKey, roles) must be implemented by a subclass");
    }}
    return this.authorize{name}(apiKey, roles);
  }}
"#,
            name = name
        )
    } else {
        String::new()
    };
    let methods = format!(
        r#"
  async #handle{name}Authentication(req) {{
    const apiKey = {extract};
    if (apiKey === undefined) {{
      return false;
    }}
    if (typeof this.authenticate{name} !== "function") {{
      throw new Error("authenticate{name}(apiKey) must be implemented by a subclass");
    }}
    return this.authenticate{name}(apiKey);
  }}
{authorize}"#,
        name = name,
        extract = extract,
        authorize = authorize
    );
    AuthLowering { class_methods: methods, extra_routes: String::new() }
}

fn lower_bearer_none(name: &str) -> AuthLowering {
    let methods = format!(
        r#"
  async #handle{name}Authentication(req) {{
    const header = getHeader(req.headers, "Authorization");
    if (!header || !header.startsWith("Bearer ")) {{
      return false;
    }}
    const jwt = header.slice("Bearer ".length);
    if (typeof this.authenticate{name} !== "function") {{
      throw new Error("authenticate{name}(jwt) must be implemented by a subclass");
    }}
    return this.authenticate{name}(jwt);
  }}
"#,
        name = name
    );
    AuthLowering { class_methods: methods, extra_routes: String::new() }
}

fn lower_bearer_basic(block: &AuthBlock, name: &str) -> AuthLowering {
    let username_field = username_field(block);
    let password_field = password_field(block);
    let read_creds = format!("const {{ {username_field}, {password_field} }} = req.body || {{}};");
    let logout_enabled = with_logout(block);

    let logout_method = if logout_enabled {
        format!(
            r#"
  async #logout{name}(req, res) {{
    const header = getHeader(req.headers, "Authorization");
    const jwt = header && header.startsWith("Bearer ") ? header.slice("Bearer ".length) : undefined;
    if (typeof this.logout{name} === "function") {{
      await this.logout{name}(jwt);
    }}
    res.status(200).json({{ ok: true }});
  }}
"#,
            name = name
        )
    } else {
        String::new()
    };

    let methods = format!(
        r#"
  async #handle{name}Authentication(req) {{
    const header = getHeader(req.headers, "Authorization");
    if (!header || !header.startsWith("Bearer ")) {{
      return false;
    }}
    const jwt = header.slice("Bearer ".length);
    if (typeof this.validateJwtFor{name} !== "function") {{
      throw new Error("validateJwtFor{name}(jwt) must be implemented by a subclass");
    }}
    return this.validateJwtFor{name}(jwt);
  }}

  async #login{name}(req, res) {{
    {read_creds}
    if (typeof this.generateJwtFor{name} !== "function") {{
      throw new Error("generateJwtFor{name}(user, pass) must be implemented by a subclass");
    }}
    const token = await this.generateJwtFor{name}({username_field}, {password_field});
    if (!token) {{
      res.status(401).json({{ error: Messages._401() }});
      return;
    }}
    res.status(200).json({{ token }});
  }}
{logout_method}"#,
        name = name,
        read_creds = read_creds,
        username_field = username_field,
        password_field = password_field,
        logout_method = logout_method,
    );
    let mut extra_routes = format!(
        r#"    app.post("{login}", (req, res) => this.#login{name}(req, res));
"#,
        login = login_path(block, name),
        name = name
    );
    if logout_enabled {
        extra_routes.push_str(&format!(
            r#"    app.post("{logout}", (req, res) => this.#logout{name}(req, res));
"#,
            logout = logout_path(block, name),
            name = name
        ));
    }
    AuthLowering { class_methods: methods, extra_routes }
}

fn lower_bearer_full(block: &AuthBlock, name: &str) -> AuthLowering {
    let secret = secret_expr(block);
    let username_field = username_field(block);
    let password_field = password_field(block);
    let expires_in = expires_in(block);
    let logout_enabled = with_logout(block);

    let logout_method = if logout_enabled {
        format!(
            r#"
  async #logout{name}(req, res) {{
    res.status(200).json({{ ok: true }});
  }}
"#,
            name = name
        )
    } else {
        String::new()
    };

    let methods = format!(
        r#"
  async #handle{name}Authentication(req) {{
    const header = getHeader(req.headers, "Authorization");
    if (!header || !header.startsWith("Bearer ")) {{
      return false;
    }}
    const jwt = header.slice("Bearer ".length);
    try {{
      const payload = jsonwebtoken.verify(jwt, {secret});
      if (typeof this.validateJwtPayloadFor{name} !== "function") {{
        throw new Error("validateJwtPayloadFor{name}(payload) must be implemented by a subclass");
      }}
      return this.validateJwtPayloadFor{name}(payload);
    }} catch (err) {{
      return false;
    }}
  }}

  async #login{name}(req, res) {{
    const {{ {username_field}, {password_field} }} = req.body || {{}};
    if (typeof this.getJwtPayloadFor{name} !== "function") {{
      throw new Error("getJwtPayloadFor{name}(user, pass) must be implemented by a subclass");
    }}
    const payload = await this.getJwtPayloadFor{name}({username_field}, {password_field});
    if (!payload) {{
      res.status(401).json({{ error: Messages._401() }});
      return;
    }}
    const token = jsonwebtoken.sign(payload, {secret}, {{ expiresIn: "{expires_in}" }});
    res.status(200).json({{ token }});
  }}
{logout_method}"#,
        name = name,
        secret = secret,
        username_field = username_field,
        password_field = password_field,
        expires_in = expires_in,
        logout_method = logout_method,
    );
    let mut extra_routes = format!(
        r#"    app.post("{login}", (req, res) => this.#login{name}(req, res));
"#,
        login = login_path(block, name),
        name = name
    );
    if logout_enabled {
        extra_routes.push_str(&format!(
            r#"    app.post("{logout}", (req, res) => this.#logout{name}(req, res));
"#,
            logout = logout_path(block, name),
            name = name
        ));
    }
    AuthLowering { class_methods: methods, extra_routes }
}
