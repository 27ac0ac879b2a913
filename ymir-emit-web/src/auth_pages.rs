//! Login/logout pages, generated only when the project defines a
//! Bearer/Full auth block.

use ymir_ast::auth::AuthBlock;

use crate::forms::GeneratedPage;
use crate::layout::page;

pub fn emit_login_page(block: &AuthBlock) -> GeneratedPage {
    let identity = block.identity();
    let body = format!(
        r#"<form id="ymir-login-form">
  <label>Username
    <input type="text" name="username">
  </label>
  <label>Password
    <input type="password" name="password">
  </label>
  <button type="submit">Log in</button>
</form>
<script>
document.getElementById("ymir-login-form").addEventListener("submit", async (event) => {{
  event.preventDefault();
  const formData = new FormData(event.target);
  const result = await ymirApiClient.post("/auth/{identity}/login", {{
    username: formData.get("username"),
    password: formData.get("password"),
  }});
  ymirApiClient.setToken(result.token);
  window.location.href = "index.html";
}});
</script>
"#
    );
    GeneratedPage { path: "login.html".to_string(), content: page("Log in", &[], &body) }
}

pub fn emit_logout_page(block: &AuthBlock) -> GeneratedPage {
    let identity = block.identity();
    let body = format!(
        r#"<p>Signing out…</p>
<script>
(async () => {{
  await ymirApiClient.post("/auth/{identity}/logout");
  ymirApiClient.setToken(null);
  window.location.href = "login.html";
}})();
</script>
"#
    );
    GeneratedPage { path: "logout.html".to_string(), content: page("Log out", &[], &body) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_ast::auth::{AuthSource, AuthType};
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn login_page_posts_to_identity_scoped_path() {
        let block = AuthBlock {
            auth_type: AuthType::Bearer,
            source: AuthSource::Header,
            field: "Authorization".to_string(),
            alias: Some("bearer".to_string()),
            is_default_access: true,
            options: Default::default(),
            authorization_in_use: false,
            position: pos(),
        };
        let page = emit_login_page(&block);
        assert!(page.content.contains("/auth/bearer/login"));
    }
}
