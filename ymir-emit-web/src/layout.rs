//! Common HTML document shell shared by every generated page.

pub fn page(title: &str, nav_links: &[(String, String)], body: &str) -> String {
    let nav = nav_links
        .iter()
        .map(|(href, label)| format!(r#"<a href="{href}">{label}</a>"#))
        .collect::<Vec<_>>()
        .join("\n    ");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="style.css">
  <script src="api-client.js" defer></script>
</head>
<body>
  <nav>
    {nav}
  </nav>
  <h1>{title}</h1>
{body}
</body>
</html>
"#
    )
}
