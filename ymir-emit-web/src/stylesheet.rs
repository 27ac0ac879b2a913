//! Shared stylesheet for every generated page.

pub fn stylesheet() -> &'static str {
    r#"
:root {
  color-scheme: light dark;
  --border: #d0d0d0;
  --accent: #2563eb;
}

body {
  font-family: system-ui, sans-serif;
  margin: 2rem auto;
  max-width: 960px;
  padding: 0 1rem;
}

nav a { margin-right: 1rem; }

table {
  border-collapse: collapse;
  width: 100%;
}

th, td {
  border: 1px solid var(--border);
  padding: 0.5rem 0.75rem;
  text-align: left;
}

fieldset {
  border: 1px solid var(--border);
  border-radius: 4px;
  margin-bottom: 1rem;
}

label { display: block; margin-bottom: 0.5rem; }

input, button {
  font: inherit;
  padding: 0.4rem 0.6rem;
}

button {
  background: var(--accent);
  color: white;
  border: none;
  border-radius: 4px;
  cursor: pointer;
}

.row-actions button { margin-right: 0.25rem; }
"#
}
