//! Class/method/field builder IR for the Java target. Every builder is a plain struct whose fields are
//! pushed into directly; `render()` is the only thing that turns it into
//! text.

/// One parameter in a method signature: `@Annotation Type name`.
#[derive(Debug, Clone)]
pub struct ParamBuilder {
    pub annotation: Option<String>,
    pub java_type: String,
    pub name: String,
}

impl ParamBuilder {
    pub fn new(java_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self { annotation: None, java_type: java_type.into(), name: name.into() }
    }

    pub fn render(&self) -> String {
        match &self.annotation {
            Some(a) => format!("{a} {} {}", self.java_type, self.name),
            None => format!("{} {}", self.java_type, self.name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldBuilder {
    pub access: String,
    pub java_type: String,
    pub name: String,
    pub annotations: Vec<String>,
    pub initializer: Option<String>,
}

impl FieldBuilder {
    /// Fields added to a class are private by construction.
    pub fn new(java_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self { access: "private".to_string(), java_type: java_type.into(), name: name.into(), annotations: Vec::new(), initializer: None }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for annotation in &self.annotations {
            out.push_str(&format!("  {annotation}\n"));
        }
        match &self.initializer {
            Some(init) => out.push_str(&format!("  {} {} {} = {};\n", self.access, self.java_type, self.name, init)),
            None => out.push_str(&format!("  {} {} {};\n", self.access, self.java_type, self.name)),
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodBuilder {
    pub access: String,
    pub return_type: String,
    pub name: String,
    pub params: Vec<ParamBuilder>,
    pub annotations: Vec<String>,
    pub throws: Vec<String>,
    pub comment_lines: Vec<String>,
    pub body_lines: Vec<String>,
}

impl MethodBuilder {
    pub fn new(return_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            access: "public".to_string(),
            return_type: return_type.into(),
            name: name.into(),
            params: Vec::new(),
            annotations: Vec::new(),
            throws: Vec::new(),
            comment_lines: Vec::new(),
            body_lines: Vec::new(),
        }
    }

    fn signature(&self) -> String {
        let params = self.params.iter().map(ParamBuilder::render).collect::<Vec<_>>().join(", ");
        let throws = if self.throws.is_empty() { String::new() } else { format!(" throws {}", self.throws.join(", ")) };
        format!("{} {} {}({}){}", self.access, self.return_type, self.name, params, throws)
    }

    /// Renders as a concrete method body when `is_interface` is false, or a
    /// bare stub (no body, no access modifier) when rendering into an
    /// interface.
    pub fn render(&self, is_interface: bool) -> String {
        let mut out = String::new();
        if !self.comment_lines.is_empty() {
            out.push_str("  /**\n");
            for line in &self.comment_lines {
                out.push_str(&format!("   * {line}\n"));
            }
            out.push_str("   */\n");
        }
        for annotation in &self.annotations {
            out.push_str(&format!("  {annotation}\n"));
        }
        if is_interface {
            let params = self.params.iter().map(ParamBuilder::render).collect::<Vec<_>>().join(", ");
            let throws = if self.throws.is_empty() { String::new() } else { format!(" throws {}", self.throws.join(", ")) };
            out.push_str(&format!("  {} {}({}){};\n", self.return_type, self.name, params, throws));
        } else {
            out.push_str(&format!("  {} {{\n", self.signature()));
            for line in &self.body_lines {
                out.push_str(&format!("    {line}\n"));
            }
            out.push_str("  }\n");
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct ClassBuilder {
    pub package: String,
    pub name: String,
    pub is_interface: bool,
    pub imports: Vec<String>,
    pub annotations: Vec<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldBuilder>,
    pub methods: Vec<MethodBuilder>,
    pub inner_classes: Vec<ClassBuilder>,
}

impl ClassBuilder {
    pub fn new(package: impl Into<String>, name: impl Into<String>, is_interface: bool) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            is_interface,
            imports: Vec::new(),
            annotations: Vec::new(),
            implements: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    /// Appends `import` unless already present, preserving first-seen
    /// order.
    pub fn add_import(&mut self, import: impl Into<String>) {
        let import = import.into();
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    /// Appends `field` unless a field with the same name already exists.
    pub fn add_field(&mut self, field: FieldBuilder) {
        if !self.fields.iter().any(|f| f.name == field.name) {
            self.fields.push(field);
        }
    }

    /// Appends `inner`, rejecting it outright for interfaces: an interface
    /// cannot declare a nested class body.
    pub fn add_inner_class(&mut self, inner: ClassBuilder) {
        if !self.is_interface {
            self.inner_classes.push(inner);
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("// Code generated by the Ymir compiler. DO NOT EDIT.\n");
        out.push_str(&format!("package {};\n\n", self.package));
        for import in &self.imports {
            out.push_str(&format!("import {import};\n"));
        }
        if !self.imports.is_empty() {
            out.push('\n');
        }
        for annotation in &self.annotations {
            out.push_str(&format!("{annotation}\n"));
        }
        let kind = if self.is_interface { "interface" } else { "class" };
        let implements = if self.implements.is_empty() {
            String::new()
        } else if self.is_interface {
            format!(" extends {}", self.implements.join(", "))
        } else {
            format!(" implements {}", self.implements.join(", "))
        };
        out.push_str(&format!("public {} {}{} {{\n", kind, self.name, implements));
        for field in &self.fields {
            out.push_str(&field.render());
        }
        if !self.fields.is_empty() {
            out.push('\n');
        }
        for method in &self.methods {
            out.push_str(&method.render(self.is_interface));
            out.push('\n');
        }
        for inner in &self.inner_classes {
            for line in inner.render_body_only().lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
        out.push_str("}\n");
        out
    }

    /// Renders only the `class Name { ... }` body, without the package
    /// declaration or imports — used when nesting as an inner class.
    fn render_body_only(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("public static class {} {{\n", self.name));
        for field in &self.fields {
            out.push_str(&field.render());
        }
        for method in &self.methods {
            out.push_str(&method.render(false));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_imports_and_fields_by_identity() {
        let mut class = ClassBuilder::new("com.ymir.generated", "Widget", false);
        class.add_import("java.util.List");
        class.add_import("java.util.List");
        class.add_field(FieldBuilder::new("String", "name"));
        class.add_field(FieldBuilder::new("int", "name"));
        assert_eq!(class.imports.len(), 1);
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.fields[0].java_type, "String");
    }

    #[test]
    fn interface_method_renders_as_stub() {
        let mut method = MethodBuilder::new("boolean", "authenticate");
        method.params.push(ParamBuilder::new("String", "token"));
        let rendered = method.render(true);
        assert!(rendered.contains("boolean authenticate(String token);"));
        assert!(!rendered.contains('{'));
    }

    #[test]
    fn class_rejects_inner_classes_on_interfaces() {
        let mut iface = ClassBuilder::new("com.ymir.generated", "Handler", true);
        iface.add_inner_class(ClassBuilder::new("com.ymir.generated", "Nested", false));
        assert!(iface.inner_classes.is_empty());
    }
}
