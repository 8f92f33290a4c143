use serde::Serialize;

/// Element kinds the widget knows how to build and serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Body,
    Header,
    Form,
    Div,
    H1,
    H2,
    H3,
    P,
    A,
    Img,
    Input,
    Button,
}

impl ElementKind {
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Body => "body",
            ElementKind::Header => "header",
            ElementKind::Form => "form",
            ElementKind::Div => "div",
            ElementKind::H1 => "h1",
            ElementKind::H2 => "h2",
            ElementKind::H3 => "h3",
            ElementKind::P => "p",
            ElementKind::A => "a",
            ElementKind::Img => "img",
            ElementKind::Input => "input",
            ElementKind::Button => "button",
        }
    }

    fn is_void(self) -> bool {
        matches!(self, ElementKind::Img | ElementKind::Input)
    }
}

/// Minimal element tree standing in for the page DOM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub kind: ElementKind,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
    pub disabled: bool,
    pub background: Option<String>,
}

/// Creates a new element of `kind` with the single CSS class `class` applied.
pub fn create(kind: ElementKind, class: &str) -> Element {
    let mut element = Element::new(kind);
    element.classes.push(class.to_string());
    element
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            disabled: false,
            background: None,
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Drops all children and text, the equivalent of `innerHTML = ''`.
    pub fn clear(&mut self) {
        self.children.clear();
        self.text = None;
    }

    /// Depth-first search for the first element carrying `class` (self included).
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_class(class))
    }

    pub fn count_by_class(&self, class: &str) -> usize {
        let own = usize::from(self.has_class(class));
        own + self
            .children
            .iter()
            .map(|c| c.count_by_class(class))
            .sum::<usize>()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, 0);
        out
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(self.kind.tag());
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_html(&self.classes.join(" "))));
        }
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        if let Some(bg) = &self.background {
            out.push_str(&format!(" style=\"background: {}\"", escape_html(bg)));
        }
        if self.disabled {
            out.push_str(" disabled");
        }
        if self.kind.is_void() {
            out.push_str("/>\n");
            return;
        }
        out.push('>');

        if self.children.is_empty() {
            if let Some(text) = &self.text {
                out.push_str(&escape_html(text));
            }
            out.push_str(&format!("</{}>\n", self.kind.tag()));
            return;
        }

        out.push('\n');
        if let Some(text) = &self.text {
            out.push_str(&"  ".repeat(depth + 1));
            out.push_str(&escape_html(text));
            out.push('\n');
        }
        for child in &self.children {
            child.write_html(out, depth + 1);
        }
        out.push_str(&indent);
        out.push_str(&format!("</{}>\n", self.kind.tag()));
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/dom.rs"]
mod tests;
