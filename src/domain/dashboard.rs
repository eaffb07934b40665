// Dashboard definition domain model
use super::theme::{ThemeCatalog, DEFAULT_THEME_MODE};

pub const THEME_ATTRIBUTE: &str = "theme";
pub const ROW_TAG: &str = "row";
pub const PANEL_TAG: &str = "panel";

/// Token the marker panel depends on; it is never set, so the panel stays hidden.
const HIDDEN_PANEL_TOKEN: &str = "$alwaysHideCSS$";

/// A node in a dashboard document. Non-element content is kept in its raw
/// (still escaped) form so it is written back byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Unescaped attribute values, in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites an existing attribute in place, otherwise appends it.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    fn is_theme_row(&self, catalog: &ThemeCatalog) -> bool {
        self.name == ROW_TAG
            && self.child_elements().any(|panel| {
                panel.name == PANEL_TAG
                    && panel
                        .attribute("ref")
                        .is_some_and(|reference| catalog.is_theme(reference))
            })
    }

    fn strip_theme_rows(&mut self, catalog: &ThemeCatalog) -> usize {
        let before = self.children.len();
        self.children.retain(|node| match node {
            Node::Element(element) => !element.is_theme_row(catalog),
            _ => true,
        });
        let mut removed = before - self.children.len();

        for node in &mut self.children {
            if let Node::Element(element) = node {
                removed += element.strip_theme_rows(catalog);
            }
        }
        removed
    }

    fn count_theme_rows(&self, catalog: &ThemeCatalog) -> usize {
        self.child_elements()
            .map(|element| {
                if element.is_theme_row(catalog) {
                    1
                } else {
                    element.count_theme_rows(catalog)
                }
            })
            .sum()
    }
}

/// A parsed dashboard definition (`<dashboard>` or `<form>` root).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDocument {
    /// Raw content of the `<?xml ...?>` declaration, if the file had one.
    pub declaration: Option<String>,
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl DashboardDocument {
    pub fn new(root: Element) -> Self {
        Self {
            declaration: None,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    pub fn theme_mode(&self) -> &str {
        self.root
            .attribute(THEME_ATTRIBUTE)
            .unwrap_or(DEFAULT_THEME_MODE)
    }

    /// Number of theme marker rows anywhere in the document.
    pub fn theme_row_count(&self, catalog: &ThemeCatalog) -> usize {
        usize::from(self.root.is_theme_row(catalog)) + self.root.count_theme_rows(catalog)
    }

    /// Removes every row holding a panel that references a known theme.
    /// Returns how many rows were dropped.
    pub fn strip_theme_rows(&mut self, catalog: &ThemeCatalog) -> usize {
        self.root.strip_theme_rows(catalog)
    }

    /// Sets the root `theme` attribute only when it differs from the current
    /// value, so an absent attribute stays absent for the default mode.
    pub fn set_theme_mode(&mut self, mode: &str) -> bool {
        if self.theme_mode() == mode {
            return false;
        }
        self.root.set_attribute(THEME_ATTRIBUTE, mode);
        true
    }

    pub fn reset_theme_mode(&mut self) {
        self.root.set_attribute(THEME_ATTRIBUTE, DEFAULT_THEME_MODE);
    }

    /// Appends `<row><panel ref=".." app=".." depends=".."/></row>` to the root.
    pub fn append_theme_row(&mut self, theme_id: &str, theme_app: &str) {
        let panel = Element::new(PANEL_TAG)
            .with_attribute("ref", theme_id)
            .with_attribute("app", theme_app)
            .with_attribute("depends", HIDDEN_PANEL_TOKEN);
        let mut row = Element::new(ROW_TAG);
        row.children.push(Node::Element(panel));
        self.root.children.push(Node::Element(row));
    }
}
