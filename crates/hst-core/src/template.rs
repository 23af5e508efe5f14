//! Templates and render path resolution

use std::collections::BTreeMap;

use hst_node::{HstNode, NodeType, props};

use crate::component::ComponentConfig;

/// A template a component can render with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HstComponentTemplate {
    name: String,
    render_path: String,
    named: bool,
    inline: bool,
}

impl HstComponentTemplate {
    /// Build a template from its node.
    ///
    /// An explicit render path wins; an inline script is addressed by a
    /// virtual path under `inline_protocol`. Returns `None` when neither is
    /// present.
    pub fn from_node(node: &HstNode, inline_protocol: &str) -> Option<Self> {
        let (render_path, inline) = match node.string_property(props::RENDER_PATH) {
            Some(path) if !path.is_empty() => (path.to_string(), false),
            _ if node.string_property(props::SCRIPT).is_some() => {
                (format!("{inline_protocol}{}", node.path()), true)
            }
            _ => return None,
        };
        Some(Self {
            name: node.name().to_string(),
            render_path,
            named: node.boolean_or(props::IS_NAMED, false),
            inline,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effective_render_path(&self) -> &str {
        &self.render_path
    }

    /// Named templates are addressed by name rather than by path.
    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }
}

/// Maps template names to render paths.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    templates: BTreeMap<String, HstComponentTemplate>,
}

impl TemplateResolver {
    /// Read every valid template of an `hst:templates` section.
    pub fn from_section(section: Option<&HstNode>, inline_protocol: &str) -> Self {
        let mut templates = BTreeMap::new();
        for node in section
            .into_iter()
            .flat_map(|s| s.children_of_type(NodeType::Template))
        {
            match HstComponentTemplate::from_node(node, inline_protocol) {
                Some(template) => {
                    templates.insert(template.name.clone(), template);
                }
                None => tracing::warn!(
                    template = %node.path(),
                    "Template has neither a render path nor a script, skipping"
                ),
            }
        }
        Self { templates }
    }

    pub fn get(&self, name: &str) -> Option<&HstComponentTemplate> {
        self.templates.get(name)
    }

    pub fn templates(&self) -> &BTreeMap<String, HstComponentTemplate> {
        &self.templates
    }

    /// Set `render_path` and `serve_resource_path` on every component of a
    /// tree from its template names.
    pub fn apply(&self, config: &mut ComponentConfig) {
        config.walk_mut(&mut |node| {
            let attrs = node.attributes_mut();
            attrs.render_path = self.render_path(&attrs.id, attrs.template.as_deref());
            attrs.serve_resource_path =
                self.render_path(&attrs.id, attrs.resource_template.as_deref());
        });
    }

    fn render_path(&self, component: &str, template: Option<&str>) -> Option<String> {
        let name = template?;
        match self.templates.get(name) {
            Some(template) => Some(template.render_path.clone()),
            None => {
                tracing::debug!(component, template = name, "Template is not defined");
                None
            }
        }
    }
}
