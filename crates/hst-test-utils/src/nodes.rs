//! Fluent builders for raw configuration node trees.
//!
//! ```rust
//! use hst_test_utils::nodes::{ConfigurationBuilder, component, container, item};
//!
//! let configuration = ConfigurationBuilder::new("demo")
//!     .abstract_page(component("base").template("base"))
//!     .page(
//!         component("home")
//!             .reference("hst:abstractpages/base")
//!             .child(container("main").child(item("banner").class("com.example.Banner"))),
//!     )
//!     .template("base", "webfile:/ftl/base.ftl")
//!     .build();
//! assert_eq!(configuration.children().len(), 3);
//! ```

use hst_node::{HstNode, NodeType, props};

/// Builder for one component node and its subtree.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: HstNode,
    names: Vec<String>,
    values: Vec<String>,
    prefixes: Vec<String>,
}

/// A plain `hst:component`.
pub fn component(name: &str) -> NodeBuilder {
    NodeBuilder::new(name, NodeType::Component)
}

/// An `hst:containercomponent`.
pub fn container(name: &str) -> NodeBuilder {
    NodeBuilder::new(name, NodeType::ContainerComponent)
}

/// An `hst:containeritemcomponent`.
pub fn item(name: &str) -> NodeBuilder {
    NodeBuilder::new(name, NodeType::ContainerItemComponent)
}

/// An `hst:containercomponentreference` pointing at a workspace container.
pub fn container_reference(name: &str, target: &str) -> NodeBuilder {
    NodeBuilder::new(name, NodeType::ContainerComponentReference).property(props::REFERENCE, target)
}

/// An `hst:dynamicparameter` node.
pub fn dynamic_parameter(name: &str) -> NodeBuilder {
    NodeBuilder::new(name, NodeType::DynamicParameter)
}

impl NodeBuilder {
    pub fn new(name: &str, node_type: NodeType) -> Self {
        Self {
            node: HstNode::new(name, node_type.as_str()),
            names: Vec::new(),
            values: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    pub fn property(mut self, name: &str, value: impl Into<hst_node::PropertyValue>) -> Self {
        self.node.set_property(name, value);
        self
    }

    pub fn class(self, class_name: &str) -> Self {
        self.property(props::COMPONENT_CLASS_NAME, class_name)
    }

    pub fn template(self, template: &str) -> Self {
        self.property(props::TEMPLATE, template)
    }

    pub fn reference(self, target: &str) -> Self {
        self.property(props::REFERENCE_COMPONENT, target)
    }

    pub fn definition(self, catalog_id: &str) -> Self {
        self.property(props::COMPONENT_DEFINITION, catalog_id)
    }

    pub fn is_async(self, value: bool) -> Self {
        self.property(props::ASYNC, value)
    }

    pub fn cacheable(self, value: bool) -> Self {
        self.property(props::CACHEABLE, value)
    }

    /// Add an unprefixed parameter.
    pub fn param(self, name: &str, value: &str) -> Self {
        self.prefixed_param("", name, value)
    }

    /// Add a parameter for the variant `prefix`.
    pub fn prefixed_param(mut self, prefix: &str, name: &str, value: &str) -> Self {
        self.names.push(name.to_string());
        self.values.push(value.to_string());
        self.prefixes.push(prefix.to_string());
        self
    }

    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.node.add_child(child.build());
        self
    }

    pub fn build(mut self) -> HstNode {
        if !self.names.is_empty() {
            self.node.set_property(props::PARAMETER_NAMES, self.names);
            self.node.set_property(props::PARAMETER_VALUES, self.values);
            if self.prefixes.iter().any(|p| !p.is_empty()) {
                self.node.set_property(props::PARAMETER_NAME_PREFIXES, self.prefixes);
            }
        }
        self.node
    }
}

/// Builder for an `hst:configuration` node with its sections.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    name: String,
    sections: Vec<HstNode>,
    catalog: Vec<(String, Vec<HstNode>)>,
    containers: Vec<HstNode>,
}

impl ConfigurationBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sections: Vec::new(),
            catalog: Vec::new(),
            containers: Vec::new(),
        }
    }

    fn section_mut(&mut self, node_type: NodeType) -> &mut HstNode {
        let pos = match self.sections.iter().position(|s| s.is_type(node_type)) {
            Some(pos) => pos,
            None => {
                self.sections
                    .push(HstNode::new(node_type.as_str(), node_type.as_str()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos]
    }

    fn add(mut self, node_type: NodeType, node: NodeBuilder) -> Self {
        self.section_mut(node_type).add_child(node.build());
        self
    }

    pub fn page(self, node: NodeBuilder) -> Self {
        self.add(NodeType::Pages, node)
    }

    pub fn component(self, node: NodeBuilder) -> Self {
        self.add(NodeType::Components, node)
    }

    pub fn abstract_page(self, node: NodeBuilder) -> Self {
        self.add(NodeType::AbstractPages, node)
    }

    pub fn prototype_page(self, node: NodeBuilder) -> Self {
        self.add(NodeType::PrototypePages, node)
    }

    pub fn xpage(self, node: NodeBuilder) -> Self {
        self.add(NodeType::XPages, node)
    }

    /// Add a catalog item inside the package `package`.
    pub fn catalog_item(mut self, package: &str, node: NodeBuilder) -> Self {
        match self.catalog.iter_mut().find(|(name, _)| name == package) {
            Some((_, items)) => items.push(node.build()),
            None => self.catalog.push((package.to_string(), vec![node.build()])),
        }
        self
    }

    /// Add a template with an explicit render path.
    pub fn template(mut self, name: &str, render_path: &str) -> Self {
        self.section_mut(NodeType::Templates).add_child(
            HstNode::new(name, NodeType::Template.as_str()).with_property(props::RENDER_PATH, render_path),
        );
        self
    }

    /// Add a template whose script is stored inline.
    pub fn inline_template(mut self, name: &str, script: &str) -> Self {
        self.section_mut(NodeType::Templates).add_child(
            HstNode::new(name, NodeType::Template.as_str()).with_property(props::SCRIPT, script),
        );
        self
    }

    /// Add a referenceable container below `hst:workspace/hst:containers`.
    pub fn workspace_container(mut self, node: NodeBuilder) -> Self {
        self.containers.push(node.build());
        self
    }

    pub fn build(self) -> HstNode {
        let mut root = HstNode::new(&self.name, NodeType::Configuration.as_str());
        for section in self.sections {
            root.add_child(section);
        }
        if !self.catalog.is_empty() {
            let mut catalog = HstNode::new(NodeType::Catalog.as_str(), NodeType::Catalog.as_str());
            for (package, items) in self.catalog {
                let package = items.into_iter().fold(
                    HstNode::new(&package, NodeType::CatalogPackage.as_str()),
                    HstNode::with_child,
                );
                catalog.add_child(package);
            }
            root.add_child(catalog);
        }
        if !self.containers.is_empty() {
            let containers = self.containers.into_iter().fold(
                HstNode::new(NodeType::Containers.as_str(), NodeType::Containers.as_str()),
                HstNode::with_child,
            );
            root.add_child(
                HstNode::new(NodeType::Workspace.as_str(), NodeType::Workspace.as_str())
                    .with_child(containers),
            );
        }
        root
    }
}
