//! Deep copies of component trees and the experience page overlay operations

use hst_node::NodePath;

use super::{ComponentAttributes, ComponentConfig, ComponentView, LifecycleState, reference};
use crate::{Error, Result};

/// Deep-copies a component tree, assigning new ids through an injected
/// function.
///
/// The id function receives the new id of the copied parent (`None` for the
/// copy root) and the attributes of the node being copied.
pub struct TreeCopier<F> {
    id_fn: F,
    include_container_items: bool,
    detached: bool,
    inherited: bool,
    state: Option<LifecycleState>,
}

impl<F> TreeCopier<F>
where
    F: Fn(Option<&str>, &ComponentAttributes) -> String,
{
    pub fn new(id_fn: F) -> Self {
        Self {
            id_fn,
            include_container_items: true,
            detached: false,
            inherited: false,
            state: None,
        }
    }

    pub fn include_container_items(mut self, include: bool) -> Self {
        self.include_container_items = include;
        self
    }

    /// Flag every copied node as detached.
    pub fn mark_detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Flag every copied node as inherited.
    pub fn mark_inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// Put every copied node into `state` instead of keeping the source state.
    pub fn with_state(mut self, state: LifecycleState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn copy<V: ComponentView>(&self, source: &V) -> ComponentConfig {
        self.copy_node(source, None)
    }

    fn copy_node<V: ComponentView>(&self, source: &V, parent_id: Option<&str>) -> ComponentConfig {
        let mut attrs = source.attributes().clone();
        attrs.id = (self.id_fn)(parent_id, source.attributes());
        attrs.detached |= self.detached;
        attrs.inherited |= self.inherited;

        let children = source
            .child_views()
            .into_iter()
            .filter(|child| self.include_container_items || !child.is_container_item())
            .map(|child| self.copy_node(child, Some(attrs.id.as_str())))
            .collect();

        ComponentConfig {
            attrs,
            children,
            state: self.state.unwrap_or(source.lifecycle_state()),
        }
    }
}

/// Copy `source` as a detached tree rooted at `new_id`.
///
/// Descendants get `<parent id>/<name>` ids; the copy starts over at
/// [`LifecycleState::Constructed`].
pub(crate) fn detached_copy<V: ComponentView>(
    source: &V,
    new_id: &str,
    new_location: Option<NodePath>,
    include_container_items: bool,
) -> ComponentConfig {
    let mut copy = TreeCopier::new(|parent: Option<&str>, attrs: &ComponentAttributes| match parent {
        None => new_id.to_string(),
        Some(parent) => format!("{parent}/{}", attrs.name),
    })
    .include_container_items(include_container_items)
    .mark_detached()
    .with_state(LifecycleState::Constructed)
    .copy(source);

    if new_location.is_some() {
        copy.attrs.canonical_stored_location = new_location;
    }
    copy
}

/// Overlay operations used to apply a document's experience page content
/// onto a detached copy of its layout.
impl ComponentConfig {
    /// Replace this layout container's children with the children of the
    /// document container `doc`.
    ///
    /// The result belongs to the document: it takes the document container's
    /// identity and is no longer shared or inherited.
    pub fn transform_xpage_layout_container<V: ComponentView>(&mut self, doc: &V) -> Result<()> {
        if !self.is_container() {
            return Err(Error::NotAContainer {
                id: self.attrs.id.clone(),
            });
        }
        if !doc.is_container() {
            return Err(Error::NotAContainer {
                id: doc.id().to_string(),
            });
        }

        let layout_id = self.attrs.id.clone();
        let copier = TreeCopier::new(|parent: Option<&str>, attrs: &ComponentAttributes| {
            format!("{}/{}", parent.unwrap_or(&layout_id), attrs.name)
        })
        .with_state(LifecycleState::Constructed);
        self.children = doc
            .child_views()
            .into_iter()
            .map(|child| {
                let mut copy = copier.copy(child);
                copy.walk_mut(&mut |node| {
                    node.attrs.experience_page_component = true;
                    node.attrs.shared = false;
                    node.attrs.inherited = false;
                });
                copy
            })
            .collect();

        let attrs = &mut self.attrs;
        attrs.canonical_identifier = doc.canonical_identifier();
        attrs.canonical_stored_location = doc.canonical_stored_location().cloned();
        attrs.experience_page_component = true;
        attrs.shared = false;
        attrs.inherited = false;
        attrs.unresolved_xpage_layout_container = false;
        Ok(())
    }

    /// Expose this layout container without its inherited children, flagged
    /// so that editing tooling can create the document container lazily.
    pub fn transform_unresolved_xpage_layout_container(&mut self) -> Result<()> {
        if !self.is_container() {
            return Err(Error::NotAContainer {
                id: self.attrs.id.clone(),
            });
        }
        self.children
            .retain(|child| !child.attrs.inherited && !child.attrs.xpage_layout_component);
        self.attrs.unresolved_xpage_layout_container = true;
        Ok(())
    }

    /// Combine document data into the same-named existing child.
    ///
    /// The document side wins; shared layout data only fills what the
    /// document leaves unset.
    pub fn merge<V: ComponentView>(&mut self, doc: &V) -> Result<()> {
        let Some(pos) = self.children.iter().position(|c| c.attrs.name == doc.name()) else {
            return Err(Error::ComponentNotFound {
                id: format!("{}/{}", self.attrs.id, doc.name()),
            });
        };

        let existing_id = self.children[pos].attrs.id.clone();
        let mut merged = TreeCopier::new(|parent: Option<&str>, attrs: &ComponentAttributes| match parent {
            None => existing_id.clone(),
            Some(parent) => format!("{parent}/{}", attrs.name),
        })
        .with_state(LifecycleState::Constructed)
        .copy(doc);

        if reference::combine(&mut merged, &self.children[pos]) {
            self.children[pos] = merged;
        }
        Ok(())
    }

    /// Append a document-owned child below this node.
    pub fn add_xpage_doc_child<V: ComponentView>(&mut self, doc_child: &V) -> Result<()> {
        let parent_id = self.attrs.id.clone();
        let mut copy = TreeCopier::new(|parent: Option<&str>, attrs: &ComponentAttributes| {
            format!("{}/{}", parent.unwrap_or(&parent_id), attrs.name)
        })
        .with_state(LifecycleState::Constructed)
        .copy(doc_child);
        copy.walk_mut(&mut |node| node.attrs.experience_page_component = true);
        self.add_child(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use pretty_assertions::assert_eq;

    fn container(id: &str, name: &str) -> ComponentConfig {
        ComponentConfig::new(id, name, ComponentType::ContainerComponent)
    }

    fn item(id: &str, name: &str) -> ComponentConfig {
        ComponentConfig::new(id, name, ComponentType::ContainerItemComponent)
    }

    fn layout() -> ComponentConfig {
        let mut root = ComponentConfig::new("hst:xpages/layout", "layout", ComponentType::Component);
        let mut main = container("hst:xpages/layout/main", "main");
        let mut inherited = item("hst:xpages/layout/main/teaser", "teaser");
        inherited.attrs.inherited = true;
        main.add_child(inherited).unwrap();
        main.add_child(item("hst:xpages/layout/main/own", "own")).unwrap();
        root.add_child(main).unwrap();
        root
    }

    #[test]
    fn test_copier_injects_ids_and_marks() {
        let source = layout();
        let copy = TreeCopier::new(|_: Option<&str>, attrs: &ComponentAttributes| format!("x-{}", attrs.id))
            .mark_inherited()
            .copy(&source);

        assert_eq!(copy.attrs.id, "x-hst:xpages/layout");
        let main = copy.child("main").unwrap();
        assert_eq!(main.attrs.id, "x-hst:xpages/layout/main");
        assert!(main.attrs.inherited);
        assert_eq!(main.child("own").unwrap().attrs.id, "x-hst:xpages/layout/main/own");
    }

    #[test]
    fn test_detached_copy_skips_container_items() {
        let source = layout();
        let copy = detached_copy(&source, "doc/page", Some(NodePath::new("/doc/page")), false);

        assert_eq!(copy.attrs.id, "doc/page");
        assert_eq!(copy.canonical_stored_location().unwrap().as_str(), "/doc/page");
        let main = copy.child("main").unwrap();
        assert_eq!(main.attrs.id, "doc/page/main");
        assert!(main.is_detached());
        assert!(main.children().is_empty());
        assert_eq!(main.state(), LifecycleState::Constructed);
    }

    #[test]
    fn test_copy_is_independent() {
        let source = layout();
        let mut copy = detached_copy(&source, "copy", None, true);
        copy.attrs.parameters.insert("added", "1");
        copy.child_mut("main").unwrap().remove_child("own");

        assert!(source.attrs.parameters.is_empty());
        assert_eq!(source.child("main").unwrap().children().len(), 2);
    }

    #[test]
    fn test_transform_layout_container_replaces_children() {
        let mut main = layout().remove_child("main").unwrap();
        let mut doc = container("doc/main", "main");
        doc.attrs.canonical_identifier = Some(uuid::Uuid::new_v4());
        let mut doc_item = item("doc/main/banner", "banner");
        doc_item.attrs.shared = true;
        doc.add_child(doc_item).unwrap();

        main.transform_xpage_layout_container(&doc).unwrap();

        assert_eq!(main.children().len(), 1);
        let banner = main.child("banner").unwrap();
        assert_eq!(banner.attrs.id, "hst:xpages/layout/main/banner");
        assert!(banner.is_experience_page_component());
        assert!(!banner.is_shared());
        assert!(main.is_experience_page_component());
        assert_eq!(main.canonical_identifier(), doc.canonical_identifier());
    }

    #[test]
    fn test_transform_requires_containers() {
        let mut page = layout();
        let doc = container("doc/main", "main");
        assert!(matches!(
            page.transform_xpage_layout_container(&doc),
            Err(Error::NotAContainer { .. })
        ));
        assert!(matches!(
            page.transform_unresolved_xpage_layout_container(),
            Err(Error::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_transform_unresolved_strips_inherited_children() {
        let mut main = layout().remove_child("main").unwrap();
        main.transform_unresolved_xpage_layout_container().unwrap();

        assert!(main.is_unresolved_xpage_layout_container());
        let names: Vec<_> = main.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["own"]);
    }

    #[test]
    fn test_merge_document_wins() {
        let mut page = ComponentConfig::new("p", "p", ComponentType::Component);
        let mut shared = ComponentConfig::new("p/body", "body", ComponentType::Component);
        shared.attrs.template = Some("layout.ftl".into());
        shared.attrs.parameters.insert("title", "Layout");
        shared.attrs.parameters.insert("size", "large");
        page.add_child(shared).unwrap();

        let mut doc = ComponentConfig::new("doc/body", "body", ComponentType::Component);
        doc.attrs.parameters.insert("title", "Document");

        page.merge(&doc).unwrap();
        let body = page.child("body").unwrap();
        assert_eq!(body.attrs.id, "p/body");
        assert_eq!(body.parameter("title"), Some("Document"));
        assert_eq!(body.parameter("size"), Some("large"));
        assert_eq!(body.template(), Some("layout.ftl"));

        let missing = ComponentConfig::new("doc/aside", "aside", ComponentType::Component);
        assert!(matches!(page.merge(&missing), Err(Error::ComponentNotFound { .. })));
    }

    #[test]
    fn test_add_xpage_doc_child() {
        let mut main = container("l/main", "main");
        main.add_xpage_doc_child(&item("doc/main/banner", "banner")).unwrap();
        let banner = main.child("banner").unwrap();
        assert_eq!(banner.attrs.id, "l/main/banner");
        assert!(banner.is_experience_page_component());
        assert!(matches!(
            main.add_xpage_doc_child(&item("doc/main/banner", "banner")),
            Err(Error::DuplicateChild { .. })
        ));
    }
}
