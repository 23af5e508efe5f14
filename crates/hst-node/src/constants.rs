//! Node type tags and property names understood by the component engine.

use std::fmt;
use std::str::FromStr;

/// Type tags of the configuration nodes the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A whole site configuration (`hst:configuration`)
    Configuration,
    /// Page definitions (`hst:pages`)
    Pages,
    /// Shared components (`hst:components`)
    Components,
    /// Abstract base pages (`hst:abstractpages`)
    AbstractPages,
    /// Prototype pages offered when creating new pages (`hst:prototypepages`)
    PrototypePages,
    /// Experience page layouts (`hst:xpages`)
    XPages,
    /// Container item catalog (`hst:catalog`)
    Catalog,
    /// Folder inside the catalog (`hst:containeritempackage`)
    CatalogPackage,
    /// Templates section (`hst:templates`)
    Templates,
    /// Workspace section (`hst:workspace`)
    Workspace,
    /// Referenceable containers inside the workspace (`hst:containers`)
    Containers,
    /// Plain component (`hst:component`)
    Component,
    /// Container component (`hst:containercomponent`)
    ContainerComponent,
    /// Container item component (`hst:containeritemcomponent`)
    ContainerItemComponent,
    /// Pointer to a referenceable container (`hst:containercomponentreference`)
    ContainerComponentReference,
    /// Template definition (`hst:template`)
    Template,
    /// Node-declared component parameter (`hst:dynamicparameter`)
    DynamicParameter,
    /// Path picker config below a dynamic parameter (`hst:jcrpath`)
    PathPicker,
    /// Image path picker config below a dynamic parameter (`hst:imagesetpath`)
    ImageSetPath,
    /// Drop-down config below a dynamic parameter (`hst:dropdownlist`)
    DropDownList,
}

impl NodeType {
    /// Get the type tag as stored in the content tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "hst:configuration",
            Self::Pages => "hst:pages",
            Self::Components => "hst:components",
            Self::AbstractPages => "hst:abstractpages",
            Self::PrototypePages => "hst:prototypepages",
            Self::XPages => "hst:xpages",
            Self::Catalog => "hst:catalog",
            Self::CatalogPackage => "hst:containeritempackage",
            Self::Templates => "hst:templates",
            Self::Workspace => "hst:workspace",
            Self::Containers => "hst:containers",
            Self::Component => "hst:component",
            Self::ContainerComponent => "hst:containercomponent",
            Self::ContainerItemComponent => "hst:containeritemcomponent",
            Self::ContainerComponentReference => "hst:containercomponentreference",
            Self::Template => "hst:template",
            Self::DynamicParameter => "hst:dynamicparameter",
            Self::PathPicker => "hst:jcrpath",
            Self::ImageSetPath => "hst:imagesetpath",
            Self::DropDownList => "hst:dropdownlist",
        }
    }

    const ALL: [NodeType; 20] = [
        Self::Configuration,
        Self::Pages,
        Self::Components,
        Self::AbstractPages,
        Self::PrototypePages,
        Self::XPages,
        Self::Catalog,
        Self::CatalogPackage,
        Self::Templates,
        Self::Workspace,
        Self::Containers,
        Self::Component,
        Self::ContainerComponent,
        Self::ContainerItemComponent,
        Self::ContainerComponentReference,
        Self::Template,
        Self::DynamicParameter,
        Self::PathPicker,
        Self::ImageSetPath,
        Self::DropDownList,
    ];

    /// Whether nodes of this type describe a rendering component.
    pub fn is_component(&self) -> bool {
        matches!(
            self,
            Self::Component
                | Self::ContainerComponent
                | Self::ContainerItemComponent
                | Self::ContainerComponentReference
        )
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for NodeType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Property names read from configuration nodes.
pub mod props {
    pub const REFERENCE_COMPONENT: &str = "hst:referencecomponent";
    pub const REFERENCE_NAME: &str = "hst:referencename";
    pub const COMPONENT_CLASS_NAME: &str = "hst:componentclassname";
    pub const PARAMETERS_INFO_CLASS_NAME: &str = "hst:parametersinfoclassname";
    pub const COMPONENT_DEFINITION: &str = "hst:componentdefinition";
    pub const TEMPLATE: &str = "hst:template";
    pub const RESOURCE_TEMPLATE: &str = "hst:resourcetemplate";
    pub const PARAMETER_NAMES: &str = "hst:parameternames";
    pub const PARAMETER_VALUES: &str = "hst:parametervalues";
    pub const PARAMETER_NAME_PREFIXES: &str = "hst:parameternameprefixes";
    pub const STANDALONE: &str = "hst:standalone";
    pub const ASYNC: &str = "hst:async";
    pub const ASYNC_MODE: &str = "hst:asyncmode";
    pub const CACHEABLE: &str = "hst:cacheable";
    pub const LOCKED_BY: &str = "hst:lockedby";
    pub const LOCKED_ON: &str = "hst:lockedon";
    pub const LAST_MODIFIED: &str = "hst:lastmodified";
    pub const LABEL: &str = "hst:label";
    pub const ICON_PATH: &str = "hst:iconpath";
    pub const XTYPE: &str = "hst:xtype";
    pub const HIDDEN: &str = "hst:hidden";
    pub const COMPONENT_FILTER_TAG: &str = "hst:componentfiltertag";
    pub const REFERENCE: &str = "hst:reference";

    pub const RENDER_PATH: &str = "hst:renderpath";
    pub const SCRIPT: &str = "hst:script";
    pub const IS_NAMED: &str = "hst:isnamed";

    pub const REQUIRED: &str = "hst:required";
    pub const DEFAULT_VALUE: &str = "hst:defaultvalue";
    pub const DISPLAY_NAME: &str = "hst:displayname";
    pub const HIDE_IN_CHANNEL_MANAGER: &str = "hst:hideinchannelmanager";
    pub const VALUE_TYPE: &str = "hst:valuetype";
    pub const FIELD_GROUP: &str = "hst:fieldgroup";

    pub const PICKER_CONFIGURATION: &str = "hst:pickerconfiguration";
    pub const PICKER_INITIAL_PATH: &str = "hst:pickerinitialpath";
    pub const PICKER_ROOT_PATH: &str = "hst:pickerrootpath";
    pub const PICKER_SELECTABLE_NODE_TYPES: &str = "hst:pickerselectablenodetypes";
    pub const RELATIVE: &str = "hst:relative";
    pub const PREVIEW_VARIANT: &str = "hst:previewvariant";
    pub const VALUE_LIST: &str = "hst:valuelist";
    pub const VALUE_LIST_PROVIDER: &str = "hst:valuelistprovider";
}
