//! Text and JSON rendering of resolved components

use std::collections::BTreeMap;

use colored::Colorize;
use hst_core::ComponentView;
use hst_core::component::{ParameterMap, split_prefixed_key};
use serde_json::{Map, Value, json};

/// Split a parameter map into plain parameters and variant parameters
/// grouped by prefix.
fn split_parameters(
    parameters: &ParameterMap,
    delimiter: &str,
) -> (Map<String, Value>, BTreeMap<String, Map<String, Value>>) {
    let mut plain = Map::new();
    let mut prefixed: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    for (key, value) in parameters.iter() {
        match split_prefixed_key(key, delimiter) {
            Some((prefix, name)) => {
                prefixed
                    .entry(prefix.to_string())
                    .or_default()
                    .insert(name.to_string(), json!(value));
            }
            None => {
                plain.insert(key.to_string(), json!(value));
            }
        }
    }
    (plain, prefixed)
}

/// A component and its subtree as JSON.
pub fn component_json<V: ComponentView>(component: &V, delimiter: &str) -> Value {
    let (parameters, prefixed_parameters) = split_parameters(component.parameters(), delimiter);
    let dynamic_parameters: Vec<Value> = component
        .dynamic_parameters()
        .iter()
        .map(|p| {
            json!({
                "name": p.name(),
                "type": p.definition.value_type.to_string(),
                "required": p.definition.required,
                "default": p.definition.default_value,
                "residual": p.is_residual(),
            })
        })
        .collect();
    let field_groups: Vec<Value> = component
        .field_groups()
        .iter()
        .map(|g| json!({ "title": g.title_key, "parameters": g.parameters }))
        .collect();
    let children: Vec<Value> = component
        .child_views()
        .into_iter()
        .map(|child| component_json(child, delimiter))
        .collect();

    json!({
        "id": component.id(),
        "name": component.name(),
        "type": component.component_type().to_string(),
        "class": component.component_class_name(),
        "template": component.template(),
        "render_path": component.render_path(),
        "serve_resource_path": component.serve_resource_path(),
        "parameters": parameters,
        "prefixed_parameters": prefixed_parameters,
        "dynamic_parameters": dynamic_parameters,
        "field_groups": field_groups,
        "variants": component.variants(),
        "async": component.is_async(),
        "cacheable": component.is_cacheable(),
        "composite_cacheable": component.is_composite_cacheable(),
        "shared": component.is_shared(),
        "inherited": component.is_inherited(),
        "experience_page_component": component.is_experience_page_component(),
        "unresolved_xpage_layout_container": component.is_unresolved_xpage_layout_container(),
        "children": children,
    })
}

/// Print the details of one component.
pub fn print_component<V: ComponentView>(component: &V, delimiter: &str) {
    println!("{}", component.id().bold());
    println!();
    println!("{}:        {}", "Type".dimmed(), component.component_type().to_string().cyan());
    println!("{}:       {}", "Class".dimmed(), optional(component.component_class_name()));
    println!("{}:    {}", "Template".dimmed(), optional(component.template()));
    println!("{}: {}", "Render path".dimmed(), optional(component.render_path()));
    println!(
        "{}:   {}",
        "Cacheable".dimmed(),
        if component.is_composite_cacheable() {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    if component.is_async() {
        println!("{}:       {}", "Async".dimmed(), optional(component.async_mode()));
    }

    let (parameters, prefixed) = split_parameters(component.parameters(), delimiter);
    if !parameters.is_empty() || !prefixed.is_empty() {
        println!();
        println!("{}:", "Parameters".bold());
        for (name, value) in &parameters {
            println!("  {} = {}", name, display_value(value));
        }
        for (prefix, values) in &prefixed {
            for (name, value) in values {
                println!("  {} {} = {}", format!("[{prefix}]").cyan(), name, display_value(value));
            }
        }
    }

    if !component.variants().is_empty() {
        println!();
        println!("{}:", "Variants".bold());
        for variant in component.variants() {
            println!("  {}", variant.cyan());
        }
    }

    let children = component.child_views();
    if !children.is_empty() {
        println!();
        println!("{}:", "Children".bold());
        for child in children {
            println!("  {} {}", child.name(), format!("({})", child.component_type()).dimmed());
        }
    }
}

/// Print a component tree, one line per component.
pub fn print_tree<V: ComponentView>(component: &V, depth: usize) {
    let mut markers = Vec::new();
    if component.is_experience_page_component() {
        markers.push("xpage");
    }
    if component.is_unresolved_xpage_layout_container() {
        markers.push("unresolved");
    }
    if component.is_inherited() {
        markers.push("inherited");
    }
    let markers = if markers.is_empty() {
        String::new()
    } else {
        format!(" [{}]", markers.join(", "))
    };
    println!(
        "{}{} {}{}",
        "  ".repeat(depth),
        component.name(),
        format!("({})", component.component_type()).dimmed(),
        markers.yellow()
    );
    for child in component.child_views() {
        print_tree(child, depth + 1);
    }
}

fn optional(value: Option<&str>) -> colored::ColoredString {
    match value {
        Some(v) => v.cyan(),
        None => "-".dimmed(),
    }
}

fn display_value(value: &Value) -> String {
    value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string())
}
