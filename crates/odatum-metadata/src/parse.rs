//! XML walk from document text to the typed element graph.
//!
//! Every parent element matches its children against an explicit case list;
//! an element the list does not know is a hard error, so schema drift
//! surfaces instead of being skipped.

use crate::{MetadataError, document::*};
use odatum_schema::types::ProtocolVersion;
use roxmltree::Node;

pub fn parse_document(xml: &str) -> Result<Document, MetadataError> {
    log::debug!("parsing metadata document ({} bytes)", xml.len());

    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    if root.tag_name().name() != "Edmx" {
        return Err(MetadataError::MissingRoot("Edmx"));
    }

    let version = parse_version(&root)?;

    let mut references = Vec::new();
    let mut data_services = None;

    for child in elements(&root) {
        match child.tag_name().name() {
            "Reference" => references.push(parse_reference(&child)?),
            "DataServices" => data_services = Some(child),
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "Edmx",
                    element: other.to_string(),
                });
            }
        }
    }

    let data_services = data_services.ok_or(MetadataError::MissingRoot("DataServices"))?;

    let mut schemas = Vec::new();
    for child in elements(&data_services) {
        match child.tag_name().name() {
            "Schema" => schemas.push(parse_schema(&child)?),
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "DataServices",
                    element: other.to_string(),
                });
            }
        }
    }

    log::info!(
        "parsed metadata document: {} schema(s), protocol {version}",
        schemas.len()
    );

    Ok(Document {
        version,
        references,
        schemas,
    })
}

// The EDMX wrapper version plus the V2-era DataServiceVersion attribute
// select the dialect. EDMX 1.0 wraps both V2 and V3 payloads.
fn parse_version(root: &Node) -> Result<ProtocolVersion, MetadataError> {
    let declared = attr(root, "Version").unwrap_or("1.0");

    let token = if declared == "1.0" {
        root.descendants()
            .find(|n| n.tag_name().name() == "DataServices")
            .and_then(|n| attr(&n, "DataServiceVersion").map(str::to_string))
            .unwrap_or_else(|| "2.0".to_string())
    } else {
        declared.to_string()
    };

    token
        .parse()
        .map_err(|_| MetadataError::UnsupportedVersion { version: token })
}

fn parse_reference(node: &Node) -> Result<Reference, MetadataError> {
    let uri = require_attr(node, "Reference", "Uri")?;

    let mut includes = Vec::new();
    for child in elements(node) {
        match child.tag_name().name() {
            "Include" | "IncludeAnnotations" => {
                if let Some(ns) = attr(&child, "Namespace") {
                    includes.push(ns.to_string());
                }
            }
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "Reference",
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(Reference {
        uri: uri.to_string(),
        includes,
    })
}

fn parse_schema(node: &Node) -> Result<SchemaElement, MetadataError> {
    let mut schema = SchemaElement {
        namespace: require_attr(node, "Schema", "Namespace")?.to_string(),
        alias: attr(node, "Alias").map(str::to_string),
        ..SchemaElement::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "EntityType" => schema.entity_types.push(parse_structured(&child, "EntityType")?),
            "ComplexType" => schema.complex_types.push(parse_structured(&child, "ComplexType")?),
            "EnumType" => schema.enum_types.push(parse_enum(&child)?),
            "TypeDefinition" => schema.type_definitions.push(TypeDefinitionElement {
                name: require_attr(&child, "TypeDefinition", "Name")?.to_string(),
                underlying_type: require_attr(&child, "TypeDefinition", "UnderlyingType")?
                    .to_string(),
            }),
            "Function" => schema.functions.push(parse_callable(&child, "Function")?),
            "Action" => schema.actions.push(parse_callable(&child, "Action")?),
            "Association" => schema.associations.push(parse_association(&child)?),
            "EntityContainer" => schema.containers.push(parse_container(&child)?),
            "Annotations" => parse_annotations(&child, &mut schema.annotations)?,
            "Annotation" => schema.annotations.push(parse_annotation(&child, None)?),
            // V2-era namespace import, no structural content to keep
            "Using" => {}
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "Schema",
                    element: other.to_string(),
                });
            }
        }
    }

    log::debug!(
        "schema '{}': {} entity type(s), {} complex type(s), {} enum(s), {} container(s)",
        schema.namespace,
        schema.entity_types.len(),
        schema.complex_types.len(),
        schema.enum_types.len(),
        schema.containers.len(),
    );

    Ok(schema)
}

fn parse_structured(
    node: &Node,
    element: &'static str,
) -> Result<StructuredTypeElement, MetadataError> {
    let mut structured = StructuredTypeElement {
        name: require_attr(node, element, "Name")?.to_string(),
        base_type: attr(node, "BaseType").map(str::to_string),
        open_type: bool_attr(node, "OpenType"),
        ..StructuredTypeElement::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "Key" => {
                for key_ref in elements(&child) {
                    match key_ref.tag_name().name() {
                        "PropertyRef" => structured
                            .key
                            .push(require_attr(&key_ref, "PropertyRef", "Name")?.to_string()),
                        other => {
                            return Err(MetadataError::UnexpectedElement {
                                parent: "Key",
                                element: other.to_string(),
                            });
                        }
                    }
                }
            }
            "Property" => structured.properties.push(parse_property(&child)?),
            "NavigationProperty" => structured.navigations.push(parse_navigation(&child)?),
            "Annotation" => {}
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: element,
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(structured)
}

fn parse_property(node: &Node) -> Result<PropertyElement, MetadataError> {
    Ok(PropertyElement {
        name: require_attr(node, "Property", "Name")?.to_string(),
        type_name: require_attr(node, "Property", "Type")?.to_string(),
        nullable: attr(node, "Nullable").is_none_or(|v| v == "true"),
        precision: facet_attr(node, "Property", "Precision")?,
        scale: facet_attr(node, "Property", "Scale")?,
        max_length: facet_attr(node, "Property", "MaxLength")?,
        default_value: attr(node, "DefaultValue").map(str::to_string),
    })
}

fn parse_navigation(node: &Node) -> Result<NavigationElement, MetadataError> {
    let name = require_attr(node, "NavigationProperty", "Name")?.to_string();
    let type_name = attr(node, "Type").map(str::to_string);
    let relationship = attr(node, "Relationship").map(str::to_string);

    if type_name.is_none() && relationship.is_none() {
        return Err(MetadataError::MissingAttribute {
            element: "NavigationProperty",
            attribute: "Type",
        });
    }

    Ok(NavigationElement {
        name,
        type_name,
        relationship,
        to_role: attr(node, "ToRole").map(str::to_string),
        nullable: attr(node, "Nullable").is_none_or(|v| v == "true"),
    })
}

fn parse_enum(node: &Node) -> Result<EnumTypeElement, MetadataError> {
    let mut config = EnumTypeElement {
        name: require_attr(node, "EnumType", "Name")?.to_string(),
        flags: bool_attr(node, "IsFlags"),
        underlying_type: attr(node, "UnderlyingType").map(str::to_string),
        ..EnumTypeElement::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "Member" => {
                let name = require_attr(&child, "Member", "Name")?.to_string();
                let value = match attr(&child, "Value") {
                    Some(raw) => {
                        Some(raw.parse::<i64>().map_err(|_| MetadataError::InvalidValue {
                            element: "Member",
                            attribute: "Value",
                            value: raw.to_string(),
                        })?)
                    }
                    None => None,
                };
                config.members.push((name, value));
            }
            "Annotation" => {}
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "EnumType",
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(config)
}

fn parse_callable(node: &Node, element: &'static str) -> Result<CallableElement, MetadataError> {
    let mut callable = CallableElement {
        name: require_attr(node, element, "Name")?.to_string(),
        bound: bool_attr(node, "IsBound"),
        composable: bool_attr(node, "IsComposable"),
        entity_set_path: attr(node, "EntitySetPath").map(str::to_string),
        ..CallableElement::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "Parameter" => callable.parameters.push(parse_parameter(&child)?),
            "ReturnType" => {
                callable.return_type = Some(ReturnElement {
                    type_name: require_attr(&child, "ReturnType", "Type")?.to_string(),
                    nullable: attr(&child, "Nullable").is_none_or(|v| v == "true"),
                });
            }
            "Annotation" => {}
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: element,
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(callable)
}

fn parse_parameter(node: &Node) -> Result<ParameterElement, MetadataError> {
    Ok(ParameterElement {
        name: require_attr(node, "Parameter", "Name")?.to_string(),
        type_name: require_attr(node, "Parameter", "Type")?.to_string(),
        nullable: attr(node, "Nullable").is_none_or(|v| v == "true"),
    })
}

fn parse_association(node: &Node) -> Result<AssociationElement, MetadataError> {
    let mut association = AssociationElement {
        name: require_attr(node, "Association", "Name")?.to_string(),
        ..AssociationElement::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "End" => association.ends.push(AssociationEnd {
                role: require_attr(&child, "End", "Role")?.to_string(),
                entity_type: require_attr(&child, "End", "Type")?.to_string(),
                multiplicity: attr(&child, "Multiplicity").map(str::to_string),
            }),
            // constraints carry no type information the engine keeps
            "ReferentialConstraint" => {}
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "Association",
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(association)
}

fn parse_container(node: &Node) -> Result<ContainerElement, MetadataError> {
    let mut container = ContainerElement {
        name: require_attr(node, "EntityContainer", "Name")?.to_string(),
        ..ContainerElement::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "EntitySet" => {
                for grandchild in elements(&child) {
                    match grandchild.tag_name().name() {
                        "NavigationPropertyBinding" | "Annotation" => {}
                        other => {
                            return Err(MetadataError::UnexpectedElement {
                                parent: "EntitySet",
                                element: other.to_string(),
                            });
                        }
                    }
                }
                container.entity_sets.push(EntitySetElement {
                    name: require_attr(&child, "EntitySet", "Name")?.to_string(),
                    entity_type: require_attr(&child, "EntitySet", "EntityType")?.to_string(),
                });
            }
            "Singleton" => container.singletons.push(SingletonElement {
                name: require_attr(&child, "Singleton", "Name")?.to_string(),
                entity_type: require_attr(&child, "Singleton", "Type")?.to_string(),
            }),
            "FunctionImport" => container.function_imports.push(parse_import(&child, "FunctionImport")?),
            "ActionImport" => container.action_imports.push(parse_import(&child, "ActionImport")?),
            "AssociationSet" | "Annotation" => {}
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "EntityContainer",
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(container)
}

fn parse_import(node: &Node, element: &'static str) -> Result<ImportElement, MetadataError> {
    let target_attr = match element {
        "FunctionImport" => "Function",
        _ => "Action",
    };

    let mut import = ImportElement {
        name: require_attr(node, element, "Name")?.to_string(),
        target: attr(node, target_attr).map(str::to_string),
        entity_set: attr(node, "EntitySet").map(str::to_string),
        // V2 declares the return type as an attribute on the import itself
        return_type: attr(node, "ReturnType").map(|t| ReturnElement {
            type_name: t.to_string(),
            nullable: true,
        }),
        ..ImportElement::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "Parameter" => import.parameters.push(parse_parameter(&child)?),
            "Annotation" => {}
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: element,
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(import)
}

fn parse_annotations(
    node: &Node,
    out: &mut Vec<AnnotationElement>,
) -> Result<(), MetadataError> {
    let target = attr(node, "Target").map(str::to_string);

    for child in elements(node) {
        match child.tag_name().name() {
            "Annotation" => out.push(parse_annotation(&child, target.clone())?),
            other => {
                return Err(MetadataError::UnexpectedElement {
                    parent: "Annotations",
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn parse_annotation(
    node: &Node,
    target: Option<String>,
) -> Result<AnnotationElement, MetadataError> {
    let value = ["String", "Bool", "Int", "EnumMember", "Path"]
        .iter()
        .find_map(|name| attr(node, name))
        .map(str::to_string);

    Ok(AnnotationElement {
        target,
        term: require_attr(node, "Annotation", "Term")?.to_string(),
        value,
    })
}

//
// attribute helpers
//

fn elements<'a, 'input>(node: &Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

// Attribute lookup by local name; CSDL mixes plain and namespaced
// attributes (m:DataServiceVersion) across dialects.
fn attr<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

fn require_attr<'a>(
    node: &Node<'a, '_>,
    element: &'static str,
    name: &'static str,
) -> Result<&'a str, MetadataError> {
    attr(node, name).ok_or(MetadataError::MissingAttribute {
        element,
        attribute: name,
    })
}

fn bool_attr(node: &Node, name: &str) -> bool {
    attr(node, name) == Some("true")
}

// Numeric facet; `Max` and `variable` mean "unbounded", not a number.
fn facet_attr(
    node: &Node,
    element: &'static str,
    name: &'static str,
) -> Result<Option<u32>, MetadataError> {
    match attr(node, name) {
        None | Some("Max" | "variable") => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| MetadataError::InvalidValue {
                element,
                attribute: name,
                value: raw.to_string(),
            }),
    }
}
