//! Typed mirror of a CSDL document.
//!
//! One node per recognized EDM construct, in document order, carrying
//! attribute values verbatim. Behavior is limited to the pure `to_config`
//! reductions in `reduce`.

use odatum_schema::types::ProtocolVersion;

///
/// Document
///

#[derive(Clone, Debug)]
pub struct Document {
    pub version: ProtocolVersion,
    pub references: Vec<Reference>,
    pub schemas: Vec<SchemaElement>,
}

///
/// Reference
///
/// An `edmx:Reference` to an external vocabulary or schema document.
/// Recorded for callers; nothing here follows the URI.
///

#[derive(Clone, Debug)]
pub struct Reference {
    pub uri: String,
    pub includes: Vec<String>,
}

///
/// SchemaElement
///

#[derive(Clone, Debug, Default)]
pub struct SchemaElement {
    pub namespace: String,
    pub alias: Option<String>,
    pub entity_types: Vec<StructuredTypeElement>,
    pub complex_types: Vec<StructuredTypeElement>,
    pub enum_types: Vec<EnumTypeElement>,
    pub type_definitions: Vec<TypeDefinitionElement>,
    pub functions: Vec<CallableElement>,
    pub actions: Vec<CallableElement>,
    pub associations: Vec<AssociationElement>,
    pub containers: Vec<ContainerElement>,
    pub annotations: Vec<AnnotationElement>,
}

///
/// StructuredTypeElement
///
/// `EntityType` and `ComplexType` share this shape; complex types carry an
/// empty key.
///

#[derive(Clone, Debug, Default)]
pub struct StructuredTypeElement {
    pub name: String,
    pub base_type: Option<String>,
    pub open_type: bool,
    pub key: Vec<String>,
    pub properties: Vec<PropertyElement>,
    pub navigations: Vec<NavigationElement>,
}

///
/// PropertyElement
///

#[derive(Clone, Debug)]
pub struct PropertyElement {
    /// Raw declared type, possibly `Collection(...)`-wrapped.
    pub type_name: String,
    pub name: String,
    pub nullable: bool,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub max_length: Option<u32>,
    pub default_value: Option<String>,
}

///
/// NavigationElement
///
/// V4 declares the target type directly; V2 names an association whose ends
/// carry the types, resolved during reduction.
///

#[derive(Clone, Debug)]
pub struct NavigationElement {
    pub name: String,
    pub type_name: Option<String>,
    pub relationship: Option<String>,
    pub to_role: Option<String>,
    pub nullable: bool,
}

///
/// EnumTypeElement
///

#[derive(Clone, Debug, Default)]
pub struct EnumTypeElement {
    pub name: String,
    pub flags: bool,
    pub underlying_type: Option<String>,
    /// Member name plus declared value; members without a value number from
    /// zero during reduction.
    pub members: Vec<(String, Option<i64>)>,
}

///
/// TypeDefinitionElement
///

#[derive(Clone, Debug)]
pub struct TypeDefinitionElement {
    pub name: String,
    pub underlying_type: String,
}

///
/// CallableElement
///

#[derive(Clone, Debug, Default)]
pub struct CallableElement {
    pub name: String,
    pub bound: bool,
    pub composable: bool,
    pub entity_set_path: Option<String>,
    pub parameters: Vec<ParameterElement>,
    pub return_type: Option<ReturnElement>,
}

///
/// ParameterElement
///

#[derive(Clone, Debug)]
pub struct ParameterElement {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
}

///
/// ReturnElement
///

#[derive(Clone, Debug)]
pub struct ReturnElement {
    pub type_name: String,
    pub nullable: bool,
}

///
/// AssociationElement
///
/// V2-era relationship declaration; each end binds a role name to an entity
/// type.
///

#[derive(Clone, Debug, Default)]
pub struct AssociationElement {
    pub name: String,
    pub ends: Vec<AssociationEnd>,
}

#[derive(Clone, Debug)]
pub struct AssociationEnd {
    pub role: String,
    pub entity_type: String,
    pub multiplicity: Option<String>,
}

///
/// ContainerElement
///

#[derive(Clone, Debug, Default)]
pub struct ContainerElement {
    pub name: String,
    pub entity_sets: Vec<EntitySetElement>,
    pub singletons: Vec<SingletonElement>,
    pub function_imports: Vec<ImportElement>,
    pub action_imports: Vec<ImportElement>,
}

#[derive(Clone, Debug)]
pub struct EntitySetElement {
    pub name: String,
    pub entity_type: String,
}

#[derive(Clone, Debug)]
pub struct SingletonElement {
    pub name: String,
    pub entity_type: String,
}

///
/// ImportElement
///
/// `FunctionImport`/`ActionImport` container members. The V2 flavor carries
/// inline parameters and a return type attribute.
///

#[derive(Clone, Debug, Default)]
pub struct ImportElement {
    pub name: String,
    pub target: Option<String>,
    pub entity_set: Option<String>,
    pub parameters: Vec<ParameterElement>,
    pub return_type: Option<ReturnElement>,
}

///
/// AnnotationElement
///
/// Vocabulary annotation, recorded verbatim and never interpreted.
///

#[derive(Clone, Debug)]
pub struct AnnotationElement {
    pub target: Option<String>,
    pub term: String,
    pub value: Option<String>,
}
