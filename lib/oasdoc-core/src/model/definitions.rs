use std::collections::BTreeMap;
use std::sync::Arc;

use utoipa::openapi::{OpenApi, RefOr, Schema};

use crate::inline::NameRegistry;

const SCHEMA_PREFIXES: [&str; 2] = ["#/components/schemas/", "#/definitions/"];

/// Named top-level schemas of the API, addressable by `$ref`.
///
/// Every definition also gets a unique name, used for its anchor and its file: `Pet` and `pet`
/// both normalize to `pet`, so the second one in name order becomes `pet-2`.
#[derive(Debug, Clone)]
pub struct DefinitionIndex<'a> {
    schemas: Option<&'a BTreeMap<String, RefOr<Schema>>>,
    unique_names: Arc<BTreeMap<&'a str, String>>,
}

impl<'a> DefinitionIndex<'a> {
    /// Indexes the component schemas of the API.
    pub fn new(api: &'a OpenApi) -> Self {
        Self::registered(api, &mut NameRegistry::new())
    }

    /// Indexes the component schemas of the API, drawing unique names from `registry`.
    pub(crate) fn registered(api: &'a OpenApi, registry: &mut NameRegistry) -> Self {
        let schemas = api.components.as_ref().map(|components| &components.schemas);
        Self::index(schemas, registry)
    }

    /// Indexes an explicit schema map.
    pub fn from_schemas(schemas: &'a BTreeMap<String, RefOr<Schema>>) -> Self {
        Self::index(Some(schemas), &mut NameRegistry::new())
    }

    fn index(
        schemas: Option<&'a BTreeMap<String, RefOr<Schema>>>,
        registry: &mut NameRegistry,
    ) -> Self {
        let unique_names = schemas
            .into_iter()
            .flat_map(|schemas| schemas.keys())
            .map(|name| (name.as_str(), registry.register(name)))
            .collect();
        Self {
            schemas,
            unique_names: Arc::new(unique_names),
        }
    }

    /// The unique name of a definition, `None` for an unknown one.
    pub fn unique_name(&self, name: &str) -> Option<&str> {
        self.unique_names.get(name).map(String::as_str)
    }

    /// Unique names of every definition.
    pub fn unique_names(&self) -> impl Iterator<Item = &str> {
        self.unique_names.values().map(String::as_str)
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&'a RefOr<Schema>> {
        self.schemas.and_then(|schemas| schemas.get(name))
    }

    /// Definition names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.schemas
            .into_iter()
            .flat_map(|schemas| schemas.keys().map(String::as_str))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.schemas.map_or(0, BTreeMap::len)
    }

    /// Whether there is no definition at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts the definition name from a schema reference.
///
/// ```rust,ignore
/// assert_eq!(reference_name("#/components/schemas/Pet"), Some("Pet"));
/// assert_eq!(reference_name("common.yaml#/components/schemas/Error"), Some("Error"));
/// assert_eq!(reference_name("#/components/responses/NotFound"), None);
/// ```
pub(crate) fn reference_name(ref_location: &str) -> Option<&str> {
    let fragment = ref_location
        .find('#')
        .and_then(|index| ref_location.get(index..))
        .unwrap_or(ref_location);
    SCHEMA_PREFIXES
        .iter()
        .find_map(|prefix| fragment.strip_prefix(prefix))
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::{ComponentsBuilder, ObjectBuilder, OpenApiBuilder};

    use super::*;

    #[test]
    fn should_extract_reference_name() {
        assert_eq!(reference_name("#/components/schemas/Pet"), Some("Pet"));
        assert_eq!(reference_name("#/definitions/Pet"), Some("Pet"));
        assert_eq!(
            reference_name("common.yaml#/components/schemas/Error"),
            Some("Error")
        );
        assert_eq!(reference_name("#/components/responses/NotFound"), None);
        assert_eq!(reference_name("#/components/schemas/"), None);
        assert_eq!(reference_name("Pet"), None);
    }

    #[test]
    fn should_index_component_schemas() {
        let api = OpenApiBuilder::new()
            .components(Some(
                ComponentsBuilder::new()
                    .schema("Pet", ObjectBuilder::new())
                    .schema("Category", ObjectBuilder::new())
                    .build(),
            ))
            .build();

        let index = DefinitionIndex::new(&api);

        assert_eq!(index.len(), 2);
        assert!(index.get("Pet").is_some());
        assert!(index.get("Owner").is_none());
        assert_eq!(index.names().collect::<Vec<_>>(), ["Category", "Pet"]);
    }

    #[test]
    fn should_give_colliding_definitions_distinct_unique_names() {
        let api = OpenApiBuilder::new()
            .components(Some(
                ComponentsBuilder::new()
                    .schema("Pet", ObjectBuilder::new())
                    .schema("pet", ObjectBuilder::new())
                    .schema("Order.Item", ObjectBuilder::new())
                    .schema("Order_Item", ObjectBuilder::new())
                    .build(),
            ))
            .build();

        let index = DefinitionIndex::new(&api);

        assert_eq!(index.unique_name("Order.Item"), Some("order-item"));
        assert_eq!(index.unique_name("Order_Item"), Some("order-item-2"));
        assert_eq!(index.unique_name("Pet"), Some("pet"));
        assert_eq!(index.unique_name("pet"), Some("pet-2"));
        assert_eq!(index.unique_name("Owner"), None);
        assert_eq!(index.unique_names().count(), 4);
    }

    #[test]
    fn should_handle_missing_components() {
        let api = OpenApiBuilder::new().build();
        let index = DefinitionIndex::new(&api);

        assert!(index.is_empty());
        assert_eq!(index.names().count(), 0);
    }
}
