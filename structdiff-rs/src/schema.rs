//! Per-signature property schemas.
//!
//! Every structural position class (identified by its dotted signature,
//! e.g. `root.movie.title`) gets one [`Schema`] accumulating the union of
//! property names seen at that position in *either* document. Flattening a
//! node's properties against its schema yields fixed-order vectors, so two
//! nodes with the same signature always compare column by column.

use rustc_hash::FxHashMap;

use crate::bigram::Bigram;
use crate::counter::Counter;

/// Accumulated property-name set for one structural signature.
#[derive(Debug)]
pub struct Schema {
    id: usize,
    signature: String,
    /// Property names in first-seen order; defines the column order of
    /// flattened property vectors.
    names: Vec<String>,
}

impl Schema {
    fn new(id: usize, signature: &str) -> Self {
        Schema {
            id,
            signature: signature.to_string(),
            names: Vec::new(),
        }
    }

    /// Returns the schema id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the dotted signature this schema belongs to.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the accumulated property names in column order.
    pub fn property_names(&self) -> &[String] {
        &self.names
    }

    fn add_name(&mut self, name: &str) {
        // Schemas hold a handful of names; a linear scan beats hashing.
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }
}

/// Registry mapping signatures to schemas, shared by both documents of one
/// diff so that matching signatures get identical ids.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: FxHashMap<String, Schema>,
    ids: Counter,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Unions `names` into the schema for `signature`, creating the schema
    /// with a fresh id on first sight.
    pub fn add_property_names<'a, I>(&mut self, signature: &str, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let Some(schema) = self.schemas.get_mut(signature) {
            for name in names {
                schema.add_name(name);
            }
            return;
        }

        let mut schema = Schema::new(self.ids.next(), signature);
        for name in names {
            schema.add_name(name);
        }
        self.schemas.insert(signature.to_string(), schema);
    }

    /// Flattens `properties` into the column order of the schema for
    /// `signature`, substituting the empty bigram for missing columns.
    ///
    /// Both documents must have finished registering before the first
    /// `format` call, otherwise columns would differ between the two sides.
    ///
    /// # Panics
    ///
    /// Panics if `signature` was never registered; callers always register
    /// a node before formatting it.
    pub fn format(
        &self,
        signature: &str,
        properties: &FxHashMap<String, Bigram>,
    ) -> (usize, Vec<Bigram>) {
        let schema = self
            .schemas
            .get(signature)
            .unwrap_or_else(|| panic!("format() called for unregistered signature {signature:?}"));

        let flattened = schema
            .names
            .iter()
            .map(|name| properties.get(name).cloned().unwrap_or_else(Bigram::empty))
            .collect();

        (schema.id, flattened)
    }

    /// Returns the schema for a signature, if registered.
    pub fn get(&self, signature: &str) -> Option<&Schema> {
        self.schemas.get(signature)
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no schema has been registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(entries: &[(&str, &str)]) -> FxHashMap<String, Bigram> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), Bigram::new(value)))
            .collect()
    }

    #[test]
    fn test_ids_assigned_in_first_seen_order() {
        let mut registry = SchemaRegistry::new();
        registry.add_property_names("root", std::iter::empty());
        registry.add_property_names("root.a", std::iter::empty());
        registry.add_property_names("root.b", std::iter::empty());
        // Re-registering does not burn a new id.
        registry.add_property_names("root.a", std::iter::empty());

        assert_eq!(registry.get("root").unwrap().id(), 0);
        assert_eq!(registry.get("root.a").unwrap().id(), 1);
        assert_eq!(registry.get("root.b").unwrap().id(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_property_union_across_documents() {
        let mut registry = SchemaRegistry::new();
        // Expected document sees x, actual document sees y on the same path.
        registry.add_property_names("root.item", ["x"]);
        registry.add_property_names("root.item", ["y", "x"]);

        let schema = registry.get("root.item").unwrap();
        assert_eq!(schema.property_names(), ["x", "y"]);
    }

    #[test]
    fn test_format_aligns_columns_and_fills_missing() {
        let mut registry = SchemaRegistry::new();
        registry.add_property_names("root.item", ["x"]);
        registry.add_property_names("root.item", ["y"]);

        let (id_a, vec_a) = registry.format("root.item", &props(&[("x", "1")]));
        let (id_b, vec_b) = registry.format("root.item", &props(&[("y", "2")]));

        assert_eq!(id_a, id_b);
        assert_eq!(vec_a.len(), 2);
        assert_eq!(vec_b.len(), 2);
        // Column 0 is x, column 1 is y on both sides.
        assert_eq!(vec_a[0], Bigram::new("1"));
        assert!(vec_a[1].is_empty());
        assert!(vec_b[0].is_empty());
        assert_eq!(vec_b[1], Bigram::new("2"));
    }

    #[test]
    fn test_format_is_insertion_order_stable() {
        let mut registry = SchemaRegistry::new();
        registry.add_property_names("n", ["b", "a", "c"]);

        let (_, first) = registry.format("n", &props(&[("a", "1"), ("b", "2"), ("c", "3")]));
        let (_, second) = registry.format("n", &props(&[("c", "3"), ("b", "2"), ("a", "1")]));
        assert_eq!(first, second);
        assert_eq!(first[0], Bigram::new("2")); // column order is b, a, c
    }

    #[test]
    #[should_panic(expected = "unregistered signature")]
    fn test_format_unregistered_panics() {
        let registry = SchemaRegistry::new();
        registry.format("never.seen", &FxHashMap::default());
    }
}
