//! Schema extraction: tagged fields of a record shape, in declaration order.

use crate::cell::CellValue;
use crate::error::{FieldError, MapError, MapResult};
use crate::record::{Getter, Record, Setter, Shape};
use std::collections::{HashMap, HashSet};

const WIDTH_PREFIX: &str = "width:";

/// Column metadata derived from one tagged field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Header text.
    pub label: String,
    /// Column width; `0.0` means the backend default.
    pub width: f64,
    /// Position of the field among all declared fields.
    pub slot: usize,
    /// Field name, for diagnostics.
    pub field: &'static str,
}

impl FieldDescriptor {
    /// Describe a column straight from a tag string, with no backing field.
    #[must_use]
    pub fn from_tag(tag: &str, slot: usize) -> Self {
        let (label, width) = parse_tag(tag);
        FieldDescriptor {
            label,
            width,
            slot,
            field: "",
        }
    }

    /// The explicit width, if one was tagged.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        (self.width != 0.0).then_some(self.width)
    }
}

/// Parse a field tag into `(label, width)`.
///
/// Tokens are separated by `;`. A `width:<n>` token sets the width; a
/// malformed number gives `0.0`. Every other token is a label and the last
/// one wins, so `"a;b"` is labelled `b`.
pub fn parse_tag(tag: &str) -> (String, f64) {
    let mut label = "";
    let mut width = 0.0;
    for token in tag.split(';') {
        if let Some(value) = token.strip_prefix(WIDTH_PREFIX) {
            width = value.parse::<f64>().unwrap_or(0.0);
        } else {
            label = token;
        }
    }
    (label.to_string(), width)
}

/// The extracted schema of record type `T`.
///
/// Built fresh for every decode or encode call.
pub struct Schema<T> {
    shape_name: &'static str,
    fields: Vec<FieldDescriptor>,
    getters: Vec<Option<Getter<T>>>,
    setters: Vec<Option<Setter<T>>>,
}

impl<T: Record> Schema<T> {
    /// Extract the schema of `T`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the shape is not a well-formed record:
    /// an empty or duplicated field name.
    pub fn extract() -> MapResult<Self> {
        Self::from_shape(&T::shape())
    }
}

impl<T> Schema<T> {
    /// Extract the schema from an explicit shape.
    pub fn from_shape(shape: &Shape<T>) -> MapResult<Self> {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();

        for (slot, declared) in shape.slots().iter().enumerate() {
            let name = declared.name();
            if name.is_empty() {
                return Err(MapError::InvalidArgument(format!(
                    "{} is not a record: field {slot} has no name",
                    shape.name()
                )));
            }
            if !seen.insert(name) {
                return Err(MapError::InvalidArgument(format!(
                    "{} is not a record: field `{name}` is declared twice",
                    shape.name()
                )));
            }

            let Some(tag) = declared.tag().filter(|tag| !tag.is_empty()) else {
                continue;
            };
            fields.push(FieldDescriptor {
                field: name,
                ..FieldDescriptor::from_tag(tag, slot)
            });
        }

        Ok(Schema {
            shape_name: shape.name(),
            fields,
            getters: shape.slots().iter().map(|s| s.getter()).collect(),
            setters: shape.slots().iter().map(|s| s.setter()).collect(),
        })
    }

    /// Record type name.
    pub fn shape_name(&self) -> &'static str {
        self.shape_name
    }

    /// Tagged fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Map each label to its slot. A label used twice resolves to the
    /// later-declared field.
    pub fn label_index(&self) -> HashMap<&str, usize> {
        self.fields
            .iter()
            .map(|field| (field.label.as_str(), field.slot))
            .collect()
    }

    /// Read the value of `slot` from `record`.
    pub fn get(&self, slot: usize, record: &T) -> CellValue {
        self.getters
            .get(slot)
            .copied()
            .flatten()
            .map_or(CellValue::Null, |get| get(record))
    }

    /// Store `text` into `slot` of `record`. Untagged slots ignore the text.
    pub fn set(&self, slot: usize, record: &mut T, text: &str) -> Result<(), FieldError> {
        match self.setters.get(slot).copied().flatten() {
            Some(set) => set(record, text),
            None => Ok(()),
        }
    }

    /// Field name of `slot`.
    pub fn field_name(&self, slot: usize) -> &'static str {
        self.fields
            .iter()
            .find(|f| f.slot == slot)
            .map_or("", |f| f.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Slot;
    use crate::CellField;

    crate::record! {
        #[derive(Debug, Default)]
        struct Export {
            id: String => "ID",
            name: String => "姓名",
            internal: String,
            mobile: String => "手机号;width:16",
            age: String => "年龄",
        }
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag("ID"), ("ID".to_string(), 0.0));
        assert_eq!(parse_tag("手机号;width:16"), ("手机号".to_string(), 16.0));
        assert_eq!(parse_tag("width:12.5;Notes"), ("Notes".to_string(), 12.5));
        // last label wins
        assert_eq!(parse_tag("first;second"), ("second".to_string(), 0.0));
        // malformed width is silently zero
        assert_eq!(parse_tag("Mobile;width:wide"), ("Mobile".to_string(), 0.0));
        // width only
        assert_eq!(parse_tag("width:10"), (String::new(), 10.0));
    }

    #[test]
    fn test_descriptor_from_tag() {
        let field = FieldDescriptor::from_tag("Mobile;width:16", 4);
        assert_eq!(field.label, "Mobile");
        assert_eq!(field.width(), Some(16.0));
        assert_eq!(field.slot, 4);
    }

    #[test]
    fn test_extract_declaration_order() {
        let schema = Schema::<Export>::extract().unwrap();
        assert_eq!(schema.shape_name(), "Export");

        let labels: Vec<_> = schema.fields().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["ID", "姓名", "手机号", "年龄"]);

        let slots: Vec<_> = schema.fields().iter().map(|f| f.slot).collect();
        assert_eq!(slots, vec![0, 1, 3, 4]);

        assert_eq!(schema.fields()[2].width(), Some(16.0));
        assert_eq!(schema.fields()[0].width(), None);
        assert_eq!(schema.field_name(3), "mobile");
    }

    #[test]
    fn test_get_and_set_by_slot() {
        let schema = Schema::<Export>::extract().unwrap();
        let mut record = Export::default();
        schema.set(3, &mut record, "111111111").unwrap();
        schema.set(2, &mut record, "ignored").unwrap();
        assert_eq!(record.mobile, "111111111");
        assert_eq!(record.internal, "");
        assert_eq!(schema.get(3, &record), CellValue::from("111111111"));
        assert_eq!(schema.get(2, &record), CellValue::Null);
    }

    #[derive(Default)]
    struct Twice {
        a: String,
        b: String,
    }

    fn twice_slot(name: &'static str, tag: &'static str) -> Slot<Twice> {
        Slot::tagged(name, tag, |t: &Twice| t.a.to_cell(), |t: &mut Twice, s: &str| {
            t.b.assign_text(s)
        })
    }

    #[test]
    fn test_duplicate_label_later_wins() {
        let shape = Shape::new("Twice")
            .slot(twice_slot("a", "Same"))
            .slot(twice_slot("b", "Same"));
        let schema = Schema::from_shape(&shape).unwrap();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.label_index().get("Same"), Some(&1));
    }

    #[test]
    fn test_malformed_shape_is_invalid_argument() {
        let shape = Shape::new("Twice")
            .slot(twice_slot("a", "A"))
            .slot(twice_slot("a", "B"));
        let err = Schema::from_shape(&shape).err().unwrap();
        assert!(err.is_invalid_argument());

        let shape = Shape::new("Twice").slot(Slot::<Twice>::untagged(""));
        assert!(Schema::from_shape(&shape).err().unwrap().is_invalid_argument());
    }

    #[test]
    fn test_empty_tag_is_untagged() {
        let shape = Shape::new("Twice").slot(twice_slot("a", ""));
        let schema = Schema::from_shape(&shape).unwrap();
        assert!(schema.fields().is_empty());
    }
}
