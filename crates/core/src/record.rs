//! Record shapes: the declared fields of a record type, in declaration order.

use crate::cell::CellValue;
use crate::error::FieldError;

/// Reads a field out of a record as a native cell value.
pub type Getter<T> = fn(&T) -> CellValue;

/// Stores a cell's text into a field of a record.
pub type Setter<T> = fn(&mut T, &str) -> Result<(), FieldError>;

/// A record type that can be mapped to and from table rows.
///
/// Decoded records start from `Default::default()`, so every unmapped field
/// keeps its zero value. Implement it with the [`record!`](crate::record)
/// macro, or by hand with [`Shape`] and [`Slot`].
pub trait Record: Default {
    /// Describe the fields of this record in declaration order.
    fn shape() -> Shape<Self>;
}

/// One declared field of a record.
pub struct Slot<T> {
    name: &'static str,
    tag: Option<&'static str>,
    access: Option<(Getter<T>, Setter<T>)>,
}

impl<T> Slot<T> {
    /// A field with no column tag. It takes part in slot numbering only.
    #[must_use]
    pub fn untagged(name: &'static str) -> Self {
        Slot {
            name,
            tag: None,
            access: None,
        }
    }

    /// A field mapped to a column through its tag, e.g. `"手机号;width:16"`.
    #[must_use]
    pub fn tagged(name: &'static str, tag: &'static str, get: Getter<T>, set: Setter<T>) -> Self {
        Slot {
            name,
            tag: Some(tag),
            access: Some((get, set)),
        }
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw tag string, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    pub(crate) fn getter(&self) -> Option<Getter<T>> {
        self.access.map(|(get, _)| get)
    }

    pub(crate) fn setter(&self) -> Option<Setter<T>> {
        self.access.map(|(_, set)| set)
    }
}

impl<T> std::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// The ordered field list of record type `T`.
#[derive(Debug)]
pub struct Shape<T> {
    name: &'static str,
    slots: Vec<Slot<T>>,
}

impl<T> Shape<T> {
    /// Start an empty shape for the record named `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Shape {
            name,
            slots: Vec::new(),
        }
    }

    /// Append the next declared field.
    #[must_use]
    pub fn slot(mut self, slot: Slot<T>) -> Self {
        self.slots.push(slot);
        self
    }

    /// Record type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All declared fields, tagged or not.
    #[must_use]
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }
}

/// Declare a struct together with its [`Record`] implementation.
///
/// Fields followed by `=> "tag"` are mapped to a column; the tag is a
/// `;`-separated list holding the column label and an optional `width:<n>`.
/// Untagged fields are ignored by decode and encode, but still need a
/// `Default` value.
///
/// ```
/// sheetbind_core::record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Contact {
///         pub id: String => "ID",
///         pub mobile: String => "手机号;width:16",
///         pub age: Option<u32> => "年龄",
///         pub internal_note: String,
///     }
/// }
///
/// let records = vec![Contact { id: "1".into(), ..Contact::default() }];
/// let table = sheetbind_core::encode(&records).unwrap();
/// assert_eq!(table.rows("Sheet1").unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    (@slot $name:ident, $field:ident) => {
        $crate::Slot::untagged(stringify!($field))
    };
    (@slot $name:ident, $field:ident, $tag:literal) => {
        $crate::Slot::tagged(
            stringify!($field),
            $tag,
            |record: &$name| $crate::CellField::to_cell(&record.$field),
            |record: &mut $name, text: &str| $crate::CellField::assign_text(&mut record.$field, text),
        )
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn shape() -> $crate::Shape<Self> {
                $crate::Shape::new(stringify!($name))
                    $(.slot($crate::record!(@slot $name, $field $(, $tag)?)))*
            }
        }
    };
}
