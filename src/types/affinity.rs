//! Static type-affinity table.
//!
//! Maps abstract column-type names used by host frameworks to BigQuery
//! storage types. Consulted by schema-generation collaborators; the cursor
//! core never reads it. Immutable for the lifetime of the process.

/// Abstract field type name → BigQuery storage type.
pub const TYPE_AFFINITY: &[(&str, &str)] = &[
    ("BinaryField", "BYTES"),
    ("BooleanField", "BOOL"),
    ("CharField", "STRING"),
    ("DateField", "DATE"),
    ("DateTimeField", "DATETIME"),
    ("DecimalField", "NUMERIC"),
    ("DurationField", "STRING"),
    ("FileField", "STRING"),
    ("FilePathField", "STRING"),
    ("FloatField", "FLOAT64"),
    ("IntegerField", "INT64"),
    ("BigIntegerField", "INT64"),
    ("IPAddressField", "STRING"),
    ("GenericIPAddressField", "STRING"),
    ("JSONField", "JSON"),
    ("OneToOneField", "INT64"),
    ("PositiveBigIntegerField", "INT64"),
    ("PositiveIntegerField", "INT64"),
    ("PositiveSmallIntegerField", "INT64"),
    ("SlugField", "STRING"),
    ("SmallAutoField", "INT64"),
    ("SmallIntegerField", "INT64"),
    ("TextField", "STRING"),
    ("TimeField", "TIME"),
    ("UUIDField", "STRING"),
];

/// Look up the BigQuery storage type for an abstract field type name.
pub fn storage_type(field_type: &str) -> Option<&'static str> {
    TYPE_AFFINITY
        .iter()
        .find(|(name, _)| *name == field_type)
        .map(|(_, storage)| *storage)
}
