//! Static operator-template table.
//!
//! Maps abstract comparison operator names to BigQuery expression templates.
//! Each template carries one or two `?` placeholders that the query
//! compilation layer fills before handing the statement to
//! [`render`](crate::query::statement::render); the translator itself never
//! consults this table. Immutable for the lifetime of the process.

/// Abstract comparator name → BigQuery expression template.
pub const OPERATOR_TEMPLATES: &[(&str, &str)] = &[
    ("exact", "= ?"),
    ("iexact", "= UPPER(?)"),
    ("contains", "LIKE ?"),
    ("icontains", "LIKE UPPER(?)"),
    ("startswith", "LIKE CONCAT(?, '%')"),
    ("istartswith", "LIKE CONCAT(UPPER(?), '%')"),
    ("endswith", "LIKE CONCAT('%', ?)"),
    ("iendswith", "LIKE CONCAT('%', UPPER(?))"),
    ("regex", "REGEXP_CONTAINS(?, ?)"),
    ("iregex", "REGEXP_CONTAINS(UPPER(?), UPPER(?))"),
    ("gt", "> ?"),
    ("gte", ">= ?"),
    ("lt", "< ?"),
    ("lte", "<= ?"),
];

/// Look up the expression template for an abstract comparator name.
pub fn template_for(operator: &str) -> Option<&'static str> {
    OPERATOR_TEMPLATES
        .iter()
        .find(|(name, _)| *name == operator)
        .map(|(_, template)| *template)
}
