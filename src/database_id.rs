//! Database ID type definition.

/// The identifier a sale record was given by the external sale feed.
///
/// The store does not enforce uniqueness, several rows may share the same
/// record ID, e.g. after seeding twice.
pub type RecordId = i64;
