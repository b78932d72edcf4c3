mod core;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod query;

pub use core::{
    NewSaleRecord, SaleRecord, create_record_table, get_record, insert_record, map_record_row,
};
pub use delete_endpoint::delete_record_endpoint;
pub use edit_endpoint::edit_record_endpoint;
pub use list_endpoint::list_records_endpoint;
pub use query::{RecordFilter, get_filtered_records, list_records};

pub(crate) use core::{RECORD_COLUMNS, validate_price};

#[cfg(test)]
pub(crate) use core::count_records;
