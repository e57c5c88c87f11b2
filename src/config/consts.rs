// src/config/consts.rs

// Markup layout
pub const CONTAINER_ID: &str = "hideMap";
pub const HEADING_TAG: &str = "h3";
pub const LABEL_ATTR: &str = "data-label";
pub const HEADING_SEP: &str = " - ";

// Normalization
pub const UNIT_COLUMN: &str = "Apartment";
pub const KEY_SEP: &str = " ";
pub const EXCLUDED_COLUMNS: [&str; 4] = ["AvailableFrom", "AvailableTo", "Amenities", "Action"];
pub const SORT_FIELD: &str = "Bedroom";
pub const PLURAL_SUFFIX: char = 's';

// Snapshot store
pub const STORE_DIR: &str = "history";
pub const SNAPSHOT_EXT: &str = "csv";
pub const KEY_HEADER: &str = "Key";
pub const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

// Report
pub const ADDED_MARKER: &str = "***";
pub const ITEM_NOUN: &str = "listing";

// Delivery
pub const OUTBOX_DIR: &str = "outbox";
pub const MAIL_SUBJECT: &str = "Listing update";
pub const MAIL_FROM: &str = "listing-watch@localhost";
