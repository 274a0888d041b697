// doc constants
pub const DOC_ID: &str = "_id";
pub const RESERVED_FIELDS: [&str; 1] = [DOC_ID];

// field path separator for nested documents
pub const FIELD_SEPARATOR: &str = ".";

// identity constraints
pub const MAX_ID_LENGTH: usize = 128;
pub const GENERATED_ID_WIDTH: usize = 19;

// repository defaults
pub const DEFAULT_REPOSITORY_NAME: &str = "default";
