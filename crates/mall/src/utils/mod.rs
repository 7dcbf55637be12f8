mod criteria;
mod file;

pub use self::criteria::{Criteria, CriteriaParams, SearchCriteria, SearchType};
pub use self::file::{FileError, FileStorage, StoredFile, THUMBNAIL_PREFIX};
