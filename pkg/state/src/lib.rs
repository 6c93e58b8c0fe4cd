pub mod records;

pub use records::{OrgStore, OrganizationRecords};
