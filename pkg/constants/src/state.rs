//! Record store constants.

/// etcd-style key prefix for organization records.
pub const ORGANIZATIONS_PREFIX: &str = "/registry/organizations/";

/// Build the record store key for an organization id.
pub fn organization_key(id: &str) -> String {
    format!("{}{}", ORGANIZATIONS_PREFIX, id)
}
