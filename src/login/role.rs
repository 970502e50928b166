/// Dashboard for accounts whose role is missing or not recognised.
pub const DEFAULT_DASHBOARD: &str = "/dashboard";
pub const ORGANIZATION_DASHBOARD: &str = "/dashboard/organization";
pub const DONOR_DASHBOARD: &str = "/dashboard/donor";
pub const ADMIN_DASHBOARD: &str = "/dashboard/admin";

/// Account role reported by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Organization,
    Donor,
    Superadmin,
    Unknown,
}

impl Role {
    /// Exact, case-sensitive match on the wire value.
    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("organization") => Self::Organization,
            Some("donor") => Self::Donor,
            Some("superadmin") => Self::Superadmin,
            _ => Self::Unknown,
        }
    }

    /// Post-login destination for this role.
    #[must_use]
    pub fn dashboard(&self) -> &'static str {
        match self {
            Self::Organization => ORGANIZATION_DASHBOARD,
            Self::Donor => DONOR_DASHBOARD,
            Self::Superadmin => ADMIN_DASHBOARD,
            Self::Unknown => DEFAULT_DASHBOARD,
        }
    }
}
