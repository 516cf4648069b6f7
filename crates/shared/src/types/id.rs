//! Typed IDs for type-safe entity references.
//!
//! Typed IDs keep an `EmployeeId` from being passed where a `UserId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user acting on the ledger or payroll.");
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(
    AccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(LedgerEntryId, "Unique identifier for a general ledger row.");
typed_id!(FiscalPeriodId, "Unique identifier for a fiscal period.");
typed_id!(PayrollCycleId, "Unique identifier for a payroll cycle.");
typed_id!(PayrollItemId, "Unique identifier for a payroll item.");
typed_id!(
    PayrollTransactionId,
    "Unique identifier for a payroll disbursement record."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_from_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = EmployeeId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_typed_id_from_str() {
        let uuid = Uuid::new_v4();
        let id = PayrollCycleId::from_str(&uuid.to_string()).unwrap();
        assert_eq!(id.into_inner(), uuid);
        assert!(UserId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(PayrollItemId::new(), PayrollItemId::new());
    }
}
