//! Farm ownership accounting
//!
//! Owners only ever accumulate: a farm's total share grows until it reaches
//! full ownership and is never allowed past it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::{Owner, VerticalFarm};
use crate::validation::{validate_owner_address, validate_share_size};

/// Sum of all shares when a farm is fully owned
pub const FULL_OWNERSHIP: Decimal = Decimal::ONE_HUNDRED;

/// Sum of the share sizes of all owners
pub fn total_shares(owners: &[Owner]) -> Decimal {
    owners.iter().map(|owner| owner.share_size).sum()
}

/// Share still available to new owners
pub fn available_share(owners: &[Owner]) -> Decimal {
    (FULL_OWNERSHIP - total_shares(owners)).max(Decimal::ZERO)
}

/// Append a new owner to `farm`, enforcing the 100% cap.
///
/// On rejection the owner list is left untouched.
pub fn add_owner(
    farm: &mut VerticalFarm,
    address: &str,
    share_size: Decimal,
    now: DateTime<Utc>,
) -> DomainResult<Owner> {
    validate_owner_address(address).map_err(DomainError::InvalidOwnerAddress)?;
    validate_share_size(share_size).map_err(|reason| DomainError::InvalidShareSize {
        share_size,
        reason,
    })?;

    let current = total_shares(&farm.owners);
    if current + share_size > FULL_OWNERSHIP {
        return Err(DomainError::ShareExceeded {
            requested: share_size,
            available: available_share(&farm.owners),
        });
    }

    let owner = Owner {
        id: Uuid::new_v4(),
        address: address.trim().to_string(),
        share_size,
        joined_at: now,
    };
    farm.owners.push(owner.clone());

    Ok(owner)
}
