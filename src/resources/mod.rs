//! Resource clients.
//!
//! [`ObjectsClient`] does generic object CRUD. The typed clients
//! ([`UsersClient`], [`TenantsClient`], [`RolesClient`],
//! [`PermissionsClient`], [`FeaturesClient`], [`PricingTiersClient`]) each
//! wrap it with a fixed object type and project results into their own
//! struct. Relationship helpers on the typed clients write `member` warrants
//! through [`WarrantsClient`].

mod features;
mod list;
mod object_types;
pub(crate) mod objects;
mod permissions;
mod pricing_tiers;
mod projection;
mod roles;
mod sessions;
mod tenants;
mod users;
pub(crate) mod warrants;

pub use features::{CreateFeatureParams, Feature, FeaturesClient};
pub use list::ListRequest;
pub use object_types::{ListObjectTypesRequest, ObjectType, ObjectTypesClient, RelationRule};
pub use objects::{CreateObjectParams, ObjectsClient, UpdateObjectParams};
pub use permissions::{
    CreatePermissionParams, Permission, PermissionsClient, UpdatePermissionParams,
};
pub use pricing_tiers::{CreatePricingTierParams, PricingTier, PricingTiersClient};
pub use roles::{CreateRoleParams, Role, RolesClient, UpdateRoleParams};
pub use sessions::{
    AuthorizationSessionParams, SelfServiceSessionParams, SelfServiceStrategy, SessionsClient,
};
pub use tenants::{CreateTenantParams, Tenant, TenantsClient, UpdateTenantParams};
pub use users::{CreateUserParams, UpdateUserParams, User, UsersClient};
pub use warrants::{ListWarrantsRequest, WarrantParams, WarrantsClient};
