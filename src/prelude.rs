//! Prelude module for convenient imports.
//!
//! ```rust
//! use warrant::prelude::*;
//! ```
//!
//! Brings in the client, errors, the core data types, check and query
//! builders, and the parameter structs of every resource client.

pub use crate::{
    authz::{Authorizer, CheckOp, CheckResult, Query, QueryResult, WarrantCheck},
    client::{Client, ClientBuilder},
    error::{Error, ErrorKind, Result},
    resources::{
        AuthorizationSessionParams, CreateFeatureParams, CreateObjectParams,
        CreatePermissionParams, CreatePricingTierParams, CreateRoleParams, CreateTenantParams,
        CreateUserParams, ObjectType, RelationRule, SelfServiceSessionParams,
        SelfServiceStrategy, UpdateObjectParams, UpdatePermissionParams, UpdateRoleParams,
        UpdateTenantParams, UpdateUserParams, WarrantParams,
    },
    types::{
        ListResult, Meta, Object, ObjectRef, PolicyContext, RequestOptions, SortOrder, Subject,
        Warrant, WarrantToken,
    },
};
