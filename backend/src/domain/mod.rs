//! Domain primitives, services and ports.
//!
//! Purpose: define the tenant identity model, the reconciliation and
//! authorization rules, and the owner-scoped catalog, settings and page
//! operations. Adapters reach the outside world only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Identity / TenantRecord: the two halves reconciled on every session
//!   change.
//! - IdentityReconciler / SessionHub: self-healing driven by session events.
//! - AccessService / resolve_role: effective role derivation.

pub mod access;
pub mod app_settings;
pub mod auth;
pub mod catalog_import;
pub mod catalog_service;
pub mod confirmation;
pub mod error;
pub mod identity;
pub mod listing;
pub mod moderation;
pub mod moderation_service;
pub mod page_connection;
pub mod page_connection_service;
pub mod port_errors;
pub mod ports;
pub mod product;
pub mod reconciler;
pub mod role_resolution;
pub mod secret;
pub mod session_hub;
pub mod session_service;
pub mod tenant;
pub mod tenant_admin_service;
pub mod workspace_service;

pub use self::access::{Access, AccessService, AdminGrant};
pub use self::app_settings::{AppSettings, AppSettingsValidationError};
pub use self::auth::{
    AuthSession, AuthValidationError, PASSWORD_MIN_LEN, PasswordChange, Registration,
    SignInCredentials, SignUpOutcome,
};
pub use self::catalog_import::{
    CatalogImportError, IMPORTED_CATEGORY, IMPORTED_NAME, parse_catalog_csv,
};
pub use self::catalog_service::CatalogService;
pub use self::confirmation::Confirmed;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{Email, Identity, IdentityId, IdentityMetadata, IdentityValidationError};
pub use self::listing::{CATALOG_PAGE_SIZE, ListNavigation, TENANT_PAGE_SIZE};
pub use self::moderation::{
    DEFAULT_TONE, ModerationPreview, ModerationRequest, ModerationValidationError, Sentiment,
};
pub use self::moderation_service::ModerationService;
pub use self::page_connection::{PageBinding, PageConnection, PageConnectionValidationError};
pub use self::page_connection_service::PageConnectionService;
pub use self::port_errors::ACCESS_DENIED_MESSAGE;
pub use self::product::{
    DEFAULT_CATEGORY, Product, ProductDraft, ProductId, ProductValidationError,
};
pub use self::reconciler::{IdentityReconciler, ReconcileOutcome};
pub use self::role_resolution::{
    ResolvedRole, RoleCache, RoleSource, TenantRoleLookup, resolve_role,
};
pub use self::secret::Secret;
pub use self::session_hub::{
    ReconcilingObserver, RoleCacheObserver, SessionChange, SessionEvent, SessionHub,
    SessionObserver,
};
pub use self::session_service::SessionService;
pub use self::tenant::{
    DEFAULT_ORG_NAME, OrgName, Plan, Role, TenantRecord, TenantUpdate, TenantValidationError,
};
pub use self::tenant_admin_service::TenantAdminService;
pub use self::workspace_service::{Workspace, WorkspaceService};
