// handlers/mod.rs - Three-tier handler layout
//
// Public (no auth) → Protected (JWT auth) → Admin (JWT auth + admin permissions)
pub mod admin; // Tier 3: RBAC administration (/api/admin/*)
pub mod protected; // Tier 2: JWT authentication required (/api/dashboard/*, /api/profile/*)
pub mod public; // Tier 1: No authentication required (/api/auth/*)
