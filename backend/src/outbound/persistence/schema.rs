//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts keyed by UUID, unique by normalised email.
    accounts (id) {
        id -> Uuid,
        /// Normalised email (domain lower-cased). Unique.
        email -> Varchar,
        /// Display name, empty when unset.
        name -> Varchar,
        /// Argon2id PHC string or an unusable `!` marker.
        password_hash -> Varchar,
        is_active -> Bool,
        is_staff -> Bool,
        /// Constrained so that superusers are always staff.
        is_superuser -> Bool,
        date_joined -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// API tokens, at most one per account.
    auth_tokens (key) {
        /// 40 lower-case hex characters.
        key -> Varchar,
        /// Owning account. Unique.
        account_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(auth_tokens -> accounts (account_id));
diesel::allow_tables_to_appear_in_same_query!(accounts, auth_tokens);
