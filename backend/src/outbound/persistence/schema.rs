//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes the schema, regenerate with `diesel print-schema` or edit by hand.

diesel::table! {
    /// Registered user accounts.
    ///
    /// `email` carries the `users_email_key` unique constraint.
    users (id) {
        /// Store-assigned identifier (`BIGSERIAL`).
        id -> Int8,
        /// Display name, at most 64 characters.
        name -> Varchar,
        /// Login email, at most 254 characters.
        email -> Varchar,
        /// Self-describing bcrypt hash.
        password_hash -> Text,
        /// Insert timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
