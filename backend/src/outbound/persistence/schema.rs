//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Technician directory. Names are not unique until deduplicated.
    technicians (id) {
        id -> Int4,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Help requests.
    requests (id) {
        id -> Int4,
        company_name -> Text,
        contact_name -> Text,
        phone -> Text,
        address -> Text,
        request_type -> Text,
        reference -> Text,
        is_client_owned -> Bool,
        asset_tag -> Text,
        fault_description -> Text,
        task_to_perform -> Text,
        documents_to_carry -> Array<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        /// Cleared by `ON DELETE SET NULL` when the technician row goes.
        technician_id -> Nullable<Int4>,
        /// Technician name written together with `technician_id`.
        assigned_to -> Nullable<Text>,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(requests -> technicians (technician_id));
diesel::allow_tables_to_appear_in_same_query!(requests, technicians);
