//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! converted into validated domain types before leaving it.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{requests, technicians};

/// Row struct for reading from the technicians table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = technicians)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TechnicianRow {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RequestRow {
    pub id: i32,
    pub company_name: String,
    pub contact_name: String,
    pub phone: String,
    pub address: String,
    pub request_type: String,
    pub reference: String,
    pub is_client_owned: bool,
    pub asset_tag: String,
    pub fault_description: String,
    pub task_to_perform: String,
    pub documents_to_carry: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub technician_id: Option<i32>,
    pub assigned_to: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering a request. Status and assignment use
/// the column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = requests)]
pub(crate) struct NewRequestRow<'a> {
    pub company_name: &'a str,
    pub contact_name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub request_type: &'a str,
    pub reference: &'a str,
    pub is_client_owned: bool,
    pub asset_tag: &'a str,
    pub fault_description: &'a str,
    pub task_to_perform: &'a str,
    pub documents_to_carry: &'a [String],
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Changeset written when a technician is assigned.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = requests)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AssignmentUpdate<'a> {
    pub technician_id: Option<i32>,
    pub assigned_to: Option<&'a str>,
    pub status: &'a str,
}
