// API routes and handlers

pub mod admin;
pub mod auth;
pub mod cars;
pub mod error;
pub mod health;
pub mod rates;
pub mod reservations;
pub mod routes;
pub mod staff;
pub mod users;
