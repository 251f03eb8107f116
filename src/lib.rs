//! Fleet demand assistant backend
//!
//! Consultas sobre el inventario de la flota de alquiler y señales externas de
//! demanda (festivos, eventos, vuelos, tiempo), expuestas como tools para un
//! agente: en proceso, por HTTP y a través del gateway remoto (Lambda).

pub mod config;
pub mod database;
pub mod dto;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod tools;
pub mod utils;

#[cfg(test)]
mod test_support;
