//! DTOs: argumentos de las tools y formas de respuesta

pub mod args;
pub mod fleet_dto;
pub mod signal_dto;
