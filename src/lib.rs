//! Gurshabad: renders one ang of Gurbani fetched from a verse-data API and
//! navigates between angs.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
