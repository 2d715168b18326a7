pub mod combine;
pub mod output;
pub mod record;
pub mod render;
pub mod schedule;
