pub mod clipper;
pub mod geo;
pub mod placer;
pub mod project;
pub mod router;
pub mod statistics;
pub mod validation;
