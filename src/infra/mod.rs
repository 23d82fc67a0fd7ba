//! Инфраструктурный слой вокруг турнира:
//! - состав участников и их id;
//! - жеребьёвка мест (RNG).

pub mod ids;
pub mod rng;

pub use ids::*;
pub use rng::*;
