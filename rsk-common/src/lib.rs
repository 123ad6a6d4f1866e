pub mod bundles;

pub mod color;

pub mod constants;

pub mod game_snapshot;

pub mod geometry;

pub mod marker;

pub mod vision;
