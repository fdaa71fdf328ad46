mod error;
pub mod math;
mod pose;
mod resolver;
mod sampler;

pub use crate::{
    error::TerrainError,
    pose::SensorPose,
    resolver::{RayDirection, Resolver, ResolverBuilder, TargetResolution},
    sampler::ElevationSampler,
};
pub use {dem, geo};
