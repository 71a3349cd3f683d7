mod core;
mod handle;
mod interpolate;
mod polar;
mod ring;
mod strip;

pub use self::core::{Point3, Tolerance, Transform, Vec3};
pub use handle::{
    HandleDiagnostics, HandleEnd, HandleError, HandleOptions, make_handle,
    make_handle_with_tolerance,
};
pub use polar::{PlaneFrame, PolarPoint, fit_plane_frame};
pub use ring::anchor_index_of;
pub use strip::{HandleGeometry, VertexRef};

#[cfg(test)]
mod tests;
