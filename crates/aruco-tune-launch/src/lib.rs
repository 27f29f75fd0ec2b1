//! Launch the USB camera driver together with the ArUco detector node.
//!
//! The launch description declares a `camera_config` argument naming one of
//! the camera profiles installed in `aruco_py/config/`. The profile is passed
//! to the `v4l2_camera` driver as a parameter file. Packages are located
//! through ament-style install prefixes.
//!
//! ```no_run
//! use aruco_tune_launch::{aruco_launch, process, PackageIndex};
//!
//! # fn main() -> Result<(), aruco_tune_launch::LaunchError> {
//! let index = PackageIndex::from_env();
//! let nodes = aruco_launch().resolve(["camera_config:=camera_720p.yaml"], &index)?;
//! for exit in process::run(&nodes)? {
//!     println!("{}: {}", exit.name, exit.status);
//! }
//! # Ok(())
//! # }
//! ```

mod args;
mod description;
mod error;
mod package;
pub mod process;

pub use args::{parse_override, LaunchArgument, ResolvedArguments};
pub use description::{
    aruco_launch, LaunchDescription, NodeAction, Output, ResolvedNode, Substitution,
    CAMERA_PACKAGE, DETECTOR_PACKAGE,
};
pub use error::LaunchError;
pub use package::{PackageIndex, PREFIX_ENV};
