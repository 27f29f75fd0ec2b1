//! Declarative launch description and its resolution into commands.

use crate::args::{LaunchArgument, ResolvedArguments};
use crate::package::PackageIndex;
use crate::LaunchError;
use log::{debug, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Package that ships the camera profiles and the detector node.
pub const DETECTOR_PACKAGE: &str = "aruco_py";
/// Package that ships the V4L2 camera driver node.
pub const CAMERA_PACKAGE: &str = "v4l2_camera";

/// A value computed at launch time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Substitution {
    Text(String),
    /// Value of a declared launch argument.
    Argument(String),
    /// `share` directory of an installed package.
    PackageShare(String),
}

impl Substitution {
    fn evaluate(&self, args: &ResolvedArguments, index: &PackageIndex) -> Result<String, LaunchError> {
        match self {
            Self::Text(s) => Ok(s.clone()),
            Self::Argument(name) => args.get(name).map(str::to_string).ok_or_else(|| {
                LaunchError::UnknownArgument {
                    name: name.clone(),
                    declared: args.iter().map(|(n, _)| n).collect::<Vec<_>>().join(", "),
                }
            }),
            Self::PackageShare(pkg) => Ok(index.share_dir(pkg)?.to_string_lossy().into_owned()),
        }
    }
}

/// Where a node's stdout and stderr go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Output {
    /// Inherit the launcher's terminal.
    #[default]
    Screen,
    /// Discard.
    Log,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeAction {
    pub package: String,
    pub executable: String,
    pub name: String,
    /// Parameter files, each a path built by joining its components.
    pub parameters: Vec<Vec<Substitution>>,
    pub output: Output,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchDescription {
    pub arguments: Vec<LaunchArgument>,
    pub nodes: Vec<NodeAction>,
}

/// Camera driver plus ArUco detector, with a selectable camera profile.
pub fn aruco_launch() -> LaunchDescription {
    let arguments = vec![
        LaunchArgument::new(
            "camera_config",
            "camera_c920.yaml",
            "Camera config file (camera_c920.yaml, camera_c505.yaml, camera_720p.yaml)",
        ),
        LaunchArgument::new("device", "/dev/video0", "Camera device path"),
    ];

    let config = vec![
        Substitution::PackageShare(DETECTOR_PACKAGE.to_string()),
        Substitution::Text("config".to_string()),
        Substitution::Argument("camera_config".to_string()),
    ];

    let nodes = vec![
        NodeAction {
            package: CAMERA_PACKAGE.to_string(),
            executable: "v4l2_camera_node".to_string(),
            name: "camera".to_string(),
            parameters: vec![config],
            output: Output::Screen,
        },
        NodeAction {
            package: DETECTOR_PACKAGE.to_string(),
            executable: "aruco_node".to_string(),
            name: "aruco_node".to_string(),
            parameters: Vec::new(),
            output: Output::Screen,
        },
    ];

    LaunchDescription { arguments, nodes }
}

/// A node with every substitution evaluated, ready to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedNode {
    pub name: String,
    pub executable: PathBuf,
    pub params_files: Vec<PathBuf>,
    pub output: Output,
}

impl ResolvedNode {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--ros-args".to_string(),
            "-r".to_string(),
            format!("__node:={}", self.name),
        ];
        for file in &self.params_files {
            args.push("--params-file".to_string());
            args.push(file.to_string_lossy().into_owned());
        }
        args
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(self.args());
        if self.output == Output::Log {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        cmd
    }
}

impl fmt::Display for ResolvedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable.display())?;
        for arg in self.args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl LaunchDescription {
    /// Apply overrides, then evaluate every node against `index`.
    pub fn resolve<'a, I>(
        &self,
        overrides: I,
        index: &PackageIndex,
    ) -> Result<Vec<ResolvedNode>, LaunchError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let args = ResolvedArguments::resolve(&self.arguments, overrides)?;
        for (name, value) in args.iter() {
            debug!("launch argument {name} = {value}");
        }

        self.nodes
            .iter()
            .map(|node| {
                let executable = index.executable(&node.package, &node.executable)?;
                let params_files = node
                    .parameters
                    .iter()
                    .map(|parts| join_path(parts, &args, index))
                    .collect::<Result<Vec<_>, _>>()?;
                for file in &params_files {
                    if !file.is_file() {
                        warn!("parameter file {} of {} does not exist", file.display(), node.name);
                    }
                }
                Ok(ResolvedNode {
                    name: node.name.clone(),
                    executable,
                    params_files,
                    output: node.output,
                })
            })
            .collect()
    }
}

fn join_path(
    parts: &[Substitution],
    args: &ResolvedArguments,
    index: &PackageIndex,
) -> Result<PathBuf, LaunchError> {
    parts.iter().try_fold(PathBuf::new(), |acc, part| {
        let value = part.evaluate(args, index)?;
        Ok(acc.join(Path::new(&value)))
    })
}
