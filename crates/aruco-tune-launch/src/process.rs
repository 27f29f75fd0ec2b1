use crate::{LaunchError, ResolvedNode};
use log::{error, info, warn};
use std::process::{Child, ExitStatus};

/// Exit status of one launched node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeExit {
    pub name: String,
    pub status: ExitStatus,
}

/// Start every node, then wait for all of them.
///
/// If a later node fails to start, the ones already running are killed
/// before the error is returned.
pub fn run(nodes: &[ResolvedNode]) -> Result<Vec<NodeExit>, LaunchError> {
    let mut running: Vec<(&ResolvedNode, Child)> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node.command().spawn() {
            Ok(child) => {
                info!("started {} (pid {})", node.name, child.id());
                running.push((node, child));
            }
            Err(source) => {
                for (started, child) in &mut running {
                    if let Err(e) = child.kill() {
                        warn!("failed to stop {}: {e}", started.name);
                    }
                    let _ = child.wait();
                }
                return Err(LaunchError::Spawn {
                    node: node.name.clone(),
                    source,
                });
            }
        }
    }

    let mut exits = Vec::with_capacity(running.len());
    for (node, mut child) in running {
        let status = child.wait()?;
        if status.success() {
            info!("{} exited cleanly", node.name);
        } else {
            error!("{} exited with {status}", node.name);
        }
        exits.push(NodeExit {
            name: node.name.clone(),
            status,
        });
    }
    Ok(exits)
}
