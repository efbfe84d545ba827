//! Command queue driving a lattice from outside its owning thread.
//!
//! Following the stage pattern: Send → Tick → Summary
//!
//! Any number of [`CommandSender`]s enqueue [`LatticeCommand`]s; the owner
//! calls [`CommandQueue::tick`] whenever it is ready to apply them.

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::chunk::ChunkCoord;
use crate::config::GridParams;
use crate::density::DensityField;
use crate::dispatch::Dispatch;
use crate::error::ConfigError;
use crate::lattice::{ChunkLattice, ReconcileReport};

/// Request applied to a lattice on the next tick.
#[derive(Clone, Debug, PartialEq)]
pub enum LatticeCommand {
  /// Reconcile against the full `num_chunks` lattice.
  Run,
  /// Reconcile against an explicit coordinate list.
  Reconcile(Vec<ChunkCoord>),
  /// Replace grid parameters. Does not regenerate on its own.
  UpdateParams(GridParams),
  /// Destroy every chunk and release buffers.
  Teardown,
}

/// Cloneable handle for enqueueing commands.
#[derive(Clone, Debug)]
pub struct CommandSender {
  tx: Sender<LatticeCommand>,
}

impl CommandSender {
  /// Enqueue `command`. Returns false once the queue has been dropped.
  pub fn send(&self, command: LatticeCommand) -> bool {
    match self.tx.try_send(command) {
      Ok(()) => true,
      Err(TrySendError::Disconnected(_)) | Err(TrySendError::Full(_)) => false,
    }
  }

  pub fn run(&self) -> bool {
    self.send(LatticeCommand::Run)
  }
}

/// Result of one [`CommandQueue::tick`].
#[derive(Debug, Default)]
pub struct TickSummary {
  /// Commands taken off the queue this tick.
  pub applied: usize,
  /// One report per `Run` or `Reconcile`, in order.
  pub reports: Vec<ReconcileReport>,
  /// Rejected `UpdateParams` commands.
  pub errors: Vec<ConfigError>,
  pub torn_down: bool,
}

impl TickSummary {
  pub fn is_empty(&self) -> bool {
    self.applied == 0
  }
}

/// Receiving side, owned next to the lattice.
pub struct CommandQueue {
  tx: Sender<LatticeCommand>,
  rx: Receiver<LatticeCommand>,
}

impl Default for CommandQueue {
  fn default() -> Self {
    Self::new()
  }
}

impl CommandQueue {
  /// Unbounded queue.
  pub fn new() -> Self {
    let (tx, rx) = crossbeam_channel::unbounded();
    Self { tx, rx }
  }

  pub fn sender(&self) -> CommandSender {
    CommandSender { tx: self.tx.clone() }
  }

  /// Number of commands waiting.
  pub fn pending_count(&self) -> usize {
    self.rx.len()
  }

  pub fn is_idle(&self) -> bool {
    self.rx.is_empty()
  }

  /// Apply every queued command to `lattice`, oldest first.
  ///
  /// Commands sent while the tick runs wait for the next one.
  pub fn tick<F: DensityField, D: Dispatch>(&self, lattice: &mut ChunkLattice<F, D>) -> TickSummary {
    let mut summary = TickSummary::default();
    let pending = self.rx.len();
    if pending == 0 {
      return summary;
    }

    for command in self.rx.try_iter().take(pending) {
      summary.applied += 1;
      match command {
        LatticeCommand::Run => summary.reports.push(lattice.run()),
        LatticeCommand::Reconcile(coords) => summary.reports.push(lattice.reconcile(&coords)),
        LatticeCommand::UpdateParams(params) => {
          if let Err(err) = lattice.set_params(params) {
            tracing::warn!(lattice = lattice.id().raw(), %err, "rejected parameter update");
            summary.errors.push(err);
          }
        }
        LatticeCommand::Teardown => {
          lattice.teardown();
          summary.torn_down = true;
        }
      }
    }

    tracing::debug!(
      lattice = lattice.id().raw(),
      applied = summary.applied,
      "command queue drained"
    );
    summary
  }
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;
