//! Pipeline state machine.

use camino::Utf8PathBuf;

use crate::error::DeployStep;

/// Progress of a single deployment.
///
/// `Transferred` and `Failed` are terminal: [`DeployState::advance`] leaves
/// them unchanged whatever event arrives.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeployState {
    /// The build tool is running.
    Building,
    /// The artefact was built and located.
    Built {
        /// Conventional path of the artefact.
        artifact: Utf8PathBuf,
    },
    /// The artefact reached its destination.
    Transferred {
        /// Conventional path of the artefact that was copied.
        artifact: Utf8PathBuf,
    },
    /// A step failed; no later step ran.
    Failed {
        /// Step that failed.
        step: DeployStep,
    },
}

/// Outcome of a pipeline step, fed into [`DeployState::advance`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeployEvent {
    /// The build succeeded and the artefact path was computed.
    BuildSucceeded(Utf8PathBuf),
    /// The transfer tool exited successfully.
    TransferSucceeded,
    /// The given step failed.
    StepFailed(DeployStep),
}

impl DeployState {
    /// Returns the state reached after `event`.
    ///
    /// Events that do not apply to the current state leave it unchanged.
    #[must_use]
    pub fn advance(self, event: DeployEvent) -> Self {
        match (self, event) {
            (Self::Building, DeployEvent::BuildSucceeded(artifact)) => Self::Built { artifact },
            (Self::Built { artifact }, DeployEvent::TransferSucceeded) => {
                Self::Transferred { artifact }
            }
            (Self::Building | Self::Built { .. }, DeployEvent::StepFailed(step)) => {
                Self::Failed { step }
            }
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn artifact() -> Utf8PathBuf {
        Utf8PathBuf::from("./target/aarch64-unknown-linux-gnu/release/chess")
    }

    #[test]
    fn happy_path_reaches_transferred() {
        let state = DeployState::Building
            .advance(DeployEvent::BuildSucceeded(artifact()))
            .advance(DeployEvent::TransferSucceeded);

        assert_eq!(state, DeployState::Transferred { artifact: artifact() });
    }

    #[rstest]
    #[case::validation(DeployState::Building, DeployStep::Validate)]
    #[case::from_building(DeployState::Building, DeployStep::Build)]
    #[case::from_built(DeployState::Built { artifact: artifact() }, DeployStep::Transfer)]
    fn failures_are_absorbing(#[case] start: DeployState, #[case] step: DeployStep) {
        let failed = start.advance(DeployEvent::StepFailed(step));
        assert_eq!(failed, DeployState::Failed { step });

        let after = failed
            .clone()
            .advance(DeployEvent::BuildSucceeded(artifact()))
            .advance(DeployEvent::TransferSucceeded)
            .advance(DeployEvent::StepFailed(DeployStep::RemoteExecute));
        assert_eq!(after, failed);
    }

    #[rstest]
    #[case::build_again(DeployEvent::BuildSucceeded(artifact()))]
    #[case::transfer_again(DeployEvent::TransferSucceeded)]
    #[case::remote_failure(DeployEvent::StepFailed(DeployStep::RemoteExecute))]
    fn transferred_is_terminal(#[case] event: DeployEvent) {
        let done = DeployState::Transferred { artifact: artifact() };
        assert_eq!(done.clone().advance(event), done);
    }

    #[test]
    fn transfer_cannot_skip_build() {
        let state = DeployState::Building.advance(DeployEvent::TransferSucceeded);
        assert_eq!(state, DeployState::Building);
    }
}
