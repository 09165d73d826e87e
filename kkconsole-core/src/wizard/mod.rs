//! Operation wizards
//!
//! A [`Wizard`] walks the user through the ordered steps of one lifecycle
//! operation while they edit a [`SpecDocument`]. Leaving a step requires its
//! gate to pass; once submitted, the streaming session owns the wizard until
//! it reports a result.

pub mod navigator;
pub mod operation;
pub mod steps;

pub use navigator::StepNavigator;
pub use operation::{OperationKind, OperationMessages, OperationOptions, TRANSPORT_FAILURE_LINE};
pub use steps::{Gate, GateContext, StepDef, WizardStep};

use crate::config::{BackendConfig, ConsoleConfig};
use crate::error::{ConsoleError, ConsoleResult};
use crate::session::{
    LogBuffer, OperationRequest, SessionCommand, SessionCoupling, SessionEvent, SessionOutcome,
    SessionPhase, StreamingSession,
};
use crate::spec::{ClusterSpecification, SpecDocument};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Wizard {
    kind: OperationKind,
    steps: &'static [StepDef],
    navigator: StepNavigator,
    document: SpecDocument,
    options: OperationOptions,
    backend: BackendConfig,
    coupling: SessionCoupling,
    session: Option<StreamingSession>,
}

impl Wizard {
    /// A wizard for `kind` editing `document`
    pub fn new(kind: OperationKind, document: SpecDocument, config: &ConsoleConfig) -> Self {
        let steps = kind.steps();
        let mut options = OperationOptions::for_kind(kind, &config.wizard);
        options.baseline_host_count = document.seq_len("spec.hosts");
        debug!(operation = %kind, steps = steps.len(), cluster = document.name(), "wizard created");

        Self {
            kind,
            steps,
            navigator: StepNavigator::new(steps.len()),
            document,
            options,
            backend: config.backend.clone(),
            coupling: SessionCoupling::default(),
            session: None,
        }
    }

    /// An install wizard over the default cluster document
    pub fn install(config: &ConsoleConfig) -> ConsoleResult<Self> {
        let document = SpecDocument::from_specification(&ClusterSpecification::install_defaults())?;
        Ok(Self::new(OperationKind::Install, document, config))
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn steps(&self) -> &'static [StepDef] {
        self.steps
    }

    pub fn step_index(&self) -> usize {
        self.navigator.index()
    }

    pub fn current_step(&self) -> WizardStep {
        self.steps[self.navigator.index()].step
    }

    pub fn is_last_step(&self) -> bool {
        self.navigator.is_last()
    }

    pub fn document(&self) -> &SpecDocument {
        &self.document
    }

    /// The document stays editable while a session runs; the payload was
    /// captured at submit time.
    pub fn document_mut(&mut self) -> &mut SpecDocument {
        &mut self.document
    }

    pub fn options(&self) -> &OperationOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OperationOptions {
        &mut self.options
    }

    /// Choose the node a delete-node wizard removes
    pub fn select_target_node(&mut self, name: impl Into<String>) {
        self.options.target_node = Some(name.into());
    }

    /// Gate of the current step, evaluated against the document as it is now
    pub fn gate_passes(&self) -> bool {
        self.gate_passes_at(self.navigator.index())
    }

    fn gate_passes_at(&self, index: usize) -> bool {
        let ctx = GateContext {
            document: &self.document,
            options: &self.options,
        };
        self.steps[index].gate.passes(&ctx)
    }

    /// First step whose gate fails, if any
    pub fn first_blocked_step(&self) -> Option<WizardStep> {
        (0..self.steps.len())
            .find(|&i| !self.gate_passes_at(i))
            .map(|i| self.steps[i].step)
    }

    pub fn can_advance(&self) -> bool {
        self.navigator
            .can_advance(self.gate_passes(), self.coupling.in_flight())
    }

    pub fn can_retreat(&self) -> bool {
        self.navigator.can_retreat(self.coupling.in_flight())
    }

    /// Submission is only offered from the final step
    pub fn can_submit(&self) -> bool {
        !self.coupling.in_flight() && self.navigator.is_last()
    }

    pub fn can_return_home(&self) -> bool {
        self.coupling.safe_to_navigate_away()
    }

    pub fn advance(&mut self) -> bool {
        let gate = self.gate_passes();
        let moved = self.navigator.advance(gate, self.coupling.in_flight());
        if moved {
            debug!(operation = %self.kind, step = ?self.current_step(), "advanced");
        }
        moved
    }

    pub fn retreat(&mut self) -> bool {
        self.navigator.retreat(self.coupling.in_flight())
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        self.navigator.jump_to(index, self.coupling.in_flight())
    }

    pub fn in_flight(&self) -> bool {
        self.coupling.in_flight()
    }

    pub fn safe_to_navigate_away(&self) -> bool {
        self.coupling.safe_to_navigate_away()
    }

    pub fn logs(&self) -> &[String] {
        self.coupling.logs().lines()
    }

    pub fn log_buffer(&self) -> &LogBuffer {
        self.coupling.logs()
    }

    pub fn session_phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::Idle, StreamingSession::phase)
    }

    pub fn session_live(&self) -> bool {
        self.session.as_ref().map_or(false, StreamingSession::is_live)
    }

    /// Result of the most recent session; pending when none has finished
    pub fn outcome(&self) -> SessionOutcome {
        self.session
            .as_ref()
            .map_or(SessionOutcome::Pending, StreamingSession::outcome)
    }

    /// Start a new session and return what the transport must open.
    ///
    /// The document is serialized here; later edits do not reach the backend.
    pub fn submit(&mut self) -> ConsoleResult<OperationRequest> {
        if self.coupling.in_flight() {
            return Err(ConsoleError::navigation_blocked(
                "submit",
                "an operation is already in flight",
            ));
        }
        if !self.navigator.is_last() {
            return Err(ConsoleError::navigation_blocked(
                "submit",
                "not on the final step",
            ));
        }
        if self.session_live() {
            return Err(ConsoleError::SessionBusy);
        }

        let request = self.build_request()?;
        info!(operation = %self.kind, cluster = self.document.name(), "operation submitted");
        self.session = Some(StreamingSession::new(request.clone()));
        Ok(request)
    }

    fn build_request(&self) -> ConsoleResult<OperationRequest> {
        let mut endpoint = self.backend.stream_endpoint(self.kind.endpoint_path())?;
        {
            let mut query = endpoint.query_pairs_mut();
            query.append_pair("clusterName", self.document.name());
            match self.kind {
                OperationKind::Install => {
                    query.append_pair("ksVersion", self.options.effective_kubesphere_version());
                    query.append_pair("KubekeyNamespace", &self.options.kubekey_namespace);
                }
                OperationKind::UpgradeCluster => {
                    query.append_pair("ksVersion", self.options.effective_kubesphere_version());
                }
                OperationKind::DeleteNode => {
                    let target = self.options.target_node.as_deref().ok_or_else(|| {
                        ConsoleError::navigation_blocked("submit", "no node selected for deletion")
                    })?;
                    query.append_pair("nodeName", target);
                }
                OperationKind::AddNode | OperationKind::DeleteCluster => {}
            }
        }

        Ok(OperationRequest {
            kind: self.kind,
            endpoint,
            payload: self.document.to_yaml()?,
        })
    }

    /// Feed a transport event into the current session
    pub fn handle_event(&mut self, event: SessionEvent) -> Option<SessionCommand> {
        match self.session.as_mut() {
            Some(session) => session.handle(event, &mut self.coupling),
            None => {
                debug!(?event, "no session for event");
                None
            }
        }
    }

    /// The owning view is going away
    pub fn teardown(&mut self) -> Option<SessionCommand> {
        self.handle_event(SessionEvent::Teardown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Host, ROLE_ETCD, ROLE_MASTER, ROLE_WORKER};

    fn install_wizard() -> Wizard {
        Wizard::install(&ConsoleConfig::test(8082)).unwrap()
    }

    fn wizard_at_confirm() -> Wizard {
        let mut wizard = install_wizard();
        wizard
            .document_mut()
            .add_host(
                Host::new("node1", "10.0.0.1", "10.0.0.1"),
                &[ROLE_MASTER, ROLE_ETCD, ROLE_WORKER],
            )
            .unwrap();
        while wizard.advance() {}
        wizard
    }

    #[test]
    fn test_install_starts_blocked_on_hosts() {
        let wizard = install_wizard();
        assert_eq!(wizard.current_step(), WizardStep::Hosts);
        assert!(!wizard.can_advance());
        assert!(!wizard.can_retreat());
        assert_eq!(wizard.first_blocked_step(), Some(WizardStep::Hosts));
    }

    #[test]
    fn test_gate_follows_document_edits() {
        let mut wizard = install_wizard();
        wizard
            .document_mut()
            .add_host(Host::new("node1", "10.0.0.1", "10.0.0.1"), &[ROLE_MASTER])
            .unwrap();
        assert!(wizard.can_advance());
        wizard.document_mut().delete_host("node1").unwrap();
        assert!(!wizard.can_advance());
    }

    #[test]
    fn test_install_walks_to_confirm() {
        let mut wizard = install_wizard();
        wizard
            .document_mut()
            .add_host(
                Host::new("node1", "10.0.0.1", "10.0.0.1"),
                &[ROLE_MASTER, ROLE_ETCD, ROLE_WORKER],
            )
            .unwrap();
        while wizard.advance() {}
        assert_eq!(wizard.current_step(), WizardStep::Confirm);
        assert!(wizard.is_last_step());
        assert_eq!(wizard.first_blocked_step(), None);
    }

    #[test]
    fn test_install_request_carries_query_and_payload() {
        let mut wizard = wizard_at_confirm();
        let request = wizard.submit().unwrap();

        assert_eq!(request.endpoint.scheme(), "ws");
        assert_eq!(request.endpoint.path(), "/createCluster");
        let query: Vec<(String, String)> = request.endpoint.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("clusterName".to_string(), "cluster.local".to_string()),
                ("ksVersion".to_string(), String::new()),
                ("KubekeyNamespace".to_string(), "kubekey-system".to_string()),
            ]
        );
        assert_eq!(
            SpecDocument::from_yaml(&request.payload).unwrap(),
            *wizard.document()
        );
        assert_eq!(wizard.session_phase(), SessionPhase::Opening);
    }

    #[test]
    fn test_submit_refused_before_final_step() {
        let mut wizard = install_wizard();
        wizard
            .document_mut()
            .add_host(
                Host::new("node1", "10.0.0.1", "10.0.0.1"),
                &[ROLE_MASTER, ROLE_ETCD, ROLE_WORKER],
            )
            .unwrap();
        assert!(wizard.advance());
        assert!(!wizard.is_last_step());
        assert!(!wizard.can_submit());

        assert!(matches!(
            wizard.submit(),
            Err(ConsoleError::NavigationBlocked { .. })
        ));
        assert_eq!(wizard.session_phase(), SessionPhase::Idle);
        assert!(!wizard.in_flight());
    }

    #[test]
    fn test_submit_twice_while_opening_is_busy() {
        let mut wizard = wizard_at_confirm();
        wizard.submit().unwrap();
        assert!(matches!(wizard.submit(), Err(ConsoleError::SessionBusy)));
    }

    #[test]
    fn test_session_locks_navigation_until_failure() {
        let mut wizard = wizard_at_confirm();
        wizard.submit().unwrap();
        wizard.handle_event(SessionEvent::Opened);

        assert!(!wizard.can_retreat());
        assert!(!wizard.can_submit());
        assert!(!wizard.can_return_home());
        assert!(!wizard.retreat());
        assert!(matches!(
            wizard.submit(),
            Err(ConsoleError::NavigationBlocked { .. })
        ));

        wizard.handle_event(SessionEvent::Message("安装集群失败".into()));
        assert!(wizard.can_submit());
        assert!(wizard.can_return_home());
        assert_eq!(wizard.outcome(), SessionOutcome::Failed);
        assert!(wizard.retreat());
        assert!(!wizard.can_submit());
    }

    #[test]
    fn test_resubmit_clears_previous_logs() {
        let mut wizard = wizard_at_confirm();
        wizard.submit().unwrap();
        wizard.handle_event(SessionEvent::Opened);
        wizard.handle_event(SessionEvent::Message("first run".into()));
        wizard.handle_event(SessionEvent::Message("安装集群失败".into()));
        assert_eq!(wizard.logs().len(), 3);

        wizard.submit().unwrap();
        assert_eq!(wizard.logs().len(), 3, "logs survive until the new stream opens");
        wizard.handle_event(SessionEvent::Opened);
        assert_eq!(wizard.logs(), ["安装开始，请勿进行其他操作！"]);
    }

    #[test]
    fn test_delete_node_requires_target() {
        let document = SpecDocument::from_yaml(
            "metadata: {name: prod}\nspec: {hosts: [{name: node1}, {name: node2}], roleGroups: {worker: [node1, node2]}}",
        )
        .unwrap();
        let mut wizard = Wizard::new(OperationKind::DeleteNode, document, &ConsoleConfig::test(8082));
        assert!(!wizard.can_advance());

        wizard.select_target_node("node2");
        assert!(wizard.advance());
        assert!(wizard.can_submit());
        let request = wizard.submit().unwrap();
        assert_eq!(request.endpoint.path(), "/deleteNode");
        assert!(request
            .endpoint
            .query_pairs()
            .any(|(k, v)| k == "nodeName" && v == "node2"));
    }

    #[test]
    fn test_add_node_needs_new_host() {
        let document = SpecDocument::from_yaml(
            "metadata: {name: prod}\nspec: {hosts: [{name: node1}], roleGroups: {master: [node1]}}",
        )
        .unwrap();
        let mut wizard = Wizard::new(OperationKind::AddNode, document, &ConsoleConfig::test(8082));
        assert_eq!(wizard.options().baseline_host_count, 1);
        assert!(!wizard.can_advance());

        wizard
            .document_mut()
            .add_host(Host::new("node2", "10.0.0.2", "10.0.0.2"), &[ROLE_WORKER])
            .unwrap();
        assert!(wizard.advance());
    }

    #[test]
    fn test_teardown_without_session_is_noop() {
        let mut wizard = install_wizard();
        assert_eq!(wizard.teardown(), None);
        assert_eq!(wizard.session_phase(), SessionPhase::Idle);
    }
}
