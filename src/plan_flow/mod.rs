//! Client side of the two-phase flow: collect inputs, ask the server for a
//! clarifying question, then send the answer and receive the plan.

pub mod http;

use rust_fsm::*;
use tokio::sync::watch;

use crate::error::{JustBeginError, Result};
use crate::interfaces::plan_api::{PlanApi, PlanForm};

state_machine! {
    plan_flow_machine(CollectingInputs)

    CollectingInputs(PromptReceived) => PromptGenerated,

    PromptGenerated(PlanReceived) => PlanGenerated,
    PromptGenerated(Restart) => CollectingInputs,

    PlanGenerated(PromptReceived) => PromptGenerated,
    PlanGenerated(Restart) => CollectingInputs
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowState {
    CollectingInputs,
    PromptGenerated,
    PlanGenerated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    PromptReceived,
    PlanReceived,
    Restart,
}

fn hydrate(machine: &mut plan_flow_machine::StateMachine, state: FlowState) -> Option<()> {
    let path: &[plan_flow_machine::Input] = match state {
        FlowState::CollectingInputs => &[],
        FlowState::PromptGenerated => &[plan_flow_machine::Input::PromptReceived],
        FlowState::PlanGenerated => &[
            plan_flow_machine::Input::PromptReceived,
            plan_flow_machine::Input::PlanReceived,
        ],
    };
    for input in path {
        machine.consume(input).ok()?;
    }
    Some(())
}

pub fn transition(current: FlowState, event: FlowEvent) -> Option<FlowState> {
    let mut machine = plan_flow_machine::StateMachine::new();
    hydrate(&mut machine, current)?;

    let input = match event {
        FlowEvent::PromptReceived => plan_flow_machine::Input::PromptReceived,
        FlowEvent::PlanReceived => plan_flow_machine::Input::PlanReceived,
        FlowEvent::Restart => plan_flow_machine::Input::Restart,
    };
    machine.consume(&input).ok()?;

    Some(match machine.state() {
        plan_flow_machine::State::CollectingInputs => FlowState::CollectingInputs,
        plan_flow_machine::State::PromptGenerated => FlowState::PromptGenerated,
        plan_flow_machine::State::PlanGenerated => FlowState::PlanGenerated,
    })
}

/// Drives one user's pass through the flow. Only successful responses move
/// the state forward; a failed call leaves state, inputs and results as they
/// were and hands the error back for display.
pub struct PlanFlow<A> {
    api: A,
    state: FlowState,
    form: PlanForm,
    question: Option<String>,
    plan: Option<String>,
    busy: watch::Sender<bool>,
}

impl<A: PlanApi> PlanFlow<A> {
    pub fn new(api: A) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            api,
            state: FlowState::CollectingInputs,
            form: PlanForm::default(),
            question: None,
            plan: None,
            busy,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn form(&self) -> &PlanForm {
        &self.form
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    /// `true` while a request is outstanding.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub async fn submit_inputs(&mut self, form: PlanForm) -> Result<&str> {
        let next = self.next_state(FlowEvent::PromptReceived)?;

        self.busy.send_replace(true);
        let result = self.api.create_prompt(&form).await;
        self.busy.send_replace(false);

        let question = result?;
        tracing::debug!(from = ?self.state, to = ?next, "Clarifying question received");
        self.form = form;
        self.plan = None;
        self.state = next;
        Ok(self.question.insert(question).as_str())
    }

    pub async fn submit_wildcard(&mut self, answer: &str) -> Result<&str> {
        let next = self.next_state(FlowEvent::PlanReceived)?;

        self.busy.send_replace(true);
        let result = self.api.generate_plan(&self.form, answer).await;
        self.busy.send_replace(false);

        let plan = result?;
        tracing::debug!(from = ?self.state, to = ?next, "Plan received");
        self.form = PlanForm::default();
        self.question = None;
        self.state = next;
        Ok(self.plan.insert(plan).as_str())
    }

    pub fn restart(&mut self) -> Result<()> {
        self.state = self.next_state(FlowEvent::Restart)?;
        self.form = PlanForm::default();
        self.question = None;
        self.plan = None;
        Ok(())
    }

    fn next_state(&self, event: FlowEvent) -> Result<FlowState> {
        transition(self.state, event).ok_or_else(|| {
            JustBeginError::Runtime(format!("{event:?} is not allowed in {:?}", self.state))
        })
    }
}
