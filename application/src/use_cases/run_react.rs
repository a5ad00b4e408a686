//! Run ReAct use case.
//!
//! Drives the bounded think-act-observe cycle:
//!
//! ```text
//! seed: [system: instructions + catalogue] [user: query]
//!
//! loop (≤ max_iterations):
//!     Thinking ── backend.chat(conversation) ── ActionParser
//!        ├─ FinalAnswer  → assistant turn → Answered (return)
//!        ├─ ToolCall     → assistant turn → Acting → execute
//!        │                 → Observing → tool turn → Thinking
//!        └─ Thought / Unparseable → assistant turn → Thinking
//! budget spent → Exhausted
//! ```
//!
//! A turn is appended only once the step producing it has a complete value,
//! so an aborted run never leaves a half-written turn behind.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::react_progress::ReactProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use toolbox_domain::{
    ActionParser, ConversationState, DomainError, LlmResponse, LoopState, Message, Observation,
    ParsedAction, ReactPromptTemplate, ReactState, RunResult, ToolCall, ToolDescriptor,
    ToolExecution,
};
use tracing::{debug, info, warn};

/// Errors that abort a run.
///
/// Tool failures and an exhausted budget are not errors; they are reported
/// through observations and [`RunResult::Exhausted`].
#[derive(Error, Debug)]
pub enum RunReactError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(#[from] GatewayError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the [`RunReactUseCase`].
#[derive(Debug, Clone)]
pub struct RunReactInput {
    /// The user's question.
    pub query: String,
    /// Loop control.
    pub execution: ExecutionParams,
}

impl RunReactInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            execution: ExecutionParams::default(),
        }
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReactOutput {
    pub result: RunResult,
    /// Full transcript, seed turns included.
    pub conversation: ConversationState,
    /// Iterations actually started.
    pub iterations: usize,
    pub tool_executions: Vec<ToolExecution>,
    /// Terminal loop state (`Answered` or `Exhausted`).
    pub state: LoopState,
}

/// Outcome of [`RunReactUseCase::probe_tool_calling`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// The response named a tool.
    pub has_action: bool,
    /// The tool call carried at least one argument.
    pub has_arguments: bool,
    /// The call arrived as a native tool-use block rather than text.
    pub native: bool,
    /// Raw response text.
    pub response_text: String,
}

impl ProbeReport {
    pub fn supports_tool_calling(&self) -> bool {
        self.has_action
    }
}

/// Use case for running a query through the ReAct loop.
pub struct RunReactUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for RunReactUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl RunReactUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, tool_executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            gateway,
            tool_executor,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run a query to completion.
    ///
    /// Iterations run strictly one after another. There is no cancellation
    /// beyond the iteration budget; dropping the returned future abandons an
    /// in-flight backend request and the partial conversation with it.
    pub async fn execute(
        &self,
        input: RunReactInput,
        progress: &dyn ReactProgressNotifier,
    ) -> Result<RunReactOutput, RunReactError> {
        let query = input.query.trim();
        if query.is_empty() {
            return Err(RunReactError::EmptyQuery);
        }

        let descriptors = self.tool_executor.tool_descriptors();
        let advertised: &[ToolDescriptor] = if input.execution.native_tools {
            &descriptors
        } else {
            &[]
        };

        info!(
            tools = descriptors.len(),
            max_iterations = input.execution.max_iterations,
            "Starting ReAct run: {}",
            preview(query, 100)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "run_start",
            json!({
                "query": query,
                "tools": descriptors.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "max_iterations": input.execution.max_iterations,
            }),
        ));

        let mut conversation =
            ConversationState::seeded(ReactPromptTemplate::system(&descriptors), query);
        let mut state = ReactState::new(input.execution.max_iterations);
        let mut tool_executions = Vec::new();

        let result = loop {
            if !state.increment_iteration() {
                state.transition(LoopState::Exhausted)?;
                progress.on_state_change(LoopState::Exhausted);
                warn!(
                    iterations = state.iteration(),
                    "Iteration budget exhausted without final answer"
                );
                break RunResult::Exhausted {
                    iterations: state.iteration(),
                };
            }

            let iteration = state.iteration();
            progress.on_iteration_start(iteration, state.max_iterations());
            debug!(iteration, turns = conversation.len(), "Requesting next step");

            let response = self
                .gateway
                .chat(conversation.messages(), advertised)
                .await
                .inspect_err(|e| warn!(iteration, "Backend request failed: {}", e))?;

            let action = ActionParser::parse_response(&response);
            let assistant_text = assistant_turn(&response, &action);
            debug!(iteration, action = action.kind(), "Parsed model response");
            self.conversation_logger.log(ConversationEvent::new(
                "llm_response",
                json!({
                    "iteration": iteration,
                    "action": action.kind(),
                    "text": assistant_text,
                }),
            ));

            match action {
                ParsedAction::FinalAnswer { text } => {
                    conversation.append_assistant(assistant_text);
                    state.transition(LoopState::Answered)?;
                    progress.on_state_change(LoopState::Answered);
                    info!(iteration, "Final answer produced");
                    break RunResult::answered(text);
                }
                ParsedAction::ToolCall { call } => {
                    conversation.append_assistant(assistant_text);
                    state.transition(LoopState::Acting)?;
                    progress.on_state_change(LoopState::Acting);

                    let observation = self
                        .run_tool(&call, iteration, progress, &mut tool_executions)
                        .await;

                    state.transition(LoopState::Observing)?;
                    progress.on_state_change(LoopState::Observing);
                    conversation.append_observation(observation.text);

                    state.transition(LoopState::Thinking)?;
                    progress.on_state_change(LoopState::Thinking);
                }
                ParsedAction::Thought { text } => {
                    conversation.append_assistant(assistant_text);
                    progress.on_thought(&text);
                    state.transition(LoopState::Thinking)?;
                }
                ParsedAction::Unparseable { raw_text } => {
                    debug!(iteration, "Response had no action or answer");
                    conversation.append_assistant(assistant_text);
                    progress.on_unparseable(&raw_text);
                    state.transition(LoopState::Thinking)?;
                }
            }
        };

        progress.on_complete(&result);
        self.conversation_logger.log(ConversationEvent::new(
            "run_complete",
            json!({
                "result": result,
                "iterations": state.iteration(),
                "tool_calls": tool_executions.len(),
            }),
        ));

        Ok(RunReactOutput {
            result,
            conversation,
            iterations: state.iteration(),
            tool_executions,
            state: state.state(),
        })
    }

    /// Send a single test prompt and report whether the backend produced a
    /// recognizable tool call.
    pub async fn probe_tool_calling(
        &self,
        native_tools: bool,
    ) -> Result<ProbeReport, RunReactError> {
        let probe_tool = ToolDescriptor {
            name: "test_tool".to_string(),
            description: "A test tool".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {"param": {"type": "string", "description": "Test parameter"}},
                "required": ["param"],
            }),
        };
        let tools: &[ToolDescriptor] = if native_tools {
            std::slice::from_ref(&probe_tool)
        } else {
            &[]
        };

        let response = self
            .gateway
            .chat(&[Message::user(ReactPromptTemplate::probe())], tools)
            .await?;
        let action = ActionParser::parse_response(&response);
        let call = action.tool_call();

        let report = ProbeReport {
            has_action: call.is_some(),
            has_arguments: call.is_some_and(|c| !c.arguments.is_empty()),
            native: call.is_some_and(|c| c.native_id.is_some()),
            response_text: response.text_content(),
        };
        info!(
            has_action = report.has_action,
            has_arguments = report.has_arguments,
            native = report.native,
            "Function calling probe finished"
        );
        Ok(report)
    }

    async fn run_tool(
        &self,
        call: &ToolCall,
        iteration: usize,
        progress: &dyn ReactProgressNotifier,
        executions: &mut Vec<ToolExecution>,
    ) -> Observation {
        progress.on_tool_call(call);
        info!(tool = %call.tool_name, iteration, "Executing tool");
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            json!({
                "iteration": iteration,
                "tool": call.tool_name,
                "arguments": call.arguments,
            }),
        ));

        let mut execution = ToolExecution::start(call, iteration);
        let result = self.tool_executor.execute(call).await;
        execution.finish(&result);

        let observation = Observation::from(&result);
        if observation.is_error {
            warn!(tool = %call.tool_name, "Tool failed: {}", observation.text);
        }
        progress.on_tool_result(&call.tool_name, result.is_success(), &observation.text);
        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "iteration": iteration,
                "tool": call.tool_name,
                "success": result.is_success(),
                "observation": observation.text,
                "duration_ms": execution.duration_ms(),
            }),
        ));

        executions.push(execution);
        observation
    }
}

/// Text recorded as the assistant turn for a response.
///
/// Native tool calls are rendered in the text protocol so that the transcript
/// stays readable by backends without function calling.
fn assistant_turn(response: &LlmResponse, action: &ParsedAction) -> String {
    let text = response.text_content();
    match action {
        ParsedAction::ToolCall { call } if call.native_id.is_some() => {
            if text.trim().is_empty() {
                call.to_react_text()
            } else {
                format!("{}\n{}", text.trim_end(), call.to_react_text())
            }
        }
        _ => text,
    }
}

fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
