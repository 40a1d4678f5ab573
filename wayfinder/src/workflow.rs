//! Travel-planning workflow: graph assembly, lazy shared initialization, and
//! the streamed final answer.
//!
//! Topology: START → supervisor; conditional edges from the supervisor route
//! on `pending_route` to a specialist or END; each specialist edges back to
//! the supervisor. A completed run is rendered to a transcript and handed to
//! a second model that streams the user-facing answer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::agents::{SpecialistAgent, SupervisorAgent, SUPERVISOR_NODE_ID};
use crate::config::Settings;
use crate::error::AgentError;
use crate::format::render_transcript;
use crate::graph::{CompiledStateGraph, Node, StateGraph, END, START};
use crate::llm::{ChatOpenAI, LlmClient, MessageChunk};
use crate::message::Message;
use crate::prompts;
use crate::state::{RouteDecision, TravelState};
use crate::tool_source::load_integration;

/// Integration name for the map/navigation tool server.
pub const NAVIGATION_INTEGRATION: &str = "amap-maps";

/// Integration name for the train ticketing tool server.
pub const TICKETING_INTEGRATION: &str = "12306-mcp";

/// Streamed final answer: text fragments, terminated early by at most one
/// error item.
pub type AnswerStream = ReceiverStream<Result<String, AgentError>>;

/// Wires the three agents into a compiled graph.
///
/// The router parses `pending_route`; recognized labels go through the path
/// map (terminate and `__end__` both reach END), unrecognized labels pass
/// through raw so the run loop fails with a configuration error naming them.
pub fn assemble_travel_graph(
    supervisor: Arc<dyn Node<TravelState>>,
    navigation: Arc<dyn Node<TravelState>>,
    ticketing: Arc<dyn Node<TravelState>>,
) -> Result<CompiledStateGraph<TravelState>, AgentError> {
    let navigation_id = RouteDecision::NavigationExpert.node_id();
    let ticketing_id = RouteDecision::TicketingExpert.node_id();

    let mut graph = StateGraph::<TravelState>::new();
    graph.add_node(SUPERVISOR_NODE_ID, supervisor);
    graph.add_node(navigation_id, navigation);
    graph.add_node(ticketing_id, ticketing);

    graph.add_edge(START, SUPERVISOR_NODE_ID);
    graph.add_edge(navigation_id, SUPERVISOR_NODE_ID);
    graph.add_edge(ticketing_id, SUPERVISOR_NODE_ID);

    let path_map: HashMap<String, String> = [
        (navigation_id.to_string(), navigation_id.to_string()),
        (ticketing_id.to_string(), ticketing_id.to_string()),
        (
            RouteDecision::Terminate.as_label().to_string(),
            END.to_string(),
        ),
        (END.to_string(), END.to_string()),
    ]
    .into_iter()
    .collect();

    graph.add_conditional_edges(
        SUPERVISOR_NODE_ID,
        Arc::new(|state: &TravelState| {
            let raw = state.pending_route.as_deref().unwrap_or_default();
            match raw.parse::<RouteDecision>() {
                Ok(decision) => decision.as_label().to_string(),
                // Unknown labels pass through and fail the run loop by name.
                Err(_) => raw.trim().to_string(),
            }
        }),
        Some(path_map),
    );

    graph.compile().map_err(AgentError::from)
}

/// The travel assistant: settings plus a lazily built, shared workflow graph.
///
/// The graph connects to both tool integrations on first use and is reused by
/// every later query; concurrent first queries build it exactly once.
pub struct TravelAgent {
    settings: Settings,
    graph: tokio::sync::OnceCell<Arc<CompiledStateGraph<TravelState>>>,
}

impl TravelAgent {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            graph: tokio::sync::OnceCell::new(),
        }
    }

    /// Builds the agent from environment settings.
    pub fn from_env() -> Result<Self, AgentError> {
        Ok(Self::new(Settings::from_env()?))
    }

    async fn build_graph(&self) -> Result<Arc<CompiledStateGraph<TravelState>>, AgentError> {
        let navigation_tools =
            load_integration(&self.settings.mcp_config, NAVIGATION_INTEGRATION).await?;
        let ticketing_tools =
            load_integration(&self.settings.mcp_config, TICKETING_INTEGRATION).await?;

        let supervisor_llm: Arc<dyn LlmClient> = Arc::new(
            ChatOpenAI::new(&self.settings.model).with_temperature(0.0),
        );
        let navigation_llm: Arc<dyn LlmClient> = Arc::new(
            ChatOpenAI::new(&self.settings.model)
                .with_temperature(0.0)
                .with_tools(navigation_tools.specs.clone()),
        );
        let ticketing_llm: Arc<dyn LlmClient> = Arc::new(
            ChatOpenAI::new(&self.settings.model)
                .with_temperature(0.0)
                .with_tools(ticketing_tools.specs.clone()),
        );

        let supervisor = Arc::new(SupervisorAgent::new(
            supervisor_llm,
            prompts::supervisor_prompt(),
        ));
        let navigation = Arc::new(SpecialistAgent::new(
            RouteDecision::NavigationExpert.node_id(),
            navigation_llm,
            navigation_tools.source.clone(),
            navigation_tools.specs.clone(),
            prompts::navigation_prompt(&navigation_tools.summary),
        ));
        let ticketing = Arc::new(SpecialistAgent::new(
            RouteDecision::TicketingExpert.node_id(),
            ticketing_llm,
            ticketing_tools.source.clone(),
            ticketing_tools.specs.clone(),
            prompts::ticketing_prompt(&ticketing_tools.summary),
        ));

        let graph = assemble_travel_graph(supervisor, navigation, ticketing)?;
        info!(
            model = %self.settings.model,
            chat_model = %self.settings.chat_model,
            "travel workflow graph built"
        );
        Ok(Arc::new(graph))
    }

    async fn graph(&self) -> Result<Arc<CompiledStateGraph<TravelState>>, AgentError> {
        self.graph
            .get_or_try_init(|| self.build_graph())
            .await
            .cloned()
    }

    /// Runs the full workflow for one query and streams the final answer.
    pub async fn process_query(&self, query: &str) -> Result<AnswerStream, AgentError> {
        let graph = self.graph().await?;

        let final_state = graph.invoke(TravelState::with_query(query)).await?;
        let context = render_transcript(&final_state.messages);
        debug!(
            messages = final_state.messages.len(),
            supervisor_turns = final_state.supervisor_turns,
            "workflow run complete, generating final answer"
        );

        let output_llm: Arc<dyn LlmClient> = Arc::new(ChatOpenAI::new(&self.settings.chat_model));
        let messages = vec![
            Message::system(prompts::final_system_prompt(&context)),
            Message::user(prompts::final_question_prompt(query)),
        ];
        Ok(stream_final_answer(output_llm, messages))
    }
}

/// Streams the final answer generation as text fragments.
///
/// The generation runs in a spawned task; dropping the returned stream stops
/// it. A provider failure ends the stream with one `Err` item after any
/// fragments already produced.
pub fn stream_final_answer(llm: Arc<dyn LlmClient>, messages: Vec<Message>) -> AnswerStream {
    let (tx, rx) = mpsc::channel::<Result<String, AgentError>>(32);

    tokio::spawn(async move {
        let (chunk_tx, mut chunk_rx) = mpsc::channel::<MessageChunk>(32);

        let forward = {
            let tx = tx.clone();
            async move {
                while let Some(chunk) = chunk_rx.recv().await {
                    if tx.send(Ok(chunk.content)).await.is_err() {
                        break;
                    }
                }
            }
        };
        let generate = llm.invoke_stream(&messages, Some(chunk_tx));

        tokio::select! {
            // Receiver dropped: stop generating.
            _ = tx.closed() => {}
            (result, ()) = async { tokio::join!(generate, forward) } => {
                if let Err(e) = result {
                    let e = match e {
                        AgentError::ExecutionFailed(msg) => AgentError::Generation(msg),
                        other => other,
                    };
                    let _ = tx.send(Err(e)).await;
                }
            }
        }
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Next;
    use crate::llm::MockLlm;
    use async_trait::async_trait;
    use tokio_stream::StreamExt;

    struct StopNode(&'static str);

    #[async_trait]
    impl Node<TravelState> for StopNode {
        fn id(&self) -> &str {
            self.0
        }
        async fn run(&self, mut state: TravelState) -> Result<(TravelState, Next), AgentError> {
            state.pending_route = None;
            Ok((state, Next::Continue))
        }
    }

    fn routing_supervisor(labels: Vec<&str>) -> Arc<SupervisorAgent> {
        let turns = labels
            .into_iter()
            .map(|l| (l.to_string(), vec![]))
            .collect();
        Arc::new(SupervisorAgent::new(
            Arc::new(MockLlm::scripted(turns)),
            "route",
        ))
    }

    /// **Scenario**: a terminate decision on the first turn runs only the
    /// supervisor and ends the graph.
    #[tokio::test]
    async fn graph_terminates_on_terminate_label() {
        let graph = assemble_travel_graph(
            routing_supervisor(vec!["terminate"]),
            Arc::new(StopNode("navigation_expert")),
            Arc::new(StopNode("ticketing_expert")),
        )
        .unwrap();

        let state = graph.invoke(TravelState::with_query("q")).await.unwrap();
        assert_eq!(state.supervisor_turns, 1);
    }

    /// **Scenario**: the `__end__` alias also ends the graph through the
    /// path map.
    #[tokio::test]
    async fn graph_terminates_on_end_alias() {
        let graph = assemble_travel_graph(
            routing_supervisor(vec!["__end__"]),
            Arc::new(StopNode("navigation_expert")),
            Arc::new(StopNode("ticketing_expert")),
        )
        .unwrap();

        let state = graph.invoke(TravelState::with_query("q")).await.unwrap();
        assert_eq!(state.supervisor_turns, 1);
    }

    /// **Scenario**: an unrecognized routing label fails the run with a
    /// configuration error naming the label.
    #[tokio::test]
    async fn graph_rejects_unknown_routing_label() {
        let graph = assemble_travel_graph(
            routing_supervisor(vec!["hotel_expert"]),
            Arc::new(StopNode("navigation_expert")),
            Arc::new(StopNode("ticketing_expert")),
        )
        .unwrap();

        let err = graph.invoke(TravelState::with_query("q")).await.unwrap_err();
        assert!(matches!(err, AgentError::Config(ref m) if m.contains("hotel_expert")));
    }

    /// **Scenario**: streaming the final answer yields every chunk in order
    /// and ends cleanly.
    #[tokio::test]
    async fn stream_final_answer_yields_chunks_in_order() {
        let llm: Arc<dyn LlmClient> =
            Arc::new(MockLlm::with_reply("Take G101.").with_stream_by_char());
        let stream = stream_final_answer(llm, vec![Message::user("q")]);

        let fragments: Vec<_> = stream.collect::<Vec<_>>().await;
        let text: String = fragments
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(text, "Take G101.");
    }

    /// **Scenario**: dropping the stream mid-generation cancels it without
    /// panicking.
    #[tokio::test]
    async fn stream_final_answer_cancel_by_drop() {
        let llm: Arc<dyn LlmClient> =
            Arc::new(MockLlm::with_reply("a long answer").with_stream_by_char());
        let mut stream = stream_final_answer(llm, vec![Message::user("q")]);
        let first = stream.next().await;
        assert!(matches!(first, Some(Ok(_))));
        drop(stream);
        tokio::task::yield_now().await;
    }
}
