//! Run Discussion use case
//!
//! The orchestration engine: drives rounds and expert turns, streams
//! tokens as they arrive, tracks consensus, recovers from transient
//! generation failures, and produces the end-of-discussion summary.
//!
//! The engine owns all mutable discussion state. Progress is observable
//! only through the [`DiscussionEvent`]s it pushes onto the caller's
//! bounded channel; the channel's backpressure paces event production, and
//! a closed channel (receiver dropped) cancels the run at the next event
//! boundary.

use crate::ports::completion::{
    CompletionClient, CompletionError, CompletionFactory, GenerationParams, StreamEvent,
};
use colloquy_domain::{
    decode_summary, extract_key_points, parse_consensus_score, DiscussionConfig, DiscussionEvent,
    DiscussionState, DiscussionSummary, Expert, Message, ModelId, PromptBuilder, StylePicker,
    TurnScheduler,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Additional attempts after a failed turn (3 attempts total)
pub const MAX_TURN_RETRIES: usize = 2;

/// Backoff before each retry attempt
pub const TURN_BACKOFF: [Duration; MAX_TURN_RETRIES] =
    [Duration::from_secs(1), Duration::from_secs(2)];

/// A turn shorter than this is treated as a generation failure
const MIN_TURN_CONTENT: usize = 20;

/// Consensus analysis is skipped (score 0.0) below this many messages
const CONSENSUS_MIN_MESSAGES: usize = 5;

/// Early-termination threshold on the per-round consensus score
const EARLY_CONSENSUS_THRESHOLD: f64 = 0.85;

/// Early termination only applies from this round onward
const EARLY_CONSENSUS_MIN_ROUND: u32 = 3;

const TURN_MAX_TOKENS: u32 = 700;
const CONSENSUS_MAX_TOKENS: u32 = 8;
const CONSENSUS_TEMPERATURE: f32 = 0.1;
const SUMMARY_MAX_TOKENS: u32 = 1200;
const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Errors that can abort a discussion run
#[derive(Error, Debug)]
pub enum RunDiscussionError {
    /// The event channel was closed by the consumer
    #[error("Discussion cancelled: event channel closed")]
    Cancelled,

    /// A completion client could not be constructed (fails before any event)
    #[error("Completion setup failed: {0}")]
    Setup(#[from] CompletionError),
}

/// Caller-side handle for injecting moderator messages between turns.
///
/// The engine drains pending interjections into its log before building
/// each turn's prompt, so a message injected while one expert is speaking
/// is picked up by the very next turn.
#[derive(Clone)]
pub struct ModeratorHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl ModeratorHandle {
    /// Queue a moderator message. Returns false if the engine is gone.
    pub fn interject(&self, content: impl Into<String>) -> bool {
        self.tx.send(content.into()).is_ok()
    }
}

/// Outcome of a single turn attempt
enum TurnAttempt {
    Content(String),
    Failed(String),
}

/// Use case for running one expert-panel discussion
pub struct RunDiscussionUseCase {
    config: DiscussionConfig,
    state: DiscussionState,
    styles: StylePicker,
    /// Client registry keyed by model; built per run, never shared across runs
    clients: HashMap<ModelId, Arc<dyn CompletionClient>>,
    moderator_tx: mpsc::UnboundedSender<String>,
    moderator_rx: mpsc::UnboundedReceiver<String>,
}

impl RunDiscussionUseCase {
    /// Build the engine, eagerly creating one client per distinct model so
    /// configuration problems surface here instead of mid-stream.
    pub fn new(
        factory: Arc<dyn CompletionFactory>,
        config: DiscussionConfig,
    ) -> Result<Self, RunDiscussionError> {
        let mut clients: HashMap<ModelId, Arc<dyn CompletionClient>> = HashMap::new();

        let mut register = |model: &ModelId| -> Result<(), CompletionError> {
            if !clients.contains_key(model) {
                clients.insert(model.clone(), factory.create(model)?);
            }
            Ok(())
        };

        register(&config.fallback_model)?;
        for expert in &config.experts {
            if let Some(model) = &expert.model {
                register(model)?;
            }
        }

        let (moderator_tx, moderator_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            state: DiscussionState::new(),
            styles: StylePicker::new(),
            clients,
            moderator_tx,
            moderator_rx,
        })
    }

    /// Handle for caller-side moderator interjections
    pub fn moderator_handle(&self) -> ModeratorHandle {
        ModeratorHandle {
            tx: self.moderator_tx.clone(),
        }
    }

    /// Append a moderator message to the log directly.
    ///
    /// No event is emitted; relaying the interjection to consumers is the
    /// transport's job. The engine only needs the message in its log before
    /// the next turn's prompt is built.
    pub fn append_moderator_message(&mut self, content: impl Into<String>) {
        let round = self.state.current_round.max(1);
        self.state.append(Message::moderator(content, round));
    }

    /// Run the discussion to completion, pushing events onto `events`.
    ///
    /// Rounds and turns are strictly sequential. The run only stops
    /// normally, via early-consensus termination, or when the consumer
    /// drops the receiving end of `events`.
    pub async fn run(
        mut self,
        events: mpsc::Sender<DiscussionEvent>,
    ) -> Result<(), RunDiscussionError> {
        info!(
            discussion_id = %self.config.discussion_id,
            experts = self.config.experts.len(),
            rounds = self.config.total_rounds,
            "Starting discussion"
        );
        self.state.running = true;

        for round in 1..=self.config.total_rounds {
            self.state.current_round = round;
            self.styles.reset();

            let order = TurnScheduler::round_order(&self.config, round);
            debug!(round, ?order, "Round order selected");

            for index in order {
                let expert = self.config.experts[index].clone();
                self.run_expert_turn(&expert, round, &events).await?;

                if self.config.moderator_enabled {
                    self.emit(
                        &events,
                        DiscussionEvent::ModeratorPrompt {
                            message: format!(
                                "{} has finished speaking. Interject now if you wish.",
                                expert.name
                            ),
                        },
                    )
                    .await?;
                }
            }

            let score = self.analyze_consensus().await;
            self.state.last_consensus = score;
            self.emit(
                &events,
                DiscussionEvent::RoundComplete {
                    round,
                    consensus_score: Some(score),
                },
            )
            .await?;

            if round >= EARLY_CONSENSUS_MIN_ROUND && score > EARLY_CONSENSUS_THRESHOLD {
                info!(round, score, "Early consensus reached, ending discussion");
                break;
            }
        }

        let summary = self.generate_summary().await;
        self.emit(&events, DiscussionEvent::DiscussionSummary { summary })
            .await?;
        self.emit(
            &events,
            DiscussionEvent::DiscussionComplete {
                discussion_id: self.config.discussion_id.clone(),
            },
        )
        .await?;

        self.state.running = false;
        info!(discussion_id = %self.config.discussion_id, "Discussion complete");
        Ok(())
    }

    /// Run one expert's turn, retrying transient failures with backoff.
    ///
    /// A turn that exhausts its retries emits an `error` event and returns
    /// Ok; the round and discussion always proceed.
    async fn run_expert_turn(
        &mut self,
        expert: &Expert,
        round: u32,
        events: &mpsc::Sender<DiscussionEvent>,
    ) -> Result<(), RunDiscussionError> {
        self.drain_moderator_inbox();

        let mut last_failure = String::new();

        for attempt in 0..=MAX_TURN_RETRIES {
            if attempt > 0 {
                debug!(expert = %expert.name, attempt, "Retrying turn after backoff");
                tokio::time::sleep(TURN_BACKOFF[attempt - 1]).await;
            }

            // A fresh style may be selected on each attempt
            let style = self.styles.pick();
            self.emit(
                events,
                DiscussionEvent::ExpertStart {
                    expert_id: expert.id.clone(),
                    expert_name: expert.name.clone(),
                    expert_color: expert.color.clone(),
                    round,
                    debate_style: style,
                },
            )
            .await?;

            let prompt = PromptBuilder::turn_prompt(&self.config, &self.state, expert, style, round);
            let params = GenerationParams {
                max_tokens: TURN_MAX_TOKENS,
                temperature: TurnScheduler::temperature(&self.config, round),
            };
            let client = self.client_for(expert);

            match self.stream_turn(&client, &prompt, params, events).await? {
                TurnAttempt::Content(content) if content.chars().count() >= MIN_TURN_CONTENT => {
                    self.state
                        .record_points(&expert.name, extract_key_points(&content));

                    let message =
                        Message::expert(content.clone(), round, style, &expert.id, &expert.name);
                    let message_id = message.id.clone();
                    self.state.append(message);

                    self.emit(
                        events,
                        DiscussionEvent::ExpertComplete {
                            message_id,
                            expert_id: expert.id.clone(),
                            full_content: content,
                        },
                    )
                    .await?;
                    return Ok(());
                }
                TurnAttempt::Content(short) => {
                    last_failure = format!("response too short ({} chars)", short.chars().count());
                    warn!(expert = %expert.name, attempt, "{}", last_failure);
                }
                TurnAttempt::Failed(reason) => {
                    last_failure = reason;
                    warn!(expert = %expert.name, attempt, "Turn failed: {}", last_failure);
                }
            }
        }

        // Retries exhausted: surface the failure and move on without a message
        self.emit(
            events,
            DiscussionEvent::Error {
                message: format!(
                    "{} could not respond in round {}: {}",
                    expert.name, round, last_failure
                ),
            },
        )
        .await
    }

    /// Stream one completion attempt, emitting a token event per fragment.
    ///
    /// Returns `Err` only on cancellation; generation failures come back as
    /// [`TurnAttempt::Failed`] so the retry loop can handle them.
    async fn stream_turn(
        &self,
        client: &Arc<dyn CompletionClient>,
        prompt: &str,
        params: GenerationParams,
        events: &mpsc::Sender<DiscussionEvent>,
    ) -> Result<TurnAttempt, RunDiscussionError> {
        let mut handle = match client.generate_streaming(prompt, params).await {
            Ok(handle) => handle,
            Err(e) => return Ok(TurnAttempt::Failed(e.to_string())),
        };

        let mut accumulated = String::new();
        while let Some(event) = handle.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    accumulated.push_str(&chunk);
                    self.emit(events, DiscussionEvent::Token { content: chunk })
                        .await?;
                }
                StreamEvent::Completed(full) => {
                    if accumulated.is_empty() {
                        accumulated = full;
                    }
                    break;
                }
                StreamEvent::Error(e) => return Ok(TurnAttempt::Failed(e)),
            }
        }

        Ok(TurnAttempt::Content(accumulated))
    }

    /// Compute the round's consensus score.
    ///
    /// Skips the completion call entirely below [`CONSENSUS_MIN_MESSAGES`]
    /// messages. Client and parse failures are absorbed: the probe defaults
    /// to 0.5 rather than surfacing an error.
    async fn analyze_consensus(&self) -> f64 {
        if self.state.message_count() < CONSENSUS_MIN_MESSAGES {
            return 0.0;
        }

        let prompt = PromptBuilder::consensus_prompt(&self.state);
        let params = GenerationParams {
            max_tokens: CONSENSUS_MAX_TOKENS,
            temperature: CONSENSUS_TEMPERATURE,
        };

        match self.fallback_client().generate(&prompt, params).await {
            Ok(response) => parse_consensus_score(&response),
            Err(e) => {
                warn!("Consensus analysis failed, assuming moderate consensus: {}", e);
                0.5
            }
        }
    }

    /// Generate the final summary. Never fails: any client or decode
    /// problem falls back to the fixed summary seeded with the engine's
    /// last consensus score.
    async fn generate_summary(&self) -> DiscussionSummary {
        let prompt = PromptBuilder::summary_prompt(&self.config, &self.state);
        let params = GenerationParams {
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        match self.fallback_client().generate(&prompt, params).await {
            Ok(response) => decode_summary(&response, self.state.last_consensus),
            Err(e) => {
                warn!("Summary generation failed, using fallback: {}", e);
                DiscussionSummary::fallback(self.state.last_consensus)
            }
        }
    }

    /// Move queued moderator interjections into the log
    fn drain_moderator_inbox(&mut self) {
        while let Ok(content) = self.moderator_rx.try_recv() {
            debug!("Moderator interjection received");
            let round = self.state.current_round.max(1);
            self.state.append(Message::moderator(content, round));
        }
    }

    /// Push one event, treating a closed channel as cancellation
    async fn emit(
        &self,
        events: &mpsc::Sender<DiscussionEvent>,
        event: DiscussionEvent,
    ) -> Result<(), RunDiscussionError> {
        events
            .send(event)
            .await
            .map_err(|_| RunDiscussionError::Cancelled)
    }

    fn client_for(&self, expert: &Expert) -> Arc<dyn CompletionClient> {
        let model = expert.resolve_model(&self.config.fallback_model);
        Arc::clone(
            self.clients
                .get(model)
                .unwrap_or_else(|| &self.clients[&self.config.fallback_model]),
        )
    }

    fn fallback_client(&self) -> Arc<dyn CompletionClient> {
        Arc::clone(&self.clients[&self.config.fallback_model])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const TURN_REPLY: &str =
        "A thoughtful contribution that easily exceeds the minimum length requirement.";

    /// Scripted completion client with call accounting
    struct MockClient {
        model: ModelId,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        temperatures: Mutex<Vec<f32>>,
        fail_always: bool,
        consensus_reply: String,
        summary_reply: String,
    }

    impl MockClient {
        fn healthy(model: &str) -> Arc<Self> {
            Arc::new(Self {
                model: ModelId::new(model),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                temperatures: Mutex::new(Vec::new()),
                fail_always: false,
                consensus_reply: "0.2".to_string(),
                summary_reply: "I cannot comply.".to_string(),
            })
        }

        fn failing(model: &str) -> Arc<Self> {
            Arc::new(Self {
                model: ModelId::new(model),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                temperatures: Mutex::new(Vec::new()),
                fail_always: true,
                consensus_reply: "0.2".to_string(),
                summary_reply: "I cannot comply.".to_string(),
            })
        }

        fn with_consensus_reply(model: &str, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                model: ModelId::new(model),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                temperatures: Mutex::new(Vec::new()),
                fail_always: false,
                consensus_reply: reply.to_string(),
                summary_reply: "I cannot comply.".to_string(),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        fn consensus_call_count(&self) -> usize {
            self.prompts()
                .iter()
                .filter(|p| p.contains("Rate the level of agreement"))
                .count()
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        fn model(&self) -> &ModelId {
            &self.model
        }

        async fn generate(
            &self,
            prompt: &str,
            params: GenerationParams,
        ) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.temperatures.lock().unwrap().push(params.temperature);

            if self.fail_always {
                return Err(CompletionError::RequestFailed("mock outage".to_string()));
            }
            if prompt.contains("Rate the level of agreement") {
                Ok(self.consensus_reply.clone())
            } else if prompt.contains("Summarize it as a single JSON object") {
                Ok(self.summary_reply.clone())
            } else {
                Ok(TURN_REPLY.to_string())
            }
        }
    }

    struct MockFactory {
        clients: HashMap<ModelId, Arc<MockClient>>,
    }

    impl MockFactory {
        fn single(client: Arc<MockClient>) -> Arc<Self> {
            let mut clients = HashMap::new();
            clients.insert(client.model().clone(), client);
            Arc::new(Self { clients })
        }

        fn pair(a: Arc<MockClient>, b: Arc<MockClient>) -> Arc<Self> {
            let mut clients = HashMap::new();
            clients.insert(a.model().clone(), a);
            clients.insert(b.model().clone(), b);
            Arc::new(Self { clients })
        }
    }

    impl CompletionFactory for MockFactory {
        fn create(&self, model: &ModelId) -> Result<Arc<dyn CompletionClient>, CompletionError> {
            self.clients
                .get(model)
                .cloned()
                .map(|c| c as Arc<dyn CompletionClient>)
                .ok_or_else(|| CompletionError::UnsupportedProvider(model.to_string()))
        }
    }

    fn roster(n: usize) -> Vec<Expert> {
        (0..n)
            .map(|i| {
                Expert::new(format!("e{}", i), format!("Expert {}", i), "Analyst")
                    .with_system_prompt(format!("You are Expert {}.", i))
            })
            .collect()
    }

    fn config(experts: Vec<Expert>, rounds: u32) -> DiscussionConfig {
        DiscussionConfig::new("Test topic under discussion", experts, ModelId::new("mock-model"))
            .unwrap()
            .with_rounds(rounds)
            .unwrap()
    }

    async fn run_and_collect(engine: RunDiscussionUseCase) -> Vec<DiscussionEvent> {
        let (tx, mut rx) = mpsc::channel(1024);
        let handle = tokio::spawn(engine.run(tx));

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        handle.await.unwrap().unwrap();
        events
    }

    fn count_kind(events: &[DiscussionEvent], kind: &str) -> usize {
        events.iter().filter(|e| e.kind() == kind).count()
    }

    #[tokio::test]
    async fn test_completed_run_emits_all_rounds_in_order() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(Arc::clone(&client));
        let engine =
            RunDiscussionUseCase::new(factory, config(roster(2), 2)).unwrap();

        let events = run_and_collect(engine).await;

        // 2 experts x 2 rounds
        assert_eq!(count_kind(&events, "expert_start"), 4);
        assert_eq!(count_kind(&events, "expert_complete"), 4);
        assert_eq!(count_kind(&events, "round_complete"), 2);
        assert_eq!(count_kind(&events, "discussion_summary"), 1);
        assert_eq!(count_kind(&events, "discussion_complete"), 1);
        assert_eq!(count_kind(&events, "error"), 0);

        let rounds: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                DiscussionEvent::RoundComplete { round, .. } => Some(*round),
                _ => None,
            })
            .collect();
        assert_eq!(rounds, vec![1, 2]);

        // Terminal events arrive last, in order
        assert_eq!(events[events.len() - 2].kind(), "discussion_summary");
        assert!(events.last().unwrap().is_terminal());
    }

    #[tokio::test]
    async fn test_consensus_skipped_below_five_messages() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(Arc::clone(&client));
        // 2 experts x 2 rounds = 4 messages, always under the threshold
        let engine = RunDiscussionUseCase::new(factory, config(roster(2), 2)).unwrap();

        let events = run_and_collect(engine).await;

        assert_eq!(client.consensus_call_count(), 0);
        for event in &events {
            if let DiscussionEvent::RoundComplete { consensus_score, .. } = event {
                assert_eq!(*consensus_score, Some(0.0));
            }
        }
    }

    #[tokio::test]
    async fn test_later_rounds_see_tracked_points() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(Arc::clone(&client));
        let engine = RunDiscussionUseCase::new(factory, config(roster(1), 2)).unwrap();

        run_and_collect(engine).await;

        let prompts = client.prompts();
        // Round 1 prompt has no repetition reminder, round 2 does
        assert!(!prompts[0].contains("do not repeat"));
        assert!(prompts[1].contains("do not repeat"));
    }

    #[tokio::test]
    async fn test_temperature_drops_on_last_round() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(Arc::clone(&client));
        let engine = RunDiscussionUseCase::new(factory, config(roster(1), 2)).unwrap();

        run_and_collect(engine).await;

        let temps = client.temperatures.lock().unwrap().clone();
        // Turn temps: round 1 then round 2; the summary call follows
        assert_eq!(temps[0], 0.8);
        assert_eq!(temps[1], 0.6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_turn_retries_three_times_then_continues() {
        let flaky = MockClient::failing("flaky-model");
        let healthy = MockClient::healthy("mock-model");
        let factory = MockFactory::pair(Arc::clone(&flaky), Arc::clone(&healthy));

        let mut experts = roster(2);
        experts[0] = experts[0].clone().with_model(ModelId::new("flaky-model"));
        let engine = RunDiscussionUseCase::new(factory, config(experts, 1)).unwrap();

        let events = run_and_collect(engine).await;

        // Initial attempt + 2 retries
        assert_eq!(flaky.calls(), 3);
        assert_eq!(count_kind(&events, "error"), 1);
        // The healthy expert still completed; the round and run finished
        assert_eq!(count_kind(&events, "expert_complete"), 1);
        assert_eq!(count_kind(&events, "round_complete"), 1);
        assert_eq!(count_kind(&events, "discussion_complete"), 1);
    }

    #[tokio::test]
    async fn test_early_consensus_terminates_after_round_three() {
        let client = MockClient::with_consensus_reply("mock-model", "0.95");
        let factory = MockFactory::single(Arc::clone(&client));
        // 10 configured rounds, but 2 experts reach 6 messages by round 3
        let engine = RunDiscussionUseCase::new(factory, config(roster(2), 10)).unwrap();

        let events = run_and_collect(engine).await;

        assert_eq!(count_kind(&events, "round_complete"), 3);
        assert_eq!(count_kind(&events, "discussion_summary"), 1);
        assert_eq!(count_kind(&events, "discussion_complete"), 1);

        let last_round = events
            .iter()
            .filter_map(|e| match e {
                DiscussionEvent::RoundComplete {
                    round,
                    consensus_score,
                } => Some((*round, *consensus_score)),
                _ => None,
            })
            .last()
            .unwrap();
        assert_eq!(last_round, (3, Some(0.95)));
    }

    #[tokio::test]
    async fn test_high_consensus_before_round_three_does_not_terminate() {
        let client = MockClient::with_consensus_reply("mock-model", "0.95");
        let factory = MockFactory::single(Arc::clone(&client));
        // 3 experts hit the message threshold in round 2 already
        let engine = RunDiscussionUseCase::new(factory, config(roster(3), 3)).unwrap();

        let events = run_and_collect(engine).await;

        // Round 2 scores 0.95 but is below the minimum round, so round 3 runs
        assert_eq!(count_kind(&events, "round_complete"), 3);
    }

    #[tokio::test]
    async fn test_unparsable_summary_falls_back() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(Arc::clone(&client));
        let engine = RunDiscussionUseCase::new(factory, config(roster(2), 2)).unwrap();

        let events = run_and_collect(engine).await;

        let summary = events
            .iter()
            .find_map(|e| match e {
                DiscussionEvent::DiscussionSummary { summary } => Some(summary.clone()),
                _ => None,
            })
            .unwrap();
        // Mock summary reply is unparsable; last consensus was 0.0
        assert_eq!(summary, DiscussionSummary::fallback(0.0));
    }

    #[tokio::test]
    async fn test_moderator_interjection_lands_in_next_prompt() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(Arc::clone(&client));
        let engine = RunDiscussionUseCase::new(factory, config(roster(1), 1)).unwrap();

        let handle = engine.moderator_handle();
        assert!(handle.interject("Please consider the budget"));

        run_and_collect(engine).await;

        let prompts = client.prompts();
        assert!(prompts[0].contains("\"Please consider the budget\""));
        assert!(prompts[0].contains("Address this comment explicitly"));
    }

    #[tokio::test]
    async fn test_moderator_prompts_emitted_after_each_turn() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(Arc::clone(&client));
        let config = config(roster(2), 2).with_moderator(true);
        let engine = RunDiscussionUseCase::new(factory, config).unwrap();

        let events = run_and_collect(engine).await;

        // One prompt per expert turn, not just per round
        assert_eq!(count_kind(&events, "moderator_prompt"), 4);
    }

    #[tokio::test]
    async fn test_dropped_receiver_cancels_run() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(client);
        let engine = RunDiscussionUseCase::new(factory, config(roster(2), 2)).unwrap();

        let (tx, rx) = mpsc::channel(1024);
        drop(rx);

        let result = engine.run(tx).await;
        assert!(matches!(result, Err(RunDiscussionError::Cancelled)));
    }

    #[tokio::test]
    async fn test_unknown_model_fails_at_construction() {
        let client = MockClient::healthy("mock-model");
        let factory = MockFactory::single(client);

        let mut experts = roster(1);
        experts[0] = experts[0].clone().with_model(ModelId::new("missing-model"));
        let result = RunDiscussionUseCase::new(factory, config(experts, 1));

        assert!(matches!(result, Err(RunDiscussionError::Setup(_))));
    }
}
