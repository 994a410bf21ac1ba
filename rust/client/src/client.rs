use std::collections::VecDeque;
use std::time::Duration;

use arena_engine::action::Action;
use arena_engine::cards::Card;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, PlayerEndpoint};
use crate::errors::{log_error, ClientError, TransportError};
use crate::message::{cards_to_wire, drain_actions, Envelope, Reply, Request};
use crate::retry::RetryPolicy;
use crate::transport::{TcpTransport, Transport};

/// Appended once when a bot's log output exceeds its byte budget.
pub const LOG_LIMIT_MARKER: &str = "Log size limit reached. No further entries will be added.";

/// The referee's handle on one bot for the duration of a match.
///
/// Owns the player's game clock and bankroll. Once the clock reaches zero
/// the client never contacts the bot again.
#[derive(Debug)]
pub struct RemoteClient<T> {
    name: String,
    auth_token: Option<String>,
    transport: T,
    config: ClientConfig,
    /// Seconds of decision time left
    game_clock: f64,
    bankroll: i64,
    log: Vec<String>,
    log_size: usize,
}

impl RemoteClient<TcpTransport> {
    pub fn tcp(endpoint: PlayerEndpoint, config: ClientConfig) -> Self {
        let transport = TcpTransport::new(endpoint.address, config.connect_timeout())
            .with_max_reply_bytes(config.max_reply_bytes);
        Self::new(endpoint.name, endpoint.auth_token, transport, config)
    }
}

impl<T: Transport> RemoteClient<T> {
    pub fn new(
        name: impl Into<String>,
        auth_token: Option<String>,
        transport: T,
        config: ClientConfig,
    ) -> Self {
        Self {
            name: name.into(),
            auth_token,
            transport,
            game_clock: config.starting_game_clock,
            config,
            bankroll: 0,
            log: Vec::new(),
            log_size: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn game_clock(&self) -> f64 {
        self.game_clock
    }

    pub fn clock_exhausted(&self) -> bool {
        self.game_clock <= 0.0
    }

    /// Sum of all round deltas reported through [`end_round`](Self::end_round).
    pub fn bankroll(&self) -> i64 {
        self.bankroll
    }

    /// Every log entry accepted from the bot so far this match.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Open the connection, retrying refused or timed-out attempts.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        let policy = self.config.connect_policy();
        let mut attempt = 1;
        loop {
            match self.transport.connect().await {
                Ok(()) => {
                    info!(player = %self.name, endpoint = self.transport.endpoint(), attempt, "connected to bot");
                    return Ok(());
                }
                Err(e) if e.is_retryable() && policy.allows_retry(attempt) => {
                    debug!(player = %self.name, attempt, error = %e, "connect failed, retrying");
                    policy.backoff().await;
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    let err = ClientError::ConnectFailed {
                        endpoint: self.transport.endpoint().to_string(),
                        attempts: attempt,
                    };
                    log_error(&self.name, &err, err.severity());
                    return Err(err);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Ask whether the bot is ready to play. Retried on errors and on a
    /// "not ready" answer; false once every attempt is used up.
    pub async fn check_ready(&mut self, player_names: &[String]) -> bool {
        if self.clock_exhausted() {
            return false;
        }
        let policy = self.config.ready_check_policy();
        let limit = self.config.ready_check_timeout();
        let envelope = self.envelope(Request::ReadyCheck {
            player_names: player_names.to_vec(),
        });

        for attempt in 1..=policy.max_attempts() {
            match self.call_once(&envelope, limit).await {
                Ok(Reply::Ready { ready: true }) => {
                    info!(player = %self.name, attempt, "bot is ready");
                    return true;
                }
                Ok(Reply::Ready { ready: false }) => {
                    debug!(player = %self.name, attempt, "bot not ready yet");
                }
                Ok(_) => self.report(&TransportError::UnexpectedReply { expected: "ready" }),
                Err(e) => self.report(&e),
            }
            if policy.allows_retry(attempt) {
                policy.backoff().await;
            }
        }
        warn!(player = %self.name, attempts = policy.max_attempts(), "bot never became ready");
        false
    }

    /// Ask the bot for its next action.
    ///
    /// `new_actions` holds every action taken since this player's previous
    /// request and is emptied. Any transport failure, timeout or malformed
    /// reply yields `Ok(None)`; the caller substitutes a safe default. The
    /// returned action is not checked for legality.
    ///
    /// # Errors
    ///
    /// [`ClientError::GameClockExhausted`] once the player's clock has run
    /// out, including when this very call used up the remainder. No I/O
    /// happens after that point.
    pub async fn request_action(
        &mut self,
        hand: &[Card],
        board: &[Card],
        new_actions: &mut VecDeque<Action>,
    ) -> Result<Option<Action>, ClientError> {
        let new_actions = drain_actions(new_actions);
        if self.clock_exhausted() {
            return Err(self.exhausted());
        }
        let envelope = self.envelope(Request::RequestAction {
            game_clock: self.game_clock,
            player_hand: cards_to_wire(hand),
            board_cards: cards_to_wire(board),
            new_actions,
        });

        let start = Instant::now();
        let result = self
            .call_with_retry(&envelope, self.config.action_timeout(), self.config.action_policy())
            .await;
        let elapsed = start.elapsed();
        if self.config.enforce_game_clock {
            self.game_clock -= elapsed.as_secs_f64();
        }
        debug!(
            player = %self.name,
            elapsed_ms = elapsed.as_millis() as u64,
            game_clock = self.game_clock,
            "action request finished"
        );

        if self.clock_exhausted() {
            let err = self.exhausted();
            log_error(&self.name, &err, err.severity());
            return Err(err);
        }

        let action = match result {
            Ok(Reply::Action { action }) => {
                let decoded = action.to_action();
                if decoded.is_none() {
                    info!(player = %self.name, "bot sent an unknown action type");
                }
                decoded
            }
            Ok(_) => {
                self.report(&TransportError::UnexpectedReply { expected: "action" });
                None
            }
            Err(e) => {
                self.report(&e);
                None
            }
        };
        Ok(action)
    }

    /// Tell the bot how the round ended and collect its log output.
    ///
    /// Returns the entries accepted this round. Once the player's byte budget
    /// is spent a single [`LOG_LIMIT_MARKER`] is added and later entries are
    /// dropped. Never fails; errors are logged and yield no entries.
    pub async fn end_round(
        &mut self,
        hand: &[Card],
        opponent_hand: &[Card],
        board: &[Card],
        new_actions: &mut VecDeque<Action>,
        delta: i32,
        is_match_over: bool,
    ) -> Vec<String> {
        self.bankroll += i64::from(delta);
        let new_actions = drain_actions(new_actions);
        if self.clock_exhausted() {
            return Vec::new();
        }
        let envelope = self.envelope(Request::EndRound {
            player_hand: cards_to_wire(hand),
            opponent_hand: cards_to_wire(opponent_hand),
            board_cards: cards_to_wire(board),
            new_actions,
            delta,
            is_match_over,
        });

        match self.call_once(&envelope, self.config.end_round_timeout()).await {
            Ok(Reply::Logs { logs }) => self.accept_logs(logs),
            Ok(_) => {
                self.report(&TransportError::UnexpectedReply { expected: "logs" });
                Vec::new()
            }
            Err(e) => {
                self.report(&e);
                Vec::new()
            }
        }
    }

    fn accept_logs(&mut self, entries: Vec<String>) -> Vec<String> {
        let limit = self.config.player_log_limit;
        let mut accepted = Vec::new();
        for entry in entries {
            if self.log_size + entry.len() <= limit {
                self.log_size += entry.len();
                accepted.push(entry);
            } else {
                if self.log_size < limit {
                    warn!(player = %self.name, limit, "bot log limit reached");
                    accepted.push(LOG_LIMIT_MARKER.to_string());
                    self.log_size = limit;
                }
                break;
            }
        }
        self.log.extend(accepted.iter().cloned());
        accepted
    }

    fn envelope(&self, request: Request) -> Envelope {
        Envelope {
            auth_token: self.auth_token.clone(),
            request,
        }
    }

    async fn call_once(&mut self, envelope: &Envelope, limit: Duration) -> Result<Reply, TransportError> {
        match tokio::time::timeout(limit, self.transport.call(envelope)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(limit)),
        }
    }

    /// Retries only failures where no response was received.
    async fn call_with_retry(
        &mut self,
        envelope: &Envelope,
        limit: Duration,
        policy: RetryPolicy,
    ) -> Result<Reply, TransportError> {
        let mut attempt = 1;
        loop {
            match self.call_once(envelope, limit).await {
                Err(e) if e.is_retryable() && policy.allows_retry(attempt) => {
                    debug!(player = %self.name, attempt, kind = envelope.request.kind(), error = %e, "retrying");
                    policy.backoff().await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn exhausted(&self) -> ClientError {
        ClientError::GameClockExhausted {
            player: self.name.clone(),
        }
    }

    fn report(&self, err: &TransportError) {
        log_error(&self.name, err, err.severity());
    }
}

/// Run both players' readiness checks at the same time.
pub async fn check_ready_both<A, B>(
    first: &mut RemoteClient<A>,
    second: &mut RemoteClient<B>,
    player_names: &[String],
) -> (bool, bool)
where
    A: Transport,
    B: Transport,
{
    tokio::join!(
        first.check_ready(player_names),
        second.check_ready(player_names)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ActionType, WireAction};
    use arena_engine::cards::parse_cards;
    use async_trait::async_trait;

    enum Step {
        Reply(Reply),
        After(Duration, Reply),
        Refuse,
        Garbage,
    }

    /// Plays back canned replies and records every request.
    struct Scripted {
        steps: VecDeque<Step>,
        sent: Vec<Envelope>,
        refuse_connects: u32,
        connects: u32,
    }

    impl Scripted {
        fn new(steps: impl IntoIterator<Item = Step>) -> Self {
            Self {
                steps: steps.into_iter().collect(),
                sent: Vec::new(),
                refuse_connects: 0,
                connects: 0,
            }
        }
    }

    fn refused() -> TransportError {
        TransportError::Connect {
            endpoint: "scripted".into(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        fn endpoint(&self) -> &str {
            "scripted"
        }

        async fn connect(&mut self) -> Result<(), TransportError> {
            self.connects += 1;
            if self.refuse_connects > 0 {
                self.refuse_connects -= 1;
                return Err(refused());
            }
            Ok(())
        }

        async fn call(&mut self, envelope: &Envelope) -> Result<Reply, TransportError> {
            self.sent.push(envelope.clone());
            match self.steps.pop_front() {
                Some(Step::Reply(reply)) => Ok(reply),
                Some(Step::After(delay, reply)) => {
                    tokio::time::sleep(delay).await;
                    Ok(reply)
                }
                Some(Step::Refuse) => Err(refused()),
                Some(Step::Garbage) => Err(TransportError::Malformed("expected value".into())),
                None => Err(TransportError::Closed),
            }
        }
    }

    fn client(steps: impl IntoIterator<Item = Step>) -> RemoteClient<Scripted> {
        RemoteClient::new("bot", Some("token".into()), Scripted::new(steps), ClientConfig::default())
    }

    fn action(action: Action) -> Step {
        Step::Reply(Reply::Action {
            action: WireAction::from(action),
        })
    }

    fn hand() -> Vec<Card> {
        parse_cards("9s 9h").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn request_action_sends_the_delta_and_decodes_the_reply() {
        let mut c = client([action(Action::Raise(8))]);
        let mut pending = VecDeque::from([Action::Call, Action::Check]);
        let board = parse_cards("5s").unwrap();

        let got = c.request_action(&hand(), &board, &mut pending).await.unwrap();
        assert_eq!(got, Some(Action::Raise(8)));
        assert!(pending.is_empty());

        let sent = &c.transport().sent[0];
        assert_eq!(sent.auth_token.as_deref(), Some("token"));
        let Request::RequestAction {
            game_clock,
            player_hand,
            board_cards,
            new_actions,
        } = &sent.request
        else {
            panic!("sent {:?}", sent.request);
        };
        assert_eq!(*game_clock, 30.0);
        assert_eq!(player_hand, &vec!["9s".to_string(), "9h".to_string()]);
        assert_eq!(board_cards, &vec!["5s".to_string()]);
        assert_eq!(new_actions.len(), 2);
        assert_eq!(new_actions[0].action, ActionType::Call);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_charges_the_clock_and_yields_no_action() {
        let mut c = client([Step::After(
            Duration::from_secs(10),
            Reply::Action {
                action: WireAction::from(Action::Call),
            },
        )]);
        let got = c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap();
        assert_eq!(got, None);
        assert!((c.game_clock() - 28.0).abs() < 1e-3, "clock {}", c.game_clock());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_reply_is_charged_in_full() {
        let mut c = client([Step::After(
            Duration::from_millis(1500),
            Reply::Action {
                action: WireAction::from(Action::Check),
            },
        )]);
        let got = c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap();
        assert_eq!(got, Some(Action::Check));
        assert!((c.game_clock() - 28.5).abs() < 1e-3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_clock_fails_fast_without_io() {
        let config = ClientConfig {
            starting_game_clock: 3.0,
            ..ClientConfig::default()
        };
        let hang = || {
            Step::After(
                Duration::from_secs(60),
                Reply::Action {
                    action: WireAction::from(Action::Call),
                },
            )
        };
        let mut c = RemoteClient::new("slow", None, Scripted::new([hang(), hang(), hang()]), config);

        assert_eq!(c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap(), None);
        let err = c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::GameClockExhausted { .. }));
        assert!(c.clock_exhausted());

        let mut pending = VecDeque::from([Action::Fold]);
        let err = c.request_action(&hand(), &[], &mut pending).await.unwrap_err();
        assert!(matches!(err, ClientError::GameClockExhausted { .. }));
        assert_eq!(c.transport().sent.len(), 2);
        assert!(pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unenforced_clock_never_runs_out() {
        let config = ClientConfig {
            starting_game_clock: 1.0,
            enforce_game_clock: false,
            ..ClientConfig::default()
        };
        let mut c = RemoteClient::new("slow", None, Scripted::new([]), config);
        for _ in 0..3 {
            assert_eq!(c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap(), None);
        }
        assert_eq!(c.game_clock(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn connection_failures_are_retried_but_bad_replies_are_not() {
        let mut c = client([Step::Refuse, action(Action::Fold)]);
        let got = c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap();
        assert_eq!(got, Some(Action::Fold));
        assert_eq!(c.transport().sent.len(), 2);

        let mut c = client([Step::Garbage, action(Action::Fold)]);
        let got = c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap();
        assert_eq!(got, None);
        assert_eq!(c.transport().sent.len(), 1);

        let mut c = client([Step::Reply(Reply::Ready { ready: true })]);
        let got = c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_stop_at_the_policy_limit() {
        let mut c = client([Step::Refuse, Step::Refuse, action(Action::Call)]);
        let got = c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap();
        assert_eq!(got, None);
        assert_eq!(c.transport().sent.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn check_ready_retries_until_ready() {
        let mut c = client([
            Step::Reply(Reply::Ready { ready: false }),
            Step::Garbage,
            Step::Reply(Reply::Ready { ready: true }),
        ]);
        assert!(c.check_ready(&["A".into(), "B".into()]).await);
        assert_eq!(c.transport().sent.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn check_ready_gives_up_after_every_attempt() {
        let mut c = client([]);
        assert!(!c.check_ready(&["A".into()]).await);
        assert_eq!(c.transport().sent.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn connect_retries_refusals() {
        let mut transport = Scripted::new([]);
        transport.refuse_connects = 2;
        let mut c = RemoteClient::new("bot", None, transport, ClientConfig::default());
        c.connect().await.unwrap();
        assert_eq!(c.transport().connects, 3);

        let mut transport = Scripted::new([]);
        transport.refuse_connects = 10;
        let mut c = RemoteClient::new("bot", None, transport, ClientConfig::default());
        let err = c.connect().await.unwrap_err();
        assert!(matches!(err, ClientError::ConnectFailed { attempts: 5, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn end_round_caps_the_log_with_one_marker() {
        let config = ClientConfig {
            player_log_limit: 10,
            ..ClientConfig::default()
        };
        let logs = |entries: &[&str]| {
            Step::Reply(Reply::Logs {
                logs: entries.iter().map(|s| s.to_string()).collect(),
            })
        };
        let steps = [logs(&["abcd", "efgh", "ijkl", "mn"]), logs(&["x"])];
        let mut c = RemoteClient::new("bot", None, Scripted::new(steps), config);
        let opp = parse_cards("1s 1h").unwrap();

        let first = c.end_round(&hand(), &opp, &[], &mut VecDeque::new(), 2, false).await;
        assert_eq!(first, vec!["abcd", "efgh", LOG_LIMIT_MARKER]);

        let second = c.end_round(&hand(), &opp, &[], &mut VecDeque::new(), -5, true).await;
        assert!(second.is_empty());
        assert_eq!(c.log().len(), 3);
        assert_eq!(c.bankroll(), -3);
    }

    #[tokio::test(start_paused = true)]
    async fn end_round_swallows_errors_but_keeps_the_bankroll() {
        let mut c = client([Step::Garbage]);
        let logs = c.end_round(&hand(), &hand(), &[], &mut VecDeque::new(), 7, false).await;
        assert!(logs.is_empty());
        assert_eq!(c.bankroll(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn both_players_are_checked_concurrently() {
        let ready_after = |secs| Step::After(Duration::from_secs(secs), Reply::Ready { ready: true });
        let mut a = client([ready_after(3)]);
        let mut b = client([ready_after(3)]);
        let start = Instant::now();
        let names = vec!["A".to_string(), "B".to_string()];
        assert_eq!(check_ready_both(&mut a, &mut b, &names).await, (true, true));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn bot_failures_are_logged_with_the_player() {
        use crate::logging::TestLogSubscriber;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::Registry;

        let capture = TestLogSubscriber::new();
        let registry = Registry::default().with(capture.clone().into_layer::<Registry>());
        let _guard = tracing::subscriber::set_default(registry);

        let mut c = client([Step::Garbage]);
        assert_eq!(c.request_action(&hand(), &[], &mut VecDeque::new()).await.unwrap(), None);

        let entries = capture.entries();
        let failure = entries
            .iter()
            .find(|e| e.message == "bot error")
            .expect("bot error logged");
        assert_eq!(failure.level, tracing::Level::INFO);
        assert_eq!(failure.field("player"), Some("bot"));
        assert!(entries.iter().any(|e| e.field("elapsed_ms").is_some()));
    }
}
