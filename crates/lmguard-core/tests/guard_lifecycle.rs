//! End-to-end tests of the guard against the scripted host.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lmguard_core::{
    Availability, CancelReason, CancellationToken, ChatMessage, DownloadPolicy,
    DownloadProgressPort, GuardError, GuardSettings, HostError, HostSession, InitOptions,
    InitializeResult, Instance, LanguageModelHost, ModelGuard, PromptOptions, ScriptedHost,
    SessionOptions,
};

fn guard_for(host: &Arc<ScriptedHost>) -> ModelGuard {
    ModelGuard::new(host.clone(), GuardSettings::default())
}

async fn ready_instance(guard: &ModelGuard, system_prompt: Option<&str>) -> Instance {
    let mut options = InitOptions::default();
    options.system_prompt = system_prompt.map(str::to_string);
    guard
        .initialize(options)
        .await
        .unwrap()
        .into_instance()
        .unwrap()
}

#[tokio::test]
async fn test_instance_ids_are_unique_across_initializations() {
    let host = Arc::new(ScriptedHost::new());
    let guard = guard_for(&host);

    let mut ids = HashSet::new();
    for _ in 0..50 {
        ids.insert(ready_instance(&guard, None).await.id());
    }
    assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn test_downloadable_inline_download_yields_ready_instance() {
    let host = Arc::new(
        ScriptedHost::new()
            .with_availability(Availability::Downloadable)
            .with_download_steps(4),
    );
    let guard = guard_for(&host);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let options = InitOptions::default()
        .with_system_prompt("You are terse.")
        .with_download_progress(Arc::new(move |pct| sink.lock().unwrap().push(pct)));

    let instance = guard
        .initialize(options)
        .await
        .unwrap()
        .into_instance()
        .unwrap();

    assert_eq!(instance.system_prompt(), Some("You are terse."));
    assert_eq!(*seen.lock().unwrap(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);

    let stats = host.stats();
    assert_eq!(stats.downloads, 1);
    // The download session is not the caller's and is torn down.
    assert_eq!(stats.sessions_created, stats.sessions_destroyed);
}

#[tokio::test]
async fn test_unavailable_fails_without_download_or_session() {
    let host = Arc::new(ScriptedHost::new().with_availability(Availability::Unavailable));
    let guard = guard_for(&host);

    let err = guard.initialize(InitOptions::default()).await.unwrap_err();
    assert_eq!(err, GuardError::CapabilityUnavailable);

    let stats = host.stats();
    assert_eq!(stats.downloads, 0);
    assert_eq!(stats.sessions_created, 0);
}

#[tokio::test]
async fn test_absent_capability() {
    let host = Arc::new(ScriptedHost::absent());
    let guard = guard_for(&host);

    assert_eq!(guard.availability().await, Err(GuardError::CapabilityAbsent));
    assert_eq!(
        guard.initialize(InitOptions::default()).await.unwrap_err(),
        GuardError::CapabilityAbsent
    );
}

#[tokio::test]
async fn test_download_that_leaves_model_downloading_is_not_ready() {
    let host = Arc::new(
        ScriptedHost::new()
            .with_availability(Availability::Downloadable)
            .with_availability_after_download(Availability::Downloading),
    );
    let guard = guard_for(&host);

    assert_eq!(
        guard.initialize(InitOptions::default()).await.unwrap_err(),
        GuardError::NotReadyAfterDownload {
            availability: Availability::Downloading
        }
    );
}

#[tokio::test]
async fn test_deferred_policy_waits_for_trigger() {
    let host = Arc::new(ScriptedHost::new().with_availability(Availability::Downloadable));
    let guard = ModelGuard::new(
        host.clone(),
        GuardSettings {
            download_policy: DownloadPolicy::Deferred,
            ..Default::default()
        },
    );

    let result = guard
        .initialize(InitOptions::default().with_system_prompt("A"))
        .await
        .unwrap();
    assert_eq!(host.stats().downloads, 0);

    let InitializeResult::NeedsDownload(pending) = result else {
        panic!("expected a pending download");
    };
    let instance = pending.safe_trigger().await.into_result().unwrap();

    assert_eq!(instance.system_prompt(), Some("A"));
    assert_eq!(host.stats().downloads, 1);
}

#[tokio::test]
async fn test_merge_policy_through_session_creation() {
    let host = Arc::new(ScriptedHost::new());
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, Some("A")).await;

    let session = guard
        .create_session(
            &instance,
            SessionOptions::default().with_initial_prompts(vec![
                ChatMessage::system("B"),
                ChatMessage::user("hello"),
            ]),
        )
        .await
        .unwrap();

    let expected = vec![ChatMessage::system("A"), ChatMessage::user("hello")];
    assert_eq!(session.config().initial_prompts, expected);
    assert_eq!(host.last_session_options().unwrap().initial_prompts, expected);

    session.destroy().await.unwrap();
}

#[tokio::test]
async fn test_with_session_destroys_exactly_once_on_every_path() {
    let host = Arc::new(ScriptedHost::new());
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, None).await;

    let ok = guard
        .with_session(&instance, SessionOptions::default(), |session| async move {
            session.prompt("hi", &PromptOptions::default()).await
        })
        .await;
    assert_eq!(ok.as_deref(), Ok("echo: hi"));
    assert_eq!(host.stats().sessions_destroyed, 1);

    let failed = guard
        .safe_with_session(&instance, SessionOptions::default(), |_| async {
            Err::<(), _>(GuardError::callback("rejected"))
        })
        .await;
    assert_eq!(failed.error(), Some(&GuardError::callback("rejected")));
    assert_eq!(host.stats().sessions_destroyed, 2);

    let panicking_guard = guard.clone();
    let panicking_instance = instance.clone();
    let joined = tokio::spawn(async move {
        panicking_guard
            .with_session(&panicking_instance, SessionOptions::default(), |_| async {
                if true {
                    panic!("callback raised");
                }
                Ok(())
            })
            .await
    })
    .await;
    assert!(joined.unwrap_err().is_panic());

    let stats = host.stats();
    assert_eq!(stats.sessions_created, 3);
    assert_eq!(stats.sessions_destroyed, 3);
}

#[tokio::test]
async fn test_check_token_usage_is_idempotent() {
    let host = Arc::new(ScriptedHost::new().with_input_quota(64));
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, Some("be brief")).await;

    let first = guard
        .check_token_usage(&instance, "how many tokens is this", SessionOptions::default())
        .await
        .unwrap();
    let second = guard
        .check_token_usage(&instance, "how many tokens is this", SessionOptions::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.prompt_tokens, 5);
    assert_eq!(first.max_tokens, 64);
    // The merged system prompt is pre-charged by the host.
    assert_eq!(first.tokens_so_far, 2);
    assert_eq!(first.tokens_available, first.max_tokens - first.tokens_so_far);
    assert_eq!(first.will_fit, first.prompt_tokens <= first.tokens_available);

    let stats = host.stats();
    assert_eq!(stats.sessions_created, stats.sessions_destroyed);
    assert_eq!(stats.prompts, 0);
}

#[tokio::test]
async fn test_prompt_that_does_not_fit() {
    let host = Arc::new(ScriptedHost::new().with_input_quota(3));
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, None).await;

    let info = guard
        .check_token_usage(&instance, "one two three four", SessionOptions::default())
        .await
        .unwrap();
    assert!(!info.will_fit);

    let err = guard
        .prompt(
            &instance,
            "one two three four",
            None,
            PromptOptions::default(),
            SessionOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GuardError::Generation { .. }));
    assert!(err.to_string().contains("Quota exceeded"));
}

#[tokio::test]
async fn test_prompt_timeout_reports_cancellation() {
    let host = Arc::new(ScriptedHost::new().with_response_delay(Duration::from_secs(10)));
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, None).await;

    let started = Instant::now();
    let err = guard
        .prompt(
            &instance,
            "slow",
            Some(Duration::from_millis(10)),
            PromptOptions::default(),
            SessionOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(started.elapsed() >= Duration::from_millis(10));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(
        err,
        GuardError::Cancelled {
            reason: CancelReason::Timeout { after_ms: 10 }
        }
    );
    assert!(err.is_cancellation());
    assert_eq!(host.stats().sessions_destroyed, 1);
}

#[tokio::test]
async fn test_default_timeout_from_settings() {
    let host = Arc::new(ScriptedHost::new().with_response_delay(Duration::from_secs(10)));
    let guard = ModelGuard::new(
        host.clone(),
        GuardSettings {
            default_prompt_timeout_ms: Some(15),
            ..Default::default()
        },
    );
    let instance = ready_instance(&guard, None).await;

    let outcome = guard
        .safe_prompt(
            &instance,
            "slow",
            None,
            PromptOptions::default(),
            SessionOptions::default(),
        )
        .await;
    assert_eq!(
        outcome.error(),
        Some(&GuardError::Cancelled {
            reason: CancelReason::Timeout { after_ms: 15 }
        })
    );
}

#[tokio::test]
async fn test_caller_signal_aborts_prompt() {
    let host = Arc::new(ScriptedHost::new().with_response_delay(Duration::from_secs(10)));
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, None).await;

    let signal = CancellationToken::new();
    let canceller = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        canceller.cancel();
    });

    let err = guard
        .prompt(
            &instance,
            "slow",
            Some(Duration::from_secs(60)),
            PromptOptions::default().with_signal(signal),
            SessionOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GuardError::Cancelled {
            reason: CancelReason::Aborted
        }
    );
}

/// Host that records the signal each prompt receives.
struct SignalRecordingHost {
    inner: ScriptedHost,
    signals: Arc<Mutex<Vec<CancellationToken>>>,
}

struct SignalRecordingSession {
    inner: Box<dyn HostSession>,
    signals: Arc<Mutex<Vec<CancellationToken>>>,
}

#[async_trait]
impl LanguageModelHost for SignalRecordingHost {
    fn is_present(&self) -> bool {
        self.inner.is_present()
    }

    async fn availability(&self) -> Result<Availability, HostError> {
        self.inner.availability().await
    }

    async fn create_session(
        &self,
        options: SessionOptions,
        monitor: Option<Arc<dyn DownloadProgressPort>>,
    ) -> Result<Box<dyn HostSession>, HostError> {
        Ok(Box::new(SignalRecordingSession {
            inner: self.inner.create_session(options, monitor).await?,
            signals: self.signals.clone(),
        }))
    }
}

#[async_trait]
impl HostSession for SignalRecordingSession {
    async fn prompt(&self, input: &str, options: &PromptOptions) -> Result<String, HostError> {
        if let Some(signal) = &options.signal {
            self.signals.lock().unwrap().push(signal.clone());
        }
        self.inner.prompt(input, options).await
    }

    async fn measure_input_usage(&self, input: &str) -> Result<u64, HostError> {
        self.inner.measure_input_usage(input).await
    }

    fn input_quota(&self) -> u64 {
        self.inner.input_quota()
    }

    fn input_usage(&self) -> u64 {
        self.inner.input_usage()
    }

    async fn destroy(&self) -> Result<(), HostError> {
        self.inner.destroy().await
    }
}

#[tokio::test]
async fn test_timer_is_cleared_after_fast_prompt() {
    let signals = Arc::new(Mutex::new(Vec::new()));
    let host = Arc::new(SignalRecordingHost {
        inner: ScriptedHost::new(),
        signals: signals.clone(),
    });
    let guard = ModelGuard::new(host, GuardSettings::default());
    let instance = guard
        .initialize(InitOptions::default())
        .await
        .unwrap()
        .into_instance()
        .unwrap();

    let reply = guard
        .prompt(
            &instance,
            "fast",
            Some(Duration::from_millis(30)),
            PromptOptions::default(),
            SessionOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(reply, "echo: fast");

    tokio::time::sleep(Duration::from_millis(90)).await;

    let signals = signals.lock().unwrap();
    assert_eq!(signals.len(), 1);
    assert!(!signals[0].is_cancelled(), "timer fired after the call returned");
}

#[tokio::test]
async fn test_session_creation_failure_embeds_host_message() {
    let host = Arc::new(
        ScriptedHost::new().with_session_failure(HostError::QuotaExceeded("rate limited".into())),
    );
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, None).await;

    let err = guard
        .prompt(
            &instance,
            "hi",
            None,
            PromptOptions::default(),
            SessionOptions::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GuardError::SessionCreation {
            message: "Quota exceeded: rate limited".to_string()
        }
    );
}

#[tokio::test]
async fn test_stale_instance_fails_on_use() {
    let host = Arc::new(ScriptedHost::new());
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, None).await;

    host.set_availability(Availability::Unavailable);

    let err = guard
        .create_session(&instance, SessionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GuardError::SessionCreation { .. }));
}

#[tokio::test]
async fn test_sessions_keep_conversation_state() {
    let host = Arc::new(ScriptedHost::new());
    let guard = guard_for(&host);
    let instance = ready_instance(&guard, None).await;

    let session = guard
        .create_session(&instance, SessionOptions::default())
        .await
        .unwrap();
    let before = session.input_usage().unwrap();
    session.prompt("one two", &PromptOptions::default()).await.unwrap();
    let after = session.input_usage().unwrap();
    assert!(after > before);

    session.destroy().await.unwrap();
    assert_eq!(
        session.prompt("again", &PromptOptions::default()).await,
        Err(GuardError::SessionDestroyed)
    );
}
