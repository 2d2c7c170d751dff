//! Background execution of explanation requests.
//!
//! Each request runs on its own thread so the UI never blocks on the network.
//! Outcomes are posted to a bounded channel that the UI drains every frame.
//! Overlapping requests are allowed; whichever finishes last is shown.
//! Each worker holds a shared in-flight counter and releases it once its
//! outcome has been offered to the channel, even if the channel was full.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use super::client::{ExplanationError, ExplanationService};
use super::prompt::build_prompt;
use crate::calculations::{Scenario, ScenarioParameters, ScenarioResults};

/// Depth of the worker → UI channel. Only a handful of requests are ever in flight.
pub const EXPLANATION_QUEUE_SIZE: usize = 10;
pub type ExplanationQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, ExplanationEvent, EXPLANATION_QUEUE_SIZE>;
pub type ExplanationQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, ExplanationEvent, EXPLANATION_QUEUE_SIZE>;
pub type ExplanationQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, ExplanationEvent, EXPLANATION_QUEUE_SIZE>;

/// Everything needed to ask for one explanation.
#[derive(Debug, Clone)]
pub struct ExplanationRequest {
    pub request_id: u64,
    pub api_key: String,
    pub params: ScenarioParameters,
    pub results: ScenarioResults,
}

/// Outcome of a request, sent back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplanationEvent {
    Completed { request_id: u64, scenario: Scenario, text: String },
    Failed { request_id: u64, scenario: Scenario, error: ExplanationError },
}

impl ExplanationEvent {
    pub fn scenario(&self) -> Scenario {
        match self {
            ExplanationEvent::Completed { scenario, .. } | ExplanationEvent::Failed { scenario, .. } => *scenario,
        }
    }
}

/// Run `request` against `service` on a new thread and post the outcome to `tx`.
///
/// `in_flight` is incremented before the thread starts and decremented after the
/// outcome is offered to `tx`, so it returns to zero even when results are dropped.
///
/// # Returns
/// The thread handle, or the spawn error if no thread could be created.
pub fn spawn_explanation(
    service: Arc<dyn ExplanationService>,
    request: ExplanationRequest,
    tx: ExplanationQueueSender,
    in_flight: Arc<AtomicU32>,
) -> std::io::Result<thread::JoinHandle<()>> {
    in_flight.fetch_add(1, Ordering::SeqCst);
    let worker_in_flight = in_flight.clone();
    let spawned = thread::Builder::new()
        .name(format!("explanation-{}", request.request_id))
        .spawn(move || {
            let event = run_request(service.as_ref(), &request);
            if tx.try_send(event).is_err() {
                log::warn!("Explanation queue full, dropping result of request {}", request.request_id);
            }
            worker_in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    if spawned.is_err() {
        in_flight.fetch_sub(1, Ordering::SeqCst);
    }
    spawned
}

fn run_request(service: &dyn ExplanationService, request: &ExplanationRequest) -> ExplanationEvent {
    let scenario = request.params.scenario();
    let prompt = build_prompt(&request.params, &request.results);
    log::debug!("Explanation request {} for {} started", request.request_id, scenario.label());

    match service.generate_explanation(&request.api_key, &prompt) {
        Ok(text) => {
            log::debug!("Explanation request {} completed ({} chars)", request.request_id, text.len());
            ExplanationEvent::Completed {
                request_id: request.request_id,
                scenario,
                text,
            }
        }
        Err(error) => {
            log::warn!("Explanation request {} failed: {}", request.request_id, error);
            ExplanationEvent::Failed {
                request_id: request.request_id,
                scenario,
                error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Canned service that records the prompts it receives.
    struct CannedService {
        reply: Result<String, ExplanationError>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedService {
        fn new(reply: Result<String, ExplanationError>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ExplanationService for CannedService {
        fn generate_explanation(&self, _api_key: &str, prompt: &str) -> Result<String, ExplanationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn request(id: u64, scenario: Scenario) -> ExplanationRequest {
        let params = ScenarioParameters::defaults(scenario);
        ExplanationRequest {
            request_id: id,
            api_key: "key".to_string(),
            params,
            results: params.calculate(),
        }
    }

    fn leaked_queue() -> &'static ExplanationQueue {
        Box::leak(Box::new(ExplanationQueue::new()))
    }

    #[test]
    fn completed_request_posts_text() {
        let queue = leaked_queue();
        let service = Arc::new(CannedService::new(Ok("Because physics.".to_string())));

        let in_flight = Arc::new(AtomicU32::new(0));
        spawn_explanation(service.clone(), request(7, Scenario::Ofdm), queue.sender(), in_flight.clone())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);

        let event = queue.try_receive().unwrap();
        assert_eq!(
            event,
            ExplanationEvent::Completed {
                request_id: 7,
                scenario: Scenario::Ofdm,
                text: "Because physics.".to_string()
            }
        );
        let prompts = service.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Scenario: OFDM RATES"));
    }

    #[test]
    fn failed_request_posts_error() {
        let queue = leaked_queue();
        let service = Arc::new(CannedService::new(Err(ExplanationError::Transport("connection refused".to_string()))));

        spawn_explanation(service, request(1, Scenario::DigitalChain), queue.sender(), Arc::new(AtomicU32::new(0)))
            .unwrap()
            .join()
            .unwrap();

        match queue.try_receive().unwrap() {
            ExplanationEvent::Failed { request_id, scenario, error } => {
                assert_eq!(request_id, 1);
                assert_eq!(scenario, Scenario::DigitalChain);
                assert_eq!(error, ExplanationError::Transport("connection refused".to_string()));
            }
            other => panic!("Expected Failed event, got {:?}", other),
        }
    }

    #[test]
    fn overlapping_requests_all_report_back() {
        let queue = leaked_queue();
        let service: Arc<dyn ExplanationService> = Arc::new(CannedService::new(Ok("ok".to_string())));

        let in_flight = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (1..=3)
            .map(|id| spawn_explanation(service.clone(), request(id, Scenario::LinkBudget), queue.sender(), in_flight.clone()).unwrap())
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids = Vec::new();
        while let Ok(event) = queue.try_receive() {
            if let ExplanationEvent::Completed { request_id, .. } = event {
                ids.push(request_id);
            }
        }
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn full_queue_still_releases_in_flight_count() {
        let queue = leaked_queue();
        let service: Arc<dyn ExplanationService> = Arc::new(CannedService::new(Ok("ok".to_string())));
        let in_flight = Arc::new(AtomicU32::new(0));
        let total = EXPLANATION_QUEUE_SIZE as u64 + 2;

        let handles: Vec<_> = (1..=total)
            .map(|id| spawn_explanation(service.clone(), request(id, Scenario::Ofdm), queue.sender(), in_flight.clone()).unwrap())
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
        let mut delivered = 0;
        while queue.try_receive().is_ok() {
            delivered += 1;
        }
        assert_eq!(delivered, EXPLANATION_QUEUE_SIZE);
    }
}
