//! Background polling of a payment's status.
//!
//! Mobile money confirmation is asynchronous: the customer approves the
//! charge on their handset while the confirmation page waits. The poller
//! re-verifies the payment on a fixed interval and publishes each status
//! change to observers over a `tokio::sync::watch` channel.
//!
//! The verify call is awaited inline in the tick loop, so at most one
//! request is ever in flight. A failed verify is logged and skipped; the
//! next tick tries again. Polling ends on a terminal status or when the
//! overall window elapses; the window elapsing is silent and the last
//! known status stays on screen.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::api::PaymentGateway;
use crate::api::types::Payment;
use crate::config::CheckoutConfig;

/// Timing for one polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Delay between verify calls.
    pub interval: Duration,
    /// Total polling window, measured from start.
    pub timeout: Duration,
}

impl PollerConfig {
    /// The checkout confirmation page: poll every 5 seconds.
    #[must_use]
    pub const fn checkout() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
        }
    }

    /// The standalone order status page: poll every 10 seconds.
    #[must_use]
    pub const fn status_page() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(300),
        }
    }

    /// Timing taken from the environment configuration.
    #[must_use]
    pub const fn from_config(config: &CheckoutConfig) -> Self {
        Self {
            interval: config.poll_interval,
            timeout: config.poll_timeout,
        }
    }
}

/// Handle to a running polling task.
///
/// Dropping the handle aborts the task; navigating away from the
/// confirmation page must not leave a poller running.
pub struct PaymentPoller {
    handle: JoinHandle<()>,
    receiver: watch::Receiver<Payment>,
}

impl PaymentPoller {
    /// Spawn a polling task for the given payment.
    ///
    /// The first verify happens immediately, then every
    /// `config.interval` until a terminal status or the end of the
    /// polling window.
    #[must_use]
    pub fn start(
        gateway: Arc<dyn PaymentGateway>,
        payment: Payment,
        config: PollerConfig,
    ) -> Self {
        let (sender, receiver) = watch::channel(payment.clone());
        let handle = tokio::spawn(run(gateway, payment, config, sender));
        Self { handle, receiver }
    }

    /// Subscribe to status changes.
    ///
    /// The channel holds the latest payment record; `changed()` resolves
    /// each time a verify call reports a different status.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Payment> {
        self.receiver.clone()
    }

    /// The most recently published payment record.
    #[must_use]
    pub fn latest(&self) -> Payment {
        self.receiver.borrow().clone()
    }

    /// Whether the polling task has ended (terminal status or window
    /// elapsed).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop polling now.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for PaymentPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    gateway: Arc<dyn PaymentGateway>,
    mut payment: Payment,
    config: PollerConfig,
    sender: watch::Sender<Payment>,
) {
    let payment_id = payment.id;
    let deadline = Instant::now() + config.timeout;
    let mut interval = tokio::time::interval(config.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if Instant::now() >= deadline {
            debug!(%payment_id, status = %payment.status, "polling window elapsed");
            return;
        }

        match gateway.verify_payment(payment_id).await {
            Ok(update) => {
                let changed = update.status != payment.status;
                payment.apply(&update);
                if changed {
                    debug!(%payment_id, status = %payment.status, "payment status changed");
                    // Only fails when every receiver is gone, which only
                    // happens while the task is being aborted.
                    let _ = sender.send(payment.clone());
                }
                if payment.status.is_terminal() {
                    debug!(%payment_id, status = %payment.status, "payment reached terminal status");
                    return;
                }
            }
            Err(err) => {
                // Transient; the next tick retries.
                warn!(%payment_id, error = %err, "payment verify failed");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use kikuubo_core::{Money, OrderId, PaymentId, PaymentStatus};

    use super::*;
    use crate::api::ApiError;
    use crate::api::types::{
        CheckPhoneRequest, CheckPhoneResponse, CreateOrderRequest, CreatePaymentRequest, Order,
        PaymentMethodInfo, PaymentStatusUpdate,
    };

    fn pending_payment() -> Payment {
        Payment {
            id: PaymentId::new(21),
            order_id: OrderId::new(11),
            payment_method: "mtn_momo".to_owned(),
            status: PaymentStatus::Pending,
            reference_number: Some("REF-21".to_owned()),
            transaction_id: None,
            amount: Money::from_shillings(9_000),
            failure_reason: None,
            created_at: None,
        }
    }

    fn update(status: PaymentStatus) -> PaymentStatusUpdate {
        PaymentStatusUpdate {
            status,
            transaction_id: None,
            failure_reason: None,
        }
    }

    /// Replays a scripted sequence of verify responses, then repeats the
    /// last one forever.
    struct ScriptedGateway {
        script: Mutex<VecDeque<Result<PaymentStatusUpdate, ApiError>>>,
        fallback: PaymentStatusUpdate,
        verify_calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(
            script: Vec<Result<PaymentStatusUpdate, ApiError>>,
            fallback: PaymentStatusUpdate,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                fallback,
                verify_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PaymentGateway for ScriptedGateway {
        async fn payment_methods(&self) -> Result<Vec<PaymentMethodInfo>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_order(&self, _request: &CreateOrderRequest) -> Result<Order, ApiError> {
            Err(ApiError::Parse("not scripted".to_owned()))
        }

        async fn create_payment(
            &self,
            _request: &CreatePaymentRequest,
        ) -> Result<Payment, ApiError> {
            Err(ApiError::Parse("not scripted".to_owned()))
        }

        async fn verify_payment(&self, _id: PaymentId) -> Result<PaymentStatusUpdate, ApiError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(self.fallback.clone()))
        }

        async fn cancel_payment(&self, _id: PaymentId) -> Result<PaymentStatusUpdate, ApiError> {
            Err(ApiError::Parse("not scripted".to_owned()))
        }

        async fn check_phone(
            &self,
            _request: &CheckPhoneRequest,
        ) -> Result<CheckPhoneResponse, ApiError> {
            Ok(CheckPhoneResponse {
                valid: true,
                message: None,
            })
        }
    }

    async fn wait_until_finished(poller: &PaymentPoller) {
        while !poller.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_terminal_status() {
        let gateway = ScriptedGateway::new(
            vec![
                Ok(update(PaymentStatus::Processing)),
                Ok(update(PaymentStatus::Processing)),
                Ok(update(PaymentStatus::Completed)),
            ],
            update(PaymentStatus::Completed),
        );
        let poller = PaymentPoller::start(
            Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
            pending_payment(),
            PollerConfig::checkout(),
        );

        wait_until_finished(&poller).await;

        assert_eq!(poller.latest().status, PaymentStatus::Completed);
        // Three verifies, then the terminal status stops the loop.
        assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_only_on_change() {
        let gateway = ScriptedGateway::new(
            vec![
                // Same as the starting status: no publish.
                Ok(update(PaymentStatus::Pending)),
                Ok(update(PaymentStatus::Processing)),
                Ok(update(PaymentStatus::Completed)),
            ],
            update(PaymentStatus::Completed),
        );
        let poller = PaymentPoller::start(
            Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
            pending_payment(),
            PollerConfig::checkout(),
        );
        let mut receiver = poller.subscribe();

        let mut seen = Vec::new();
        while receiver.changed().await.is_ok() {
            seen.push(receiver.borrow_and_update().status);
        }

        assert_eq!(seen, vec![PaymentStatus::Processing, PaymentStatus::Completed]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_failure_does_not_abort_polling() {
        let gateway = ScriptedGateway::new(
            vec![
                Err(ApiError::Api {
                    status: 503,
                    message: "busy".to_owned(),
                }),
                Ok(update(PaymentStatus::Failed)),
            ],
            update(PaymentStatus::Failed),
        );
        let poller = PaymentPoller::start(
            Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
            pending_payment(),
            PollerConfig::checkout(),
        );

        wait_until_finished(&poller).await;

        assert_eq!(poller.latest().status, PaymentStatus::Failed);
        assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_elapses_silently() {
        // Never leaves processing.
        let gateway = ScriptedGateway::new(vec![], update(PaymentStatus::Processing));
        let poller = PaymentPoller::start(
            Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
            pending_payment(),
            PollerConfig::checkout(),
        );

        wait_until_finished(&poller).await;

        // 5s interval over a 300s window: verifies at 0s..295s, then the
        // 300s tick hits the deadline and stops.
        assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), 60);
        // Last known status is retained, not reset.
        assert_eq!(poller.latest().status, PaymentStatus::Processing);

        // No further calls after the window.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_polling() {
        let gateway = ScriptedGateway::new(vec![], update(PaymentStatus::Processing));
        let poller = PaymentPoller::start(
            Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
            pending_payment(),
            PollerConfig::checkout(),
        );

        tokio::time::sleep(Duration::from_secs(12)).await;
        let calls_before_drop = gateway.verify_calls.load(Ordering::SeqCst);
        assert!(calls_before_drop >= 2);
        drop(poller);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), calls_before_drop);
    }

    #[test]
    fn test_config_variants() {
        assert_eq!(PollerConfig::checkout().interval, Duration::from_secs(5));
        assert_eq!(PollerConfig::status_page().interval, Duration::from_secs(10));
        assert_eq!(PollerConfig::checkout().timeout, Duration::from_secs(300));
    }
}
