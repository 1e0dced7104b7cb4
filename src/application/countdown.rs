use crate::domain::countdown::{Countdown, CountdownPhase, PaymentWindow, Tick};
use crate::domain::order::Order;
use crate::domain::ports::{ClockHandle, NotifierHandle, OrderServiceHandle};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

const TICK: Duration = Duration::from_secs(1);

/// Starts payment countdowns for orders.
///
/// Each countdown ticks once per second and, when the payment window closes,
/// asks the order service to cancel the order exactly once. Success and
/// failure both end in [`CountdownPhase::Expired`] and the `on_cancelled`
/// callback; failures additionally raise a user notification.
#[derive(Clone)]
pub struct PaymentCountdown {
    orders: OrderServiceHandle,
    notifier: NotifierHandle,
    clock: ClockHandle,
}

impl PaymentCountdown {
    pub fn new(orders: OrderServiceHandle, notifier: NotifierHandle, clock: ClockHandle) -> Self {
        Self {
            orders,
            notifier,
            clock,
        }
    }

    /// Mounts a countdown for `order` and starts ticking.
    ///
    /// Must be called within a tokio runtime. The returned handle owns the
    /// timer; dropping it stops the countdown.
    pub fn start<F>(&self, order: &Order, window_seconds: u64, on_cancelled: F) -> CountdownHandle
    where
        F: FnOnce(String) + Send + 'static,
    {
        let window = PaymentWindow::new(order.created_at, window_seconds);
        let countdown = Countdown::mount(&window, self.clock.now());
        self.start_mounted(order.id.clone(), countdown, on_cancelled)
    }

    pub fn start_mounted<F>(
        &self,
        order_id: String,
        countdown: Countdown,
        on_cancelled: F,
    ) -> CountdownHandle
    where
        F: FnOnce(String) + Send + 'static,
    {
        let (phase_tx, phase_rx) = watch::channel(countdown.phase());
        let ticker = tokio::spawn(run_countdown(
            order_id,
            countdown,
            self.clone(),
            phase_tx,
            on_cancelled,
        ));
        CountdownHandle {
            phase: phase_rx,
            ticker,
        }
    }
}

/// Owner-side view of a running countdown.
pub struct CountdownHandle {
    phase: watch::Receiver<CountdownPhase>,
    ticker: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn phase(&self) -> CountdownPhase {
        *self.phase.borrow()
    }

    /// Waits for the next phase change and returns the new phase, or `None`
    /// once the countdown will not change any more.
    pub async fn changed(&mut self) -> Option<CountdownPhase> {
        self.phase.changed().await.ok()?;
        Some(*self.phase.borrow_and_update())
    }

    pub async fn wait_until_terminal(&mut self) -> CountdownPhase {
        if let Ok(phase) = self.phase.wait_for(CountdownPhase::is_terminal).await {
            return *phase;
        }
        self.phase()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

async fn run_countdown<F>(
    order_id: String,
    mut countdown: Countdown,
    deps: PaymentCountdown,
    phase_tx: watch::Sender<CountdownPhase>,
    on_cancelled: F,
) where
    F: FnOnce(String) + Send + 'static,
{
    if countdown.phase().is_terminal() {
        debug!(order_id = %order_id, "Payment window already closed at mount");
        return;
    }

    let mut interval = time::interval(TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        match countdown.tick() {
            Tick::Remaining(remaining) => {
                debug!(order_id = %order_id, remaining, "Payment countdown tick");
                phase_tx.send_replace(countdown.phase());
            }
            Tick::Expire => break,
            Tick::Idle => return,
        }
    }
    drop(interval);

    phase_tx.send_replace(countdown.phase());
    info!(order_id = %order_id, "Payment window elapsed, cancelling order");

    // Detached so that tearing down the countdown cannot abort a request
    // that is already on the wire.
    let PaymentCountdown {
        orders, notifier, ..
    } = deps;
    tokio::spawn(async move {
        match orders.cancel_order(&order_id).await {
            Ok(order) => {
                info!(order_id = %order.id, status = ?order.status, "Expired order cancelled")
            }
            Err(e) => {
                error!(order_id = %order_id, error = %e, "Failed to cancel expired order");
                notifier.error("Something went wrong while cancelling the order");
            }
        }

        countdown.settle();
        if phase_tx.send(countdown.phase()).is_err() {
            debug!(order_id = %order_id, "Countdown torn down before cancellation settled");
            return;
        }
        on_cancelled(order_id);
    });
}
