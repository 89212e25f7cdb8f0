use std::sync::Arc;

use polaris_chain::{LedgerClient, OperationDescriptor, ReadQuery, WalletConnection};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::PolarisConfig;
use crate::error::PolarisError;
use crate::notifications::NotificationTimer;
use crate::refresher::ReadRefresher;
use crate::transaction::{TransactionController, TransactionEvent, TransactionStatus};

/// One write flow: a controller whose outcomes refresh a dependent read and
/// drive a notification.
///
/// - submit or reset: the indicator is dismissed
/// - success: the read is refreshed once and a success indicator is shown
/// - failure: a persistent error indicator is shown
///
/// Owners must call [`dispose`](Self::dispose) when the flow goes away.
pub struct WriteFlow {
    controller: TransactionController,
    refresher: ReadRefresher,
    notifier: NotificationTimer,
}

impl WriteFlow {
    pub fn new(
        controller: TransactionController,
        refresher: ReadRefresher,
        notifier: NotificationTimer,
    ) -> Self {
        {
            let refresher = refresher.clone();
            let notifier = notifier.clone();
            controller.on_event(move |event| match event {
                TransactionEvent::Submitted { .. } | TransactionEvent::Reset => notifier.dismiss(),
                TransactionEvent::Succeeded { id, .. } => {
                    debug!(tx_id = %id, query = %refresher.query(), "refreshing dependent read");
                    refresher.refresh();
                    notifier.show_success();
                }
                TransactionEvent::Failed { .. } => {
                    notifier.show_error();
                }
            });
        }
        Self {
            controller,
            refresher,
            notifier,
        }
    }

    /// Build the controller, refresher and timer from shared collaborators.
    pub fn from_parts(
        ledger: Arc<dyn LedgerClient>,
        wallet: Arc<dyn WalletConnection>,
        query: ReadQuery,
        config: &PolarisConfig,
    ) -> Self {
        Self::new(
            TransactionController::new(ledger.clone(), wallet),
            ReadRefresher::new(ledger, query),
            NotificationTimer::new(config.success_notice()),
        )
    }

    pub fn submit(
        &self,
        descriptor: OperationDescriptor,
    ) -> Result<JoinHandle<TransactionStatus>, PolarisError> {
        self.controller.submit(descriptor)
    }

    pub fn reset(&self) {
        self.controller.reset();
    }

    /// Cancel timers and in-flight reads and writes, then detach listeners.
    pub fn dispose(&self) {
        self.controller.dispose();
        self.notifier.dispose();
        self.refresher.dispose();
    }

    pub fn controller(&self) -> &TransactionController {
        &self.controller
    }

    pub fn refresher(&self) -> &ReadRefresher {
        &self.refresher
    }

    pub fn notifier(&self) -> &NotificationTimer {
        &self.notifier
    }
}
