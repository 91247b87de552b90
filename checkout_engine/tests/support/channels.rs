use std::sync::{Arc, Mutex};

use checkout_engine::{AdminNotifier, DirectMessenger, NotificationError, SaleNotice};

/// Records every sale notice it is given. Fails every call if `fail` is set.
#[derive(Clone, Default)]
pub struct RecordingAdmin {
    pub notices: Arc<Mutex<Vec<SaleNotice>>>,
    pub fail: bool,
}

impl RecordingAdmin {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn notices(&self) -> Vec<SaleNotice> {
        self.notices.lock().unwrap().clone()
    }
}

impl AdminNotifier for RecordingAdmin {
    async fn notify_sale(&self, notice: &SaleNotice) -> Result<(), NotificationError> {
        self.notices.lock().unwrap().push(notice.clone());
        if self.fail {
            return Err(NotificationError::Unreachable("webhook is down".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingMessenger {
    pub messages: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl RecordingMessenger {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl DirectMessenger for RecordingMessenger {
    async fn send_direct_message(&self, external_id: &str, text: &str) -> Result<(), NotificationError> {
        self.messages.lock().unwrap().push((external_id.to_string(), text.to_string()));
        if self.fail {
            return Err(NotificationError::RecipientNotFound(external_id.to_string()));
        }
        Ok(())
    }
}
